use serde::Serialize;

/// Lexical category of a token.
///
/// The vocabulary is closed: rules register interest in these variants and
/// the dispatcher indexes rules by them, so downstream plugins never need to
/// pattern-match on raw content to find out what a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    /// Host-language text outside `<?php ... ?>` regions.
    InlineHtml,
    /// `<?php` or the short echo tag `<?=`.
    OpenTag,
    /// `?>`.
    CloseTag,

    // Keywords. Matched case-insensitively by the lexer; the exact source
    // spelling is preserved in the token content.
    Function,
    Class,
    Interface,
    Trait,
    If,
    Else,
    ElseIf,
    For,
    Foreach,
    While,
    Do,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Finally,
    Return,
    Use,
    Namespace,
    Static,
    Public,
    Private,
    Protected,
    Callable,
    SelfKeyword,
    Parent,
    New,
    Echo,
    True,
    False,
    Null,

    /// `$name`.
    Variable,
    /// Bare identifier that is not a keyword.
    Identifier,
    /// `\` between namespace parts.
    NsSeparator,
    Number,

    /// Single-quoted string, or a double-quoted string with no interpolation.
    ConstantString,
    /// Double-quoted string containing `$var` or `{$...}` interpolation,
    /// kept as one opaque token.
    DoubleQuotedString,
    /// `<<<LABEL` opener line of a heredoc or nowdoc.
    HeredocStart,
    /// One body line of a heredoc or nowdoc.
    HeredocBody,
    /// The closing label line.
    HeredocEnd,

    /// `//`, `#`, or `/* ... */` comment.
    Comment,
    /// `/** ... */`.
    DocComment,
    Whitespace,

    /// `?` introducing a nullable type.
    Nullable,
    /// `?` in a ternary expression.
    Ternary,
    Colon,
    Semicolon,
    Comma,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    OpenSquare,
    CloseSquare,
    /// `->` and `?->`.
    Arrow,
    /// `=>`.
    DoubleArrow,
    /// `::`.
    DoubleColon,
    /// Any other operator or punctuation.
    Operator,

    /// A byte sequence the lexer could not classify. Never fatal.
    Unknown,
}

impl TokenType {
    /// Whitespace and comments: the tokens rules skip when looking for the
    /// "next meaningful" token.
    pub fn is_empty(self) -> bool {
        matches!(
            self,
            TokenType::Whitespace | TokenType::Comment | TokenType::DocComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenType::Comment | TokenType::DocComment)
    }

    /// Keywords that own a brace-delimited scope.
    pub fn is_scope_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Function
                | TokenType::Class
                | TokenType::Interface
                | TokenType::Trait
                | TokenType::If
                | TokenType::Else
                | TokenType::ElseIf
                | TokenType::For
                | TokenType::Foreach
                | TokenType::While
                | TokenType::Do
                | TokenType::Switch
                | TokenType::Case
                | TokenType::Default
                | TokenType::Try
                | TokenType::Catch
                | TokenType::Finally
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Function
                | TokenType::Class
                | TokenType::Interface
                | TokenType::Trait
                | TokenType::If
                | TokenType::Else
                | TokenType::ElseIf
                | TokenType::For
                | TokenType::Foreach
                | TokenType::While
                | TokenType::Do
                | TokenType::Switch
                | TokenType::Case
                | TokenType::Default
                | TokenType::Try
                | TokenType::Catch
                | TokenType::Finally
                | TokenType::Return
                | TokenType::Use
                | TokenType::Namespace
                | TokenType::Static
                | TokenType::Public
                | TokenType::Private
                | TokenType::Protected
                | TokenType::Callable
                | TokenType::SelfKeyword
                | TokenType::Parent
                | TokenType::New
                | TokenType::Echo
                | TokenType::True
                | TokenType::False
                | TokenType::Null
        )
    }
}

/// One lexical unit plus the scope annotations added by the indexer.
///
/// `content` is the exact source slice: concatenating every token's content
/// in order reproduces the tokenized input byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub content: String,
    /// 1-based line of the first byte.
    pub line: usize,
    /// 1-based byte column of the first byte.
    pub column: usize,

    /// Nesting depth: number of scopes enclosing this token.
    pub level: u32,
    /// Owner types of the enclosing scopes, outermost first.
    pub conditions: Vec<TokenType>,
    /// Index of the scope-opening brace, set on the owner, the opener itself,
    /// and the closer. `None` for unmatched or scope-free tokens.
    pub scope_opener: Option<usize>,
    pub scope_closer: Option<usize>,
    /// Paired index for `(`/`)` and `[`/`]` tokens.
    pub bracket_opener: Option<usize>,
    pub bracket_closer: Option<usize>,
    /// For parenthesis tokens: the scope-keyword token owning the pair,
    /// e.g. the `if` in `if ($x)`.
    pub parenthesis_owner: Option<usize>,
}

impl Token {
    pub fn new(token_type: TokenType, content: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            content: content.into(),
            line,
            column,
            level: 0,
            conditions: Vec::new(),
            scope_opener: None,
            scope_closer: None,
            bracket_opener: None,
            bracket_closer: None,
            parenthesis_owner: None,
        }
    }

    pub fn length(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty_type(&self) -> bool {
        self.token_type.is_empty()
    }
}

/// Index of the next token after `from` that is not whitespace or a comment.
pub fn find_next_non_empty(tokens: &[Token], from: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| !t.is_empty_type())
        .map(|(i, _)| i)
}

/// Index of the closest token before `from` that is not whitespace or a
/// comment.
pub fn find_prev_non_empty(tokens: &[Token], from: usize) -> Option<usize> {
    let mut i = from.min(tokens.len());
    while i > 0 {
        i -= 1;
        if !tokens[i].is_empty_type() {
            return Some(i);
        }
    }
    None
}
