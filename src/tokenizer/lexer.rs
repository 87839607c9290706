//! Context-sensitive, lossless PHP lexer.
//!
//! The lexer covers the entire input byte for byte: every character lands in
//! exactly one token, malformed constructs produce best-effort tokens rather
//! than errors, and anything unclassifiable becomes [`TokenType::Unknown`].
//! Text outside `<?php ... ?>` regions is emitted as `InlineHtml`, so a file
//! that never opens a PHP region is a single host token.

use crate::tokenizer::token::{Token, TokenType, find_prev_non_empty};

/// Tokenize `text` into an ordered, gap-free token sequence.
///
/// Total: never fails, regardless of how broken the input is. Multi-line
/// tokens (block comments, strings, heredocs) report the line/column of
/// their first byte.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(text);
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

/// Token types after which a `?` reads as a nullable-type marker rather than
/// a ternary operator. Parameter lists, return types, and typed properties.
const NULLABLE_PREV: &[TokenType] = &[
    TokenType::OpenParen,
    TokenType::Comma,
    TokenType::Colon,
    TokenType::Public,
    TokenType::Private,
    TokenType::Protected,
    TokenType::Static,
];

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.src.len() {
            self.lex_host();
            if self.pos < self.src.len() {
                self.lex_php();
            }
        }
        log::debug!("tokenized {} bytes into {} tokens", self.src.len(), self.tokens.len());
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Emit a token covering `self.pos..end` and advance past it.
    fn emit(&mut self, token_type: TokenType, end: usize) {
        debug_assert!(end > self.pos && end <= self.src.len());
        let content = &self.src[self.pos..end];
        self.tokens
            .push(Token::new(token_type, content, self.line, self.column));
        for ch in content.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Consume host text up to the next open tag, then the tag itself.
    fn lex_host(&mut self) {
        let rest = self.rest();
        let mut tag = None;
        let mut search = 0;
        while let Some(off) = rest[search..].find("<?") {
            let at = search + off;
            let after = &rest[at + 2..];
            if after.get(..3).is_some_and(|s| s.eq_ignore_ascii_case("php")) {
                tag = Some((at, at + 5));
                break;
            }
            if after.starts_with('=') {
                tag = Some((at, at + 3));
                break;
            }
            search = at + 2;
        }

        match tag {
            Some((at, tag_end)) => {
                if at > 0 {
                    self.emit(TokenType::InlineHtml, self.pos + at);
                }
                self.emit(TokenType::OpenTag, self.pos + (tag_end - at));
            }
            None => {
                if !rest.is_empty() {
                    self.emit(TokenType::InlineHtml, self.src.len());
                }
            }
        }
    }

    /// Lex PHP code until a `?>` close tag or end of input.
    fn lex_php(&mut self) {
        while let Some(c) = self.peek() {
            let rest = self.rest();
            match c {
                ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(),
                '?' => {
                    if rest.starts_with("?>") {
                        self.emit(TokenType::CloseTag, self.pos + 2);
                        return;
                    }
                    self.lex_question();
                }
                '/' => {
                    if rest.starts_with("//") {
                        self.lex_line_comment(2);
                    } else if rest.starts_with("/*") {
                        self.lex_block_comment();
                    } else if rest.starts_with("/=") {
                        self.emit(TokenType::Operator, self.pos + 2);
                    } else {
                        self.emit(TokenType::Operator, self.pos + 1);
                    }
                }
                '#' => {
                    if rest.starts_with("#[") {
                        // PHP 8 attribute opener.
                        self.emit(TokenType::Operator, self.pos + 2);
                    } else {
                        self.lex_line_comment(1);
                    }
                }
                '\'' => self.lex_single_quoted(),
                '"' => self.lex_double_quoted(),
                '$' => self.lex_variable(),
                '\\' => self.emit(TokenType::NsSeparator, self.pos + 1),
                '<' => {
                    if rest.starts_with("<<<") {
                        if !self.try_heredoc() {
                            self.emit(TokenType::Operator, self.pos + 3);
                        }
                    } else {
                        self.lex_operator();
                    }
                }
                '0'..='9' => self.lex_number(),
                '.' => {
                    if rest[1..].starts_with(|ch: char| ch.is_ascii_digit()) {
                        self.lex_number();
                    } else if rest.starts_with("...") {
                        self.emit(TokenType::Operator, self.pos + 3);
                    } else if rest.starts_with(".=") {
                        self.emit(TokenType::Operator, self.pos + 2);
                    } else {
                        self.emit(TokenType::Operator, self.pos + 1);
                    }
                }
                ';' => self.emit(TokenType::Semicolon, self.pos + 1),
                ',' => self.emit(TokenType::Comma, self.pos + 1),
                ':' => {
                    if rest.starts_with("::") {
                        self.emit(TokenType::DoubleColon, self.pos + 2);
                    } else {
                        self.emit(TokenType::Colon, self.pos + 1);
                    }
                }
                '{' => self.emit(TokenType::OpenCurly, self.pos + 1),
                '}' => self.emit(TokenType::CloseCurly, self.pos + 1),
                '(' => self.emit(TokenType::OpenParen, self.pos + 1),
                ')' => self.emit(TokenType::CloseParen, self.pos + 1),
                '[' => self.emit(TokenType::OpenSquare, self.pos + 1),
                ']' => self.emit(TokenType::CloseSquare, self.pos + 1),
                '-' => {
                    if rest.starts_with("->") {
                        self.emit(TokenType::Arrow, self.pos + 2);
                    } else {
                        self.lex_operator();
                    }
                }
                '=' => {
                    if rest.starts_with("=>") {
                        self.emit(TokenType::DoubleArrow, self.pos + 2);
                    } else {
                        self.lex_operator();
                    }
                }
                c if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() => {
                    self.lex_identifier();
                }
                '+' | '*' | '%' | '!' | '&' | '|' | '^' | '~' | '@' | '>' => self.lex_operator(),
                _ => self.emit(TokenType::Unknown, self.pos + c.len_utf8()),
            }
        }
    }

    /// A whitespace run, cut after the first newline so that indentation and
    /// trailing whitespace are separate per-line tokens.
    fn lex_whitespace(&mut self) {
        let mut end = self.pos;
        for ch in self.rest().chars() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                end += ch.len_utf8();
            } else if ch == '\n' {
                end += 1;
                break;
            } else {
                break;
            }
        }
        self.emit(TokenType::Whitespace, end);
    }

    /// `?` that is not part of `?>`: close-tag handled by the caller.
    fn lex_question(&mut self) {
        let rest = self.rest();
        if rest.starts_with("?->") {
            self.emit(TokenType::Arrow, self.pos + 3);
            return;
        }
        if rest.starts_with("??=") {
            self.emit(TokenType::Operator, self.pos + 3);
            return;
        }
        if rest.starts_with("??") {
            self.emit(TokenType::Operator, self.pos + 2);
            return;
        }
        // Nullable vs ternary is decided from the preceding meaningful
        // token, recorded here so the indexer never has to re-derive it.
        let token_type = match find_prev_non_empty(&self.tokens, self.tokens.len()) {
            Some(prev) if NULLABLE_PREV.contains(&self.tokens[prev].token_type) => {
                TokenType::Nullable
            }
            _ => TokenType::Ternary,
        };
        self.emit(token_type, self.pos + 1);
    }

    /// `//` or `#` comment. Ends at (and includes) the newline, but a close
    /// tag inside the comment still closes the PHP region, so the comment
    /// stops short of it.
    fn lex_line_comment(&mut self, marker_len: usize) {
        let rest = self.rest();
        let mut end = rest.len();
        if let Some(nl) = rest.find('\n') {
            end = nl + 1;
        }
        if let Some(close) = rest[marker_len..end].find("?>") {
            end = marker_len + close;
        }
        self.emit(TokenType::Comment, self.pos + end);
    }

    fn lex_block_comment(&mut self) {
        let rest = self.rest();
        let doc = rest.starts_with("/**") && !rest.starts_with("/**/");
        let end = match rest[2..].find("*/") {
            Some(off) => 2 + off + 2,
            // Unterminated: swallow the rest of the input.
            None => rest.len(),
        };
        let token_type = if doc {
            TokenType::DocComment
        } else {
            TokenType::Comment
        };
        self.emit(token_type, self.pos + end);
    }

    fn lex_single_quoted(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => i += 2,
                b'\'' => {
                    i += 1;
                    break;
                }
                _ => i += 1,
            }
        }
        self.emit(TokenType::ConstantString, self.pos + i.min(rest.len()));
    }

    /// Double-quoted string. One opaque token either way; the type records
    /// whether `$var` or `{$...}` interpolation is present.
    fn lex_double_quoted(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 1;
        let mut interpolated = false;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => i += 2,
                b'"' => {
                    i += 1;
                    break;
                }
                b'$' if i + 1 < bytes.len()
                    && (bytes[i + 1].is_ascii_alphabetic()
                        || bytes[i + 1] == b'_'
                        || bytes[i + 1] >= 0x80) =>
                {
                    interpolated = true;
                    i += 1;
                }
                b'{' if i + 1 < bytes.len() && bytes[i + 1] == b'$' => {
                    interpolated = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        let token_type = if interpolated {
            TokenType::DoubleQuotedString
        } else {
            TokenType::ConstantString
        };
        self.emit(token_type, self.pos + i.min(rest.len()));
    }

    fn lex_variable(&mut self) {
        let rest = self.rest();
        let mut end = 1;
        for ch in rest[1..].chars() {
            if ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii() {
                end += ch.len_utf8();
            } else {
                break;
            }
        }
        if end == 1 {
            // Bare `$`, e.g. variable variables mid-edit.
            self.emit(TokenType::Operator, self.pos + 1);
        } else {
            self.emit(TokenType::Variable, self.pos + end);
        }
    }

    /// Heredoc/nowdoc. The opener line becomes `HeredocStart`, every body
    /// line a `HeredocBody`, and the closing label `HeredocEnd`; with no
    /// closer before end of input the body simply runs to the end.
    fn try_heredoc(&mut self) -> bool {
        let rest = self.rest();
        let mut i = 3;
        let bytes = rest.as_bytes();
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        let quote = match bytes.get(i) {
            Some(b'\'') => {
                i += 1;
                Some(b'\'')
            }
            Some(b'"') => {
                i += 1;
                Some(b'"')
            }
            _ => None,
        };
        let label_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if i == label_start {
            return false;
        }
        let label = rest[label_start..i].to_string();
        if let Some(q) = quote {
            if bytes.get(i) != Some(&q) {
                return false;
            }
            i += 1;
        }
        let Some(nl) = rest[i..].find('\n') else {
            return false;
        };
        // Opener line including its newline.
        self.emit(TokenType::HeredocStart, self.pos + i + nl + 1);

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return true;
            }
            let line_end = rest.find('\n').map(|n| n + 1).unwrap_or(rest.len());
            let line = &rest[..line_end];
            let trimmed = line.trim_start_matches([' ', '\t']);
            if trimmed.starts_with(label.as_str()) {
                let after = &trimmed[label.len()..];
                let is_closer = after
                    .chars()
                    .next()
                    .map(|ch| !(ch.is_ascii_alphanumeric() || ch == '_'))
                    .unwrap_or(true);
                if is_closer {
                    let indent = line.len() - trimmed.len();
                    self.emit(TokenType::HeredocEnd, self.pos + indent + label.len());
                    return true;
                }
            }
            self.emit(TokenType::HeredocBody, self.pos + line_end);
        }
    }

    fn lex_number(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 0;
        if bytes[0] == b'0' && bytes.len() > 1 && matches!(bytes[1] | 0x20, b'x' | b'b' | b'o') {
            i = 2;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
        } else {
            let mut seen_dot = false;
            let mut seen_exp = false;
            while i < bytes.len() {
                match bytes[i] {
                    b'0'..=b'9' | b'_' => i += 1,
                    b'.' if !seen_dot
                        && !seen_exp
                        && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) =>
                    {
                        seen_dot = true;
                        i += 1;
                    }
                    b'e' | b'E' if !seen_exp && i > 0 => {
                        let next = bytes.get(i + 1);
                        let digit_after = match next {
                            Some(b'+') | Some(b'-') => {
                                bytes.get(i + 2).is_some_and(u8::is_ascii_digit)
                            }
                            Some(d) => d.is_ascii_digit(),
                            None => false,
                        };
                        if !digit_after {
                            break;
                        }
                        seen_exp = true;
                        i += if matches!(next, Some(b'+') | Some(b'-')) { 2 } else { 1 };
                    }
                    _ => break,
                }
            }
        }
        self.emit(TokenType::Number, self.pos + i.max(1));
    }

    fn lex_identifier(&mut self) {
        let rest = self.rest();
        let mut end = 0;
        for ch in rest.chars() {
            if ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii() {
                end += ch.len_utf8();
            } else {
                break;
            }
        }
        let word = &rest[..end];
        let token_type = keyword_type(word).unwrap_or(TokenType::Identifier);
        self.emit(token_type, self.pos + end);
    }

    fn lex_operator(&mut self) {
        // Longest match first.
        const THREE: &[&str] = &["===", "!==", "<=>", "<<=", ">>=", "**="];
        const TWO: &[&str] = &[
            "==", "!=", "<>", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "%=",
            "&=", "|=", "^=", "<<", ">>", "**",
        ];
        let rest = self.rest();
        for op in THREE {
            if rest.starts_with(op) {
                self.emit(TokenType::Operator, self.pos + 3);
                return;
            }
        }
        for op in TWO {
            if rest.starts_with(op) {
                self.emit(TokenType::Operator, self.pos + 2);
                return;
            }
        }
        let len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        self.emit(TokenType::Operator, self.pos + len);
    }
}

/// PHP keywords are case-insensitive; the lexer classifies on a lowercase
/// view but the token keeps the source spelling.
fn keyword_type(word: &str) -> Option<TokenType> {
    let lower = word.to_ascii_lowercase();
    let token_type = match lower.as_str() {
        "function" => TokenType::Function,
        "class" => TokenType::Class,
        "interface" => TokenType::Interface,
        "trait" => TokenType::Trait,
        "if" => TokenType::If,
        "else" => TokenType::Else,
        "elseif" => TokenType::ElseIf,
        "for" => TokenType::For,
        "foreach" => TokenType::Foreach,
        "while" => TokenType::While,
        "do" => TokenType::Do,
        "switch" => TokenType::Switch,
        "case" => TokenType::Case,
        "default" => TokenType::Default,
        "try" => TokenType::Try,
        "catch" => TokenType::Catch,
        "finally" => TokenType::Finally,
        "return" => TokenType::Return,
        "use" => TokenType::Use,
        "namespace" => TokenType::Namespace,
        "static" => TokenType::Static,
        "public" => TokenType::Public,
        "private" => TokenType::Private,
        "protected" => TokenType::Protected,
        "callable" => TokenType::Callable,
        "self" => TokenType::SelfKeyword,
        "parent" => TokenType::Parent,
        "new" => TokenType::New,
        "echo" => TokenType::Echo,
        "true" => TokenType::True,
        "false" => TokenType::False,
        "null" => TokenType::Null,
        _ => return None,
    };
    Some(token_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.content.as_str()).collect()
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn lossless_simple_file() {
        let src = "<?php\necho \"hi\";\n";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
    }

    #[test]
    fn host_only_input_is_one_token() {
        let src = "<html><body>no php here</body></html>";
        let tokens = tokenize(src);
        assert_eq!(types(&tokens), vec![TokenType::InlineHtml]);
        assert_eq!(joined(&tokens), src);
    }

    #[test]
    fn embedded_regions_round_trip() {
        let src = "<h1><?php echo $title; ?></h1>\n<p><?= $body ?></p>\n";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert_eq!(tokens[0].token_type, TokenType::InlineHtml);
        assert_eq!(tokens[1].token_type, TokenType::OpenTag);
        assert!(types(&tokens).contains(&TokenType::CloseTag));
    }

    #[test]
    fn close_tag_ends_line_comment() {
        let src = "<?php // trailing ?> html";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        let comment = tokens
            .iter()
            .find(|t| t.token_type == TokenType::Comment)
            .unwrap();
        assert_eq!(comment.content, "// trailing ");
        assert!(types(&tokens).contains(&TokenType::CloseTag));
    }

    #[test]
    fn comment_markers_inside_strings_are_content() {
        let src = "<?php $a = 'not // a comment'; $b = \"nor /* this */\";";
        let tokens = tokenize(src);
        assert!(!types(&tokens).contains(&TokenType::Comment));
        assert_eq!(joined(&tokens), src);
    }

    #[test]
    fn interpolation_switches_string_type() {
        let plain = tokenize("<?php $a = \"just text\";");
        assert!(types(&plain).contains(&TokenType::ConstantString));

        let interp = tokenize("<?php $a = \"hello $name\";");
        assert!(types(&interp).contains(&TokenType::DoubleQuotedString));

        let braced = tokenize("<?php $a = \"hello {$user->name}\";");
        assert!(types(&braced).contains(&TokenType::DoubleQuotedString));

        let escaped = tokenize("<?php $a = \"price \\$5\";");
        assert!(types(&escaped).contains(&TokenType::ConstantString));
    }

    #[test]
    fn multiline_block_comment_position() {
        let src = "<?php\n/* one\n   two */ $x = 1;";
        let tokens = tokenize(src);
        let comment = tokens
            .iter()
            .find(|t| t.token_type == TokenType::Comment)
            .unwrap();
        assert_eq!(comment.line, 2);
        assert_eq!(comment.column, 1);
        assert_eq!(comment.content, "/* one\n   two */");
        let x = tokens
            .iter()
            .find(|t| t.token_type == TokenType::Variable)
            .unwrap();
        assert_eq!(x.line, 3);
        assert_eq!(joined(&tokens), src);
    }

    #[test]
    fn unterminated_string_swallows_rest() {
        let src = "<?php $a = 'oops";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert_eq!(tokens.last().unwrap().token_type, TokenType::ConstantString);
        assert_eq!(tokens.last().unwrap().content, "'oops");
    }

    #[test]
    fn unterminated_block_comment_swallows_rest() {
        let src = "<?php /* never closed";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert_eq!(tokens.last().unwrap().token_type, TokenType::Comment);
    }

    #[test]
    fn heredoc_is_a_structured_subsequence() {
        let src = "<?php $s = <<<EOT\nline one\nline two\nEOT;\n";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert_eq!(
            types(&tokens)
                .into_iter()
                .filter(|t| matches!(
                    t,
                    TokenType::HeredocStart | TokenType::HeredocBody | TokenType::HeredocEnd
                ))
                .collect::<Vec<_>>(),
            vec![
                TokenType::HeredocStart,
                TokenType::HeredocBody,
                TokenType::HeredocBody,
                TokenType::HeredocEnd,
            ]
        );
    }

    #[test]
    fn nowdoc_label_accepted() {
        let src = "<?php $s = <<<'RAW'\n$not_interpolated\nRAW;\n";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert!(types(&tokens).contains(&TokenType::HeredocStart));
    }

    #[test]
    fn unterminated_heredoc_is_tolerated() {
        let src = "<?php $s = <<<EOT\nstill open\n";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert_eq!(tokens.last().unwrap().token_type, TokenType::HeredocBody);
    }

    #[test]
    fn nullable_in_parameter_list() {
        let tokens = tokenize("<?php function f(?int $x) {}");
        let q = tokens
            .iter()
            .find(|t| t.content == "?")
            .unwrap();
        assert_eq!(q.token_type, TokenType::Nullable);
    }

    #[test]
    fn nullable_in_return_type_and_property() {
        let tokens = tokenize("<?php function f(): ?string {}");
        assert!(types(&tokens).contains(&TokenType::Nullable));

        let tokens = tokenize("<?php class C { private ?Foo $foo; }");
        assert!(types(&tokens).contains(&TokenType::Nullable));
    }

    #[test]
    fn ternary_question_mark() {
        let tokens = tokenize("<?php $a = $b ? 1 : 2;");
        let q = tokens.iter().find(|t| t.content == "?").unwrap();
        assert_eq!(q.token_type, TokenType::Ternary);
        assert!(!types(&tokens).contains(&TokenType::Nullable));
    }

    #[test]
    fn null_coalesce_is_not_nullable() {
        let tokens = tokenize("<?php $a = $b ?? 'x';");
        assert!(!types(&tokens).contains(&TokenType::Nullable));
        assert!(!types(&tokens).contains(&TokenType::Ternary));
    }

    #[test]
    fn whitespace_tokens_break_at_newlines() {
        let tokens = tokenize("<?php\n    $a = 1;   \n");
        for t in tokens.iter().filter(|t| t.token_type == TokenType::Whitespace) {
            let inner = &t.content[..t.content.len() - 1];
            assert!(!inner.contains('\n'), "whitespace spans a newline: {:?}", t);
        }
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let tokens = tokenize("<?php IF (true) { } ELSE { }");
        assert!(types(&tokens).contains(&TokenType::If));
        assert!(types(&tokens).contains(&TokenType::Else));
        let kw = tokens.iter().find(|t| t.token_type == TokenType::If).unwrap();
        assert_eq!(kw.content, "IF");
    }

    #[test]
    fn numbers_and_operators() {
        let src = "<?php $x = 0xFF + 1_000 * 2.5e-3 <=> $y;";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Number)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(numbers, vec!["0xFF", "1_000", "2.5e-3"]);
    }

    #[test]
    fn unknown_bytes_are_isolated() {
        let src = "<?php $a = 1; ` $b = 2;";
        let tokens = tokenize(src);
        assert_eq!(joined(&tokens), src);
        assert!(types(&tokens).contains(&TokenType::Unknown));
    }

    #[test]
    fn lossless_on_malformed_soup() {
        let cases = [
            "<?php function (((",
            "<?php \"unclosed",
            "<?php }}} )))",
            "<?",
            "<?p",
            "plain text only",
            "<?php <<<",
            "<?php $",
        ];
        for src in cases {
            assert_eq!(joined(&tokenize(src)), src, "case {src:?}");
        }
    }
}
