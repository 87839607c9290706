//! Scope and bracket annotation pass.
//!
//! A single linear walk over the token sequence fills in nesting `level`,
//! the enclosing-construct `conditions` stack, `scope_opener`/`scope_closer`
//! pairing for brace scopes, and `bracket_opener`/`bracket_closer` pairing
//! for parentheses and square brackets. Brackets nest orthogonally to scopes
//! and use their own stacks. Unbalanced input never panics: unmatched tokens
//! keep `None` pointers and levels stay as computed up to the truncation
//! point.

use crate::tokenizer::token::{Token, TokenType, find_prev_non_empty};

#[derive(Debug)]
struct ScopeFrame {
    /// Scope keyword that owns this scope, if any; anonymous braces own
    /// themselves.
    owner: Option<usize>,
    owner_type: TokenType,
    opener: usize,
    /// Colon-opened scopes (`case`/`default` bodies) close implicitly at the
    /// next `case`, `default`, or the enclosing `}`.
    colon: bool,
}

/// Annotate `tokens` in place. Expects the lexer's output; the `?`
/// nullable-vs-ternary distinction is taken from the token types as recorded
/// there, never re-derived here.
pub fn annotate(tokens: &mut [Token]) {
    let mut scopes: Vec<ScopeFrame> = Vec::new();
    let mut parens: Vec<usize> = Vec::new();
    let mut squares: Vec<usize> = Vec::new();
    let mut pending_owner: Option<usize> = None;
    let mut ternary_depth: usize = 0;

    for i in 0..tokens.len() {
        let token_type = tokens[i].token_type;

        // A case body ends at the next case/default label or the switch's
        // closing brace; the closer token is shared, not consumed.
        if matches!(
            token_type,
            TokenType::Case | TokenType::Default | TokenType::CloseCurly
        ) {
            while let Some(frame) = scopes.pop_if(|f| f.colon) {
                close_scope(tokens, &frame, i);
            }
        }

        match token_type {
            TokenType::OpenCurly => {
                set_position(tokens, i, &scopes);
                let owner = pending_owner.take();
                let owner_type = owner.map(|o| tokens[o].token_type).unwrap_or(token_type);
                tokens[i].scope_opener = Some(i);
                if let Some(o) = owner {
                    tokens[o].scope_opener = Some(i);
                }
                scopes.push(ScopeFrame {
                    owner,
                    owner_type,
                    opener: i,
                    colon: false,
                });
            }
            TokenType::CloseCurly => {
                match scopes.pop() {
                    Some(frame) => {
                        set_position(tokens, i, &scopes);
                        close_scope(tokens, &frame, i);
                        tokens[i].scope_opener = Some(frame.opener);
                    }
                    None => {
                        // Unmatched closer in broken source.
                        log::debug!("unmatched '}}' at line {}", tokens[i].line);
                        set_position(tokens, i, &scopes);
                    }
                }
                pending_owner = None;
            }
            TokenType::Colon if ternary_depth > 0 => {
                ternary_depth -= 1;
                set_position(tokens, i, &scopes);
            }
            TokenType::Colon
                if pending_owner.is_some_and(|o| {
                    matches!(tokens[o].token_type, TokenType::Case | TokenType::Default)
                }) =>
            {
                set_position(tokens, i, &scopes);
                let owner = pending_owner.take();
                tokens[i].scope_opener = Some(i);
                if let Some(o) = owner {
                    tokens[o].scope_opener = Some(i);
                }
                scopes.push(ScopeFrame {
                    owner,
                    owner_type: owner.map(|o| tokens[o].token_type).unwrap_or(token_type),
                    opener: i,
                    colon: true,
                });
            }
            TokenType::Ternary => {
                ternary_depth += 1;
                set_position(tokens, i, &scopes);
            }
            TokenType::Semicolon => {
                // A statement end discards any braceless construct keyword.
                pending_owner = None;
                set_position(tokens, i, &scopes);
            }
            TokenType::OpenParen => {
                set_position(tokens, i, &scopes);
                tokens[i].parenthesis_owner = paren_owner(tokens, i, pending_owner);
                parens.push(i);
            }
            TokenType::CloseParen => {
                set_position(tokens, i, &scopes);
                if let Some(opener) = parens.pop() {
                    tokens[opener].bracket_closer = Some(i);
                    tokens[i].bracket_opener = Some(opener);
                    tokens[i].bracket_closer = Some(i);
                    tokens[opener].bracket_opener = Some(opener);
                    tokens[i].parenthesis_owner = tokens[opener].parenthesis_owner;
                } else {
                    log::debug!("unmatched ')' at line {}", tokens[i].line);
                }
            }
            TokenType::OpenSquare => {
                set_position(tokens, i, &scopes);
                squares.push(i);
            }
            TokenType::CloseSquare => {
                set_position(tokens, i, &scopes);
                if let Some(opener) = squares.pop() {
                    tokens[opener].bracket_closer = Some(i);
                    tokens[opener].bracket_opener = Some(opener);
                    tokens[i].bracket_opener = Some(opener);
                    tokens[i].bracket_closer = Some(i);
                } else {
                    log::debug!("unmatched ']' at line {}", tokens[i].line);
                }
            }
            t if t.is_scope_keyword() => {
                set_position(tokens, i, &scopes);
                pending_owner = Some(i);
            }
            _ => set_position(tokens, i, &scopes),
        }
    }

    if !scopes.is_empty() || !parens.is_empty() || !squares.is_empty() {
        log::debug!(
            "input ends with {} open scope(s), {} open paren(s), {} open bracket(s)",
            scopes.len(),
            parens.len(),
            squares.len()
        );
    }
}

fn set_position(tokens: &mut [Token], i: usize, scopes: &[ScopeFrame]) {
    tokens[i].level = scopes.len() as u32;
    tokens[i].conditions = scopes.iter().map(|f| f.owner_type).collect();
}

fn close_scope(tokens: &mut [Token], frame: &ScopeFrame, closer: usize) {
    tokens[frame.opener].scope_closer = Some(closer);
    tokens[closer].scope_closer = Some(closer);
    if let Some(owner) = frame.owner {
        tokens[owner].scope_closer = Some(closer);
    }
}

/// The scope keyword owning a parenthesis pair, e.g. the `if` in `if ($x)`.
/// `function` owns its parameter list even with the name in between.
fn paren_owner(tokens: &[Token], open_paren: usize, pending: Option<usize>) -> Option<usize> {
    let owner = pending?;
    let prev = find_prev_non_empty(tokens, open_paren)?;
    if prev == owner || tokens[owner].token_type == TokenType::Function {
        Some(owner)
    } else {
        None
    }
}
