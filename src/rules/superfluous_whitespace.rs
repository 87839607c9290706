//! No trailing whitespace at the end of a line.

use crate::rules::{Rule, RuleContext};
use crate::tokenizer::TokenType;

pub struct SuperfluousWhitespace;

impl Rule for SuperfluousWhitespace {
    fn code(&self) -> &'static str {
        "squiz.superfluous-whitespace"
    }

    fn register(&self) -> &'static [TokenType] {
        &[TokenType::Whitespace]
    }

    fn properties(&self) -> &'static [&'static str] {
        &["ignore-blank-lines"]
    }

    fn process(&self, ctx: &mut RuleContext<'_>, index: usize) {
        let token = &ctx.tokens()[index];
        let content = token.content.as_str();

        // Whitespace tokens never span newlines, so trailing whitespace is a
        // token with spaces or tabs in front of its newline, or a
        // whitespace-only token at the very end of the input.
        let before_newline = content.strip_suffix('\n').unwrap_or(content);
        let at_eof = !content.ends_with('\n') && index == ctx.tokens().len() - 1;
        if before_newline.is_empty() || (!content.ends_with('\n') && !at_eof) {
            return;
        }

        let blank_line = token.column == 1;
        let ignore_blank = ctx
            .property("ignore-blank-lines")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if blank_line && ignore_blank {
            return;
        }

        let ends_with_newline = content.ends_with('\n');
        if ctx.add_fixable_error(index, "Whitespace found at end of line") {
            if ends_with_newline {
                ctx.replace(index, "\n");
            } else {
                ctx.remove(index);
            }
        }
    }
}
