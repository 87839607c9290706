//! Nullable type markers must hug the type they qualify, e.g. `?int`.

use crate::rules::{Rule, RuleContext};
use crate::tokenizer::TokenType;

pub struct NullableTypeSpacing;

/// Tokens that may legitimately follow a nullable marker.
const VALID_AFTER: &[TokenType] = &[
    TokenType::Identifier,
    TokenType::NsSeparator,
    TokenType::Callable,
    TokenType::SelfKeyword,
    TokenType::Parent,
    TokenType::Static,
];

impl Rule for NullableTypeSpacing {
    fn code(&self) -> &'static str {
        "psr12.nullable-type-spacing"
    }

    fn register(&self) -> &'static [TokenType] {
        &[TokenType::Nullable]
    }

    fn process(&self, ctx: &mut RuleContext<'_>, index: usize) {
        // Next token that is not plain whitespace; comments deliberately
        // count as "unexpected characters" here.
        let next = ctx
            .tokens()
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, t)| t.token_type != TokenType::Whitespace)
            .map(|(i, _)| i);
        let Some(next) = next else {
            // Parse error or live coding.
            return;
        };

        let valid = VALID_AFTER.contains(&ctx.tokens()[next].token_type);
        if valid && next == index + 1 {
            return;
        }

        if valid {
            // Only whitespace between the marker and the type; fixable.
            if ctx.add_fixable_error(index + 1, "Superfluous whitespace after nullable type marker")
            {
                for i in index + 1..next {
                    ctx.remove(i);
                }
            }
            return;
        }

        ctx.add_error(index + 1, "Unexpected characters found after nullable type marker");
    }
}
