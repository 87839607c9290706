//! Indentation must use spaces, not tabs.

use crate::rules::{Rule, RuleContext};
use crate::ruleset::resolver::PropertyValue;
use crate::tokenizer::TokenType;

pub struct DisallowTabIndent;

const DEFAULT_TAB_WIDTH: usize = 4;

impl Rule for DisallowTabIndent {
    fn code(&self) -> &'static str {
        "generic.disallow-tab-indent"
    }

    fn register(&self) -> &'static [TokenType] {
        &[TokenType::Whitespace]
    }

    fn properties(&self) -> &'static [&'static str] {
        &["tab-width"]
    }

    fn process(&self, ctx: &mut RuleContext<'_>, index: usize) {
        let token = &ctx.tokens()[index];
        // Only leading whitespace counts as indentation.
        if token.column != 1 || !token.content.contains('\t') {
            return;
        }

        let tab_width = ctx
            .property("tab-width")
            .and_then(PropertyValue::as_int)
            .map(|w| w.max(1) as usize)
            .unwrap_or(DEFAULT_TAB_WIDTH);

        if ctx.add_fixable_error(index, "Spaces must be used to indent lines; tabs are not allowed")
        {
            let spaces = " ".repeat(tab_width);
            let fixed = ctx.tokens()[index].content.replace('\t', &spaces);
            ctx.replace(index, fixed);
        }
    }
}
