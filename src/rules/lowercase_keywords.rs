//! PHP keywords must be written in lowercase.

use crate::rules::{Rule, RuleContext};
use crate::tokenizer::TokenType;

pub struct LowercaseKeywords;

const KEYWORDS: &[TokenType] = &[
    TokenType::Function,
    TokenType::Class,
    TokenType::Interface,
    TokenType::Trait,
    TokenType::If,
    TokenType::Else,
    TokenType::ElseIf,
    TokenType::For,
    TokenType::Foreach,
    TokenType::While,
    TokenType::Do,
    TokenType::Switch,
    TokenType::Case,
    TokenType::Default,
    TokenType::Try,
    TokenType::Catch,
    TokenType::Finally,
    TokenType::Return,
    TokenType::Use,
    TokenType::Namespace,
    TokenType::Static,
    TokenType::Public,
    TokenType::Private,
    TokenType::Protected,
    TokenType::Callable,
    TokenType::SelfKeyword,
    TokenType::Parent,
    TokenType::New,
    TokenType::Echo,
    TokenType::True,
    TokenType::False,
    TokenType::Null,
];

impl Rule for LowercaseKeywords {
    fn code(&self) -> &'static str {
        "generic.lowercase-keywords"
    }

    fn register(&self) -> &'static [TokenType] {
        KEYWORDS
    }

    fn process(&self, ctx: &mut RuleContext<'_>, index: usize) {
        let content = ctx.tokens()[index].content.as_str();
        if content.chars().all(|c| !c.is_ascii_uppercase()) {
            return;
        }

        let lower = content.to_ascii_lowercase();
        let message = format!(
            "Keywords must be lowercase; expected \"{lower}\" but found \"{content}\""
        );
        if ctx.add_fixable_error(index, message) {
            ctx.replace(index, lower);
        }
    }
}
