//! The rule ("sniff") plugin contract and the built-in catalogue.

pub mod context;

pub mod disallow_tab_indent;
pub mod lowercase_keywords;
pub mod nullable_type_spacing;
pub mod superfluous_whitespace;

pub use context::RuleContext;

use std::collections::HashMap;

use crate::tokenizer::TokenType;

/// A pluggable checker registered for interest in specific token types.
///
/// Rules are pure with respect to everything outside the context they are
/// handed: they observe the frozen token slice and report violations,
/// optionally queueing edits through the context. They must tolerate broken,
/// partially-tokenized source.
pub trait Rule: Send + Sync {
    /// Stable, rule-qualified identifier, e.g. `psr12.nullable-type-spacing`.
    fn code(&self) -> &'static str;

    /// Token types this rule wants to observe.
    fn register(&self) -> &'static [TokenType];

    /// Names of the configuration properties this rule accepts. Anything
    /// else in a ruleset declaration is a configuration error.
    fn properties(&self) -> &'static [&'static str] {
        &[]
    }

    /// Called once per matching token, with the index of that token.
    fn process(&self, ctx: &mut RuleContext<'_>, index: usize);
}

/// Ordered rule collection. Registration order is part of the engine's
/// determinism contract: dispatch and conflict resolution both follow it.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    by_code: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            by_code: HashMap::new(),
        }
    }

    /// All built-in rules, in their canonical order.
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(nullable_type_spacing::NullableTypeSpacing));
        registry.register(Box::new(superfluous_whitespace::SuperfluousWhitespace));
        registry.register(Box::new(disallow_tab_indent::DisallowTabIndent));
        registry.register(Box::new(lowercase_keywords::LowercaseKeywords));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        let code = rule.code();
        if self.by_code.contains_key(code) {
            log::warn!("rule '{}' registered twice; keeping the first", code);
            return;
        }
        self.by_code.insert(code, self.rules.len());
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn get(&self, code: &str) -> Option<&dyn Rule> {
        self.by_code.get(code).map(|&i| self.rules[i].as_ref())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}
