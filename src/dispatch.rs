//! Per-token rule dispatch.
//!
//! Walks the file in token order and invokes, for each token, every active
//! rule registered for that token's type, through the resolved ruleset's
//! index. Violation order is a pure function of token order and rule
//! registration order. A panicking rule is isolated: its failure becomes a
//! single non-fixable violation and dispatch carries on.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use crate::diagnostics::{DEFAULT_SEVERITY, Violation};
use crate::fixer::EditBuffer;
use crate::rules::{RuleContext, RuleRegistry};
use crate::ruleset::ResolvedRuleset;
use crate::tokenizer::Token;

/// Violation code used when a rule itself fails.
pub const INTERNAL_ERROR_CODE: &str = "internal.rule-error";

/// Run one dispatch pass. When `edits` is `Some`, rules may queue fixes into
/// it; with `None` the pass is check-only and fixable violations are
/// reported without edits.
pub fn run(
    tokens: &[Token],
    ruleset: &ResolvedRuleset,
    registry: &RuleRegistry,
    path: &Path,
    mut edits: Option<&mut EditBuffer>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        for &config_pos in ruleset.rules_for(token.token_type) {
            let config = &ruleset.rules()[config_pos];
            if config.severity == 0 || config.suppressed_for(path) {
                continue;
            }
            let rule = registry.rules()[config.rule_pos].as_ref();

            let mut ctx = RuleContext::new(
                tokens,
                path,
                &config.code,
                config.severity,
                config.message_override.as_deref(),
                &config.properties,
                config_pos,
                &mut violations,
                edits.as_deref_mut(),
            );
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.process(&mut ctx, index)));

            if let Err(payload) = outcome {
                let reason = panic_message(payload.as_ref());
                log::warn!(
                    "rule '{}' panicked on token {} of {}: {}",
                    config.code,
                    index,
                    path.display(),
                    reason
                );
                violations.push(Violation {
                    code: INTERNAL_ERROR_CODE.to_string(),
                    message: format!("Rule '{}' failed internally: {}", config.code, reason),
                    severity: DEFAULT_SEVERITY,
                    line: token.line,
                    column: token.column,
                    fixable: false,
                    warning: false,
                });
            }
        }
    }

    log::debug!(
        "dispatch over {} token(s) produced {} violation(s)",
        tokens.len(),
        violations.len()
    );
    violations.sort_by_key(|v| (v.line, v.column));
    violations
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
