pub mod diagnostics;
pub mod dispatch;
pub mod fixer;
pub mod indexer;
pub mod rules;
pub mod ruleset;
pub mod tokenizer;

use std::path::Path;

pub use diagnostics::{DEFAULT_SEVERITY, Violation};
pub use fixer::{EditOp, FixOutcome, MAX_PASSES};
pub use rules::{Rule, RuleContext, RuleRegistry};
pub use ruleset::{
    ConfigError, DirLoader, MapLoader, PropertyValue, ResolvedRuleset, RuleConfig, RulesetDecl,
    RulesetLoader, resolve,
};
pub use tokenizer::{Token, TokenType};

#[cfg(debug_assertions)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn detect_line_ending(input: &str) -> &str {
    // Check for first occurrence of \r\n or \n
    let rn_pos = input.find("\r\n");
    let n_pos = input.find('\n');

    if let (Some(rn), Some(n)) = (rn_pos, n_pos) {
        if rn < n {
            return "\r\n";
        }
    } else if rn_pos.is_some() {
        return "\r\n";
    }

    "\n"
}

/// Tokenize `text` and annotate the result with scope and bracket metadata.
///
/// The raw lexer is also available as [`tokenizer::tokenize`] when the
/// annotations are not needed.
///
/// # Examples
///
/// ```rust
/// use phlint::tokenize;
///
/// let tokens = tokenize("<?php echo 1;");
/// let joined: String = tokens.iter().map(|t| t.content.as_str()).collect();
/// assert_eq!(joined, "<?php echo 1;");
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = tokenizer::tokenize(text);
    indexer::annotate(&mut tokens);
    tokens
}

/// Check `text` against a resolved ruleset and return all violations, in
/// (line, column) order.
///
/// A single tokenize → index → dispatch pass with fixing disabled. The text
/// is never modified; fixable violations are reported as such so callers can
/// decide whether to run [`fix`].
pub fn check(
    text: &str,
    ruleset: &ResolvedRuleset,
    registry: &RuleRegistry,
    path: &Path,
) -> Vec<Violation> {
    #[cfg(debug_assertions)]
    init_logger();

    let normalized = text.replace("\r\n", "\n");
    let tokens = tokenize(&normalized);
    dispatch::run(&tokens, ruleset, registry, path, None)
}

/// Fix `text` by repeatedly checking and applying the fixable violations'
/// edits until the text stabilizes or the pass ceiling is reached.
///
/// Line endings are normalized for processing and the original style is
/// restored in the returned text.
pub fn fix(
    text: &str,
    ruleset: &ResolvedRuleset,
    registry: &RuleRegistry,
    path: &Path,
) -> FixOutcome {
    #[cfg(debug_assertions)]
    init_logger();

    let line_ending = detect_line_ending(text);
    let normalized = text.replace("\r\n", "\n");

    let mut outcome = fixer::fix(&normalized, ruleset, registry, path);

    if line_ending == "\r\n" {
        outcome.text = outcome.text.replace('\n', "\r\n");
        outcome.original = text.to_string();
    }
    outcome
}
