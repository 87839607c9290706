//! Edit buffering and the fix convergence loop.
//!
//! Rules never touch tokens directly: during a pass they queue edits into an
//! [`EditBuffer`], which enforces one owner per token per pass. When the
//! pass's violation collection is complete, the buffered edits are applied
//! to produce new text, and the whole pipeline runs again on the result.
//! The loop stops when a pass applies no edits or after [`MAX_PASSES`]
//! passes, whichever comes first.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use similar::TextDiff;

use crate::diagnostics::Violation;
use crate::dispatch;
use crate::indexer;
use crate::rules::RuleRegistry;
use crate::ruleset::ResolvedRuleset;
use crate::tokenizer::{Token, tokenize};

/// Ceiling on fix passes. Reaching it means rules kept producing fixable
/// violations without the text stabilizing; the caller gets the best-effort
/// text plus whatever is still outstanding.
pub const MAX_PASSES: usize = 50;

/// One requested token rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Replace(String),
    InsertBefore(String),
    InsertAfter(String),
    Remove,
}

/// Pass-scoped edit collection with first-claim-wins token ownership.
///
/// Token indices refer to the token sequence of the pass the buffer was
/// created for; they are meaningless once the text has been rewritten, which
/// is why a fresh buffer is built every pass.
#[derive(Debug, Default)]
pub struct EditBuffer {
    edits: BTreeMap<usize, (usize, EditOp)>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `op` against `token` on behalf of the rule at config position
    /// `owner`. Returns false if another rule already owns the token this
    /// pass; the same rule may refine its own earlier edit.
    pub fn queue(&mut self, token: usize, owner: usize, op: EditOp) -> bool {
        match self.edits.entry(token) {
            Entry::Vacant(entry) => {
                entry.insert((owner, op));
                true
            }
            Entry::Occupied(mut entry) if entry.get().0 == owner => {
                entry.insert((owner, op));
                true
            }
            Entry::Occupied(entry) => {
                log::debug!(
                    "edit conflict on token {}: owner {} keeps it, {} loses",
                    token,
                    entry.get().0,
                    owner
                );
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Rebuild the text with all buffered edits applied. Relies on the
    /// lossless tokenization invariant: unedited tokens contribute their
    /// exact source content.
    pub fn apply(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            match self.edits.get(&i) {
                Some((_, EditOp::Replace(new))) => out.push_str(new),
                Some((_, EditOp::InsertBefore(new))) => {
                    out.push_str(new);
                    out.push_str(&token.content);
                }
                Some((_, EditOp::InsertAfter(new))) => {
                    out.push_str(&token.content);
                    out.push_str(new);
                }
                Some((_, EditOp::Remove)) => {}
                None => out.push_str(&token.content),
            }
        }
        out
    }
}

/// Result of a fix run.
#[derive(Debug)]
pub struct FixOutcome {
    /// Final text: fully fixed when `converged`, best-effort otherwise.
    pub text: String,
    /// Violations still present in the final text.
    pub violations: Vec<Violation>,
    /// Number of tokenize→dispatch passes used.
    pub passes: usize,
    /// False when the pass ceiling was reached with edits still pending.
    pub converged: bool,
    pub(crate) original: String,
}

impl FixOutcome {
    /// Unified diff from the original to the fixed text, for external
    /// reporting. Plays no part in the convergence algorithm.
    pub fn diff(&self, path: &Path) -> String {
        let name = path.display().to_string();
        TextDiff::from_lines(&self.original, &self.text)
            .unified_diff()
            .context_radius(3)
            .header(&name, &name)
            .to_string()
    }
}

/// Repeatedly tokenize, dispatch, and apply fixes until the text stabilizes
/// or the pass ceiling is reached.
pub fn fix(
    text: &str,
    ruleset: &ResolvedRuleset,
    registry: &RuleRegistry,
    path: &Path,
) -> FixOutcome {
    let mut current = text.to_string();

    for pass in 1..=MAX_PASSES {
        let mut tokens = tokenize(&current);
        indexer::annotate(&mut tokens);

        let mut buffer = EditBuffer::new();
        let violations =
            dispatch::run(&tokens, ruleset, registry, path, Some(&mut buffer));

        if buffer.is_empty() {
            log::debug!("fixer stable after {} pass(es)", pass);
            return FixOutcome {
                text: current,
                violations,
                passes: pass,
                converged: true,
                original: text.to_string(),
            };
        }

        log::debug!("pass {}: applying {} edit(s)", pass, buffer.len());
        let next = buffer.apply(&tokens);
        if next == current {
            // Edits that change nothing are a fixed point too.
            log::debug!("pass {} edits left the text unchanged", pass);
            return FixOutcome {
                text: current,
                violations,
                passes: pass,
                converged: true,
                original: text.to_string(),
            };
        }
        current = next;
    }

    // Ceiling reached. Report what remains in the final text.
    log::warn!(
        "fixer hit the {}-pass ceiling for {}",
        MAX_PASSES,
        path.display()
    );
    let mut tokens = tokenize(&current);
    indexer::annotate(&mut tokens);
    let violations = dispatch::run(&tokens, ruleset, registry, path, None);
    FixOutcome {
        text: current,
        violations,
        passes: MAX_PASSES,
        converged: false,
        original: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenType;

    fn tokens_of(src: &str) -> Vec<Token> {
        tokenize(src)
    }

    #[test]
    fn first_claim_wins() {
        let mut buffer = EditBuffer::new();
        assert!(buffer.queue(3, 0, EditOp::Remove));
        assert!(!buffer.queue(3, 1, EditOp::Replace("x".into())));
        // The winner may still refine its own edit.
        assert!(buffer.queue(3, 0, EditOp::Replace("y".into())));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn apply_reproduces_unedited_text() {
        let src = "<?php echo 1;\n";
        let tokens = tokens_of(src);
        let buffer = EditBuffer::new();
        assert_eq!(buffer.apply(&tokens), src);
    }

    #[test]
    fn apply_handles_all_edit_kinds() {
        let src = "<?php echo 1;";
        let tokens = tokens_of(src);
        let num = tokens
            .iter()
            .position(|t| t.token_type == TokenType::Number)
            .unwrap();
        let semi = tokens
            .iter()
            .position(|t| t.token_type == TokenType::Semicolon)
            .unwrap();

        let mut buffer = EditBuffer::new();
        buffer.queue(num, 0, EditOp::Replace("2".into()));
        buffer.queue(semi, 0, EditOp::InsertBefore(" ".into()));
        assert_eq!(buffer.apply(&tokens), "<?php echo 2 ;");

        let mut buffer = EditBuffer::new();
        buffer.queue(num, 0, EditOp::Remove);
        buffer.queue(semi, 0, EditOp::InsertAfter("\n".into()));
        assert_eq!(buffer.apply(&tokens), "<?php echo ;\n");
    }

    #[test]
    fn diff_is_unified_format() {
        let outcome = FixOutcome {
            text: "<?php echo 2;\n".into(),
            violations: Vec::new(),
            passes: 2,
            converged: true,
            original: "<?php echo 1;\n".into(),
        };
        let diff = outcome.diff(Path::new("demo.php"));
        assert!(diff.contains("--- demo.php"));
        assert!(diff.contains("-<?php echo 1;"));
        assert!(diff.contains("+<?php echo 2;"));
    }
}
