use std::collections::BTreeMap;
use std::path::Path;

use crate::diagnostics::Violation;
use crate::fixer::{EditBuffer, EditOp};
use crate::ruleset::resolver::PropertyValue;
use crate::tokenizer::{Token, find_next_non_empty, find_prev_non_empty};

/// Everything a rule may see and do during one invocation.
///
/// The token slice is the pass-start sequence and stays frozen for the whole
/// pass, even after other rules have queued edits; disagreements between
/// rules resolve on the next pass, when the text has been rebuilt. Mutation
/// is only possible through the queued-edit methods, never on the tokens
/// themselves.
pub struct RuleContext<'a> {
    tokens: &'a [Token],
    path: &'a Path,
    code: &'a str,
    severity: u8,
    message_override: Option<&'a str>,
    properties: &'a BTreeMap<String, PropertyValue>,
    /// Config position of the invoked rule; used as the edit owner id.
    owner: usize,
    violations: &'a mut Vec<Violation>,
    edits: Option<&'a mut EditBuffer>,
}

impl<'a> RuleContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tokens: &'a [Token],
        path: &'a Path,
        code: &'a str,
        severity: u8,
        message_override: Option<&'a str>,
        properties: &'a BTreeMap<String, PropertyValue>,
        owner: usize,
        violations: &'a mut Vec<Violation>,
        edits: Option<&'a mut EditBuffer>,
    ) -> Self {
        Self {
            tokens,
            path,
            code,
            severity,
            message_override,
            properties,
            owner,
            violations,
            edits,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn find_next_non_empty(&self, from: usize) -> Option<usize> {
        find_next_non_empty(self.tokens, from)
    }

    pub fn find_prev_non_empty(&self, from: usize) -> Option<usize> {
        find_prev_non_empty(self.tokens, from)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Record a non-fixable error anchored at `index`.
    pub fn add_error(&mut self, index: usize, message: impl Into<String>) {
        self.record(index, message.into(), false, false);
    }

    pub fn add_warning(&mut self, index: usize, message: impl Into<String>) {
        self.record(index, message.into(), false, true);
    }

    /// Record a fixable error. Returns true when fixing is active, in which
    /// case the rule should queue the corresponding edits.
    pub fn add_fixable_error(&mut self, index: usize, message: impl Into<String>) -> bool {
        self.record(index, message.into(), true, false);
        self.edits.is_some()
    }

    pub fn add_fixable_warning(&mut self, index: usize, message: impl Into<String>) -> bool {
        self.record(index, message.into(), true, true);
        self.edits.is_some()
    }

    /// Queue a content replacement for `index`. Returns false if another
    /// rule already owns the token this pass.
    pub fn replace(&mut self, index: usize, content: impl Into<String>) -> bool {
        self.queue(index, EditOp::Replace(content.into()))
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.queue(index, EditOp::Remove)
    }

    pub fn insert_before(&mut self, index: usize, content: impl Into<String>) -> bool {
        self.queue(index, EditOp::InsertBefore(content.into()))
    }

    pub fn insert_after(&mut self, index: usize, content: impl Into<String>) -> bool {
        self.queue(index, EditOp::InsertAfter(content.into()))
    }

    fn queue(&mut self, index: usize, op: EditOp) -> bool {
        match self.edits.as_deref_mut() {
            Some(buffer) => buffer.queue(index, self.owner, op),
            None => false,
        }
    }

    fn record(&mut self, index: usize, message: String, fixable: bool, warning: bool) {
        let (line, column) = self
            .tokens
            .get(index)
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        let message = self
            .message_override
            .map(str::to_string)
            .unwrap_or(message);
        self.violations.push(Violation {
            code: self.code.to_string(),
            message,
            severity: self.severity,
            line,
            column,
            fixable,
            warning,
        });
    }
}
