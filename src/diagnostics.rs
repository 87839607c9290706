use serde::Serialize;

/// Severity assigned to a rule when a ruleset does not override it.
pub const DEFAULT_SEVERITY: u8 = 5;

/// One reported style violation, anchored to a token position.
///
/// Violations are immutable once recorded for a pass; the fixer rebuilds the
/// list from scratch on every pass and only the final pass's list reaches
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Rule-qualified stable identifier, e.g. `psr12.nullable-type-spacing`.
    pub code: String,
    pub message: String,
    /// 0 disables a rule entirely; such violations are never recorded.
    pub severity: u8,
    pub line: usize,
    pub column: usize,
    /// Whether the reporting rule offered an automatic fix.
    pub fixable: bool,
    /// Warning rather than error class.
    pub warning: bool,
}

impl Violation {
    pub fn is_error(&self) -> bool {
        !self.warning
    }
}
