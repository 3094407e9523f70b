use crate::sets::SetError;

use thiserror::Error;

/// An error type indicating that a rule, or a table of
/// rules, could not be added to a controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// The antecedent has no membership function at all.
    #[error("rule antecedent has no membership functions")]
    EmptyAntecedent,
    /// The antecedent length differs from the controller's input count.
    #[error("rule has {found} antecedent entries, controller expects {expected}")]
    ArityMismatch { expected: usize, found: usize },
    /// A precomputed consequent does not match the output domain.
    #[error("consequent has {found} degrees, output domain has {expected} samples")]
    ConsequentLength { expected: usize, found: usize },
    /// A rule table has a different number of rows than row terms.
    #[error("rule table has {found} rows, expected {expected}")]
    TableRows { expected: usize, found: usize },
    /// A rule table row has a different number of cells than column terms.
    #[error("rule table row {row} has {found} cells, expected {expected}")]
    TableShape {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A parametric rule does not have one coefficient per input plus a bias.
    #[error("parametric rule needs {expected} coefficients, got {found}")]
    CoefficientCount { expected: usize, found: usize },
}

/// An error type indicating that a controller could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Set(#[from] SetError),
    /// The number of crisp inputs differs from the controller's input count.
    #[error("expected {expected} inputs, got {found}")]
    InputCount { expected: usize, found: usize },
    /// A rule was requested by an out-of-range index.
    #[error("no rule at index {index}, rule base has {count} rules")]
    RuleIndex { index: usize, count: usize },
    /// Every rule had zero firing strength.
    #[error("no rule fired")]
    NoRuleFired,
}
