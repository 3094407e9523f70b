use thiserror::Error;

/// An error type indicating that a membership function,
/// or a family of them, could not be built from the
/// given parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MembershipError {
    /// A shape parameter was NaN or infinite.
    #[error("{shape} parameters must be finite")]
    NonFinite { shape: &'static str },
    /// The breakpoints of a piecewise shape were not strictly increasing.
    #[error("{shape} breakpoints {points:?} are not strictly increasing")]
    UnorderedPoints {
        shape: &'static str,
        points: Vec<f64>,
    },
    /// A width, frequency or exponent was zero or negative.
    #[error("{shape} {parameter} must be positive, got {value}")]
    NonPositive {
        shape: &'static str,
        parameter: &'static str,
        value: f64,
    },
    /// An interval to be partitioned had its end at or before its start.
    #[error("interval ({start}, {end}) is empty or reversed")]
    EmptyInterval { start: f64, end: f64 },
    /// Too few functions were requested for the partition.
    #[error("cannot build a partition of {requested} functions, at least {minimum} needed")]
    TooFewFunctions { requested: usize, minimum: usize },
    /// A linguistic variable already has a term with this label.
    #[error("duplicate term `{0}`")]
    DuplicateTerm(String),
    /// A stored linguistic variable had a different number of labels and terms.
    #[error("{labels} labels given for {memberships} membership functions")]
    TermCount { labels: usize, memberships: usize },
}
