//! Norms, conorms, negations, implications and aggregations.
//!
//! The basic operations of fuzzy logic are `and`, `or` and `not`. The `and`
//! is a t-norm, a function of two degrees of truth; the `or` is a t-conorm;
//! the `not` is a negation of a single degree. Fuzzy inference also needs an
//! implication (the generalized modus ponens applied to a rule's consequent)
//! and an aggregation (how the conclusions of several rules are merged).
//!
//! Any operator is just a value implementing [`BinaryOperator`] or
//! [`UnaryOperator`]. The built-in ones are enums, and plain closures
//! implement the traits too, so a custom operator needs no wrapper:
//!
//! ```
//! use oxifuzzy::norms::{BinaryOperator, Operators, TNorm};
//!
//! assert_eq!(TNorm::Probabilistic.apply(0.5, 0.5), 0.25);
//!
//! let lukasiewicz_and = |x: f64, y: f64| (x + y - 1.0).max(0.0);
//! let operators = Operators::mamdani().with_norm(lukasiewicz_and);
//! assert!((operators.and(0.75, 0.5) - 0.25).abs() < 1e-12);
//! ```
//!
//! Operators are never global. A set of them is bundled in an [`Operators`]
//! value which is handed explicitly to whatever needs it.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::Arc;

/// A binary operation over degrees of truth.
///
/// Implementations should be total on `[0, 1] × [0, 1]`
/// and map back into `[0, 1]`.
pub trait BinaryOperator: Send + Sync {
    /// Applies the operation to a pair of degrees.
    fn apply(&self, x: f64, y: f64) -> f64;

    /// A short human-readable name, used in diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

/// A unary operation over degrees of truth.
pub trait UnaryOperator: Send + Sync {
    /// Applies the operation to a degree.
    fn apply(&self, x: f64) -> f64;

    /// A short human-readable name, used in diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> BinaryOperator for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn apply(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

impl<F> UnaryOperator for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn apply(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Built-in t-norms (`and` operations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TNorm {
    /// min(x, y)
    Zadeh,
    /// x·y
    Probabilistic,
    /// x·y / (2 − (x + y − x·y))
    Einstein,
    /// y if x = 1, x if y = 1, 0 otherwise.
    Drastic,
}

/// Built-in t-conorms (`or` operations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TConorm {
    /// max(x, y)
    Zadeh,
    /// x + y − x·y
    Probabilistic,
    /// (x + y) / (1 + x·y)
    Einstein,
    /// y if x = 0, x if y = 0, 1 otherwise.
    Drastic,
}

/// Built-in negations (`not` operations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Negation {
    /// 1 − x
    Zadeh,
    /// 1 − x
    Probabilistic,
}

/// Built-in implications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Implication {
    /// min(x, y)
    Mamdani,
    /// x·y
    Probabilistic,
    /// max(min(x, y), 1 − x)
    Zadeh,
    /// max(1 − x, y)
    DienesRescher,
    /// min(1, 1 − x + y)
    Lukasiewicz,
    /// 1 if x < y, y otherwise.
    Godel,
}

/// Built-in aggregations of rule conclusions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// max(x, y)
    Mamdani,
    /// x + y − x·y
    Probabilistic,
}

fn drastic_product(x: f64, y: f64) -> f64 {
    if x == 1.0 {
        y
    } else if y == 1.0 {
        x
    } else {
        0.0
    }
}

fn drastic_sum(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        y
    } else if y == 0.0 {
        x
    } else {
        1.0
    }
}

impl BinaryOperator for TNorm {
    fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Zadeh => x.min(y),
            Self::Probabilistic => x * y,
            Self::Einstein => (x * y) / (2.0 - (x + y - x * y)),
            Self::Drastic => drastic_product(x, y),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Zadeh => "zadeh and",
            Self::Probabilistic => "probabilistic and",
            Self::Einstein => "einstein product",
            Self::Drastic => "drastic product",
        }
    }
}

impl BinaryOperator for TConorm {
    fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Zadeh => x.max(y),
            Self::Probabilistic => x + y - x * y,
            Self::Einstein => (x + y) / (1.0 + x * y),
            Self::Drastic => drastic_sum(x, y),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Zadeh => "zadeh or",
            Self::Probabilistic => "probabilistic or",
            Self::Einstein => "einstein sum",
            Self::Drastic => "drastic sum",
        }
    }
}

impl UnaryOperator for Negation {
    fn apply(&self, x: f64) -> f64 {
        1.0 - x
    }

    fn name(&self) -> &str {
        match self {
            Self::Zadeh => "zadeh not",
            Self::Probabilistic => "probabilistic not",
        }
    }
}

impl BinaryOperator for Implication {
    fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Mamdani => x.min(y),
            Self::Probabilistic => x * y,
            Self::Zadeh => x.min(y).max(1.0 - x),
            Self::DienesRescher => (1.0 - x).max(y),
            Self::Lukasiewicz => (1.0 - x + y).min(1.0),
            Self::Godel => {
                if x < y {
                    1.0
                } else {
                    y
                }
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Mamdani => "mamdani implication",
            Self::Probabilistic => "probabilistic implication",
            Self::Zadeh => "zadeh implication",
            Self::DienesRescher => "dienes-rescher implication",
            Self::Lukasiewicz => "lukasiewicz implication",
            Self::Godel => "godel implication",
        }
    }
}

impl BinaryOperator for Aggregation {
    fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Mamdani => x.max(y),
            Self::Probabilistic => x + y - x * y,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Mamdani => "mamdani aggregation",
            Self::Probabilistic => "probabilistic aggregation",
        }
    }
}

/// A bundle of the five operators used by fuzzy sets and controllers.
///
/// Bundles are cheap to clone: operators are shared
/// behind reference counts and never mutated in place.
///
/// # Examples
/// ```
/// use oxifuzzy::norms::{Implication, Operators};
///
/// let operators = Operators {
///     // Pick the operators to replace...
///     implication: std::sync::Arc::new(Implication::Lukasiewicz),
///     // ...and take the rest from a preset.
///     ..Operators::mamdani()
/// };
/// assert_eq!(operators.imply(1.0, 0.25), 0.25);
/// assert_eq!(operators.and(0.5, 0.75), 0.5);
/// ```
#[derive(Clone)]
pub struct Operators {
    /// The t-norm, used for `and` and for combining rule antecedents.
    pub norm: Arc<dyn BinaryOperator>,
    /// The t-conorm, used for `or`.
    pub conorm: Arc<dyn BinaryOperator>,
    /// The negation, used for `not`.
    pub negation: Arc<dyn UnaryOperator>,
    /// The implication applied to a rule's consequent.
    pub implication: Arc<dyn BinaryOperator>,
    /// The aggregation merging the conclusions of fired rules.
    pub aggregation: Arc<dyn BinaryOperator>,
}

impl Operators {
    /// Zadeh norms with Mamdani inference: `min`, `max`, `1 − x`,
    /// `min` implication and `max` aggregation.
    pub fn mamdani() -> Operators {
        Operators {
            norm: Arc::new(TNorm::Zadeh),
            conorm: Arc::new(TConorm::Zadeh),
            negation: Arc::new(Negation::Zadeh),
            implication: Arc::new(Implication::Mamdani),
            aggregation: Arc::new(Aggregation::Mamdani),
        }
    }

    /// Probabilistic norms with probabilistic inference.
    pub fn probabilistic() -> Operators {
        Operators {
            norm: Arc::new(TNorm::Probabilistic),
            conorm: Arc::new(TConorm::Probabilistic),
            negation: Arc::new(Negation::Probabilistic),
            implication: Arc::new(Implication::Probabilistic),
            aggregation: Arc::new(Aggregation::Probabilistic),
        }
    }

    /// Einstein product and sum, Zadeh negation, Mamdani inference.
    pub fn einstein() -> Operators {
        Operators {
            norm: Arc::new(TNorm::Einstein),
            conorm: Arc::new(TConorm::Einstein),
            ..Operators::mamdani()
        }
    }

    /// Drastic product and sum, Zadeh negation, Mamdani inference.
    pub fn drastic() -> Operators {
        Operators {
            norm: Arc::new(TNorm::Drastic),
            conorm: Arc::new(TConorm::Drastic),
            ..Operators::mamdani()
        }
    }

    /// Replaces the t-norm.
    pub fn with_norm(mut self, norm: impl BinaryOperator + 'static) -> Operators {
        self.norm = Arc::new(norm);
        self
    }

    /// Replaces the t-conorm.
    pub fn with_conorm(mut self, conorm: impl BinaryOperator + 'static) -> Operators {
        self.conorm = Arc::new(conorm);
        self
    }

    /// Replaces the negation.
    pub fn with_negation(mut self, negation: impl UnaryOperator + 'static) -> Operators {
        self.negation = Arc::new(negation);
        self
    }

    /// Replaces the implication.
    pub fn with_implication(mut self, implication: impl BinaryOperator + 'static) -> Operators {
        self.implication = Arc::new(implication);
        self
    }

    /// Replaces the aggregation.
    pub fn with_aggregation(mut self, aggregation: impl BinaryOperator + 'static) -> Operators {
        self.aggregation = Arc::new(aggregation);
        self
    }

    pub fn and(&self, x: f64, y: f64) -> f64 {
        self.norm.apply(x, y)
    }

    pub fn or(&self, x: f64, y: f64) -> f64 {
        self.conorm.apply(x, y)
    }

    pub fn not(&self, x: f64) -> f64 {
        self.negation.apply(x)
    }

    pub fn imply(&self, x: f64, y: f64) -> f64 {
        self.implication.apply(x, y)
    }

    pub fn aggregate(&self, x: f64, y: f64) -> f64 {
        self.aggregation.apply(x, y)
    }
}

impl Default for Operators {
    fn default() -> Operators {
        Operators::mamdani()
    }
}

impl fmt::Debug for Operators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operators")
            .field("norm", &self.norm.name())
            .field("conorm", &self.conorm.name())
            .field("negation", &self.negation.name())
            .field("implication", &self.implication.name())
            .field("aggregation", &self.aggregation.name())
            .finish()
    }
}
