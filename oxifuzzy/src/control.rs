//! Fuzzy controllers.
//!
//! A controller holds a base of decision rules of the form
//! "if `x1` is `A1` and `x2` is `A2` ... then `y` is `B`", where `Ai` are
//! membership functions over the inputs. Given crisp values for the inputs,
//! it computes how strongly each rule fires and combines the conclusions
//! into one crisp output.
//!
//! Two kinds of controllers are provided:
//! - [`Controller`] (also named [`Mamdani`]), whose conclusions are fuzzy
//!   sets over an output domain, aggregated and then defuzzified.
//! - [`Parametric`] (also named [`Sugeno`]), whose conclusions are linear
//!   functions of the inputs, averaged by firing strength.
//!
//! Each controller owns its [`Operators`](crate::norms::Operators), so
//! controllers configured differently never interfere. Evaluation does not
//! mutate the controller, and a controller can be shared between threads.
//!
//! # Example: a heater, both ways
//! ```
//! use oxifuzzy::control::{Controller, Parametric};
//! use oxifuzzy::defuzzification::Defuzzifier;
//! use oxifuzzy::membership::Membership;
//! use oxifuzzy::norms::Operators;
//! use oxifuzzy::sets::linspace;
//!
//! let cold = Membership::decreasing_ramp(10.0, 20.0).unwrap();
//! let hot = Membership::increasing_ramp(10.0, 20.0).unwrap();
//!
//! // Heater power, in percent.
//! let mut mamdani = Controller::with_operators(
//!     linspace(0.0, 100.0, 101),
//!     Operators::probabilistic(),
//!     Defuzzifier::MeanOfMaxima,
//! );
//! mamdani.add_rule(vec![cold.clone()], Membership::increasing_ramp(50.0, 100.0).unwrap()).unwrap();
//! mamdani.add_rule(vec![hot.clone()], Membership::decreasing_ramp(0.0, 50.0).unwrap()).unwrap();
//! assert_eq!(mamdani.evaluate(&[0.0]).unwrap(), 100.0);
//!
//! let mut sugeno = Parametric::new();
//! sugeno.add_rule(vec![cold], vec![100.0, 0.0]).unwrap();
//! sugeno.add_rule(vec![hot], vec![0.0, 0.0]).unwrap();
//! assert_eq!(sugeno.evaluate(&[15.0]).unwrap(), 50.0);
//! ```
mod errors;
mod mamdani;
mod parametric;
mod rules;

pub use errors::{ControlError, RuleError};
pub use mamdani::{Controller, Mamdani};
pub use parametric::{Parametric, Sugeno};
pub use rules::{Antecedent, Consequent, ParametricRule, Rule, RuleFiring};
