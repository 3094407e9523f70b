//! Fuzzy logic and fuzzy control.
//!
//! This crate provides the building blocks of fuzzy inference: membership
//! functions, fuzzy sets over sampled domains, t-norms and friends, and
//! defuzzification methods, assembled into rule-based fuzzy controllers
//! ([`Controller`] for Mamdani inference, [`Parametric`] for Sugeno
//! inference). A fuzzy c-means clusterer is also included.
//!
//! Operators are never global: each controller owns its own
//! [`Operators`] bundle, and controllers configured differently can be
//! evaluated side by side, from any number of threads.
//!
//! # Example usage: a simple proportional-derivative controller
//! ```
//! use oxifuzzy::control::Controller;
//! use oxifuzzy::membership::flat_saw;
//! use oxifuzzy::sets::linspace;
//!
//! fn main() {
//!     // Error and its derivative, each split into negative, zero and positive.
//!     let error = flat_saw((-2.0, 2.0), 3).unwrap();
//!     let derivative = flat_saw((-2.0, 2.0), 3).unwrap();
//!     // Output, split the same way.
//!     let output = flat_saw((-10.0, 10.0), 3).unwrap();
//!     let (n, z, p) = (&output[0], &output[1], &output[2]);
//!
//!     let mut controller = Controller::new(linspace(-10.0, 10.0, 500));
//!     controller
//!         .add_table(&error, &derivative, &[
//!             vec![Some(n.clone()), Some(n.clone()), Some(z.clone())],
//!             vec![Some(n.clone()), Some(z.clone()), Some(p.clone())],
//!             vec![Some(z.clone()), Some(p.clone()), Some(p.clone())],
//!         ])
//!         .unwrap();
//!
//!     for e in [-1.5, -0.5, 0.0, 0.5, 1.5] {
//!         let response = controller.evaluate(&[e, 0.0]).unwrap();
//!         assert_eq!(response > 1e-9, e > 0.0);
//!         println!("error {:>4}: response {:.3}", e, response);
//!     }
//!     assert!(controller.evaluate(&[0.0, 0.0]).unwrap().abs() < 1e-9);
//! }
//! ```

pub mod clustering;
pub mod control;
pub mod defuzzification;
pub mod membership;
pub mod norms;
pub mod sets;

pub use clustering::{CMeansConfig, FuzzyCMeans};
pub use control::{Controller, Parametric};
pub use defuzzification::{Defuzzifier, Defuzzify};
pub use membership::{LinguisticVariable, Membership};
pub use norms::Operators;
pub use sets::FuzzySet;
