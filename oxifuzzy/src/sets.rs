//! Fuzzy sets over sampled domains.
//!
//! A [`FuzzySet`] is a vector of membership degrees. It does not carry
//! its domain: the caller keeps the domain vector and the set paired,
//! index for index. Sets are usually produced by fuzzifying a domain with
//! a [`Membership`], or by combining other sets.
//!
//! [`Membership`]: crate::membership::Membership
use crate::norms::{BinaryOperator, Operators, UnaryOperator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::ops::Index;

/// Error returned when two sets over different domains are combined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("fuzzy set length mismatch: {left} against {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// A vector of membership degrees, aligned with a domain vector
/// kept by the caller.
///
/// Degrees should lie in `[0, 1]`, but this is not checked.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuzzySet(Vec<f64>);

impl FuzzySet {
    /// Wraps a vector of degrees.
    pub fn new(degrees: Vec<f64>) -> FuzzySet {
        FuzzySet(degrees)
    }

    /// A set with every degree at zero.
    pub fn zeros(len: usize) -> FuzzySet {
        FuzzySet(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the degrees as a slice.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    /// Consumes the set, returning its degrees.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Returns the largest degree in the set, or 0 for an empty set.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::sets::FuzzySet;
    ///
    /// assert_eq!(FuzzySet::new(vec![0.25, 0.75, 0.5]).height(), 0.75);
    /// assert_eq!(FuzzySet::zeros(0).height(), 0.0);
    /// ```
    pub fn height(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    /// Combines two sets elementwise with `op`.
    ///
    /// # Errors
    /// Returns [`SetError::LengthMismatch`] if the sets differ in length.
    pub fn combine<O>(&self, other: &FuzzySet, op: &O) -> Result<FuzzySet, SetError>
    where
        O: BinaryOperator + ?Sized,
    {
        if self.len() != other.len() {
            return Err(SetError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(x, y)| op.apply(*x, *y))
            .collect())
    }

    /// Applies `op` to every degree.
    pub fn map<O>(&self, op: &O) -> FuzzySet
    where
        O: UnaryOperator + ?Sized,
    {
        self.0.iter().map(|x| op.apply(*x)).collect()
    }

    /// Fuzzy `and`, using the bundle's t-norm.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::norms::Operators;
    /// use oxifuzzy::sets::FuzzySet;
    ///
    /// let ops = Operators::mamdani();
    /// let a = FuzzySet::new(vec![0.0, 0.5, 1.0]);
    /// let b = FuzzySet::new(vec![1.0, 0.25, 1.0]);
    ///
    /// assert_eq!(a.and(&b, &ops).unwrap().values(), &[0.0, 0.25, 1.0]);
    /// assert_eq!(a.or(&b, &ops).unwrap().values(), &[1.0, 0.5, 1.0]);
    /// assert_eq!(a.not(&ops).values(), &[1.0, 0.5, 0.0]);
    /// ```
    pub fn and(&self, other: &FuzzySet, operators: &Operators) -> Result<FuzzySet, SetError> {
        self.combine(other, &*operators.norm)
    }

    /// Fuzzy `or`, using the bundle's t-conorm.
    pub fn or(&self, other: &FuzzySet, operators: &Operators) -> Result<FuzzySet, SetError> {
        self.combine(other, &*operators.conorm)
    }

    /// Fuzzy `not`, using the bundle's negation.
    pub fn not(&self, operators: &Operators) -> FuzzySet {
        self.map(&*operators.negation)
    }

    /// Applies an implication with a fixed antecedent degree to
    /// every degree of the set.
    pub fn implied_by<O>(&self, strength: f64, implication: &O) -> FuzzySet
    where
        O: BinaryOperator + ?Sized,
    {
        self.0.iter().map(|y| implication.apply(strength, *y)).collect()
    }
}

impl From<Vec<f64>> for FuzzySet {
    fn from(degrees: Vec<f64>) -> FuzzySet {
        FuzzySet(degrees)
    }
}

impl FromIterator<f64> for FuzzySet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> FuzzySet {
        FuzzySet(iter.into_iter().collect())
    }
}

impl AsRef<[f64]> for FuzzySet {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for FuzzySet {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Returns `n` evenly spaced samples over `[start, end]`,
/// both ends included.
///
/// # Examples
/// ```
/// use oxifuzzy::sets::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// assert!(linspace(2.0, 3.0, 0).is_empty());
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut samples: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            samples[n - 1] = end;
            samples
        }
    }
}

/// Integrates the sampled function `f` over the sample points `x`
/// with the trapezoidal rule. Extra samples in the longer slice are ignored.
///
/// # Examples
/// ```
/// use oxifuzzy::sets::trapz;
///
/// assert_eq!(trapz(&[0.0, 1.0, 0.0], &[0.0, 1.0, 2.0]), 1.0);
/// ```
pub fn trapz(f: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(f.windows(2))
        .map(|(x, f)| (x[1] - x[0]) * (f[1] + f[0]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norms::{Aggregation, Implication, TNorm};

    #[test]
    fn combine_mismatch() {
        let a = FuzzySet::zeros(3);
        let b = FuzzySet::zeros(4);
        assert_eq!(
            a.combine(&b, &TNorm::Zadeh),
            Err(SetError::LengthMismatch { left: 3, right: 4 })
        );
        assert!(a.and(&b, &Operators::mamdani()).is_err());
    }

    #[test]
    fn operators_are_per_call() {
        let a = FuzzySet::new(vec![0.5, 1.0]);
        let b = FuzzySet::new(vec![0.5, 0.25]);
        let zadeh = Operators::mamdani();
        let probabilistic = Operators::probabilistic();
        // The same pair of sets answers differently to each bundle,
        // and neither bundle affects the other.
        assert_eq!(a.and(&b, &zadeh).unwrap().values(), &[0.5, 0.25]);
        assert_eq!(a.and(&b, &probabilistic).unwrap().values(), &[0.25, 0.25]);
        assert_eq!(a.and(&b, &zadeh).unwrap().values(), &[0.5, 0.25]);
    }

    #[test]
    fn closure_operators() {
        let a = FuzzySet::new(vec![0.2, 0.6]);
        let b = FuzzySet::new(vec![0.4, 0.4]);
        let mean = |x: f64, y: f64| (x + y) / 2.0;
        let c = a.combine(&b, &mean).unwrap();
        assert!((c[0] - 0.3).abs() < 1e-12);
        assert!((c[1] - 0.5).abs() < 1e-12);
        let squared = a.map(&|x: f64| x * x);
        assert!((squared[1] - 0.36).abs() < 1e-12);
    }

    #[test]
    fn implied_by() {
        let set = FuzzySet::new(vec![0.0, 0.5, 1.0]);
        assert_eq!(
            set.implied_by(0.75, &Implication::Mamdani).values(),
            &[0.0, 0.5, 0.75]
        );
        assert_eq!(
            set.implied_by(0.5, &Implication::Probabilistic).values(),
            &[0.0, 0.25, 0.5]
        );
        let merged = set
            .implied_by(0.25, &Implication::Mamdani)
            .combine(&FuzzySet::new(vec![0.5, 0.0, 0.0]), &Aggregation::Mamdani)
            .unwrap();
        assert_eq!(merged.values(), &[0.5, 0.25, 0.25]);
    }

    #[test]
    fn linspace_endpoints() {
        for n in 2..50 {
            let samples = linspace(-3.0, 7.0, n);
            assert_eq!(samples.len(), n);
            assert_eq!(samples[0], -3.0);
            assert_eq!(samples[n - 1], 7.0);
            assert!(samples.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn trapz_linear() {
        let x = linspace(0.0, 2.0, 101);
        let f: Vec<f64> = x.iter().map(|x| 3.0 * x).collect();
        assert!((trapz(&f, &x) - 6.0).abs() < 1e-12);
        assert_eq!(trapz(&[1.0], &[0.0]), 0.0);
        assert_eq!(trapz(&[], &[]), 0.0);
    }

    #[test]
    fn serde_transparent() {
        let set = FuzzySet::new(vec![0.0, 0.5]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[0.0,0.5]");
        assert_eq!(serde_json::from_str::<FuzzySet>(&json).unwrap(), set);
    }
}
