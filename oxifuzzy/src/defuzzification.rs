//! Defuzzification methods.
//!
//! A defuzzification method reduces a fuzzy set `mf` over a domain `y` to a
//! single crisp value. `mf[i]` is the degree of `y[i]`, so both slices must
//! be paired index for index. Every method here is a pure, deterministic
//! function of `(mf, y)`.
//!
//! Degenerate inputs are reported numerically: an empty set gives NaN from
//! every method, and a set that is zero everywhere gives NaN from
//! [`centroid`]. Callers can test for "nothing fired" with `is_nan()`.
//!
//! ```
//! use oxifuzzy::defuzzification::centroid;
//! use oxifuzzy::membership::Membership;
//! use oxifuzzy::sets::linspace;
//!
//! let y = linspace(0.0, 5.0, 100);
//! let mf = Membership::triangle(1.0, 2.0, 3.0).unwrap().fuzzify(&y);
//! assert!((centroid(mf.values(), &y) - 2.0).abs() < 1e-3);
//! ```
use crate::sets::trapz;

use serde::{Deserialize, Serialize};

/// Center of gravity of the set, with both integrals
/// computed by the trapezoidal rule.
pub fn centroid(mf: &[f64], y: &[f64]) -> f64 {
    if mf.is_empty() || y.is_empty() {
        return f64::NAN;
    }
    let moment: Vec<f64> = mf.iter().zip(y).map(|(m, y)| m * y).collect();
    trapz(&moment, y) / trapz(mf, y)
}

/// The domain point splitting the area under the set in two halves.
///
/// Scans left to right, accumulating trapezoids of width `y[1] − y[0]`
/// until half of the total area is reached. The result is only
/// meaningful for equally spaced domains. Never scans past the last sample.
pub fn bisector(mf: &[f64], y: &[f64]) -> f64 {
    let len = mf.len().min(y.len());
    match len {
        0 => return f64::NAN,
        1 => return y[0],
        _ => {}
    }
    let half_area = trapz(&mf[..len], &y[..len]) / 2.0;
    let dy = y[1] - y[0];
    let mut b = 0;
    let mut area = 0.0;
    while area < half_area && b + 1 < len {
        b += 1;
        area += 0.5 * (mf[b] + mf[b - 1]) * dy;
    }
    y[b]
}

fn first_maximum(mf: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, m) in mf.iter().enumerate() {
        match best {
            Some(b) if *m <= mf[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

fn last_maximum(mf: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, m) in mf.iter().enumerate() {
        match best {
            Some(b) if *m < mf[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// The smallest domain point with the highest degree.
pub fn smallest_of_maxima(mf: &[f64], y: &[f64]) -> f64 {
    let len = mf.len().min(y.len());
    first_maximum(&mf[..len]).map_or(f64::NAN, |i| y[i])
}

/// The largest domain point with the highest degree.
pub fn largest_of_maxima(mf: &[f64], y: &[f64]) -> f64 {
    let len = mf.len().min(y.len());
    last_maximum(&mf[..len]).map_or(f64::NAN, |i| y[i])
}

/// The mean of [`smallest_of_maxima`] and [`largest_of_maxima`].
pub fn mean_of_maxima(mf: &[f64], y: &[f64]) -> f64 {
    0.5 * (smallest_of_maxima(mf, y) + largest_of_maxima(mf, y))
}

/// Anything that can reduce a fuzzy set over a domain to a crisp value.
///
/// Implemented by [`Defuzzifier`] and by any
/// `Fn(&[f64], &[f64]) -> f64`, including the functions of this module.
pub trait Defuzzify: Send + Sync {
    fn defuzzify(&self, mf: &[f64], y: &[f64]) -> f64;

    /// A short human-readable name, used in diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Defuzzify for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn defuzzify(&self, mf: &[f64], y: &[f64]) -> f64 {
        self(mf, y)
    }
}

/// The built-in defuzzification methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defuzzifier {
    Centroid,
    Bisector,
    SmallestOfMaxima,
    LargestOfMaxima,
    MeanOfMaxima,
}

impl Defuzzify for Defuzzifier {
    fn defuzzify(&self, mf: &[f64], y: &[f64]) -> f64 {
        match self {
            Self::Centroid => centroid(mf, y),
            Self::Bisector => bisector(mf, y),
            Self::SmallestOfMaxima => smallest_of_maxima(mf, y),
            Self::LargestOfMaxima => largest_of_maxima(mf, y),
            Self::MeanOfMaxima => mean_of_maxima(mf, y),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::SmallestOfMaxima => "smallest of maxima",
            Self::LargestOfMaxima => "largest of maxima",
            Self::MeanOfMaxima => "mean of maxima",
        }
    }
}

impl Default for Defuzzifier {
    fn default() -> Defuzzifier {
        Defuzzifier::Centroid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::Membership;
    use crate::sets::linspace;

    #[test]
    fn centroid_symmetry() {
        for n in [11, 100, 501] {
            let y = linspace(-1.0, 1.0, n);
            let mf = Membership::triangle(-1.0, 0.0, 1.0).unwrap().fuzzify(&y);
            assert!(centroid(mf.values(), &y).abs() < 1e-12, "{}", n);
        }
    }

    #[test]
    fn centroid_of_offset_triangle() {
        let y = linspace(0.0, 10.0, 1001);
        let mf = Membership::triangle(2.0, 3.0, 7.0).unwrap().fuzzify(&y);
        // The centroid of a triangle is the mean of its vertices.
        assert!((centroid(mf.values(), &y) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn centroid_degenerate() {
        let y = linspace(-1.0, 1.0, 21);
        assert!(centroid(&[0.0; 21], &y).is_nan());
        assert!(centroid(&[], &[]).is_nan());
    }

    #[test]
    fn centroid_reproducible() {
        let y = linspace(-3.0, 8.0, 333);
        let mf = Membership::gaussian(1.7, 2.0).unwrap().fuzzify(&y);
        let first = centroid(mf.values(), &y);
        for _ in 0..10 {
            assert_eq!(centroid(mf.values(), &y).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn bisector_halves_area() {
        let y = linspace(0.0, 10.0, 1001);
        let mf = Membership::trapezoid(1.0, 2.0, 4.0, 9.0).unwrap().fuzzify(&y);
        let b = bisector(mf.values(), &y);
        let cut = y.iter().position(|v| *v == b).unwrap();
        let left = trapz(&mf.values()[..=cut], &y[..=cut]);
        let total = trapz(mf.values(), &y);
        assert!((left - total / 2.0).abs() < 0.01 * total, "{} {}", left, total);
    }

    #[test]
    fn bisector_symmetric() {
        let y = linspace(-5.0, 5.0, 101);
        let mf = Membership::triangle(-2.0, 0.0, 2.0).unwrap().fuzzify(&y);
        assert!(bisector(mf.values(), &y).abs() < 0.1 + 1e-12);
    }

    #[test]
    fn bisector_edge_cases() {
        assert!(bisector(&[], &[]).is_nan());
        assert_eq!(bisector(&[0.5], &[3.0]), 3.0);
        // Nothing to accumulate: stops at the first sample.
        assert_eq!(bisector(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), 1.0);
        // Never runs past the end.
        assert_eq!(bisector(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0]), 3.0);
    }

    #[test]
    fn maxima() {
        let y = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let mf = [0.1, 0.7, 0.7, 0.3, 0.7, 0.2];
        assert_eq!(smallest_of_maxima(&mf, &y), 1.0);
        assert_eq!(largest_of_maxima(&mf, &y), 4.0);
        assert_eq!(mean_of_maxima(&mf, &y), 2.5);

        let single = [0.0, 0.2, 1.0, 0.2, 0.0, 0.0];
        assert_eq!(smallest_of_maxima(&single, &y), 2.0);
        assert_eq!(largest_of_maxima(&single, &y), 2.0);
        assert_eq!(mean_of_maxima(&single, &y), 2.0);

        assert!(smallest_of_maxima(&[], &[]).is_nan());
        assert!(mean_of_maxima(&[], &[]).is_nan());
    }

    #[test]
    fn defuzzifier_dispatch() {
        let y = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mf = [0.0, 1.0, 0.5, 1.0, 0.0];
        assert_eq!(Defuzzifier::SmallestOfMaxima.defuzzify(&mf, &y), 1.0);
        assert_eq!(Defuzzifier::LargestOfMaxima.defuzzify(&mf, &y), 3.0);
        assert_eq!(Defuzzifier::MeanOfMaxima.defuzzify(&mf, &y), 2.0);
        assert_eq!(Defuzzifier::Centroid.defuzzify(&mf, &y), 2.0);
        assert_eq!(Defuzzifier::default(), Defuzzifier::Centroid);

        let custom = |mf: &[f64], y: &[f64]| mf.iter().zip(y).map(|(m, y)| m * y).sum::<f64>();
        assert_eq!(custom.defuzzify(&mf, &y), 5.0);
        assert_eq!(custom.name(), "custom");
        assert_eq!((centroid as fn(&[f64], &[f64]) -> f64).defuzzify(&mf, &y), 2.0);
    }
}
