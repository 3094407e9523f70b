//! Membership functions.
//!
//! A membership function maps a crisp value to a degree of truth. The
//! built-in shapes are variants of [`Membership`]; any other curve can be
//! wrapped with [`Membership::custom`]. Shapes are immutable once built,
//! and are applied either to a single value with [`Membership::degree`] or
//! to a whole domain with [`Membership::fuzzify`].
//!
//! For controllers, input variables are usually partitioned into
//! overlapping functions with [`saw`] or [`flat_saw`], or grouped under
//! labels in a [`LinguisticVariable`].
mod errors;
mod variable;

pub use errors::MembershipError;
pub use variable::LinguisticVariable;

use crate::sets::FuzzySet;

use serde::{Deserialize, Serialize};

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// A membership function.
///
/// The constructor functions validate their parameters; building a
/// variant directly skips validation, and malformed parameters then
/// give meaningless (but non-panicking) degrees.
///
/// Piecewise shapes select the first branch whose upper breakpoint lies
/// strictly above `x`, so a triangle evaluates to exactly `1.0` at its peak
/// and exactly `0.0` at both feet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Membership {
    /// 0 below `x0`, linear up to 1 at `x1`, 1 above.
    IncreasingRamp { x0: f64, x1: f64 },
    /// 1 below `x0`, linear down to 0 at `x1`, 0 above.
    DecreasingRamp { x0: f64, x1: f64 },
    /// 0 outside `[x0, x2]`, peak of 1 at `x1`.
    Triangle { x0: f64, x1: f64, x2: f64 },
    /// Rises over `[x0, x1]`, plateau of 1 over `[x1, x2]`, falls over `[x2, x3]`.
    Trapezoid { x0: f64, x1: f64, x2: f64, x3: f64 },
    /// exp(−(x − center)² / width)
    Gaussian { center: f64, width: f64 },
    /// 1 / (1 + exp(−slope·(x − center)))
    IncreasingSigmoid { center: f64, slope: f64 },
    /// 1 / (1 + exp(slope·(x − center)))
    DecreasingSigmoid { center: f64, slope: f64 },
    /// One period of 0.5 + 0.5·cos(frequency·(x − center)), 0 elsewhere.
    RaisedCosine { center: f64, frequency: f64 },
    /// 1 / (1 + |(x − center) / width|^(2·flatness))
    Bell {
        center: f64,
        width: f64,
        flatness: f64,
    },
    /// Smooth increasing S-curve from 0 at `x0` to 1 at `x1`.
    Smf { x0: f64, x1: f64 },
    /// Smooth decreasing Z-curve from 1 at `x0` to 0 at `x1`.
    Zmf { x0: f64, x1: f64 },
    /// A user-supplied function. Its range is not checked.
    #[serde(skip)]
    Custom(CustomMembership),
}

/// A shared, user-supplied membership curve.
#[derive(Clone)]
pub struct CustomMembership(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl fmt::Debug for CustomMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomMembership")
    }
}

// Two custom memberships are equal only if they share the same function.
impl PartialEq for CustomMembership {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn check_finite(shape: &'static str, values: &[f64]) -> Result<(), MembershipError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(MembershipError::NonFinite { shape })
    }
}

fn check_ordered(shape: &'static str, points: &[f64]) -> Result<(), MembershipError> {
    check_finite(shape, points)?;
    if points.windows(2).all(|w| w[0] < w[1]) {
        Ok(())
    } else {
        Err(MembershipError::UnorderedPoints {
            shape,
            points: points.to_vec(),
        })
    }
}

fn check_positive(
    shape: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), MembershipError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(MembershipError::NonPositive {
            shape,
            parameter,
            value,
        })
    }
}

impl Membership {
    /// Returns an increasing ramp from `x0` to `x1`.
    ///
    /// # Errors
    /// Fails unless `x0 < x1`, both finite.
    pub fn increasing_ramp(x0: f64, x1: f64) -> Result<Membership, MembershipError> {
        check_ordered("increasing ramp", &[x0, x1])?;
        Ok(Membership::IncreasingRamp { x0, x1 })
    }

    /// Returns a decreasing ramp from `x0` to `x1`.
    ///
    /// # Errors
    /// Fails unless `x0 < x1`, both finite.
    pub fn decreasing_ramp(x0: f64, x1: f64) -> Result<Membership, MembershipError> {
        check_ordered("decreasing ramp", &[x0, x1])?;
        Ok(Membership::DecreasingRamp { x0, x1 })
    }

    /// Returns a triangle starting at `x0`, peaking at `x1`
    /// and ending at `x2`.
    ///
    /// # Errors
    /// Fails unless `x0 < x1 < x2`, all finite.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::membership::Membership;
    ///
    /// let mu = Membership::triangle(0.0, 3.0, 4.0).unwrap();
    /// assert_eq!(mu.degree(1.5), 0.5);
    /// assert_eq!(mu.degree(3.0), 1.0);
    ///
    /// assert!(Membership::triangle(0.0, 4.0, 3.0).is_err());
    /// ```
    pub fn triangle(x0: f64, x1: f64, x2: f64) -> Result<Membership, MembershipError> {
        check_ordered("triangle", &[x0, x1, x2])?;
        Ok(Membership::Triangle { x0, x1, x2 })
    }

    /// Returns a trapezoid with feet at `x0` and `x3`,
    /// and a plateau over `[x1, x2]`.
    ///
    /// # Errors
    /// Fails unless `x0 < x1 < x2 < x3`, all finite.
    pub fn trapezoid(x0: f64, x1: f64, x2: f64, x3: f64) -> Result<Membership, MembershipError> {
        check_ordered("trapezoid", &[x0, x1, x2, x3])?;
        Ok(Membership::Trapezoid { x0, x1, x2, x3 })
    }

    /// Returns a gaussian bump around `center`.
    ///
    /// # Errors
    /// Fails unless `width > 0`, both finite.
    pub fn gaussian(center: f64, width: f64) -> Result<Membership, MembershipError> {
        check_finite("gaussian", &[center, width])?;
        check_positive("gaussian", "width", width)?;
        Ok(Membership::Gaussian { center, width })
    }

    /// Returns an increasing sigmoid through 0.5 at `center`.
    pub fn increasing_sigmoid(center: f64, slope: f64) -> Result<Membership, MembershipError> {
        check_finite("increasing sigmoid", &[center, slope])?;
        Ok(Membership::IncreasingSigmoid { center, slope })
    }

    /// Returns a decreasing sigmoid through 0.5 at `center`.
    pub fn decreasing_sigmoid(center: f64, slope: f64) -> Result<Membership, MembershipError> {
        check_finite("decreasing sigmoid", &[center, slope])?;
        Ok(Membership::DecreasingSigmoid { center, slope })
    }

    /// Returns a single raised-cosine period centered on `center`,
    /// zero outside `center ± π/frequency`.
    pub fn raised_cosine(center: f64, frequency: f64) -> Result<Membership, MembershipError> {
        check_finite("raised cosine", &[center, frequency])?;
        check_positive("raised cosine", "frequency", frequency)?;
        Ok(Membership::RaisedCosine { center, frequency })
    }

    /// Returns a generalized bell. It evaluates to 0.5 at
    /// `center ± width`; larger `flatness` gives a flatter top.
    pub fn bell(center: f64, width: f64, flatness: f64) -> Result<Membership, MembershipError> {
        check_finite("bell", &[center, width, flatness])?;
        check_positive("bell", "width", width)?;
        check_positive("bell", "flatness", flatness)?;
        Ok(Membership::Bell {
            center,
            width,
            flatness,
        })
    }

    /// Returns a smooth S-curve, 0 below `x0` and 1 above `x1`.
    pub fn smf(x0: f64, x1: f64) -> Result<Membership, MembershipError> {
        check_ordered("s-curve", &[x0, x1])?;
        Ok(Membership::Smf { x0, x1 })
    }

    /// Returns a smooth Z-curve, 1 below `x0` and 0 above `x1`.
    pub fn zmf(x0: f64, x1: f64) -> Result<Membership, MembershipError> {
        check_ordered("z-curve", &[x0, x1])?;
        Ok(Membership::Zmf { x0, x1 })
    }

    /// Turns any function into a membership function.
    ///
    /// It is up to the caller to keep the values in `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::membership::Membership;
    ///
    /// let mu = Membership::custom(|x| (-x.abs()).exp());
    /// assert_eq!(mu.degree(0.0), 1.0);
    /// ```
    pub fn custom<F>(f: F) -> Membership
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Membership::Custom(CustomMembership(Arc::new(f)))
    }

    /// Returns the degree of membership of `x`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Membership::IncreasingRamp { x0, x1 } => {
                if x < x0 {
                    0.0
                } else if x < x1 {
                    (x - x0) / (x1 - x0)
                } else {
                    1.0
                }
            }
            Membership::DecreasingRamp { x0, x1 } => {
                if x < x0 {
                    1.0
                } else if x < x1 {
                    (x1 - x) / (x1 - x0)
                } else {
                    0.0
                }
            }
            Membership::Triangle { x0, x1, x2 } => {
                if x < x0 {
                    0.0
                } else if x < x1 {
                    (x - x0) / (x1 - x0)
                } else if x < x2 {
                    (x2 - x) / (x2 - x1)
                } else {
                    0.0
                }
            }
            Membership::Trapezoid { x0, x1, x2, x3 } => {
                if x < x0 {
                    0.0
                } else if x < x1 {
                    (x - x0) / (x1 - x0)
                } else if x < x2 {
                    1.0
                } else if x < x3 {
                    (x3 - x) / (x3 - x2)
                } else {
                    0.0
                }
            }
            Membership::Gaussian { center, width } => (-(x - center).powi(2) / width).exp(),
            Membership::IncreasingSigmoid { center, slope } => {
                1.0 / (1.0 + (-slope * (x - center)).exp())
            }
            Membership::DecreasingSigmoid { center, slope } => {
                1.0 / (1.0 + (slope * (x - center)).exp())
            }
            Membership::RaisedCosine { center, frequency } => {
                let half_period = PI / frequency;
                if x < center - half_period || x >= center + half_period {
                    0.0
                } else {
                    0.5 * (frequency * (x - center)).cos() + 0.5
                }
            }
            Membership::Bell {
                center,
                width,
                flatness,
            } => 1.0 / (1.0 + ((x - center) / width).abs().powf(2.0 * flatness)),
            Membership::Smf { x0, x1 } => {
                let (middle, range) = ((x0 + x1) / 2.0, x1 - x0);
                if x < x0 {
                    0.0
                } else if x < middle {
                    2.0 * ((x - x0) / range).powi(2)
                } else if x < x1 {
                    1.0 - 2.0 * ((x - x1) / range).powi(2)
                } else {
                    1.0
                }
            }
            Membership::Zmf { x0, x1 } => {
                let (middle, range) = ((x0 + x1) / 2.0, x1 - x0);
                if x < x0 {
                    1.0
                } else if x < middle {
                    1.0 - 2.0 * ((x - x0) / range).powi(2)
                } else if x < x1 {
                    2.0 * ((x - x1) / range).powi(2)
                } else {
                    0.0
                }
            }
            Membership::Custom(ref f) => (f.0)(x),
        }
    }

    /// Applies the function over every point of `domain`.
    ///
    /// # Examples
    /// ```
    /// use oxifuzzy::membership::Membership;
    /// use oxifuzzy::sets::linspace;
    ///
    /// let domain = linspace(0.0, 4.0, 5);
    /// let set = Membership::triangle(1.0, 2.0, 3.0).unwrap().fuzzify(&domain);
    /// assert_eq!(set.values(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    /// ```
    pub fn fuzzify(&self, domain: &[f64]) -> FuzzySet {
        domain.iter().map(|x| self.degree(*x)).collect()
    }
}

fn check_interval(start: f64, end: f64) -> Result<(), MembershipError> {
    if start.is_finite() && end.is_finite() && start < end {
        Ok(())
    } else {
        Err(MembershipError::EmptyInterval { start, end })
    }
}

/// Splits `interval` into `n` equal, overlapping triangles.
///
/// Each triangle spans two `(end − start) / (n + 1)` steps and
/// its neighbour starts at its peak.
///
/// # Examples
/// ```
/// use oxifuzzy::membership::{saw, Membership};
///
/// let mfs = saw((0.0, 4.0), 3).unwrap();
/// assert_eq!(mfs, vec![
///     Membership::triangle(0.0, 1.0, 2.0).unwrap(),
///     Membership::triangle(1.0, 2.0, 3.0).unwrap(),
///     Membership::triangle(2.0, 3.0, 4.0).unwrap(),
/// ]);
/// ```
pub fn saw(interval: (f64, f64), n: usize) -> Result<Vec<Membership>, MembershipError> {
    let (start, end) = interval;
    check_interval(start, end)?;
    let dx = (end - start) / (n + 1) as f64;
    let mut x0 = start;
    let mut mfs = Vec::with_capacity(n);
    for _ in 0..n {
        mfs.push(Membership::triangle(x0, x0 + dx, x0 + 2.0 * dx)?);
        x0 += dx;
    }
    Ok(mfs)
}

/// Splits `interval` into a decreasing ramp, `n − 2` triangles
/// and an increasing ramp.
///
/// The outer functions saturate at 1 towards the ends of the interval
/// instead of falling back to 0, which suits controller inputs.
///
/// # Errors
/// Fails if `n < 2` or the interval is empty.
///
/// # Examples
/// ```
/// use oxifuzzy::membership::{flat_saw, Membership};
///
/// let mfs = flat_saw((0.0, 2.0), 3).unwrap();
/// assert_eq!(mfs, vec![
///     Membership::decreasing_ramp(0.5, 1.0).unwrap(),
///     Membership::triangle(0.5, 1.0, 1.5).unwrap(),
///     Membership::increasing_ramp(1.0, 1.5).unwrap(),
/// ]);
/// ```
pub fn flat_saw(interval: (f64, f64), n: usize) -> Result<Vec<Membership>, MembershipError> {
    if n < 2 {
        return Err(MembershipError::TooFewFunctions {
            requested: n,
            minimum: 2,
        });
    }
    let (start, end) = interval;
    check_interval(start, end)?;
    let dx = (end - start) / (n + 1) as f64;
    let mut mfs = Vec::with_capacity(n);
    mfs.push(Membership::decreasing_ramp(start + dx, start + 2.0 * dx)?);
    mfs.extend(saw((start + dx, end - dx), n - 2)?);
    mfs.push(Membership::increasing_ramp(end - 2.0 * dx, end - dx)?);
    Ok(mfs)
}
