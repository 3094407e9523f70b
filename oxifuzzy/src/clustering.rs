//! Fuzzy C-Means clustering.
//!
//! Fuzzy c-means partitions a set of samples into `C` classes, where each
//! sample belongs to every class to some degree and the degrees of a sample
//! add up to 1. The algorithm alternates between two steps until the
//! memberships settle:
//!
//! 1. Every class center is recomputed as the average of the samples,
//!    weighted by their membership in the class raised to the fuzziness `m`.
//! 2. Every membership is recomputed from the squared distances `d` of the
//!    sample to the centers, as `μ_i = 1 / Σ_j (d_i / d_j)^(1 / (m − 1))`.
//!
//! The closer `m` is to 1, the crisper the resulting partition.
//!
//! ```
//! use oxifuzzy::clustering::{CMeansConfig, FuzzyCMeans};
//!
//! let samples = vec![vec![0.0], vec![0.5], vec![9.5], vec![10.0]];
//! let memberships = vec![
//!     vec![0.6, 0.4], vec![0.6, 0.4], vec![0.4, 0.6], vec![0.4, 0.6],
//! ];
//! let mut fcm = FuzzyCMeans::new(samples, memberships, CMeansConfig::default()).unwrap();
//! let centers = fcm.run();
//!
//! assert!((centers[0][0] - 0.25).abs() < 0.1);
//! assert!((centers[1][0] - 9.75).abs() < 0.1);
//! ```
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// An error type indicating that a clustering problem
/// was malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    /// A sample had a different dimension than the first one.
    #[error("sample {index} has dimension {found}, expected {expected}")]
    SampleDimension {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// The number of membership rows differs from the number of samples.
    #[error("{found} membership rows given for {expected} samples")]
    MembershipRows { expected: usize, found: usize },
    /// A membership row had a different number of classes than the first one.
    #[error("membership row {row} has {found} classes, expected {expected}")]
    MembershipClasses {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("at least one class is needed")]
    NoClasses,
    /// The fuzziness exponent was not greater than 1.
    #[error("fuzziness must be greater than 1, got {0}")]
    Fuzziness(f64),
    /// Replacement centers did not have the current `(classes, dimension)` shape.
    #[error("centers must have shape {expected:?}, got {found:?}")]
    CenterShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A point to classify had a different dimension than the samples.
    #[error("point has dimension {found}, expected {expected}")]
    PointDimension { expected: usize, found: usize },
}

/// Configuration of a [`FuzzyCMeans`] run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CMeansConfig {
    /// The fuzziness exponent `m`. Must be greater than 1.
    pub fuzziness: f64,
    /// The run stops once a step changes the memberships by at most this much,
    /// measured as the sum of squared differences.
    pub max_error: f64,
    /// The run stops after this many steps.
    pub max_iterations: usize,
}

impl Default for CMeansConfig {
    fn default() -> CMeansConfig {
        CMeansConfig {
            fuzziness: 2.0,
            max_error: 1e-10,
            max_iterations: 20,
        }
    }
}

/// The state of a fuzzy c-means clustering: the samples, their
/// memberships in each class and the class centers.
///
/// A deserialized clustering goes through the same checks as
/// [`FuzzyCMeans::new`] and [`FuzzyCMeans::set_centers`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CMeansState")]
pub struct FuzzyCMeans {
    samples: Vec<Vec<f64>>,
    memberships: Vec<Vec<f64>>,
    centers: Vec<Vec<f64>>,
    config: CMeansConfig,
}

#[derive(Deserialize)]
struct CMeansState {
    samples: Vec<Vec<f64>>,
    memberships: Vec<Vec<f64>>,
    centers: Vec<Vec<f64>>,
    config: CMeansConfig,
}

impl TryFrom<CMeansState> for FuzzyCMeans {
    type Error = ClusteringError;

    fn try_from(state: CMeansState) -> Result<FuzzyCMeans, ClusteringError> {
        let mut fcm = FuzzyCMeans::new(state.samples, state.memberships, state.config)?;
        fcm.set_centers(state.centers)?;
        Ok(fcm)
    }
}

impl FuzzyCMeans {
    /// Creates a new clustering from the samples and their initial
    /// memberships, one row of `C` degrees per sample. The class
    /// centers are computed immediately.
    ///
    /// The initial memberships of each sample should add up to 1,
    /// and no class should be empty or hold every sample completely;
    /// this is not checked.
    ///
    /// # Errors
    /// Fails if there are no samples, if the samples differ in dimension,
    /// if the memberships are not a `samples × C` table with `C > 0`,
    /// or if the fuzziness is not greater than 1.
    pub fn new(
        samples: Vec<Vec<f64>>,
        initial_memberships: Vec<Vec<f64>>,
        config: CMeansConfig,
    ) -> Result<FuzzyCMeans, ClusteringError> {
        let dimension = samples
            .first()
            .ok_or(ClusteringError::EmptyTrainingSet)?
            .len();
        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != dimension)
        {
            return Err(ClusteringError::SampleDimension {
                index,
                expected: dimension,
                found: sample.len(),
            });
        }
        if initial_memberships.len() != samples.len() {
            return Err(ClusteringError::MembershipRows {
                expected: samples.len(),
                found: initial_memberships.len(),
            });
        }
        let classes = initial_memberships[0].len();
        if classes == 0 {
            return Err(ClusteringError::NoClasses);
        }
        if let Some((row, memberships)) = initial_memberships
            .iter()
            .enumerate()
            .find(|(_, m)| m.len() != classes)
        {
            return Err(ClusteringError::MembershipClasses {
                row,
                expected: classes,
                found: memberships.len(),
            });
        }
        if !(config.fuzziness > 1.0) {
            return Err(ClusteringError::Fuzziness(config.fuzziness));
        }

        let mut fcm = FuzzyCMeans {
            samples,
            memberships: initial_memberships,
            centers: vec![],
            config,
        };
        fcm.centers();
        Ok(fcm)
    }

    /// Creates a new clustering in `classes` classes, with random initial
    /// memberships normalized to add up to 1 for each sample.
    ///
    /// # Errors
    /// Fails if `classes` is 0, or for any reason [`new`] would.
    ///
    /// [`new`]: FuzzyCMeans::new
    pub fn with_random_partition<R: Rng + ?Sized>(
        samples: Vec<Vec<f64>>,
        classes: usize,
        config: CMeansConfig,
        rng: &mut R,
    ) -> Result<FuzzyCMeans, ClusteringError> {
        if classes == 0 {
            return Err(ClusteringError::NoClasses);
        }
        let memberships: Vec<Vec<f64>> = samples
            .iter()
            .map(|_| {
                let row: Vec<f64> = (0..classes)
                    .map(|_| rng.gen_range(f64::EPSILON..1.0))
                    .collect();
                let total: f64 = row.iter().sum();
                row.into_iter().map(|m| m / total).collect()
            })
            .collect();
        Self::new(samples, memberships, config)
    }

    pub fn samples(&self) -> &[Vec<f64>] {
        &self.samples
    }

    /// Returns the membership of every sample in every class.
    pub fn memberships(&self) -> &[Vec<f64>] {
        &self.memberships
    }

    /// Returns the current class centers, without recomputing them.
    pub fn cluster_centers(&self) -> &[Vec<f64>] {
        &self.centers
    }

    pub fn config(&self) -> &CMeansConfig {
        &self.config
    }

    fn classes(&self) -> usize {
        self.memberships[0].len()
    }

    fn dimension(&self) -> usize {
        self.samples[0].len()
    }

    /// Replaces the class centers.
    ///
    /// # Errors
    /// Fails unless there is one center per class, each with the
    /// dimension of the samples.
    pub fn set_centers(&mut self, centers: Vec<Vec<f64>>) -> Result<(), ClusteringError> {
        let expected = (self.classes(), self.dimension());
        let found = (
            centers.len(),
            centers.first().map_or(self.dimension(), Vec::len),
        );
        if found != expected || centers.iter().any(|c| c.len() != expected.1) {
            return Err(ClusteringError::CenterShape { expected, found });
        }
        self.centers = centers;
        Ok(())
    }

    /// Recomputes the class centers from the current memberships,
    /// and returns them.
    pub fn centers(&mut self) -> &[Vec<f64>] {
        let m = self.config.fuzziness;
        let dimension = self.dimension();
        self.centers = (0..self.classes())
            .map(|class| {
                let mut center = vec![0.0; dimension];
                let mut total = 0.0;
                for (sample, memberships) in self.samples.iter().zip(&self.memberships) {
                    let weight = memberships[class].powf(m);
                    for (c, x) in center.iter_mut().zip(sample) {
                        *c += weight * x;
                    }
                    total += weight;
                }
                center.into_iter().map(|c| c / total).collect()
            })
            .collect();
        &self.centers
    }

    fn degrees(&self, point: &[f64]) -> Vec<f64> {
        let distances: Vec<f64> = self
            .centers
            .iter()
            .map(|center| {
                center
                    .iter()
                    .zip(point)
                    .map(|(c, x)| (x - c) * (x - c))
                    .sum()
            })
            .collect();

        // A point on top of one or more centers belongs to them alone.
        let coincident = distances.iter().filter(|d| **d == 0.0).count();
        if coincident > 0 {
            let share = 1.0 / coincident as f64;
            return distances
                .iter()
                .map(|d| if *d == 0.0 { share } else { 0.0 })
                .collect();
        }

        let exponent = 1.0 / (self.config.fuzziness - 1.0);
        distances
            .iter()
            .map(|di| {
                let total: f64 = distances.iter().map(|dj| (di / dj).powf(exponent)).sum();
                1.0 / total
            })
            .collect()
    }

    /// Recomputes the memberships from the current centers, and
    /// returns them.
    pub fn update_memberships(&mut self) -> &[Vec<f64>] {
        self.memberships = self.samples.iter().map(|x| self.degrees(x)).collect();
        &self.memberships
    }

    /// Performs one iteration, updating the memberships and then
    /// the centers. Returns the sum of the squared changes in
    /// membership.
    pub fn step(&mut self) -> f64 {
        let old = self.memberships.clone();
        self.update_memberships();
        self.centers();
        old.iter()
            .zip(&self.memberships)
            .flat_map(|(old, new)| old.iter().zip(new))
            .map(|(old, new)| (new - old) * (new - old))
            .sum()
    }

    /// Steps until the change in memberships is at most `max_error`, or
    /// `max_iterations` steps were taken. Returns the class centers.
    pub fn run(&mut self) -> &[Vec<f64>] {
        let mut error = f64::INFINITY;
        let mut iterations = 0;
        while error > self.config.max_error && iterations < self.config.max_iterations {
            error = self.step();
            iterations += 1;
        }
        debug!(iterations, error, "c-means finished");
        &self.centers
    }

    /// Returns the membership of an unseen point in each class,
    /// given the current centers.
    pub fn classify(&self, point: &[f64]) -> Result<Vec<f64>, ClusteringError> {
        if point.len() != self.dimension() {
            return Err(ClusteringError::PointDimension {
                expected: self.dimension(),
                found: point.len(),
            });
        }
        Ok(self.degrees(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn two_blobs() -> Vec<Vec<f64>> {
        let mut samples = vec![];
        for (x0, y0) in [(0.0, 0.0), (5.0, 5.0)] {
            for dx in 0..3 {
                for dy in 0..3 {
                    samples.push(vec![x0 + dx as f64, y0 + dy as f64]);
                }
            }
        }
        samples
    }

    fn two_blob_memberships() -> Vec<Vec<f64>> {
        let mut memberships = vec![vec![0.7, 0.3]; 9];
        memberships.extend(vec![vec![0.3, 0.7]; 9]);
        memberships
    }

    #[test]
    fn initial_centers() {
        let fcm =
            FuzzyCMeans::new(two_blobs(), two_blob_memberships(), CMeansConfig::default()).unwrap();
        let centers = fcm.cluster_centers();
        assert_eq!(centers.len(), 2);
        for x in &centers[0] {
            assert!((x - 1.7758620689655182).abs() < 1e-9);
        }
        for x in &centers[1] {
            assert!((x - 5.224137931034482).abs() < 1e-9);
        }
    }

    #[test]
    fn converges_on_two_blobs() {
        let mut fcm =
            FuzzyCMeans::new(two_blobs(), two_blob_memberships(), CMeansConfig::default()).unwrap();
        let centers = fcm.run().to_vec();
        for x in &centers[0] {
            assert!((x - 0.99557).abs() < 1e-3, "{:?}", centers);
        }
        for x in &centers[1] {
            assert!((x - 6.00443).abs() < 1e-3, "{:?}", centers);
        }
        for row in fcm.memberships() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        // The blob's middle sample sits almost on its center.
        assert!(fcm.memberships()[4][0] > 0.999);
        assert!(fcm.memberships()[13][1] > 0.999);
        // Converged: one more step barely moves anything.
        assert!(fcm.step() < 1e-10);
    }

    #[test]
    fn random_partition() {
        let config = CMeansConfig {
            max_error: 1e-12,
            max_iterations: 200,
            ..CMeansConfig::default()
        };
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut fcm =
                FuzzyCMeans::with_random_partition(two_blobs(), 2, config, &mut rng).unwrap();
            for row in fcm.memberships() {
                assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
                assert!(row.iter().all(|m| *m > 0.0));
            }
            let mut centers = fcm.run().to_vec();
            centers.sort_by(|a, b| a[0].total_cmp(&b[0]));
            assert!((centers[0][0] - 0.99557).abs() < 1e-3, "{:?}", centers);
            assert!((centers[1][0] - 6.00443).abs() < 1e-3, "{:?}", centers);
        }
    }

    #[test]
    fn coincident_centers() {
        let samples = vec![vec![0.0], vec![3.0], vec![10.0]];
        let memberships = vec![vec![0.5, 0.5]; 3];
        let mut fcm = FuzzyCMeans::new(samples, memberships, CMeansConfig::default()).unwrap();

        fcm.set_centers(vec![vec![0.0], vec![6.0]]).unwrap();
        let memberships = fcm.update_memberships().to_vec();
        assert_eq!(memberships[0], vec![1.0, 0.0]);
        assert_eq!(memberships[1], vec![0.5, 0.5]);

        fcm.set_centers(vec![vec![10.0], vec![10.0]]).unwrap();
        assert_eq!(fcm.update_memberships()[2], vec![0.5, 0.5]);
    }

    #[test]
    fn classify() {
        let mut fcm = FuzzyCMeans::new(
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            CMeansConfig::default(),
        )
        .unwrap();
        fcm.set_centers(vec![vec![0.0, 0.0], vec![6.0, 0.0]]).unwrap();
        assert_eq!(fcm.classify(&[3.0, 0.0]).unwrap(), vec![0.5, 0.5]);
        assert_eq!(fcm.classify(&[6.0, 0.0]).unwrap(), vec![0.0, 1.0]);

        // Squared distances 4 and 16: memberships 4/5 and 1/5 with m = 2.
        let degrees = fcm.classify(&[2.0, 0.0]).unwrap();
        assert!((degrees[0] - 0.8).abs() < 1e-12);
        assert!((degrees[1] - 0.2).abs() < 1e-12);
        assert_eq!(
            fcm.classify(&[1.0]),
            Err(ClusteringError::PointDimension {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn validation() {
        let config = CMeansConfig::default();
        assert_eq!(
            FuzzyCMeans::new(vec![], vec![], config),
            Err(ClusteringError::EmptyTrainingSet)
        );
        assert_eq!(
            FuzzyCMeans::new(vec![vec![0.0], vec![0.0, 1.0]], vec![vec![1.0]; 2], config),
            Err(ClusteringError::SampleDimension {
                index: 1,
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            FuzzyCMeans::new(vec![vec![0.0]; 2], vec![vec![1.0]], config),
            Err(ClusteringError::MembershipRows {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            FuzzyCMeans::new(vec![vec![0.0]; 2], vec![vec![]; 2], config),
            Err(ClusteringError::NoClasses)
        );
        assert_eq!(
            FuzzyCMeans::new(
                vec![vec![0.0]; 2],
                vec![vec![0.5, 0.5], vec![1.0]],
                config
            ),
            Err(ClusteringError::MembershipClasses {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            FuzzyCMeans::new(
                vec![vec![0.0]],
                vec![vec![1.0]],
                CMeansConfig {
                    fuzziness: 1.0,
                    ..config
                }
            ),
            Err(ClusteringError::Fuzziness(1.0))
        );
        assert_eq!(
            FuzzyCMeans::with_random_partition(
                vec![vec![0.0]],
                0,
                config,
                &mut StdRng::seed_from_u64(7)
            ),
            Err(ClusteringError::NoClasses)
        );

        let mut fcm = FuzzyCMeans::new(vec![vec![0.0]], vec![vec![1.0]], config).unwrap();
        assert_eq!(
            fcm.set_centers(vec![vec![0.0, 1.0]]),
            Err(ClusteringError::CenterShape {
                expected: (1, 1),
                found: (1, 2)
            })
        );
    }

    #[test]
    fn deserialization_is_validated() {
        let mut fcm =
            FuzzyCMeans::new(two_blobs(), two_blob_memberships(), CMeansConfig::default()).unwrap();
        fcm.run();
        let json = serde_json::to_string(&fcm).unwrap();
        let back: FuzzyCMeans = serde_json::from_str(&json).unwrap();
        assert_eq!(back.samples(), fcm.samples());
        for (a, b) in back.cluster_centers().iter().zip(fcm.cluster_centers()) {
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() < 1e-12);
            }
        }

        let config = r#""config":{"fuzziness":2.0,"max_error":1e-10,"max_iterations":20}"#;
        let empty = format!(r#"{{"samples":[],"memberships":[],"centers":[],{}}}"#, config);
        assert!(serde_json::from_str::<FuzzyCMeans>(&empty).is_err());
        let bad_centers = format!(
            r#"{{"samples":[[0.0],[1.0]],"memberships":[[1.0],[1.0]],"centers":[[0.0,0.0]],{}}}"#,
            config
        );
        assert!(serde_json::from_str::<FuzzyCMeans>(&bad_centers).is_err());
        let good_centers = bad_centers.replace("[[0.0,0.0]]", "[[0.5]]");
        let restored: FuzzyCMeans = serde_json::from_str(&good_centers).unwrap();
        assert_eq!(restored.cluster_centers(), &[vec![0.5]]);
    }
}
