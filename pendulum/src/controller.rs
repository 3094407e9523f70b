//! The fuzzy controller balancing the pendulum.

use oxifuzzy::control::{ControlError, Controller};
use oxifuzzy::membership::{flat_saw, Membership};
use oxifuzzy::sets::linspace;

use rayon::prelude::*;

use std::error::Error;
use std::f64::consts::PI;

/// Interval covered by the angle terms, in radians.
pub const THETA_RANGE: (f64, f64) = (-3.0 * PI / 8.0, 3.0 * PI / 8.0);
/// Interval covered by the angular velocity terms, in rad/s.
pub const OMEGA_RANGE: (f64, f64) = (-3.0 * PI, 3.0 * PI);
/// Interval of the force applied to the cart, in newtons.
pub const FORCE_RANGE: (f64, f64) = (-100.0, 100.0);

// Force term for each (angle, angular velocity) pair. Angle rows go from
// "very big negative" to "very big positive", velocity columns from
// "big negative" to "big positive"; force terms from 0, "very very big
// negative", to 8, "very very big positive".
const RULE_TABLE: [[usize; 5]; 7] = [
    [0, 0, 1, 2, 3],
    [0, 1, 2, 3, 4],
    [1, 2, 3, 4, 5],
    [2, 3, 4, 5, 6],
    [3, 4, 5, 6, 7],
    [4, 5, 6, 7, 8],
    [5, 6, 7, 8, 8],
];

/// Builds the pendulum controller, with `force_samples` samples
/// of the force domain. Its inputs are the angle and the angular
/// velocity of the pendulum; its output is the force on the cart.
pub fn pendulum_controller(force_samples: usize) -> Result<Controller, Box<dyn Error>> {
    let theta = flat_saw(THETA_RANGE, 7)?;
    let omega = flat_saw(OMEGA_RANGE, 5)?;
    let force = flat_saw(FORCE_RANGE, 9)?;

    let table: Vec<Vec<Option<Membership>>> = RULE_TABLE
        .iter()
        .map(|row| row.iter().map(|f| Some(force[*f].clone())).collect())
        .collect();

    let mut controller = Controller::new(linspace(FORCE_RANGE.0, FORCE_RANGE.1, force_samples));
    controller.add_table(&theta, &omega, &table)?;
    Ok(controller)
}

/// One sample of the control surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub theta: f64,
    pub omega: f64,
    pub force: f64,
}

/// Evaluates the controller over a `resolution × resolution` grid
/// spanning the angle and angular velocity ranges, in parallel.
/// Points are ordered row by row, angle first.
pub fn control_surface(
    controller: &Controller,
    resolution: usize,
) -> Result<Vec<SurfacePoint>, ControlError> {
    let thetas = linspace(THETA_RANGE.0, THETA_RANGE.1, resolution);
    let omegas = linspace(OMEGA_RANGE.0, OMEGA_RANGE.1, resolution);
    let grid: Vec<(f64, f64)> = thetas
        .iter()
        .flat_map(|theta| omegas.iter().map(move |omega| (*theta, *omega)))
        .collect();

    grid.par_iter()
        .map(|&(theta, omega)| {
            controller
                .evaluate(&[theta, omega])
                .map(|force| SurfacePoint {
                    theta,
                    omega,
                    force,
                })
        })
        .collect()
}
