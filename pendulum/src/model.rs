//! Dynamic model of an inverted pendulum on a cart.

use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

/// Gravity, in m/s².
pub const GRAVITY: f64 = 9.80665;

/// The state variables of the pendulum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Angular position of the pendulum, in radians. 0 is upright.
    pub theta: f64,
    /// Angular velocity of the pendulum, in rad/s.
    pub omega: f64,
    /// Position of the cart, in meters.
    pub x: f64,
    /// Speed of the cart, in m/s.
    pub v: f64,
}

/// Returns the principal value of an angle, in `[-π, π)`.
pub fn principal_value(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// A pendulum hinged on a cart that moves along a line.
///
/// Forces are applied to the cart; the accelerations are integrated
/// with a semi-implicit Euler step of `dt` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct InvertedPendulum {
    /// Pendulum length, in meters.
    pub l: f64,
    /// Pendulum mass, in kilograms.
    pub m: f64,
    /// Cart mass, in kilograms.
    pub mc: f64,
    /// Simulation time step, in seconds.
    pub dt: f64,
    state: State,
}

impl InvertedPendulum {
    /// Creates an upright, resting pendulum.
    pub fn new(l: f64, m: f64, mc: f64, dt: f64) -> InvertedPendulum {
        InvertedPendulum {
            l,
            m,
            mc,
            dt,
            state: State::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Sets the state of the pendulum. The angle is reduced
    /// to its principal value.
    pub fn set_state(&mut self, state: State) {
        self.state = State {
            theta: principal_value(state.theta),
            ..state
        };
    }

    /// Applies `force` (in newtons) to the cart for one time step,
    /// and returns the new state.
    pub fn apply(&mut self, force: f64) -> State {
        let State { theta, omega, x, v } = self.state;
        let (l, m, dt) = (self.l, self.m, self.dt);
        let total_mass = m + self.mc;
        let (sin, cos) = theta.sin_cos();

        let q = (GRAVITY * sin + (-force - m * l * omega * omega * sin) * cos / total_mass)
            / (l * (4.0 / 3.0 - m * cos * cos / total_mass));
        let a = force - m * l * (omega * omega * sin - q * cos) / total_mass;

        let omega = omega + q * dt;
        let v = v + a * dt;
        self.state = State {
            theta: principal_value(theta + omega * dt),
            omega,
            x: x + v * dt,
            v,
        };
        self.state
    }
}

impl Default for InvertedPendulum {
    fn default() -> InvertedPendulum {
        InvertedPendulum::new(0.5, 0.1, 0.5, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_values() {
        for turns in -5..=5 {
            let angle = 0.25 + turns as f64 * 2.0 * PI;
            assert!((principal_value(angle) - 0.25).abs() < 1e-9);
        }
        assert_eq!(principal_value(-PI), -PI);
        assert!((principal_value(PI) + PI).abs() < 1e-12);
        assert_eq!(principal_value(0.0), 0.0);
    }

    #[test]
    fn upright_equilibrium() {
        let mut pendulum = InvertedPendulum::default();
        for _ in 0..100 {
            assert_eq!(pendulum.apply(0.0), State::default());
        }
    }

    #[test]
    fn falls_without_control() {
        let mut pendulum = InvertedPendulum::default();
        pendulum.set_state(State {
            theta: 0.1,
            ..State::default()
        });
        let mut previous = pendulum.state();
        for _ in 0..20 {
            let state = pendulum.apply(0.0);
            assert!(state.theta > previous.theta);
            assert!(state.omega > previous.omega);
            previous = state;
        }
    }

    #[test]
    fn force_moves_cart_and_tilts_pendulum() {
        let mut pendulum = InvertedPendulum::default();
        let state = pendulum.apply(10.0);
        assert!(state.v > 0.0);
        assert!(state.x > 0.0);
        // Pushing the cart forward tips the pendulum back.
        assert!(state.omega < 0.0);
        assert!(state.theta < 0.0);
    }

    #[test]
    fn set_state_wraps_angle() {
        let mut pendulum = InvertedPendulum::default();
        pendulum.set_state(State {
            theta: 2.0 * PI + 0.5,
            omega: 1.0,
            x: 2.0,
            v: -1.0,
        });
        let state = pendulum.state();
        assert!((state.theta - 0.5).abs() < 1e-12);
        assert_eq!((state.omega, state.x, state.v), (1.0, 2.0, -1.0));
    }
}
