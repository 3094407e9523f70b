use crate::model::{InvertedPendulum, State};

use serde::{Deserialize, Serialize};

/// Parameters of a pendulum simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Pendulum length, in meters.
    pub length: f64,
    /// Pendulum mass, in kilograms.
    pub mass: f64,
    /// Cart mass, in kilograms.
    pub cart_mass: f64,
    /// Time step, in seconds.
    pub dt: f64,
    /// Number of time steps to simulate.
    pub steps: usize,
    /// Log the state every this many steps.
    pub report_every: usize,
    /// State at the start of the simulation.
    pub initial: State,
    /// Number of samples of the force domain.
    pub force_samples: usize,
    /// Number of samples per axis of the control surface.
    pub surface_resolution: usize,
}

impl SimulationConfig {
    /// Builds a pendulum with these parameters, in the initial state.
    pub fn pendulum(&self) -> InvertedPendulum {
        let mut pendulum = InvertedPendulum::new(self.length, self.mass, self.cart_mass, self.dt);
        pendulum.set_state(self.initial);
        pendulum
    }
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            length: 0.5,
            mass: 0.1,
            cart_mass: 0.5,
            dt: 0.01,
            steps: 500,
            report_every: 50,
            initial: State {
                theta: 0.5,
                ..State::default()
            },
            force_samples: 500,
            surface_resolution: 41,
        }
    }
}
