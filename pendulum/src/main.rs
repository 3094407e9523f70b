mod config;
mod controller;
mod model;

use config::SimulationConfig;
use controller::{control_surface, pendulum_controller};

use oxifuzzy::control::Controller;
use ron::ser::PrettyConfig;
use tracing::{info, warn};

use std::error::Error;
use std::f64::consts::FRAC_PI_2;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pendulum=info".parse()?),
        )
        .init();

    let config = SimulationConfig::default();
    info!(
        "simulation config:\n{}",
        ron::ser::to_string_pretty(&config, PrettyConfig::new())?
    );

    let controller = pendulum_controller(config.force_samples)?;
    info!(?controller, "controller ready");

    simulate(&config, &controller)?;

    let surface = control_surface(&controller, config.surface_resolution)?;
    let defined = surface.iter().filter(|p| !p.force.is_nan());
    let min = defined.clone().min_by(|a, b| a.force.total_cmp(&b.force));
    let max = defined.max_by(|a, b| a.force.total_cmp(&b.force));
    if let (Some(min), Some(max)) = (min, max) {
        info!(
            points = surface.len(),
            min_force = min.force,
            min_theta = min.theta,
            min_omega = min.omega,
            max_force = max.force,
            max_theta = max.theta,
            max_omega = max.omega,
            "control surface computed"
        );
    }

    Ok(())
}

fn simulate(
    config: &SimulationConfig,
    controller: &Controller,
) -> Result<(), Box<dyn Error>> {
    let mut pendulum = config.pendulum();
    let report_every = config.report_every.max(1);

    for step in 0..config.steps {
        let state = pendulum.state();
        let mut force = controller.evaluate(&[state.theta, state.omega])?;
        if force.is_nan() {
            warn!(step, theta = state.theta, omega = state.omega, "no rule fired, applying no force");
            force = 0.0;
        }
        let state = pendulum.apply(force);
        if step % report_every == 0 {
            info!(
                step,
                force,
                theta = state.theta,
                omega = state.omega,
                x = state.x,
                v = state.v,
                "state"
            );
        }
        if state.theta.abs() > FRAC_PI_2 {
            warn!(step, theta = state.theta, "pendulum fell");
            break;
        }
    }

    let state = pendulum.state();
    info!(
        theta = state.theta,
        omega = state.omega,
        x = state.x,
        v = state.v,
        "simulation finished"
    );
    Ok(())
}
