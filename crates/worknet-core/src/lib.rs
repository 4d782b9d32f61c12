//! Worknet Simulation Engine Library
//!
//! Discrete-time stochastic state transitions on an Erdős–Rényi network.
//! Every tick each node applies its state's transition rule, then every edge
//! applies the pair patterns of its two endpoints, then the population of
//! each state is appended to a time series.

use bevy_ecs::prelude::*;

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod random;
pub mod scenarios;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use driver::{run, run_config, Simulation, TickClock};
pub use error::SimError;
pub use random::{DrawSource, ScriptedDraws};
pub use scenarios::Scenario;
pub use setup::{InitialAssignment, NetworkBuilder};

pub use worknet_series::{
    NodeState, Occupation, PopulationCounts, RunMetadata, RunReport, TaskState, TickRecord,
    TimeSeries,
};

/// Random stream shared by every rule evaluation in a run
#[derive(Resource)]
pub struct SimRng(Box<dyn DrawSource + Send + Sync>);

impl SimRng {
    /// Wraps any draw source, e.g. a seeded `SmallRng` or `ScriptedDraws`.
    pub fn new(source: impl DrawSource + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

impl DrawSource for SimRng {
    fn draw(&mut self) -> f64 {
        self.0.draw()
    }
}
