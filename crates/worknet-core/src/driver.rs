//! Simulation Driver
//!
//! Owns the tick loop. Each tick runs, strictly in this order: every node
//! rule, every edge rule, one population snapshot. There is no early exit;
//! a run lasts exactly the requested number of ticks.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::marker::PhantomData;
use tracing::info;

use crate::components::network::Network;
use crate::components::rules::RuleSet;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::random::DrawSource;
use crate::scenarios::{self, Scenario};
use crate::systems::{
    apply_edge_rules, apply_node_rules, capture_tick_start, record_population, StatsCollector,
    TickActivity, TickStartStates,
};
use crate::SimRng;
use worknet_series::{NodeState, RunMetadata, RunReport, TimeSeries};

/// Tick counter for the current run
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    /// Last tick started; 0 before the first step
    pub current_tick: u64,
}

/// A network, its rules and its random stream, ready to be stepped
pub struct Simulation<S: NodeState> {
    world: World,
    schedule: Schedule,
    log_interval: u64,
    _state: PhantomData<S>,
}

impl<S: NodeState> Simulation<S> {
    /// Validates `rules` and sets up the tick schedule.
    pub fn new(
        network: Network<S>,
        rules: RuleSet<S>,
        draws: impl DrawSource + Send + Sync + 'static,
    ) -> Result<Self, SimError> {
        rules.validate()?;

        let mut world = World::new();
        world.insert_resource(TickClock::default());
        world.insert_resource(SimRng::new(draws));
        world.insert_resource(network);
        world.insert_resource(rules);
        world.insert_resource(TickStartStates::<S>::default());
        world.insert_resource(TickActivity::default());
        world.insert_resource(StatsCollector::<S>::new());

        // Node rules, then edge rules, then the snapshot
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                capture_tick_start::<S>,
                apply_node_rules::<S>,
                apply_edge_rules::<S>,
                record_population::<S>,
            )
                .chain(),
        );

        Ok(Self {
            world,
            schedule,
            log_interval: 0,
            _state: PhantomData,
        })
    }

    /// Builds the network and the tick loop from one seeded stream.
    ///
    /// The builder consumes the first draws; the tick loop continues the
    /// same stream, so a seed fixes the whole trajectory. Rules are checked
    /// before any graph is generated.
    pub fn from_config(
        config: &SimConfig,
        rules: RuleSet<S>,
        bases: (S, S),
    ) -> Result<Self, SimError> {
        config.validate()?;
        rules.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
        let network = config.network.builder(bases).build(&mut rng)?;
        let rules = rules.with_observation(config.simulation.observation);

        Ok(Self::new(network, rules, rng)?.with_log_interval(config.simulation.log_interval))
    }

    /// Log progress every `interval` ticks (0 = never).
    pub fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = interval;
        self
    }

    /// Advances one tick and returns its number.
    pub fn step(&mut self) -> u64 {
        let tick = {
            let mut clock = self.world.resource_mut::<TickClock>();
            clock.current_tick += 1;
            clock.current_tick
        };
        self.schedule.run(&mut self.world);

        if self.log_interval > 0 && tick % self.log_interval == 0 {
            let counts = self.network().counts();
            info!(tick, counts = ?counts.as_slice(), "progress");
        }
        tick
    }

    /// Advances `ticks` ticks.
    pub fn run(&mut self, ticks: u64) -> &TimeSeries<S> {
        for _ in 0..ticks {
            self.step();
        }
        self.time_series()
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickClock>().current_tick
    }

    pub fn network(&self) -> &Network<S> {
        self.world.resource::<Network<S>>()
    }

    pub fn stats(&self) -> &StatsCollector<S> {
        self.world.resource::<StatsCollector<S>>()
    }

    /// Activity of the most recent tick.
    pub fn last_activity(&self) -> TickActivity {
        *self.world.resource::<TickActivity>()
    }

    pub fn time_series(&self) -> &TimeSeries<S> {
        self.stats().series()
    }

    pub fn into_time_series(mut self) -> TimeSeries<S> {
        self.world
            .remove_resource::<StatsCollector<S>>()
            .map(StatsCollector::into_series)
            .unwrap_or_default()
    }
}

/// Runs `ticks` ticks over `network` and returns the population series.
///
/// Zero ticks yields an empty series.
pub fn run<S: NodeState>(
    network: Network<S>,
    rules: RuleSet<S>,
    ticks: u64,
    draws: impl DrawSource + Send + Sync + 'static,
) -> Result<TimeSeries<S>, SimError> {
    let mut simulation = Simulation::new(network, rules, draws)?;
    simulation.run(ticks);
    Ok(simulation.into_time_series())
}

/// Runs the scenario selected in `config` and packages the result.
pub fn run_config(config: &SimConfig) -> Result<RunReport, SimError> {
    match config.simulation.scenario {
        Scenario::TwoState => run_scenario(
            config,
            scenarios::two_state_rules(&config.two_state),
            scenarios::TWO_STATE_BASES,
        ),
        Scenario::Task => run_scenario(
            config,
            scenarios::task_rules(&config.task),
            scenarios::TASK_BASES,
        ),
    }
}

fn run_scenario<S: NodeState>(
    config: &SimConfig,
    rules: RuleSet<S>,
    bases: (S, S),
) -> Result<RunReport, SimError> {
    let scenario = config.simulation.scenario.name();
    let mut simulation = Simulation::from_config(config, rules, bases)?;
    info!(
        scenario,
        seed = config.simulation.seed,
        nodes = simulation.network().node_count(),
        edges = simulation.network().edge_count(),
        "network built"
    );

    simulation.run(config.simulation.ticks);

    let stats = simulation.stats();
    info!(
        ticks = simulation.current_tick(),
        node_transitions = stats.total_node_transitions,
        edge_firings = stats.total_edge_firings,
        "simulation complete"
    );

    let metadata = RunMetadata {
        scenario: scenario.to_string(),
        seed: config.simulation.seed,
        node_count: simulation.network().node_count(),
        edge_count: simulation.network().edge_count(),
        ticks: simulation.current_tick(),
    };
    Ok(RunReport::new(metadata, simulation.time_series()))
}
