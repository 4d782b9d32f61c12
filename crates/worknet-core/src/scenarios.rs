//! Scenario Presets
//!
//! Rule sets for the built-in population models. The engine accepts any
//! `RuleSet`; these are the configurations the binary knows by name.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::components::rules::{EdgePattern, RuleSet};
use crate::config::{TaskConfig, TwoStateConfig};
use worknet_series::{Occupation, TaskState};

/// Pattern group: successful workers coach failed neighbours back to work.
pub const MENTORING: &str = "mentoring";
/// Pattern group: managers promote successful neighbours.
pub const REFERRAL: &str = "referral";

/// Base states (A, B) for the two-state model
pub const TWO_STATE_BASES: (Occupation, Occupation) = (Occupation::Worker, Occupation::Manager);
/// Base states (A, B) for the task model
pub const TASK_BASES: (TaskState, TaskState) = (TaskState::Worker, TaskState::Manager);

/// Built-in population model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Workers and managers switching roles independently
    #[default]
    TwoState,
    /// Managers assign tasks to neighbouring workers
    Task,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::TwoState => "two_state",
            Scenario::Task => "task",
        }
    }
}

/// Two-state model: each tick a worker becomes a manager with probability
/// `worker_to_manager` and a manager becomes a worker with probability
/// `manager_to_worker`. No edge patterns.
pub fn two_state_rules(config: &TwoStateConfig) -> RuleSet<Occupation> {
    use Occupation::*;

    RuleSet::new()
        .with_transition(Worker, config.worker_to_manager, Manager)
        .with_transition(Manager, config.manager_to_worker, Worker)
}

/// Six-state task model.
///
/// A manager and a worker sharing an edge pair up and both become busy.
/// Busy managers are released on their own; busy workers finish with
/// success or failure. Successful workers may be promoted, failed workers
/// recover. Mentoring and referral are optional pattern groups.
pub fn task_rules(config: &TaskConfig) -> RuleSet<TaskState> {
    use TaskState::*;

    let mut rules = RuleSet::new()
        // Node rules, checked in this order per state
        .with_transition(Manager, config.demotion_rate, Worker)
        .with_transition(BusyManager, config.release_rate, Manager)
        .with_transition(BusyWorker, config.success_rate, SuccessWorker)
        .with_transition(BusyWorker, config.failure_rate, FailedWorker)
        .with_transition(SuccessWorker, config.promotion_rate, Manager)
        .with_transition(SuccessWorker, config.return_rate, Worker)
        .with_transition(FailedWorker, config.recovery_rate, Worker)
        // Edge patterns
        .with_pattern(EdgePattern::new(
            Manager,
            Worker,
            config.assignment_rate,
            BusyManager,
            BusyWorker,
        ))
        .with_pattern(
            EdgePattern::new(
                SuccessWorker,
                FailedWorker,
                config.mentoring_rate,
                SuccessWorker,
                Worker,
            )
            .in_group(MENTORING),
        )
        .with_pattern(
            EdgePattern::new(Manager, SuccessWorker, config.referral_rate, Manager, Manager)
                .in_group(REFERRAL),
        );

    for (group, enabled) in &config.groups {
        rules.set_group(group.clone(), *enabled);
    }
    rules
}
