//! Node State Types
//!
//! Closed sets of agent states. A simulation is generic over one of these
//! enums, so rules can only ever name states that exist.
//!
//! # Example
//!
//! ```
//! use worknet_series::{NodeState, TaskState};
//!
//! assert_eq!(TaskState::ALL.len(), 6);
//! assert_eq!(TaskState::BusyWorker.index(), 3);
//! assert_eq!(TaskState::BusyWorker.to_string(), "busy_worker");
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A finite, enumerated node state.
///
/// `ALL` lists every variant in index order; `index()` must agree with it.
pub trait NodeState:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every variant, ordered by `index()`.
    const ALL: &'static [Self];

    /// Position of this state in count vectors.
    fn index(self) -> usize;

    /// Stable snake_case name used in config files and reports.
    fn name(self) -> &'static str;

    /// Number of distinct states.
    fn count() -> usize {
        Self::ALL.len()
    }

    /// Names of all states, in index order.
    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name()).collect()
    }
}

/// Two-state population: agents are either working or managing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Worker,
    Manager,
}

impl NodeState for Occupation {
    const ALL: &'static [Self] = &[Occupation::Worker, Occupation::Manager];

    fn index(self) -> usize {
        match self {
            Occupation::Worker => 0,
            Occupation::Manager => 1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Occupation::Worker => "worker",
            Occupation::Manager => "manager",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Six-state population where managers hand tasks to workers over edges.
///
/// A worker and a manager that share an edge may pair up and both become
/// busy; busy workers eventually succeed or fail and rejoin the idle pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Worker,
    Manager,
    BusyManager,
    BusyWorker,
    SuccessWorker,
    FailedWorker,
}

impl NodeState for TaskState {
    const ALL: &'static [Self] = &[
        TaskState::Worker,
        TaskState::Manager,
        TaskState::BusyManager,
        TaskState::BusyWorker,
        TaskState::SuccessWorker,
        TaskState::FailedWorker,
    ];

    fn index(self) -> usize {
        match self {
            TaskState::Worker => 0,
            TaskState::Manager => 1,
            TaskState::BusyManager => 2,
            TaskState::BusyWorker => 3,
            TaskState::SuccessWorker => 4,
            TaskState::FailedWorker => 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TaskState::Worker => "worker",
            TaskState::Manager => "manager",
            TaskState::BusyManager => "busy_manager",
            TaskState::BusyWorker => "busy_worker",
            TaskState::SuccessWorker => "success_worker",
            TaskState::FailedWorker => "failed_worker",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_match<S: NodeState>() {
        for (i, state) in S::ALL.iter().enumerate() {
            assert_eq!(state.index(), i, "{} is out of order", state);
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        assert_indices_match::<Occupation>();
        assert_indices_match::<TaskState>();
    }

    #[test]
    fn test_names_match_serde() {
        for state in TaskState::ALL {
            let json = serde_json::to_string(state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.name()));
        }
        let parsed: Occupation = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(parsed, Occupation::Manager);
    }

    #[test]
    fn test_names_list() {
        assert_eq!(Occupation::names(), vec!["worker", "manager"]);
        assert_eq!(TaskState::count(), 6);
    }
}
