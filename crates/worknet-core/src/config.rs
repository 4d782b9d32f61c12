//! Configuration System
//!
//! Loads run parameters from a TOML tuning file. Every section and field
//! has a default, so a partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::components::rules::EdgeObservation;
use crate::error::SimError;
use crate::scenarios::{Scenario, MENTORING, REFERRAL};
use crate::setup::{InitialAssignment, NetworkBuilder};
use worknet_series::NodeState;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub two_state: TwoStateConfig,
    #[serde(default)]
    pub task: TaskConfig,
}

/// Run length, seed and scenario selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: Scenario,
    pub seed: u64,
    pub ticks: u64,
    /// Ticks between progress log lines; 0 disables them
    pub log_interval: u64,
    pub observation: EdgeObservation,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::TwoState,
            seed: 42,
            ticks: 1000,
            log_interval: 100,
            observation: EdgeObservation::AfterNodeRules,
        }
    }
}

/// Random network parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub node_count: usize,
    /// Expected number of edges `K`
    pub expected_edges: f64,
    /// Fraction of nodes starting in base state A
    pub initial_fraction: f64,
    pub assignment: InitialAssignment,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_count: 10_000,
            expected_edges: 20_000.0,
            initial_fraction: 0.5,
            assignment: InitialAssignment::Random,
        }
    }
}

impl NetworkConfig {
    pub fn builder<S: NodeState>(&self, bases: (S, S)) -> NetworkBuilder<S> {
        NetworkBuilder::new(self.node_count, bases.0, bases.1)
            .with_expected_edges(self.expected_edges)
            .with_initial_fraction(self.initial_fraction)
            .with_assignment(self.assignment)
    }
}

/// Two-state model rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoStateConfig {
    pub worker_to_manager: f64,
    pub manager_to_worker: f64,
}

impl Default for TwoStateConfig {
    fn default() -> Self {
        Self {
            worker_to_manager: 0.1,
            manager_to_worker: 0.5,
        }
    }
}

/// Task model rates and pattern groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub assignment_rate: f64,
    pub release_rate: f64,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub promotion_rate: f64,
    pub return_rate: f64,
    pub recovery_rate: f64,
    pub demotion_rate: f64,
    pub mentoring_rate: f64,
    pub referral_rate: f64,
    /// Pattern group toggles by name
    pub groups: BTreeMap<String, bool>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(MENTORING.to_string(), true);
        groups.insert(REFERRAL.to_string(), false);

        Self {
            assignment_rate: 0.3,
            release_rate: 0.2,
            success_rate: 0.2,
            failure_rate: 0.1,
            promotion_rate: 0.05,
            return_rate: 0.5,
            recovery_rate: 0.3,
            demotion_rate: 0.02,
            mentoring_rate: 0.1,
            referral_rate: 0.05,
            groups,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::warn!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks run-level settings. Network and rule parameters are checked
    /// when the network is built and the rule set validated.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.simulation.ticks == 0 {
            return Err(SimError::ZeroTicks);
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.simulation.ticks, 1000);
        assert_eq!(config.network.node_count, 10_000);
        assert_eq!(config.simulation.scenario, Scenario::TwoState);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [simulation]
            scenario = "task"
            ticks = 50
            observation = "tick_start"

            [network]
            node_count = 200

            [task.groups]
            referral = true
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.scenario, Scenario::Task);
        assert_eq!(config.simulation.ticks, 50);
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.simulation.observation, EdgeObservation::TickStart);
        assert_eq!(config.network.node_count, 200);
        assert_eq!(config.network.initial_fraction, 0.5);
        assert_eq!(config.task.groups.get(REFERRAL), Some(&true));
        assert_eq!(config.task.assignment_rate, 0.3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(SimConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nseed = 7\n\n[two_state]\nworker_to_manager = 0.25").unwrap();

        let config = SimConfig::from_file(file.path()).unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.two_state.worker_to_manager, 0.25);
        assert_eq!(config.two_state.manager_to_worker, 0.5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = SimConfig::from_toml_str("[simulation]\nticks = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_ticks_rejected() {
        let mut config = SimConfig::default();
        config.simulation.ticks = 0;
        assert!(matches!(config.validate(), Err(SimError::ZeroTicks)));
    }
}
