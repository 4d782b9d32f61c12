//! Error types for the simulation engine.
//!
//! Every error is raised while building the network or validating rules,
//! before the first tick. The tick loop itself cannot fail.

use worknet_series::ReportError;

use crate::config::ConfigError;

/// Setup and configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A network needs at least one node.
    #[error("network must contain at least one node")]
    NoNodes,

    /// Initial fraction must lie in `[0, 1]`.
    #[error("initial fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),

    /// Expected edge count is negative, non-finite or above `N(N-1)/2`.
    #[error("expected edge count {expected} is outside [0, {max}]")]
    EdgeCountOutOfRange {
        /// Requested expected edge count.
        expected: f64,
        /// Number of distinct node pairs.
        max: f64,
    },

    /// A probability is non-finite or outside `[0, 1]`.
    #[error("probability {value} for {rule} is outside [0, 1]")]
    InvalidProbability {
        /// Rule the probability belongs to.
        rule: String,
        /// Offending value.
        value: f64,
    },

    /// Outgoing transitions of one state sum past 1.
    #[error("transitions out of {state} sum to {total}, which exceeds 1")]
    TransitionOverflow {
        /// Source state.
        state: String,
        /// Summed probability.
        total: f64,
    },

    /// Enabled patterns matching one state pair sum past 1.
    #[error("edge patterns for ({a}, {b}) sum to {total}, which exceeds 1")]
    PatternOverflow {
        /// One endpoint state.
        a: String,
        /// Other endpoint state.
        b: String,
        /// Summed probability.
        total: f64,
    },

    /// Group toggle names a group no pattern belongs to.
    #[error("no edge pattern belongs to group '{0}'")]
    UnknownGroup(String),

    /// Edge endpoint is not a node index.
    #[error("edge endpoint {index} is out of range for {node_count} nodes")]
    EndpointOutOfRange {
        /// Offending endpoint.
        index: usize,
        /// Number of nodes in the network.
        node_count: usize,
    },

    /// Edge joins a node to itself.
    #[error("edge ({0}, {0}) is a self loop")]
    SelfLoop(usize),

    /// Unordered pair listed more than once.
    #[error("duplicate edge ({a}, {b})")]
    DuplicateEdge {
        /// Lower endpoint.
        a: usize,
        /// Higher endpoint.
        b: usize,
    },

    /// A configured run must advance at least one tick.
    #[error("tick count must be positive")]
    ZeroTicks,

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Report could not be written.
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
