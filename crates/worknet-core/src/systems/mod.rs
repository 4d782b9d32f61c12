//! ECS Systems
//!
//! Per-tick systems: node rules, edge rules, population statistics.

pub mod stats;
pub mod transition;

pub use stats::{record_population, StatsCollector};
pub use transition::{
    apply_edge_rules, apply_node_rules, capture_tick_start, step_edges, step_nodes,
    TickActivity, TickStartStates,
};
