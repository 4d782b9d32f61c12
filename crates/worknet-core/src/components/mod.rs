//! Simulation Components
//!
//! The network (node states and edges) and the rules that transform it.

pub mod network;
pub mod rules;

pub use network::*;
pub use rules::*;
