//! Simulation Setup
//!
//! Random network construction.

pub mod network;

pub use network::*;
