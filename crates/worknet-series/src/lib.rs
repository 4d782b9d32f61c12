//! Shared state and time-series types for the worknet simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine in `worknet-core` writes into these types; plotting and
//! analysis layers read them.

pub mod report;
pub mod series;
pub mod state;

pub use report::{ReportError, RunMetadata, RunReport};
pub use series::{PopulationCounts, TickRecord, TimeSeries};
pub use state::{NodeState, Occupation, TaskState};
