//! Run Report
//!
//! Serializable summary of a finished run: what was simulated and the full
//! per-tick count table. Consumed read-only by analysis and plotting tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::series::{TickRecord, TimeSeries};
use crate::state::NodeState;

/// Parameters that identify a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub scenario: String,
    pub seed: u64,
    pub node_count: usize,
    /// Edges actually generated (random, not the configured target)
    pub edge_count: usize,
    pub ticks: u64,
}

/// A run's metadata plus its time series, keyed by state name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run: RunMetadata,
    /// State names in count-vector order
    pub states: Vec<String>,
    pub records: Vec<TickRecord>,
}

impl RunReport {
    pub fn new<S: NodeState>(run: RunMetadata, series: &TimeSeries<S>) -> Self {
        Self {
            run,
            states: S::names().into_iter().map(String::from).collect(),
            records: series.records().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(ReportError::Json)
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(ReportError::Json)
    }

    /// Writes the report as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(ReportError::Io)?;
            }
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(ReportError::Io)
    }

    /// Column for the state called `name`, if present.
    pub fn column(&self, name: &str) -> Option<Vec<usize>> {
        let idx = self.states.iter().position(|s| s == name)?;
        Some(
            self.records
                .iter()
                .map(|r| r.counts.as_slice().get(idx).copied().unwrap_or(0))
                .collect(),
        )
    }
}

/// Errors from encoding or writing a report.
#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "IO error: {}", e),
            ReportError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Json(e) => Some(e),
        }
    }
}
