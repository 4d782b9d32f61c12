//! Population Time Series
//!
//! Per-tick population counts, one count per node state. The series is
//! append-only: records are pushed once per tick and never rewritten.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::state::NodeState;

/// Number of nodes in each state, indexed by `NodeState::index`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationCounts(Vec<usize>);

impl PopulationCounts {
    /// Counts every state in `states`.
    pub fn tally<S: NodeState>(states: &[S]) -> Self {
        let mut counts = vec![0; S::count()];
        for state in states {
            counts[state.index()] += 1;
        }
        Self(counts)
    }

    /// Wraps a raw count vector.
    pub fn from_vec(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    pub fn get<S: NodeState>(&self, state: S) -> usize {
        self.0.get(state.index()).copied().unwrap_or(0)
    }

    /// Sum over all states. Equals the node count for any tallied vector.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Counts observed at the end of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    /// 1-based tick number
    pub tick: u64,
    pub counts: PopulationCounts,
}

/// Ordered per-tick population records for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeries<S: NodeState> {
    records: Vec<TickRecord>,
    _state: PhantomData<S>,
}

impl<S: NodeState> Default for TimeSeries<S> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            _state: PhantomData,
        }
    }
}

impl<S: NodeState> TimeSeries<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the counts observed at the end of `tick`.
    pub fn append(&mut self, tick: u64, counts: PopulationCounts) {
        debug_assert_eq!(counts.as_slice().len(), S::count());
        debug_assert!(self.records.last().map_or(true, |r| r.tick < tick));
        self.records.push(TickRecord { tick, counts });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickRecord> {
        self.records.iter()
    }

    /// Record at position `index` (0 is the first tick).
    pub fn get(&self, index: usize) -> Option<&TickRecord> {
        self.records.get(index)
    }

    /// Counts after the last recorded tick.
    pub fn final_counts(&self) -> Option<&PopulationCounts> {
        self.records.last().map(|r| &r.counts)
    }

    /// The count column of a single state, one entry per tick.
    pub fn series(&self, state: S) -> Vec<usize> {
        self.records.iter().map(|r| r.counts.get(state)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Occupation, TaskState};

    #[test]
    fn test_tally_counts_each_state() {
        let states = [
            TaskState::Worker,
            TaskState::Manager,
            TaskState::Worker,
            TaskState::FailedWorker,
        ];
        let counts = PopulationCounts::tally(&states);
        assert_eq!(counts.as_slice(), &[2, 1, 0, 0, 0, 1]);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(TaskState::FailedWorker), 1);
    }

    #[test]
    fn test_series_column() {
        let mut series = TimeSeries::<Occupation>::new();
        assert!(series.is_empty());
        assert!(series.final_counts().is_none());

        series.append(1, PopulationCounts::from_vec(vec![3, 1]));
        series.append(2, PopulationCounts::from_vec(vec![2, 2]));

        assert_eq!(series.len(), 2);
        assert_eq!(series.series(Occupation::Worker), vec![3, 2]);
        assert_eq!(series.series(Occupation::Manager), vec![1, 2]);
        assert_eq!(series.final_counts().unwrap().get(Occupation::Manager), 2);
        assert_eq!(series.get(0).unwrap().tick, 1);
    }

    #[test]
    fn test_counts_serialize_as_array() {
        let counts = PopulationCounts::from_vec(vec![5, 7]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), "[5,7]");
    }
}
