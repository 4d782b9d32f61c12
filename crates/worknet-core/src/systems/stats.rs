//! Statistics System
//!
//! End-of-tick population counts. Runs after both transition passes, so a
//! record never reflects a half-applied tick.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::network::Network;
use crate::driver::TickClock;
use crate::systems::transition::TickActivity;
use worknet_series::{NodeState, PopulationCounts, TimeSeries};

/// Resource to accumulate the time series during a run
#[derive(Resource, Debug, Clone)]
pub struct StatsCollector<S: NodeState> {
    series: TimeSeries<S>,
    /// Highest count seen per state, indexed by `NodeState::index`
    peaks: Vec<usize>,
    pub total_node_transitions: usize,
    pub total_edge_firings: usize,
}

impl<S: NodeState> Default for StatsCollector<S> {
    fn default() -> Self {
        Self {
            series: TimeSeries::new(),
            peaks: vec![0; S::count()],
            total_node_transitions: 0,
            total_edge_firings: 0,
        }
    }
}

impl<S: NodeState> StatsCollector<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally `states` and append them as the record for `tick`.
    pub fn record_tick(&mut self, tick: u64, states: &[S]) -> &PopulationCounts {
        let counts = PopulationCounts::tally(states);
        debug_assert_eq!(counts.total(), states.len());

        for (peak, &count) in self.peaks.iter_mut().zip(counts.as_slice()) {
            *peak = (*peak).max(count);
        }
        self.series.append(tick, counts);
        &self.series.records()[self.series.len() - 1].counts
    }

    pub fn record_activity(&mut self, activity: &TickActivity) {
        self.total_node_transitions += activity.node_transitions;
        self.total_edge_firings += activity.edge_firings;
    }

    /// Highest population `state` reached at the end of any tick so far.
    pub fn peak(&self, state: S) -> usize {
        self.peaks[state.index()]
    }

    pub fn series(&self) -> &TimeSeries<S> {
        &self.series
    }

    pub fn into_series(self) -> TimeSeries<S> {
        self.series
    }
}

/// System: Append this tick's population counts
pub fn record_population<S: NodeState>(
    network: Res<Network<S>>,
    clock: Res<TickClock>,
    activity: Res<TickActivity>,
    mut stats: ResMut<StatsCollector<S>>,
) {
    stats.record_activity(&activity);
    let counts = stats.record_tick(clock.current_tick, network.states());
    debug!(
        tick = clock.current_tick,
        counts = ?counts.as_slice(),
        node_transitions = activity.node_transitions,
        edge_firings = activity.edge_firings,
        "tick recorded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use worknet_series::Occupation::{self, Manager, Worker};

    #[test]
    fn test_stats_collector_new() {
        let collector = StatsCollector::<Occupation>::new();
        assert!(collector.series().is_empty());
        assert_eq!(collector.total_node_transitions, 0);
    }

    #[test]
    fn test_records_append_and_track_peaks() {
        let mut collector = StatsCollector::new();

        collector.record_tick(1, &[Worker, Worker, Manager]);
        collector.record_tick(2, &[Manager, Manager, Manager]);

        assert_eq!(collector.series().len(), 2);
        assert_eq!(collector.series().series(Worker), vec![2, 0]);
        assert_eq!(collector.peak(Worker), 2);
        assert_eq!(collector.peak(Manager), 3);
    }

    #[test]
    fn test_activity_totals() {
        let mut collector = StatsCollector::<Occupation>::new();
        collector.record_activity(&TickActivity {
            node_transitions: 3,
            edge_firings: 1,
        });
        collector.record_activity(&TickActivity {
            node_transitions: 2,
            edge_firings: 0,
        });
        assert_eq!(collector.total_node_transitions, 5);
        assert_eq!(collector.total_edge_firings, 1);
    }
}
