//! Transition System
//!
//! Per-tick passes over the node-state array. The pure functions here are
//! the engine; the ECS systems below wire them into the tick schedule.
//!
//! Draw order within a tick is fixed: one draw per node in index order,
//! then one draw per edge in edge-list order. Nodes and edges draw even
//! when no rule could apply, so the stream never shifts between runs with
//! different rule sets.

use bevy_ecs::prelude::*;

use crate::components::network::{Edge, Network};
use crate::components::rules::{EdgeObservation, NodeRules, RuleSet};
use crate::random::DrawSource;
use crate::SimRng;
use worknet_series::NodeState;

/// What happened during the most recent tick
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickActivity {
    /// Nodes moved by their own transition rule
    pub node_transitions: usize,
    /// Edges whose pattern fired
    pub edge_firings: usize,
}

/// Copy of the node states taken before node rules run
#[derive(Resource, Debug, Clone)]
pub struct TickStartStates<S: NodeState>(pub Vec<S>);

impl<S: NodeState> Default for TickStartStates<S> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

/// Applies every node's transition rule in index order.
///
/// A node rule reads and writes only its own slot. Returns how many nodes
/// changed state.
pub fn step_nodes<S: NodeState, D: DrawSource + ?Sized>(
    states: &mut [S],
    rules: &NodeRules<S>,
    draws: &mut D,
) -> usize {
    let mut moved = 0;
    for state in states.iter_mut() {
        let u = draws.draw();
        if let Some(next) = rules.select(*state, u) {
            if next != *state {
                moved += 1;
            }
            *state = next;
        }
    }
    moved
}

/// Applies edge patterns to every edge in list order.
///
/// Endpoint states are matched against `observed` when given, otherwise
/// against the live array, which already reflects earlier edges of this
/// pass. Writes always go to the live array. Returns how many edges fired.
pub fn step_edges<S: NodeState, D: DrawSource + ?Sized>(
    states: &mut [S],
    edges: &[Edge],
    rules: &RuleSet<S>,
    observed: Option<&[S]>,
    draws: &mut D,
) -> usize {
    let mut fired = 0;
    for edge in edges {
        let u = draws.draw();
        let (a, b) = edge.endpoints();
        let (x, y) = match observed {
            Some(snapshot) => (snapshot[a], snapshot[b]),
            None => (states[a], states[b]),
        };
        if let Some((to_a, to_b)) = rules.apply_edge(x, y, u) {
            states[a] = to_a;
            states[b] = to_b;
            fired += 1;
        }
    }
    fired
}

/// System: Snapshot node states when edges observe the tick start
pub fn capture_tick_start<S: NodeState>(
    network: Res<Network<S>>,
    rules: Res<RuleSet<S>>,
    mut snapshot: ResMut<TickStartStates<S>>,
) {
    if rules.observation == EdgeObservation::TickStart {
        snapshot.0.clear();
        snapshot.0.extend_from_slice(network.states());
    }
}

/// System: Apply node transition rules
pub fn apply_node_rules<S: NodeState>(
    mut network: ResMut<Network<S>>,
    rules: Res<RuleSet<S>>,
    mut rng: ResMut<SimRng>,
    mut activity: ResMut<TickActivity>,
) {
    let (states, _) = network.parts_mut();
    activity.node_transitions = step_nodes(states, &rules.node, &mut *rng);
}

/// System: Apply edge pair patterns
pub fn apply_edge_rules<S: NodeState>(
    mut network: ResMut<Network<S>>,
    rules: Res<RuleSet<S>>,
    snapshot: Res<TickStartStates<S>>,
    mut rng: ResMut<SimRng>,
    mut activity: ResMut<TickActivity>,
) {
    let observed = match rules.observation {
        EdgeObservation::TickStart => Some(snapshot.0.as_slice()),
        EdgeObservation::AfterNodeRules => None,
    };
    let (states, edges) = network.parts_mut();
    activity.edge_firings = step_edges(states, edges, &*rules, observed, &mut *rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rules::EdgePattern;
    use crate::random::ScriptedDraws;
    use worknet_series::Occupation;
    use worknet_series::TaskState::{self, *};

    /// One tick outside the schedule: node pass, then edge pass.
    fn advance_tick<S: NodeState, D: DrawSource + ?Sized>(
        network: &mut Network<S>,
        rules: &RuleSet<S>,
        draws: &mut D,
    ) -> TickActivity {
        let tick_start = match rules.observation {
            EdgeObservation::TickStart => Some(network.states().to_vec()),
            EdgeObservation::AfterNodeRules => None,
        };
        let (states, edges) = network.parts_mut();
        let node_transitions = step_nodes(states, &rules.node, draws);
        let edge_firings = step_edges(states, edges, rules, tick_start.as_deref(), draws);
        TickActivity {
            node_transitions,
            edge_firings,
        }
    }

    #[test]
    fn test_node_pass_uses_one_draw_per_node() {
        let rules = NodeRules::new()
            .with_transition(BusyWorker, 0.3, SuccessWorker)
            .with_transition(BusyWorker, 0.2, FailedWorker);
        let mut states = vec![BusyWorker, BusyWorker, BusyWorker, Manager];
        let mut draws = ScriptedDraws::new(vec![0.1, 0.35, 0.8, 0.0]);

        let moved = step_nodes(&mut states, &rules, &mut draws);

        assert_eq!(states, vec![SuccessWorker, FailedWorker, BusyWorker, Manager]);
        assert_eq!(moved, 2);
        assert_eq!(draws.consumed(), 4);
    }

    #[test]
    fn test_edge_destinations_follow_matching_endpoint() {
        let rules = RuleSet::new().with_pattern(EdgePattern::new(
            Manager,
            Worker,
            1.0,
            BusyManager,
            BusyWorker,
        ));
        // Edge (0, 1) stores (worker, manager); edge (2, 3) stores (manager, worker).
        let mut network = Network::from_parts(
            vec![Worker, Manager, Manager, Worker],
            [(0, 1), (2, 3)],
        )
        .unwrap();
        let activity = advance_tick(&mut network, &rules, &mut ScriptedDraws::constant(0.5));

        assert_eq!(
            network.states(),
            &[BusyWorker, BusyManager, BusyManager, BusyWorker]
        );
        assert_eq!(activity.edge_firings, 2);
    }

    #[test]
    fn test_later_edges_see_earlier_writes() {
        // Manager 1 sits between workers 0 and 2. Once edge (0, 1) makes it
        // busy, edge (1, 2) no longer matches.
        let rules = RuleSet::new().with_pattern(EdgePattern::new(
            Manager,
            Worker,
            1.0,
            BusyManager,
            BusyWorker,
        ));
        let mut network =
            Network::from_parts(vec![Worker, Manager, Worker], [(0, 1), (1, 2)]).unwrap();
        advance_tick(&mut network, &rules, &mut ScriptedDraws::constant(0.0));

        assert_eq!(network.states(), &[BusyWorker, BusyManager, Worker]);
    }

    #[test]
    fn test_edges_observe_post_node_states_by_default() {
        // The manager is demoted by its node rule before edges run, so the
        // assignment pattern cannot fire.
        let rules = RuleSet::new()
            .with_transition(Manager, 1.0, Worker)
            .with_pattern(EdgePattern::new(Manager, Worker, 1.0, BusyManager, BusyWorker));
        let mut network = Network::from_parts(vec![Manager, Worker], [(0, 1)]).unwrap();

        let activity = advance_tick(&mut network, &rules, &mut ScriptedDraws::constant(0.0));
        assert_eq!(network.states(), &[Worker, Worker]);
        assert_eq!(activity.edge_firings, 0);
    }

    #[test]
    fn test_tick_start_observation_matches_old_states() {
        let rules = RuleSet::new()
            .with_transition(Manager, 1.0, Worker)
            .with_pattern(EdgePattern::new(Manager, Worker, 1.0, BusyManager, BusyWorker))
            .with_observation(EdgeObservation::TickStart);
        let mut network = Network::from_parts(vec![Manager, Worker], [(0, 1)]).unwrap();

        let activity = advance_tick(&mut network, &rules, &mut ScriptedDraws::constant(0.0));
        assert_eq!(network.states(), &[BusyManager, BusyWorker]);
        assert_eq!(activity.node_transitions, 1);
        assert_eq!(activity.edge_firings, 1);
    }

    #[test]
    fn test_zero_rules_change_nothing() {
        let rules = RuleSet::<Occupation>::new()
            .with_transition(Occupation::Worker, 0.0, Occupation::Manager)
            .with_transition(Occupation::Manager, 0.0, Occupation::Worker);
        let mut network = Network::from_parts(
            vec![Occupation::Worker, Occupation::Manager, Occupation::Worker],
            [(0, 1), (1, 2)],
        )
        .unwrap();
        let before = network.clone();
        let mut draws = ScriptedDraws::new(vec![0.0, 0.5, 0.99]);

        for _ in 0..10 {
            advance_tick(&mut network, &rules, &mut draws);
        }
        assert_eq!(network, before);
        // 3 nodes + 2 edges per tick
        assert_eq!(draws.consumed(), 50);
    }

    #[test]
    fn test_states_without_edges_untouched_by_edge_pass() {
        let rules = RuleSet::new().with_pattern(EdgePattern::new(
            Manager,
            Worker,
            1.0,
            BusyManager,
            BusyWorker,
        ));
        let mut states: Vec<TaskState> = vec![Manager, Worker, Manager, Worker];
        let edges = [Edge::new(0, 1).unwrap()];
        step_edges(&mut states, &edges, &rules, None, &mut ScriptedDraws::constant(0.0));
        assert_eq!(states, vec![BusyManager, BusyWorker, Manager, Worker]);
    }
}
