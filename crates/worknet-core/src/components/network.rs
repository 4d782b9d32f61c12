//! Network Components
//!
//! The node-state array and the immutable edge list. Node and edge rules
//! borrow the state array mutably for the length of one pass; nothing else
//! holds a reference to a node.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SimError;
use worknet_series::{NodeState, PopulationCounts};

/// An unordered node pair, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: usize,
    b: usize,
}

impl Edge {
    /// Normalizes `(x, y)` so the lower index comes first.
    pub fn new(x: usize, y: usize) -> Result<Self, SimError> {
        if x == y {
            return Err(SimError::SelfLoop(x));
        }
        Ok(Self {
            a: x.min(y),
            b: x.max(y),
        })
    }

    /// Caller guarantees `a < b`.
    pub(crate) fn from_sorted(a: usize, b: usize) -> Self {
        debug_assert!(a < b);
        Self { a, b }
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }
}

/// Fixed set of nodes and edges for one run
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Network<S: NodeState> {
    states: Vec<S>,
    edges: Vec<Edge>,
}

impl<S: NodeState> Network<S> {
    /// Builds a network from initial states and an explicit edge list.
    ///
    /// Rejects endpoints outside `0..states.len()`, self loops, and pairs
    /// listed twice in either orientation.
    pub fn from_parts(
        states: Vec<S>,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, SimError> {
        if states.is_empty() {
            return Err(SimError::NoNodes);
        }
        let node_count = states.len();
        let mut seen = HashSet::new();
        let mut checked = Vec::new();

        for (x, y) in edges {
            for index in [x, y] {
                if index >= node_count {
                    return Err(SimError::EndpointOutOfRange { index, node_count });
                }
            }
            let edge = Edge::new(x, y)?;
            if !seen.insert(edge) {
                return Err(SimError::DuplicateEdge {
                    a: edge.a,
                    b: edge.b,
                });
            }
            checked.push(edge);
        }

        Ok(Self {
            states,
            edges: checked,
        })
    }

    /// Network with no edges.
    pub fn isolated(states: Vec<S>) -> Result<Self, SimError> {
        Self::from_parts(states, std::iter::empty())
    }

    /// Edges generated by the builder are valid by construction.
    pub(crate) fn from_generated(states: Vec<S>, edges: Vec<Edge>) -> Self {
        Self { states, edges }
    }

    pub fn node_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Current population of each state.
    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts::tally(&self.states)
    }

    /// Split borrow used by the transition passes.
    pub(crate) fn parts_mut(&mut self) -> (&mut [S], &[Edge]) {
        (&mut self.states, &self.edges)
    }
}
