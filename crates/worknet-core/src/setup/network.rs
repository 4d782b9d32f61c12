//! Network Setup
//!
//! Erdős–Rényi graph generation with a two-state seed population.
//!
//! Every unordered pair `(i, j)` with `i < j` is linked independently with
//! probability `p = 2K / (N(N-1))`, so the *expected* number of edges is `K`.
//! The realized count is binomial and is deliberately left as drawn.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::network::{Edge, Network};
use crate::error::SimError;
use crate::random::DrawSource;
use worknet_series::NodeState;

/// How the two base states are laid out over the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialAssignment {
    /// One draw per node: below the fraction gives base A
    #[default]
    Random,
    /// The first `ceil(fraction * N)` nodes get base A; consumes no draws
    ByIndex,
}

/// Parameters for one random network
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkBuilder<S> {
    node_count: usize,
    expected_edges: f64,
    initial_fraction: f64,
    base_a: S,
    base_b: S,
    assignment: InitialAssignment,
}

impl<S: NodeState> NetworkBuilder<S> {
    /// Builder with no edges and an even split between the base states.
    pub fn new(node_count: usize, base_a: S, base_b: S) -> Self {
        Self {
            node_count,
            expected_edges: 0.0,
            initial_fraction: 0.5,
            base_a,
            base_b,
            assignment: InitialAssignment::Random,
        }
    }

    pub fn with_expected_edges(mut self, expected_edges: f64) -> Self {
        self.expected_edges = expected_edges;
        self
    }

    /// Sets the expected edge count from a mean degree: `K = d * N / 2`.
    pub fn with_mean_degree(mut self, mean_degree: f64) -> Self {
        self.expected_edges = mean_degree * self.node_count as f64 / 2.0;
        self
    }

    /// Fraction of nodes seeded with base A.
    pub fn with_initial_fraction(mut self, fraction: f64) -> Self {
        self.initial_fraction = fraction;
        self
    }

    pub fn with_assignment(mut self, assignment: InitialAssignment) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn expected_edges(&self) -> f64 {
        self.expected_edges
    }

    /// Number of distinct unordered pairs, `N(N-1)/2`.
    pub fn max_edges(&self) -> f64 {
        let n = self.node_count as f64;
        n * (n - 1.0) / 2.0
    }

    /// Per-pair link probability. Zero when fewer than two nodes exist.
    pub fn edge_probability(&self) -> f64 {
        let max = self.max_edges();
        if max <= 0.0 {
            0.0
        } else {
            self.expected_edges / max
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.node_count == 0 {
            return Err(SimError::NoNodes);
        }
        let fraction = self.initial_fraction;
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(SimError::InvalidFraction(fraction));
        }
        let expected = self.expected_edges;
        let max = self.max_edges();
        if !expected.is_finite() || expected < 0.0 || expected > max {
            return Err(SimError::EdgeCountOutOfRange { expected, max });
        }
        Ok(())
    }

    /// Draws initial states, then edges, from one stream.
    ///
    /// Draw order: one per node in index order (random assignment only),
    /// then one per pair `(i, j)`, `i < j`, in lexicographic order.
    pub fn build<D: DrawSource + ?Sized>(&self, draws: &mut D) -> Result<Network<S>, SimError> {
        self.validate()?;

        let states = self.assign_states(draws);
        let edges = self.generate_edges(draws);

        debug!(
            nodes = self.node_count,
            edges = edges.len(),
            expected = self.expected_edges,
            "generated random network"
        );
        Ok(Network::from_generated(states, edges))
    }

    /// Builds from a fresh `SmallRng` seeded with `seed`.
    pub fn build_seeded(&self, seed: u64) -> Result<Network<S>, SimError> {
        self.build(&mut SmallRng::seed_from_u64(seed))
    }

    fn assign_states<D: DrawSource + ?Sized>(&self, draws: &mut D) -> Vec<S> {
        match self.assignment {
            InitialAssignment::Random => (0..self.node_count)
                .map(|_| {
                    if draws.draw() < self.initial_fraction {
                        self.base_a
                    } else {
                        self.base_b
                    }
                })
                .collect(),
            InitialAssignment::ByIndex => {
                let cutoff = (self.initial_fraction * self.node_count as f64).ceil() as usize;
                (0..self.node_count)
                    .map(|i| if i < cutoff { self.base_a } else { self.base_b })
                    .collect()
            }
        }
    }

    fn generate_edges<D: DrawSource + ?Sized>(&self, draws: &mut D) -> Vec<Edge> {
        let p = self.edge_probability();
        let mut edges = Vec::with_capacity(self.expected_edges.ceil() as usize);
        for i in 0..self.node_count {
            for j in (i + 1)..self.node_count {
                if draws.draw() < p {
                    edges.push(Edge::from_sorted(i, j));
                }
            }
        }
        edges
    }
}

/// Builds a seeded network: `N` nodes, `K` expected edges, a fraction of
/// base-A nodes.
pub fn build<S: NodeState>(
    node_count: usize,
    expected_edges: f64,
    initial_fraction: f64,
    bases: (S, S),
    seed: u64,
) -> Result<Network<S>, SimError> {
    NetworkBuilder::new(node_count, bases.0, bases.1)
        .with_expected_edges(expected_edges)
        .with_initial_fraction(initial_fraction)
        .build_seeded(seed)
}
