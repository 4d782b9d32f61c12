//! Transition Rules
//!
//! Node rules form a discrete-time Markov chain over the state set: each
//! state has an ordered list of `(probability, destination)` pairs and
//! "stay" takes the remaining mass. Edge patterns couple the two endpoints
//! of an edge and follow the same cumulative-threshold convention.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::SimError;
use worknet_series::NodeState;

/// Slack allowed when summing probabilities such as 0.1 + 0.2 + 0.7.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

fn check_probability(rule: impl FnOnce() -> String, value: f64) -> Result<(), SimError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability {
            rule: rule(),
            value,
        })
    }
}

/// Outgoing transitions for every state, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRules<S: NodeState> {
    table: Vec<Vec<(f64, S)>>,
}

impl<S: NodeState> Default for NodeRules<S> {
    fn default() -> Self {
        Self {
            table: vec![Vec::new(); S::count()],
        }
    }
}

impl<S: NodeState> NodeRules<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `from -> to` with the given probability.
    pub fn with_transition(mut self, from: S, probability: f64, to: S) -> Self {
        self.add(from, probability, to);
        self
    }

    pub fn add(&mut self, from: S, probability: f64, to: S) {
        self.table[from.index()].push((probability, to));
    }

    /// Transitions out of `state`, in evaluation order.
    pub fn transitions(&self, state: S) -> &[(f64, S)] {
        &self.table[state.index()]
    }

    /// Next state for a node in `state` given draw `u`.
    ///
    /// The first destination whose cumulative threshold is strictly above
    /// `u` wins; `None` means the node stays.
    pub fn select(&self, state: S, u: f64) -> Option<S> {
        let mut threshold = 0.0;
        for &(probability, to) in self.transitions(state) {
            threshold += probability;
            if u < threshold {
                return Some(to);
            }
        }
        None
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for &state in S::ALL {
            let mut total = 0.0;
            for &(probability, to) in self.transitions(state) {
                check_probability(|| format!("{} -> {}", state, to), probability)?;
                total += probability;
            }
            if total > 1.0 + PROBABILITY_EPSILON {
                return Err(SimError::TransitionOverflow {
                    state: state.to_string(),
                    total,
                });
            }
        }
        Ok(())
    }
}

/// Coupled transition of both endpoints of an edge.
///
/// Matches an edge whose endpoints hold `a` and `b` in either orientation.
/// `to_a` is written to whichever endpoint held `a`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePattern<S> {
    pub a: S,
    pub b: S,
    pub probability: f64,
    pub to_a: S,
    pub to_b: S,
    /// Optional group this pattern is toggled with
    pub group: Option<String>,
}

impl<S: NodeState> EdgePattern<S> {
    pub fn new(a: S, b: S, probability: f64, to_a: S, to_b: S) -> Self {
        Self {
            a,
            b,
            probability,
            to_a,
            to_b,
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Destinations for endpoints currently in `(x, y)`, if the pattern matches.
    pub fn orient(&self, x: S, y: S) -> Option<(S, S)> {
        if x == self.a && y == self.b {
            Some((self.to_a, self.to_b))
        } else if x == self.b && y == self.a {
            Some((self.to_b, self.to_a))
        } else {
            None
        }
    }

    fn pair_key(&self) -> (usize, usize) {
        let (i, j) = (self.a.index(), self.b.index());
        (i.min(j), i.max(j))
    }
}

/// Which node states edge rules observe within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeObservation {
    /// Live states after every node rule of the tick has run
    #[default]
    AfterNodeRules,
    /// States as they were when the tick started
    TickStart,
}

/// Complete rule configuration for a run
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RuleSet<S: NodeState> {
    pub node: NodeRules<S>,
    patterns: Vec<EdgePattern<S>>,
    groups: BTreeMap<String, bool>,
    pub observation: EdgeObservation,
}

impl<S: NodeState> Default for RuleSet<S> {
    fn default() -> Self {
        Self {
            node: NodeRules::default(),
            patterns: Vec::new(),
            groups: BTreeMap::new(),
            observation: EdgeObservation::default(),
        }
    }
}

impl<S: NodeState> RuleSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transition(mut self, from: S, probability: f64, to: S) -> Self {
        self.node.add(from, probability, to);
        self
    }

    pub fn with_pattern(mut self, pattern: EdgePattern<S>) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Turns a whole pattern group on or off. Groups never mentioned here
    /// are on.
    pub fn with_group(mut self, group: impl Into<String>, enabled: bool) -> Self {
        self.set_group(group, enabled);
        self
    }

    pub fn set_group(&mut self, group: impl Into<String>, enabled: bool) {
        self.groups.insert(group.into(), enabled);
    }

    pub fn with_observation(mut self, observation: EdgeObservation) -> Self {
        self.observation = observation;
        self
    }

    pub fn patterns(&self) -> &[EdgePattern<S>] {
        &self.patterns
    }

    pub fn is_active(&self, pattern: &EdgePattern<S>) -> bool {
        pattern
            .group
            .as_ref()
            .map_or(true, |g| self.groups.get(g).copied().unwrap_or(true))
    }

    pub fn active_patterns(&self) -> impl Iterator<Item = &EdgePattern<S>> {
        self.patterns.iter().filter(|p| self.is_active(p))
    }

    /// New endpoint states for an edge in `(x, y)` given draw `u`.
    ///
    /// Active patterns are scanned in order; probabilities of the matching
    /// ones accumulate and the first whose threshold exceeds `u` fires.
    pub fn apply_edge(&self, x: S, y: S, u: f64) -> Option<(S, S)> {
        let mut threshold = 0.0;
        for pattern in self.active_patterns() {
            if let Some(dest) = pattern.orient(x, y) {
                threshold += pattern.probability;
                if u < threshold {
                    return Some(dest);
                }
            }
        }
        None
    }

    /// Checks every probability, including patterns in disabled groups,
    /// and rejects toggles for groups no pattern declares.
    ///
    /// Per-pair sums only count active patterns.
    pub fn validate(&self) -> Result<(), SimError> {
        self.node.validate()?;

        for pattern in &self.patterns {
            check_probability(
                || format!("pattern ({}, {})", pattern.a, pattern.b),
                pattern.probability,
            )?;
        }

        for group in self.groups.keys() {
            let declared = self
                .patterns
                .iter()
                .any(|p| p.group.as_deref() == Some(group.as_str()));
            if !declared {
                return Err(SimError::UnknownGroup(group.clone()));
            }
        }

        let mut totals: HashMap<(usize, usize), f64> = HashMap::new();
        for pattern in self.active_patterns() {
            let total = totals.entry(pattern.pair_key()).or_insert(0.0);
            *total += pattern.probability;
            if *total > 1.0 + PROBABILITY_EPSILON {
                return Err(SimError::PatternOverflow {
                    a: pattern.a.to_string(),
                    b: pattern.b.to_string(),
                    total: *total,
                });
            }
        }
        Ok(())
    }
}
