//! Statistical properties of the random network builder.

use std::collections::HashSet;

use worknet_core::setup::build;
use worknet_core::NetworkBuilder;
use worknet_series::TaskState::{Manager, Worker};

/// Mean realized edge count over many builds converges to the target.
#[test]
fn test_mean_edge_count_matches_target() {
    let node_count = 50;
    let expected = 100.0;
    let builds = 200;

    let total: usize = (0..builds)
        .map(|seed| {
            build(node_count, expected, 0.5, (Worker, Manager), seed)
                .unwrap()
                .edge_count()
        })
        .sum();
    let mean = total as f64 / builds as f64;

    // Binomial sd per build is about 9.6, so the mean of 200 builds
    // has sd below 0.7.
    assert!(
        (mean - expected).abs() < 3.0,
        "mean edge count {} too far from {}",
        mean,
        expected
    );
}

/// Realized counts vary between builds; they are not forced to the target.
#[test]
fn test_edge_count_is_not_fixed() {
    let counts: HashSet<usize> = (0..20)
        .map(|seed| {
            build(60, 120.0, 0.5, (Worker, Manager), seed)
                .unwrap()
                .edge_count()
        })
        .collect();
    assert!(counts.len() > 1);
}

/// Initial fraction is honored on average.
#[test]
fn test_initial_fraction_on_average() {
    let network = NetworkBuilder::new(5000, Worker, Manager)
        .with_initial_fraction(0.3)
        .build_seeded(17)
        .unwrap();
    let share = network.counts().get(Worker) as f64 / 5000.0;
    assert!((share - 0.3).abs() < 0.03, "worker share {}", share);
}

/// Every generated graph is simple with in-range endpoints.
#[test]
fn test_graph_validity_across_seeds() {
    for seed in 0..10 {
        let network = build(120, 400.0, 0.5, (Worker, Manager), seed).unwrap();
        let mut seen = HashSet::new();
        for edge in network.edges() {
            let (a, b) = edge.endpoints();
            assert_ne!(a, b);
            assert!(a < network.node_count() && b < network.node_count());
            assert!(seen.insert((a, b)));
        }
    }
}
