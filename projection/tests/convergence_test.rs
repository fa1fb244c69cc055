//! End-to-end projection scenarios.
//!
//! These run the full gradient descent with fixed seeds and check the
//! geometry of the resulting layouts.

use std::collections::HashSet;

use dmensions_embeddings::{Entity, cosine_similarity};
use dmensions_projection::{Point2D, TsneConfig, TsneProjector, project};

fn projector(iterations: usize, learning_rate: f64, seed: u64) -> TsneProjector {
    TsneProjector::new(TsneConfig::new(iterations, learning_rate).with_seed(seed))
}

#[test]
fn test_every_id_exactly_once() {
    let corpus: Vec<Entity> = (0..9)
        .map(|i| Entity::new(100 + i, format!("c{i}"), vec![i as f32, (i * i) as f32 * 0.1]))
        .collect();

    let projection = project(&corpus, 25, 1.0).unwrap();

    assert_eq!(projection.len(), corpus.len());
    let expected: HashSet<i64> = corpus.iter().map(|e| e.id).collect();
    let actual: HashSet<i64> = projection.keys().copied().collect();
    assert_eq!(actual, expected);
    assert!(projection.values().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_identical_pair_stays_together() {
    let corpus = vec![
        Entity::new(1, "one", vec![1.0, 0.0]),
        Entity::new(2, "uno", vec![1.0, 0.0]),
    ];
    assert!((cosine_similarity(&corpus[0].vector, &corpus[1].vector).unwrap() - 1.0).abs() < 1e-6);

    for seed in 0..4 {
        let projection = projector(500, 20.0, seed).project(&corpus).unwrap();
        let distance = projection[&1].distance(&projection[&2]);
        assert!(distance < 1e-3, "seed {seed}: pair drifted to {distance}");
    }
}

#[test]
fn test_duplicates_collapse_and_outlier_separates() {
    let corpus = vec![
        Entity::new(1, "cat", vec![1.0, 0.0]),
        Entity::new(2, "kitten", vec![1.0, 0.0]),
        Entity::new(3, "truck", vec![0.0, 1.0]),
    ];

    for seed in 0..4 {
        let layout = projector(500, 2.0, seed).layout(&corpus).unwrap();
        let pair = layout[0].distance(&layout[1]);
        let outlier = layout[0].distance(&layout[2]).min(layout[1].distance(&layout[2]));
        assert!(pair < 1e-3, "seed {seed}: duplicates {pair} apart");
        assert!(outlier > 1.0, "seed {seed}: outlier only {outlier} away");
    }
}

#[test]
fn test_more_iterations_tighten_duplicates() {
    let corpus = vec![
        Entity::new(1, "cat", vec![1.0, 0.0]),
        Entity::new(2, "kitten", vec![1.0, 0.0]),
        Entity::new(3, "truck", vec![0.0, 1.0]),
    ];

    let short = projector(1, 2.0, 9).layout(&corpus).unwrap();
    let long = projector(400, 2.0, 9).layout(&corpus).unwrap();
    assert!(long[0].distance(&long[1]) <= short[0].distance(&short[1]));
}

#[test]
fn test_clusters_are_preserved() {
    let corpus = vec![
        Entity::new(1, "red", vec![1.0, 0.0, 0.0]),
        Entity::new(2, "crimson", vec![0.95, 0.05, 0.0]),
        Entity::new(3, "scarlet", vec![0.9, 0.1, 0.0]),
        Entity::new(4, "blue", vec![0.0, 0.0, 1.0]),
        Entity::new(5, "navy", vec![0.05, 0.0, 0.95]),
        Entity::new(6, "azure", vec![0.0, 0.1, 0.9]),
    ];

    let layout = projector(500, 2.0, 1).layout(&corpus).unwrap();

    let max_within = |points: &[Point2D]| {
        points
            .iter()
            .flat_map(|a| points.iter().map(move |b| a.distance(b)))
            .fold(0.0_f64, f64::max)
    };
    let within = max_within(&layout[..3]).max(max_within(&layout[3..]));
    let between = layout[..3]
        .iter()
        .flat_map(|a| layout[3..].iter().map(move |b| a.distance(b)))
        .fold(f64::INFINITY, f64::min);

    assert!(
        within < between,
        "clusters overlap: widest cluster {within}, closest cross pair {between}"
    );
}

#[test]
fn test_result_is_permutation_invariant_in_ids() {
    let forward = vec![
        Entity::new(1, "a", vec![0.0, 1.0]),
        Entity::new(2, "b", vec![1.0, 0.0]),
        Entity::new(3, "c", vec![1.0, 1.0]),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = projector(50, 1.0, 4).project(&forward).unwrap();
    let b = projector(50, 1.0, 4).project(&reversed).unwrap();
    let keys_a: HashSet<i64> = a.keys().copied().collect();
    let keys_b: HashSet<i64> = b.keys().copied().collect();
    assert_eq!(keys_a, keys_b);
}
