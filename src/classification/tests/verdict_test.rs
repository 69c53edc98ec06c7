use super::fixture::{
    approx_eq, Fixture, BEER_BOTTLE, IMAGENET_CLASSES, PAPER_BAG, PLASTIC_BOTTLE, TIN_CAN,
    WATER_BOTTLE,
};
use crate::classification::category_map::{CategoryMap, ClassificationEntry, MaterialType};
use crate::classification::error::ClassifyError;
use crate::classification::verdict::{
    evaluate, score_materials, ProbabilityVector, VerdictPolicy, WeightMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_plastic_bottle() {
    let f = Fixture::new();
    let vector = f.vector(&[(PLASTIC_BOTTLE, 0.92)]);

    let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Plastic));
    assert!(approx_eq(verdict.confidence_percent, 92.0));
    assert!(verdict.recyclable());
}

#[test]
fn test_nothing_detected() {
    let f = Fixture::new();
    let vector = f.vector(&[]);

    let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert_eq!(verdict.material_type, None);
    assert_eq!(verdict.confidence_percent, 0.0);
    assert!(!verdict.recyclable());
}

#[test]
fn test_tie_goes_to_first_declared_type() {
    let f = Fixture::new();
    let vector = f.vector(&[(PAPER_BAG, 0.5), (TIN_CAN, 0.5), (BEER_BOTTLE, 0.2)]);

    let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Paper));
    assert!(approx_eq(verdict.confidence_percent, 50.0));
    assert!(verdict.recyclable());
}

#[test]
fn test_tie_follows_declaration_order() {
    let f = Fixture::new();
    let mut entries = f.category_map.entries().to_vec();
    entries.reverse();
    let reversed = CategoryMap::new(entries).unwrap();
    let vector = f.vector(&[(PAPER_BAG, 0.5), (TIN_CAN, 0.5)]);

    let verdict = evaluate(&vector, &reversed, &f.policy).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Metal));
    assert!(approx_eq(verdict.confidence_percent, 50.0));
}

#[test]
fn test_threshold_is_exclusive() {
    let f = Fixture::new();

    let above = evaluate(
        &f.vector(&[(PLASTIC_BOTTLE, 0.011)]),
        &f.category_map,
        &f.policy,
    )
    .unwrap();
    assert!(above.recyclable());
    assert_eq!(above.material_type, Some(MaterialType::Plastic));
    assert!(approx_eq(above.confidence_percent, 1.1));

    let at = evaluate(
        &f.vector(&[(PLASTIC_BOTTLE, 0.01)]),
        &f.category_map,
        &f.policy,
    )
    .unwrap();
    assert!(!at.recyclable());
    assert_eq!(at.material_type, None);
    assert!(approx_eq(at.confidence_percent, 1.0));
}

#[test]
fn test_max_not_sum_within_type() {
    let f = Fixture::new();
    let vector = f.vector(&[(PLASTIC_BOTTLE, 0.3), (WATER_BOTTLE, 0.3), (TIN_CAN, 0.4)]);

    let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Metal));
    assert!(approx_eq(verdict.confidence_percent, 40.0));
}

#[test]
fn test_material_scores_hold_max_per_type() {
    let f = Fixture::new();
    let vector = f.vector(&[(PLASTIC_BOTTLE, 0.2), (WATER_BOTTLE, 0.6)]);

    let scores = score_materials(&vector, &f.category_map, WeightMode::Ignore).unwrap();

    assert_eq!(scores.get(MaterialType::Plastic), Some(0.6));
    assert_eq!(scores.get(MaterialType::Glass), Some(0.0));
}

#[test]
fn test_unmapped_classes_are_ignored() {
    let f = Fixture::new();
    let vector = f.vector(&[(0, 0.99)]);

    let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert!(!verdict.recyclable());
    assert_eq!(verdict.confidence_percent, 0.0);
}

#[test]
fn test_short_vector_is_out_of_range() {
    let f = Fixture::new();
    let vector = ProbabilityVector::new(vec![0.5; 10]).unwrap();

    let result = evaluate(&vector, &f.category_map, &f.policy);

    assert!(matches!(
        result,
        Err(ClassifyError::IndexOutOfRange { vector_len: 10, .. })
    ));
}

#[test]
fn test_rejects_invalid_probabilities() {
    for value in [-0.1, 1.5, f32::NAN] {
        let result = ProbabilityVector::new(vec![0.2, value]);

        assert!(
            matches!(result, Err(ClassifyError::InvalidProbability { index: 1, .. })),
            "value {} should be rejected",
            value
        );
    }
}

#[test]
fn test_weights_ignored_by_default() {
    let category_map = CategoryMap::new(vec![
        ClassificationEntry::new(0, MaterialType::Glass, "Jar", 0.1),
        ClassificationEntry::new(1, MaterialType::Metal, "Can", 1.0),
        ClassificationEntry::new(2, MaterialType::Paper, "Box", 1.0),
        ClassificationEntry::new(3, MaterialType::Plastic, "Tub", 1.0),
    ])
    .unwrap();
    let vector = ProbabilityVector::new(vec![0.8, 0.5, 0.0, 0.0]).unwrap();

    let verdict = evaluate(&vector, &category_map, &VerdictPolicy::default()).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Glass));
    assert!(approx_eq(verdict.confidence_percent, 80.0));
}

#[test]
fn test_weights_multiply_when_configured() {
    let category_map = CategoryMap::new(vec![
        ClassificationEntry::new(0, MaterialType::Glass, "Jar", 0.1),
        ClassificationEntry::new(1, MaterialType::Metal, "Can", 1.0),
        ClassificationEntry::new(2, MaterialType::Paper, "Box", 1.0),
        ClassificationEntry::new(3, MaterialType::Plastic, "Tub", 1.0),
    ])
    .unwrap();
    let vector = ProbabilityVector::new(vec![0.8, 0.5, 0.0, 0.0]).unwrap();
    let policy = VerdictPolicy {
        weight_mode: WeightMode::Multiply,
        ..VerdictPolicy::default()
    };

    let verdict = evaluate(&vector, &category_map, &policy).unwrap();

    assert_eq!(verdict.material_type, Some(MaterialType::Metal));
    assert!(approx_eq(verdict.confidence_percent, 50.0));
}

#[test]
fn test_custom_threshold() {
    let f = Fixture::new();
    let policy = VerdictPolicy {
        acceptance_threshold: 0.5,
        ..VerdictPolicy::default()
    };

    let verdict = evaluate(&f.vector(&[(BEER_BOTTLE, 0.4)]), &f.category_map, &policy).unwrap();

    assert!(!verdict.recyclable());
    assert!(approx_eq(verdict.confidence_percent, 40.0));
}

#[test]
fn test_recyclable_iff_confidence_above_one_percent() {
    let f = Fixture::new();

    for k in 0..=1000 {
        let probability = k as f32 / 1000.0;
        let vector = f.vector(&[(BEER_BOTTLE, probability)]);

        let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

        assert_eq!(
            verdict.recyclable(),
            verdict.confidence_percent > 1.0,
            "probability {}",
            probability
        );
        assert_eq!(verdict.material_type.is_none(), !verdict.recyclable());
    }
}

#[test]
fn test_random_vectors_hold_invariants() {
    let f = Fixture::new();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let values: Vec<f32> = (0..IMAGENET_CLASSES).map(|_| rng.random::<f32>()).collect();
        let vector = ProbabilityVector::new(values).unwrap();

        let verdict = evaluate(&vector, &f.category_map, &f.policy).unwrap();

        assert!((0.0..=100.0).contains(&verdict.confidence_percent));
        assert_eq!(verdict.material_type.is_some(), verdict.recyclable());
    }
}

#[test]
fn test_best_score_is_order_independent() {
    let f = Fixture::new();
    let mut entries = f.category_map.entries().to_vec();
    entries.rotate_left(5);
    let rotated = CategoryMap::new(entries).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let values: Vec<f32> = (0..IMAGENET_CLASSES).map(|_| rng.random::<f32>()).collect();
        let vector = ProbabilityVector::new(values).unwrap();

        let original = evaluate(&vector, &f.category_map, &f.policy).unwrap();
        let permuted = evaluate(&vector, &rotated, &f.policy).unwrap();

        assert_eq!(original.confidence_percent, permuted.confidence_percent);
    }
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let f = Fixture::new();
    let vector = f.vector(&[(PLASTIC_BOTTLE, 0.37), (BEER_BOTTLE, 0.21)]);

    let first = evaluate(&vector, &f.category_map, &f.policy).unwrap();
    let second = evaluate(&vector, &f.category_map, &f.policy).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.confidence_percent.to_bits(),
        second.confidence_percent.to_bits()
    );
}
