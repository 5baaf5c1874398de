use std::sync::Arc;

use serde_json::json;

use idres::{
    ExampleLabel, ExtractorKind, FeatureConfig, FeatureExtractor, FieldFeatureConfig, MatchModel,
    RecordPair, StubComparators, Trainer, TrainingConfig, TrainingDataset, TrainingExample,
};

fn extractor() -> Arc<FeatureExtractor> {
    let config = FeatureConfig::with_fields(vec![
        FieldFeatureConfig::new("name", vec![ExtractorKind::Exact, ExtractorKind::JaroWinkler]),
        FieldFeatureConfig::new("age", vec![ExtractorKind::NumericDiff]),
    ]);
    Arc::new(FeatureExtractor::new(config, Arc::new(StubComparators)).expect("valid config"))
}

fn labeled_dataset() -> TrainingDataset {
    let mut dataset = TrainingDataset::new();
    for i in 0..15 {
        let name = format!("resident-{i}");
        dataset.push(TrainingExample::new(
            RecordPair::new(
                json!({ "name": name, "age": 30 + i }),
                json!({ "name": name, "age": 30 + i }),
            ),
            ExampleLabel::Match,
        ));
        dataset.push(TrainingExample::new(
            RecordPair::new(
                json!({ "name": format!("resident-{i}"), "age": 30 + i }),
                json!({ "name": format!("visitor-{i}"), "age": 60 + i }),
            ),
            ExampleLabel::NonMatch,
        ));
    }
    dataset
}

fn seeded_config(seed: u64) -> TrainingConfig {
    TrainingConfig {
        seed: Some(seed),
        max_iterations: 60,
        ..TrainingConfig::default()
    }
}

#[test]
fn identical_seeds_reproduce_the_entire_run() {
    let dataset = labeled_dataset();

    let first = Trainer::with_extractor(extractor(), seeded_config(2024)).train(&dataset);
    let second = Trainer::with_extractor(extractor(), seeded_config(2024)).train(&dataset);

    assert!(first.success && second.success);
    assert_eq!(first.weights, second.weights);
    assert_eq!(first.bias, second.bias);
    assert_eq!(first.history, second.history);
    assert_eq!(first.early_stopped, second.early_stopped);
}

#[test]
fn distinct_seeds_produce_distinct_weights() {
    let dataset = labeled_dataset();

    let first = Trainer::with_extractor(extractor(), seeded_config(1)).train(&dataset);
    let second = Trainer::with_extractor(extractor(), seeded_config(2)).train(&dataset);

    assert!(first.success && second.success);
    assert_ne!(first.weights, second.weights);
}

#[tokio::test]
async fn trained_classifiers_from_the_same_seed_agree_on_predictions() {
    let dataset = labeled_dataset();
    let pair = RecordPair::new(
        json!({ "name": "resident-3", "age": 33 }),
        json!({ "name": "resident-3", "age": 33 }),
    );

    let (first, result_a) = Trainer::with_extractor(extractor(), seeded_config(7))
        .train_classifier(&dataset, idres::ClassifierConfig::default())
        .expect("valid classifier config");
    let (second, result_b) = Trainer::with_extractor(extractor(), seeded_config(7))
        .train_classifier(&dataset, idres::ClassifierConfig::default())
        .expect("valid classifier config");

    assert!(result_a.success && result_b.success);
    let prediction_a = first.predict(&pair).await.unwrap();
    let prediction_b = second.predict(&pair).await.unwrap();
    assert_eq!(prediction_a.probability, prediction_b.probability);
    assert_eq!(prediction_a.classification, prediction_b.classification);
}

#[test]
fn extraction_is_deterministic_for_equivalent_inputs() {
    let extractor = extractor();
    let pair = RecordPair::new(
        json!({ "name": "resident-1", "age": 31 }),
        json!({ "name": "resident-1", "age": 31 }),
    );

    let first = extractor.extract(&pair).unwrap();
    let second = extractor.extract(&pair).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.names, extractor.feature_names());
}
