use std::sync::Arc;

use serde_json::json;

use idres::{
    ClassifierConfig, ExtractorKind, FeatureConfig, FeatureExtractor, FieldFeatureConfig,
    IntegrateError, IntegrationConfig, LogisticModel, MatchModel, MatchOutcome, ModelError,
    RecordPair, ScoreIntegrator, StubComparators, Trainer, TrainingConfig, TrainingDataset,
    MODEL_TYPE, WEIGHTS_SCHEMA_VERSION,
};
use idres::{DeterministicMatch, FieldScore, MatchScore, SerializedWeights};

fn extractor() -> Arc<FeatureExtractor> {
    let config = FeatureConfig::with_fields(vec![FieldFeatureConfig::new(
        "name",
        vec![ExtractorKind::Exact],
    )]);
    Arc::new(FeatureExtractor::new(config, Arc::new(StubComparators)).expect("valid config"))
}

fn prior() -> DeterministicMatch {
    DeterministicMatch {
        outcome: MatchOutcome::PotentialMatch,
        candidate_record: json!({"id": "existing-1"}),
        score: MatchScore {
            total_score: 42.0,
            max_possible_score: 100.0,
            normalized_score: 0.42,
            field_scores: vec![FieldScore {
                field: "name".into(),
                score: 42.0,
                max_score: 100.0,
            }],
        },
        explanation: "deterministic pass".into(),
    }
}

#[tokio::test]
async fn predicting_before_weights_exist_is_an_error() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    let pair = RecordPair::new(json!({"name": "a"}), json!({"name": "a"}));

    assert!(!model.is_ready());
    assert_eq!(
        model.predict(&pair).await.expect_err("not ready"),
        ModelError::NotReady
    );
    assert_eq!(
        model.predict_batch(&[pair]).await.expect_err("not ready"),
        ModelError::NotReady
    );
    assert_eq!(
        model.export_weights().expect_err("not ready"),
        ModelError::NotReady
    );
}

#[test]
fn misconfigured_extraction_fails_fast() {
    let config = FeatureConfig::with_fields(vec![FieldFeatureConfig::new("email", vec![])]);
    let err = FeatureExtractor::new(config, Arc::new(StubComparators))
        .err()
        .expect("field without extractors");
    assert!(err.to_string().contains("no extractors"));

    let config = FeatureConfig::with_fields(vec![FieldFeatureConfig::new(
        "email",
        vec![ExtractorKind::Custom {
            name: "normalize-domain".into(),
        }],
    )]);
    let err = FeatureExtractor::new(config, Arc::new(StubComparators))
        .err()
        .expect("unregistered custom extractor");
    assert!(err.to_string().contains("normalize-domain"));
}

#[test]
fn foreign_weight_artifacts_are_rejected_naming_the_expected_type() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    let artifact = SerializedWeights {
        model_type: "Other".into(),
        version: WEIGHTS_SCHEMA_VERSION.into(),
        weights: vec![0.1, 0.2],
        bias: 0.0,
        feature_names: vec!["name_exact".into(), "name_missing".into()],
        extra: None,
    };

    let err = model.load_weights(&artifact).expect_err("wrong model type");
    assert!(err.to_string().contains(MODEL_TYPE));
    assert!(!model.is_ready());
}

#[test]
fn rejected_loads_preserve_working_state() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    model.set_weights_and_bias(vec![1.5, -0.5], 0.25).unwrap();

    let mut artifact = model.export_weights().unwrap();
    artifact.weights = vec![f64::INFINITY, 0.0];
    assert!(model.load_weights(&artifact).is_err());

    assert_eq!(model.weights().unwrap(), vec![1.5, -0.5]);
    assert_eq!(model.bias().unwrap(), 0.25);
    assert!(model.is_ready());
}

#[test]
fn training_failures_are_results_not_panics() {
    let trainer = Trainer::with_extractor(extractor(), TrainingConfig::default());
    let result = trainer.train(&TrainingDataset::new());
    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("empty"));

    let result = Trainer::new(TrainingConfig::default()).train(&TrainingDataset::new());
    assert!(!result.success);
}

#[tokio::test]
async fn unready_model_triggers_integration_fallback() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    let integrator =
        ScoreIntegrator::new(Arc::new(model), IntegrationConfig::default()).unwrap();

    let enhanced = integrator
        .enhance_match_result(&json!({"id": "c"}), &json!({"id": "e"}), &prior())
        .await
        .expect("fallback_on_error preserves the prior");

    assert!(!enhanced.ml_used);
    assert!(enhanced.ml_error.as_deref().unwrap().contains("not ready"));
    assert_eq!(enhanced.score.total_score, 42.0);
    assert_eq!(enhanced.outcome, MatchOutcome::PotentialMatch);
}

#[tokio::test]
async fn unready_model_propagates_when_fallback_disabled() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    let integrator = ScoreIntegrator::new(
        Arc::new(model),
        IntegrationConfig {
            fallback_on_error: false,
            ..IntegrationConfig::default()
        },
    )
    .unwrap();

    let err = integrator
        .enhance_match_result(&json!({"id": "c"}), &json!({"id": "e"}), &prior())
        .await
        .expect_err("must propagate");
    assert!(matches!(err, IntegrateError::Prediction(_)));
    assert!(err.to_string().contains("ML prediction failed"));
}

#[test]
fn invalid_integration_config_is_rejected_at_construction() {
    let model =
        LogisticModel::with_extractor(ClassifierConfig::default(), extractor()).unwrap();
    let err = ScoreIntegrator::new(
        Arc::new(model),
        IntegrationConfig {
            ml_weight: 2.0,
            ..IntegrationConfig::default()
        },
    )
    .err()
    .expect("invalid ml_weight");
    assert!(matches!(err, IntegrateError::InvalidConfig(_)));
}
