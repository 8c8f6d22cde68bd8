//! Integration tests for the orchestration façade and run configuration.

use std::sync::Arc;

use ml_facade::config::{load_config, DatasetConfig, FacadeConfig};
use ml_facade::data::DataContext;
use ml_facade::notify::observers::ACCURACY_THRESHOLD;
use ml_facade::{MachineLearningFacade, ModelKind, Phase, SplitConfig};

fn small_forest_config() -> FacadeConfig {
    let mut config = FacadeConfig::default();
    config.random_forest.n_trees = 15;
    config
}

// ---------------------------------------------------------------------------
// Observer wiring
// ---------------------------------------------------------------------------

#[test]
fn only_logistic_regression_gets_a_parameter_changer() {
    let mut facade = MachineLearningFacade::new(small_forest_config()).unwrap();
    facade.initialize_trainers();

    for kind in ModelKind::ALL {
        let names = facade.trainer(kind).unwrap().observer_names();
        assert_eq!(&names[..2], &["AccuracyLogger", "ProgressMonitor"]);
        let has_changer = names.contains(&"ParameterChanger");
        assert_eq!(has_changer, kind == ModelKind::LogisticRegression, "{}", kind);
    }
}

#[test]
fn wiring_is_unchanged_by_training() {
    let mut facade = MachineLearningFacade::new(small_forest_config()).unwrap();
    facade.initialize_trainers();
    facade.train_models(&["svm", "random_forest"]).unwrap();

    for kind in [ModelKind::Svm, ModelKind::RandomForest] {
        let names = facade.trainer(kind).unwrap().observer_names();
        assert!(!names.contains(&"ParameterChanger"));
    }
}

#[test]
fn trainers_exist_for_every_model_before_training() {
    let facade = MachineLearningFacade::new(FacadeConfig::default()).unwrap();
    for kind in ModelKind::ALL {
        let trainer = facade.trainer(kind).unwrap();
        assert_eq!(trainer.phase(), Phase::Untrained);
        assert_eq!(trainer.strategy().kind(), kind);
    }
}

// ---------------------------------------------------------------------------
// Data preparation
// ---------------------------------------------------------------------------

#[test]
fn prepare_data_reuses_the_cached_split() {
    let facade = MachineLearningFacade::new(FacadeConfig::default()).unwrap();
    let first = facade.prepare_data().unwrap();
    let second = facade.prepare_data().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.n_test(), 45);
}

#[test]
fn new_initializes_the_owned_context() {
    let mut config = FacadeConfig::default();
    config.split = SplitConfig::new(0.4, 11);
    let facade = MachineLearningFacade::new(config).unwrap();

    assert!(facade.context().is_initialized());
    assert_eq!(facade.config().split, SplitConfig::new(0.4, 11));
    let provider = facade
        .context()
        .provider(SplitConfig::default(), &DatasetConfig::Iris)
        .unwrap();
    assert_eq!(provider.config(), SplitConfig::new(0.4, 11));
    assert_eq!(facade.prepare_data().unwrap().n_test(), 60);
}

#[test]
fn supplied_context_keeps_its_configuration() {
    let context = DataContext::new();
    context
        .provider(SplitConfig::new(0.2, 5), &DatasetConfig::Iris)
        .unwrap();

    let facade = MachineLearningFacade::with_context(FacadeConfig::default(), context).unwrap();
    let split = facade.prepare_data().unwrap();
    assert_eq!(split.n_test(), 30);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn trains_known_models_and_reports_unknown_ones() {
    let mut facade = MachineLearningFacade::new(small_forest_config()).unwrap();
    facade.initialize_trainers();

    let report = facade
        .train_models(&["logistic_regression", "svm", "random_forest", "unknown_model"])
        .unwrap();

    let trained: Vec<ModelKind> = report.trained.iter().map(|s| s.model).collect();
    assert_eq!(
        trained,
        vec![ModelKind::LogisticRegression, ModelKind::Svm, ModelKind::RandomForest]
    );
    assert_eq!(report.unrecognized, vec!["unknown_model".to_string()]);

    for summary in &report.trained {
        assert!((0.0..=1.0).contains(&summary.accuracy), "{:?}", summary);
        assert_eq!(summary.progress, 100);

        let trainer = facade.trainer(summary.model).unwrap();
        assert_eq!(trainer.phase(), Phase::Scored);
        assert_eq!(trainer.accuracy(), summary.accuracy);
    }

    let logistic = &report.trained[0];
    let expected_iterations = if logistic.accuracy < ACCURACY_THRESHOLD { 300 } else { 200 };
    assert_eq!(logistic.max_iterations, Some(expected_iterations));
    assert_eq!(report.trained[1].max_iterations, None);
    assert_eq!(report.trained[2].max_iterations, None);
}

#[test]
fn unknown_models_alone_train_nothing() {
    let mut facade = MachineLearningFacade::new(FacadeConfig::default()).unwrap();
    facade.initialize_trainers();

    let report = facade.train_models(&["gbdt", "xgboost"]).unwrap();
    assert!(report.trained.is_empty());
    assert_eq!(report.unrecognized.len(), 2);
    assert_eq!(
        facade.trainer(ModelKind::Svm).unwrap().phase(),
        Phase::Untrained
    );
}

#[test]
fn model_names_must_match_exactly() {
    let mut facade = MachineLearningFacade::new(small_forest_config()).unwrap();
    facade.initialize_trainers();

    let report = facade
        .train_models(&["SVM", " random_forest ", "Logistic_Regression"])
        .unwrap();
    assert!(report.trained.is_empty());
    assert_eq!(
        report.unrecognized,
        vec!["SVM", " random_forest ", "Logistic_Regression"]
    );
    for kind in ModelKind::ALL {
        assert_eq!(facade.trainer(kind).unwrap().phase(), Phase::Untrained);
    }
}

#[test]
fn csv_dataset_trains_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blobs.csv");
    let mut content = String::from("x1,x2,label\n");
    for i in 0..30 {
        let jitter = (i % 5) as f64 * 0.1;
        content.push_str(&format!("{},{},0\n", jitter, 1.0 + jitter));
        content.push_str(&format!("{},{},1\n", 5.0 + jitter, 5.0 - jitter));
    }
    std::fs::write(&path, content).unwrap();

    let mut config = small_forest_config();
    config.dataset = DatasetConfig::Csv { path };
    let mut facade = MachineLearningFacade::new(config).unwrap();
    facade.initialize_trainers();

    let report = facade.train_models(&["random_forest"]).unwrap();
    assert_eq!(report.trained.len(), 1);
    assert_eq!(report.trained[0].progress, 100);
}

#[test]
fn report_serializes_to_json() {
    let mut facade = MachineLearningFacade::new(small_forest_config()).unwrap();
    facade.initialize_trainers();
    let report = facade.train_models(&["random_forest", "nope"]).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"random_forest\""));
    assert!(json.contains("\"nope\""));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn default_config_lists_every_model() {
    let config = FacadeConfig::default();
    assert_eq!(config.models, vec!["logistic_regression", "svm", "random_forest"]);
    assert_eq!(config.split, SplitConfig::new(0.3, 42));
    assert_eq!(config.logistic_regression.max_iterations, 200);
    assert_eq!(config.dataset, DatasetConfig::Iris);
}

#[test]
fn config_round_trips_json() {
    let mut config = FacadeConfig::default();
    config.dataset = DatasetConfig::Csv {
        path: "data/train.csv".into(),
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: FacadeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn partial_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    let content = r#"{ "models": ["svm"], "split": { "test_size": 0.25, "random_state": 3 } }"#;
    std::fs::write(&path, content).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.models, vec!["svm"]);
    assert_eq!(config.split, SplitConfig::new(0.25, 3));
    assert_eq!(config.random_forest.n_trees, 100);
}

#[test]
fn config_with_invalid_split_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    std::fs::write(&path, r#"{ "split": { "test_size": 0.0, "random_state": 3 } }"#).unwrap();

    assert!(load_config(&path).is_err());
}
