use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};

/// The classification algorithms the façade knows how to train.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    Svm,
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::Svm,
        ModelKind::RandomForest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::Svm => "svm",
            ModelKind::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "logistic_regression" => Ok(ModelKind::LogisticRegression),
            "svm" => Ok(ModelKind::Svm),
            "random_forest" => Ok(ModelKind::RandomForest),
            _ => Err(TrainerError::UnknownModel(s.to_string())),
        }
    }
}

/// Train/test partition parameters. Fixed for the lifetime of a data context.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// Proportion of rows placed in the test partition, in (0, 1).
    pub test_size: f64,
    /// Seed for the row shuffle.
    pub random_state: u64,
}

impl SplitConfig {
    pub fn new(test_size: f64, random_state: u64) -> Self {
        Self {
            test_size,
            random_state,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.test_size.is_finite() || self.test_size <= 0.0 || self.test_size >= 1.0 {
            return Err(TrainerError::InvalidConfig(format!(
                "test_size must lie strictly between 0 and 1, got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            random_state: 42,
        }
    }
}

/// Where the raw labelled table comes from.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DatasetConfig {
    /// The bundled 150-row Iris table.
    #[default]
    Iris,
    /// A headered CSV file: numeric feature columns followed by an integer label column.
    Csv { path: PathBuf },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticRegressionParams {
    pub max_iterations: u64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            max_iterations: 200,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SvmParams {
    /// Penalty applied equally to positive and negative samples.
    pub c: f64,
    /// Width of the Gaussian kernel.
    pub gaussian_eps: f64,
    /// Solver stopping tolerance.
    pub eps: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            gaussian_eps: 1.0,
            eps: 1e-3,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    /// Features drawn per tree. `None` uses the square root of the feature count.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            max_features: None,
            seed: 42,
        }
    }
}

/// Top-level configuration for a training run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FacadeConfig {
    pub split: SplitConfig,
    pub models: Vec<String>,
    pub dataset: DatasetConfig,
    pub logistic_regression: LogisticRegressionParams,
    pub svm: SvmParams,
    pub random_forest: RandomForestParams,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            models: ModelKind::ALL.iter().map(|m| m.to_string()).collect(),
            dataset: DatasetConfig::default(),
            logistic_regression: LogisticRegressionParams::default(),
            svm: SvmParams::default(),
            random_forest: RandomForestParams::default(),
        }
    }
}

/// Load a run configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<FacadeConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: FacadeConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config
        .split
        .validate()
        .with_context(|| format!("Invalid split in config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_parses_canonical_names() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn model_kind_names_are_exact() {
        for name in ["SVM", " svm", "Random_Forest", "logistic-regression"] {
            assert!(
                matches!(name.parse::<ModelKind>(), Err(TrainerError::UnknownModel(_))),
                "{:?} should not parse",
                name
            );
        }
    }

    #[test]
    fn model_kind_rejects_unknown_names() {
        match "gbdt".parse::<ModelKind>() {
            Err(TrainerError::UnknownModel(name)) => assert_eq!(name, "gbdt"),
            other => panic!("expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn split_config_validation() {
        assert!(SplitConfig::default().validate().is_ok());
        assert!(SplitConfig::new(0.0, 1).validate().is_err());
        assert!(SplitConfig::new(1.0, 1).validate().is_err());
        assert!(SplitConfig::new(f64::NAN, 1).validate().is_err());
    }
}
