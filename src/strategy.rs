//! Training strategies: one swappable type per classification algorithm.
//!
//! A strategy is a stateless recipe. `train` builds a fresh model with the
//! strategy's fixed hyper-parameters, fits it and hands ownership of the
//! fitted model back to the caller, so the same strategy can be reused for
//! every training run.
use ndarray::{Array1, Array2};

use crate::config::{
    FacadeConfig, LogisticRegressionParams, ModelKind, RandomForestParams, SvmParams,
};
use crate::error::Result;
use crate::models::{
    FittedModel, LogisticRegressionModel, RandomForestClassifier, SVMClassifier,
};

pub trait ClassificationStrategy {
    /// Fit a new model on the given features and labels.
    fn train(&self, features: &Array2<f64>, labels: &Array1<usize>) -> Result<Box<dyn FittedModel>>;

    /// Which algorithm this strategy implements. Observer wiring keys off this.
    fn kind(&self) -> ModelKind;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Default)]
pub struct LogisticRegressionStrategy {
    params: LogisticRegressionParams,
}

impl LogisticRegressionStrategy {
    pub fn new(params: LogisticRegressionParams) -> Self {
        Self { params }
    }
}

impl ClassificationStrategy for LogisticRegressionStrategy {
    fn train(
        &self,
        features: &Array2<f64>,
        labels: &Array1<usize>,
    ) -> Result<Box<dyn FittedModel>> {
        let model = LogisticRegressionModel::fit(features, labels, self.params.max_iterations)?;
        Ok(Box::new(model))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::LogisticRegression
    }

    fn name(&self) -> &'static str {
        "LogisticRegressionStrategy"
    }
}

#[derive(Debug, Clone, Default)]
pub struct SupportVectorMachineStrategy {
    params: SvmParams,
}

impl SupportVectorMachineStrategy {
    pub fn new(params: SvmParams) -> Self {
        Self { params }
    }
}

impl ClassificationStrategy for SupportVectorMachineStrategy {
    fn train(
        &self,
        features: &Array2<f64>,
        labels: &Array1<usize>,
    ) -> Result<Box<dyn FittedModel>> {
        let model = SVMClassifier::fit(features, labels, &self.params)?;
        Ok(Box::new(model))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Svm
    }

    fn name(&self) -> &'static str {
        "SupportVectorMachineStrategy"
    }
}

#[derive(Debug, Clone, Default)]
pub struct RandomForestStrategy {
    params: RandomForestParams,
}

impl RandomForestStrategy {
    pub fn new(params: RandomForestParams) -> Self {
        Self { params }
    }
}

impl ClassificationStrategy for RandomForestStrategy {
    fn train(
        &self,
        features: &Array2<f64>,
        labels: &Array1<usize>,
    ) -> Result<Box<dyn FittedModel>> {
        let model = RandomForestClassifier::fit(features, labels, &self.params)?;
        Ok(Box::new(model))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn name(&self) -> &'static str {
        "RandomForestStrategy"
    }
}

/// Build the boxed strategy for `kind` using the hyper-parameters in `config`.
pub fn build_strategy(kind: ModelKind, config: &FacadeConfig) -> Box<dyn ClassificationStrategy> {
    match kind {
        ModelKind::LogisticRegression => Box::new(LogisticRegressionStrategy::new(
            config.logistic_regression.clone(),
        )),
        ModelKind::Svm => Box::new(SupportVectorMachineStrategy::new(config.svm.clone())),
        ModelKind::RandomForest => {
            Box::new(RandomForestStrategy::new(config.random_forest.clone()))
        }
    }
}
