//! Orchestration façade.
//!
//! Builds one trainer per supported algorithm, wires observers onto each,
//! prepares the dataset and trains whichever models the caller asks for.
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{FacadeConfig, ModelKind};
use crate::data::{DataContext, DatasetSplit, TableAdapter};
use crate::error::Result;
use crate::notify::{AccuracyLogger, ParameterChanger, ProgressMonitor};
use crate::strategy::build_strategy;
use crate::trainer::ModelTrainer;

/// Outcome of one trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: ModelKind,
    pub strategy: String,
    pub accuracy: f64,
    pub progress: u8,
    pub max_iterations: Option<u64>,
}

impl ModelSummary {
    fn from_trainer(model: ModelKind, trainer: &ModelTrainer) -> Self {
        Self {
            model,
            strategy: trainer.strategy().name().to_string(),
            accuracy: trainer.accuracy(),
            progress: trainer.progress(),
            max_iterations: trainer.state().max_iterations(),
        }
    }
}

/// Everything `train_models` did, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub trained: Vec<ModelSummary>,
    pub unrecognized: Vec<String>,
}

pub struct MachineLearningFacade {
    config: FacadeConfig,
    context: DataContext,
    trainers: BTreeMap<ModelKind, ModelTrainer>,
}

impl MachineLearningFacade {
    /// Create the façade, fixing the data provider's configuration and
    /// building a trainer for every supported model.
    pub fn new(config: FacadeConfig) -> Result<Self> {
        Self::with_context(config, DataContext::new())
    }

    /// Like `new`, reusing a caller-supplied data context. If the context
    /// already holds a provider, its configuration is kept.
    pub fn with_context(config: FacadeConfig, context: DataContext) -> Result<Self> {
        context.provider(config.split, &config.dataset)?;

        let trainers = ModelKind::ALL
            .iter()
            .map(|&kind| (kind, ModelTrainer::new(build_strategy(kind, &config))))
            .collect();

        Ok(Self {
            config,
            context,
            trainers,
        })
    }

    /// Attach the standard observers to every trainer.
    ///
    /// Every trainer gets an `AccuracyLogger` and a `ProgressMonitor`; only
    /// the logistic-regression trainer gets a `ParameterChanger`. Calling
    /// this twice attaches everything twice.
    pub fn initialize_trainers(&mut self) {
        for trainer in self.trainers.values_mut() {
            attach_observers(trainer);
        }
    }

    /// Load the dataset, adapt it and split it. Only the first call
    /// computes a split; later calls return the cached one.
    pub fn prepare_data(&self) -> Result<Arc<DatasetSplit>> {
        let provider = self
            .context
            .provider(self.config.split, &self.config.dataset)?;
        let table = provider.load()?;
        let data = TableAdapter::new(&table).convert()?;
        Ok(provider.split(&data)?.into_split())
    }

    /// Train each named model in order.
    ///
    /// Unknown names are logged and recorded in the report; they do not stop
    /// the run. Any other error aborts the run and is returned, leaving the
    /// models trained so far untouched.
    pub fn train_models<S: AsRef<str>>(&mut self, models: &[S]) -> Result<TrainingReport> {
        let mut report = TrainingReport::default();

        for name in models {
            let name = name.as_ref();
            let split = self.prepare_data()?;

            let trainer = name
                .parse::<ModelKind>()
                .ok()
                .and_then(|kind| self.trainers.get_mut(&kind).map(|t| (kind, t)));

            match trainer {
                Some((kind, trainer)) => {
                    log::info!("Training {}", kind);
                    trainer.train_split(&split)?;
                    report.trained.push(ModelSummary::from_trainer(kind, trainer));
                }
                None => {
                    log::warn!("Model '{}' not recognized.", name);
                    report.unrecognized.push(name.to_string());
                }
            }
        }

        Ok(report)
    }

    pub fn trainer(&self, kind: ModelKind) -> Option<&ModelTrainer> {
        self.trainers.get(&kind)
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }
}

fn attach_observers(trainer: &mut ModelTrainer) {
    trainer.attach(Arc::new(AccuracyLogger));
    trainer.attach(Arc::new(ProgressMonitor));
    if trainer.strategy().kind() == ModelKind::LogisticRegression {
        trainer.attach(Arc::new(ParameterChanger));
    }
}
