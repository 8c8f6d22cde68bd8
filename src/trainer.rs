//! The model trainer: owns a strategy, fits and scores models, and
//! broadcasts lifecycle notifications to its observers.
use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::data::DatasetSplit;
use crate::error::{Result, TrainerError};
use crate::metrics::accuracy_score;
use crate::models::{FittedModel, IterationTuning};
use crate::notify::{Message, Observer, Subject};
use crate::strategy::ClassificationStrategy;

/// Where a trainer is in its fit/score cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Untrained,
    Fitted,
    Scored,
}

/// The state observers see when they are notified.
pub struct TrainerState {
    strategy: Box<dyn ClassificationStrategy>,
    model: Option<Box<dyn FittedModel>>,
    accuracy: f64,
    progress: u8,
    phase: Phase,
}

impl TrainerState {
    fn new(strategy: Box<dyn ClassificationStrategy>) -> Self {
        Self {
            strategy,
            model: None,
            accuracy: 0.0,
            progress: 0,
            phase: Phase::Untrained,
        }
    }

    pub fn strategy(&self) -> &dyn ClassificationStrategy {
        self.strategy.as_ref()
    }

    pub fn model(&self) -> Option<&dyn FittedModel> {
        self.model.as_deref()
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Iteration-limit access on the fitted model, if it has one.
    pub fn iteration_tuning_mut(&mut self) -> Option<&mut dyn IterationTuning> {
        match self.model.as_mut() {
            Some(model) => model.as_tunable_mut(),
            None => None,
        }
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.model
            .as_ref()
            .and_then(|m| m.as_tunable())
            .map(|t| t.max_iterations())
    }
}

pub struct ModelTrainer {
    state: TrainerState,
    subject: Subject<TrainerState>,
}

impl ModelTrainer {
    pub fn new(strategy: Box<dyn ClassificationStrategy>) -> Self {
        Self {
            state: TrainerState::new(strategy),
            subject: Subject::new(),
        }
    }

    pub fn attach(&mut self, observer: Arc<dyn Observer<TrainerState>>) {
        self.subject.attach(observer);
    }

    pub fn detach(&mut self, observer: &Arc<dyn Observer<TrainerState>>) -> Result<()> {
        self.subject.detach(observer)
    }

    pub fn notify(&mut self, message: Message) -> Result<()> {
        self.subject.notify(&mut self.state, message)
    }

    /// Fit the strategy's model, score it on the test set and notify observers.
    ///
    /// Observers receive a `fetch` message once the model is fitted, an
    /// `accuracy` message once it is scored, and a second `fetch` message if
    /// the fitted model supports iteration tuning.
    ///
    /// A failing fit leaves the trainer untouched. A failure after the fit
    /// (prediction, scoring or an observer error) leaves the trainer in the
    /// `Fitted` phase holding the new model and the previous accuracy.
    pub fn train(
        &mut self,
        features_train: &Array2<f64>,
        labels_train: &Array1<usize>,
        features_test: &Array2<f64>,
        labels_test: &Array1<usize>,
    ) -> Result<()> {
        if features_train.nrows() != labels_train.len() {
            return Err(TrainerError::Shape(format!(
                "{} training rows but {} training labels",
                features_train.nrows(),
                labels_train.len()
            )));
        }

        log::debug!("Training with {}", self.state.strategy.name());
        let model = self.state.strategy.train(features_train, labels_train)?;
        self.state.model = Some(model);
        self.state.progress = 100;
        self.state.phase = Phase::Fitted;
        self.notify(Message::Fetch)?;

        let predictions = self
            .state
            .model
            .as_ref()
            .ok_or(TrainerError::NotFitted)?
            .predict(features_test)?;
        self.state.accuracy = accuracy_score(labels_test, &predictions)?;
        self.state.phase = Phase::Scored;
        self.notify(Message::Accuracy)?;

        let tunable = self
            .state
            .model
            .as_ref()
            .is_some_and(|m| m.as_tunable().is_some());
        if tunable {
            self.notify(Message::Fetch)?;
        }

        Ok(())
    }

    pub fn train_split(&mut self, split: &DatasetSplit) -> Result<()> {
        self.train(
            &split.features_train,
            &split.labels_train,
            &split.features_test,
            &split.labels_test,
        )
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    pub fn strategy(&self) -> &dyn ClassificationStrategy {
        self.state.strategy()
    }

    pub fn model(&self) -> Option<&dyn FittedModel> {
        self.state.model()
    }

    pub fn accuracy(&self) -> f64 {
        self.state.accuracy()
    }

    pub fn progress(&self) -> u8 {
        self.state.progress()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn observer_names(&self) -> Vec<&str> {
        self.subject.observer_names()
    }
}
