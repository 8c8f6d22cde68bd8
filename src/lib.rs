//! ml-facade: observer-driven orchestration for training classification models.
//!
//! A `MachineLearningFacade` owns one `ModelTrainer` per supported algorithm
//! (logistic regression, SVM, random forest). Each trainer wraps a
//! swappable `ClassificationStrategy` and broadcasts its fit/score lifecycle
//! to attached observers. Data comes from a `DataProvider` that is
//! configured once per `DataContext` and computes its train/test split a
//! single time.
//!
//! Model fitting is delegated to the linfa crates behind the
//! `FittedModel` trait.
pub mod config;
pub mod data;
pub mod error;
pub mod facade;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod strategy;
pub mod trainer;

pub use config::{FacadeConfig, ModelKind, SplitConfig};
pub use error::{Result, TrainerError};
pub use facade::{MachineLearningFacade, ModelSummary, TrainingReport};
pub use notify::{Message, Observer, Subject};
pub use trainer::{ModelTrainer, Phase, TrainerState};
