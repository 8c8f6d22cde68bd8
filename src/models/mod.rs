pub mod classifier_trait;
pub mod logistic;
pub mod random_forest;
pub mod svm;

pub use classifier_trait::{FittedModel, IterationTuning};
pub use logistic::LogisticRegressionModel;
pub use random_forest::RandomForestClassifier;
pub use svm::SVMClassifier;
