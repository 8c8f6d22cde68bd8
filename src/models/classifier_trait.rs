use ndarray::{Array1, Array2};

use crate::error::Result;

/// A fitted classifier returned by a training strategy.
///
/// Implementations wrap a model from the linfa ecosystem and only expose
/// prediction, so the trainer never depends on a concrete algorithm.
pub trait FittedModel {
    /// Predict a class label for every row of `features`.
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>>;

    /// Human readable name of the underlying model.
    fn name(&self) -> &str;

    /// Models whose configuration carries an iteration limit declare it here.
    fn as_tunable(&self) -> Option<&dyn IterationTuning> {
        None
    }

    fn as_tunable_mut(&mut self) -> Option<&mut dyn IterationTuning> {
        None
    }
}

/// Capability for models trained by an iterative solver with a bounded
/// number of iterations.
pub trait IterationTuning {
    fn max_iterations(&self) -> u64;

    fn set_max_iterations(&mut self, max_iterations: u64);
}
