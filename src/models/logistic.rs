use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2};

use crate::error::{Result, TrainerError};
use crate::models::classifier_trait::{FittedModel, IterationTuning};

/// Multinomial logistic regression fitted with linfa's L-BFGS solver.
pub struct LogisticRegressionModel {
    model: MultiFittedLogisticRegression<f64, usize>,
    max_iterations: u64,
}

impl LogisticRegressionModel {
    pub fn fit(
        features: &Array2<f64>,
        labels: &Array1<usize>,
        max_iterations: u64,
    ) -> Result<Self> {
        let dataset = Dataset::new(features.to_owned(), labels.to_owned());

        let model = MultiLogisticRegression::<f64>::default()
            .max_iterations(max_iterations)
            .fit(&dataset)
            .map_err(|e| TrainerError::Fit {
                model: "LogisticRegression",
                reason: e.to_string(),
            })?;

        Ok(Self {
            model,
            max_iterations,
        })
    }
}

impl FittedModel for LogisticRegressionModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(self.model.predict(features))
    }

    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn as_tunable(&self) -> Option<&dyn IterationTuning> {
        Some(self as &dyn IterationTuning)
    }

    fn as_tunable_mut(&mut self) -> Option<&mut dyn IterationTuning> {
        Some(self as &mut dyn IterationTuning)
    }
}

impl IterationTuning for LogisticRegressionModel {
    fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    // Only the recorded configuration changes; the fitted coefficients stay as they are.
    fn set_max_iterations(&mut self, max_iterations: u64) {
        self.max_iterations = max_iterations;
    }
}
