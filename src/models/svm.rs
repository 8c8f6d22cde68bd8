use linfa::dataset::Pr;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams as LinfaSvmParams};
use ndarray::{Array1, Array2};

use crate::config::SvmParams;
use crate::error::{Result, TrainerError};
use crate::models::classifier_trait::FittedModel;

/// One-vs-rest support vector classifier built from binary linfa SVMs
/// with a Gaussian kernel and Platt-scaled outputs.
pub struct SVMClassifier {
    machines: Vec<(usize, Svm<f64, Pr>)>,
}

impl SVMClassifier {
    pub fn fit(features: &Array2<f64>, labels: &Array1<usize>, params: &SvmParams) -> Result<Self> {
        let mut classes: Vec<usize> = labels.iter().copied().collect();
        classes.sort_unstable();
        classes.dedup();

        if classes.len() < 2 {
            return Err(TrainerError::Fit {
                model: "SVM",
                reason: format!("need at least two classes, found {}", classes.len()),
            });
        }

        let mut machines = Vec::with_capacity(classes.len());
        for &class in &classes {
            // Current class is the positive side, everything else negative
            let targets = labels.mapv(|l| l == class);
            let dataset = Dataset::new(features.to_owned(), targets);

            let svm_params: LinfaSvmParams<f64, Pr> = Svm::<f64, Pr>::params()
                .eps(params.eps)
                .pos_neg_weights(params.c, params.c)
                .gaussian_kernel(params.gaussian_eps);

            let machine = svm_params.fit(&dataset).map_err(|e| TrainerError::Fit {
                model: "SVM",
                reason: format!("class {}: {}", class, e),
            })?;

            log::trace!("Fitted one-vs-rest SVM for class {}", class);
            machines.push((class, machine));
        }

        Ok(Self { machines })
    }

    pub fn classes(&self) -> Vec<usize> {
        self.machines.iter().map(|(class, _)| *class).collect()
    }
}

impl FittedModel for SVMClassifier {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        let mut best_class = Array1::<usize>::zeros(features.nrows());
        let mut best_score = Array1::<f32>::from_elem(features.nrows(), f32::NEG_INFINITY);

        for (class, machine) in &self.machines {
            let scores: Array1<Pr> = machine.predict(features);
            for (row, score) in scores.iter().enumerate() {
                let p = **score;
                if p > best_score[row] {
                    best_score[row] = p;
                    best_class[row] = *class;
                }
            }
        }

        Ok(best_class)
    }

    fn name(&self) -> &str {
        "SVM"
    }
}
