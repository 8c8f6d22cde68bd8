use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::config::RandomForestParams;
use crate::error::{Result, TrainerError};
use crate::models::classifier_trait::FittedModel;

/// A single bagged tree together with the feature columns it was trained on.
struct ForestMember {
    columns: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

/// Bagged ensemble of linfa decision trees.
///
/// Every tree sees a bootstrap sample of the rows and a random subset of
/// the feature columns; predictions are a majority vote, ties going to the
/// smallest label.
pub struct RandomForestClassifier {
    members: Vec<ForestMember>,
    n_classes: usize,
}

impl RandomForestClassifier {
    pub fn fit(
        features: &Array2<f64>,
        labels: &Array1<usize>,
        params: &RandomForestParams,
    ) -> Result<Self> {
        let (n_rows, n_features) = features.dim();
        if n_rows == 0 || n_features == 0 {
            return Err(TrainerError::Shape(format!(
                "random forest needs a non-empty feature matrix, got ({}, {})",
                n_rows, n_features
            )));
        }
        if params.n_trees == 0 {
            return Err(TrainerError::InvalidConfig(
                "random forest needs at least one tree".to_string(),
            ));
        }

        let n_columns = params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().round() as usize)
            .clamp(1, n_features);
        let n_classes = labels.iter().copied().max().map_or(0, |m| m + 1);

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut members = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let rows: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
            let mut columns = sample(&mut rng, n_features, n_columns).into_vec();
            columns.sort_unstable();

            let records = features.select(Axis(0), &rows).select(Axis(1), &columns);
            let targets = labels.select(Axis(0), &rows);
            let dataset = Dataset::new(records, targets);

            let tree = DecisionTree::<f64, usize>::params()
                .max_depth(params.max_depth)
                .fit(&dataset)
                .map_err(|e| TrainerError::Fit {
                    model: "RandomForest",
                    reason: e.to_string(),
                })?;

            members.push(ForestMember { columns, tree });
        }

        log::trace!(
            "Fitted random forest with {} trees over {} of {} features",
            members.len(),
            n_columns,
            n_features
        );

        Ok(Self { members, n_classes })
    }

    pub fn n_trees(&self) -> usize {
        self.members.len()
    }
}

impl FittedModel for RandomForestClassifier {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        let required = self
            .members
            .iter()
            .flat_map(|m| m.columns.iter().copied())
            .max()
            .map_or(0, |c| c + 1);
        if features.ncols() < required {
            return Err(TrainerError::Shape(format!(
                "random forest expects at least {} feature columns, got {}",
                required,
                features.ncols()
            )));
        }

        let mut votes = Array2::<usize>::zeros((features.nrows(), self.n_classes));
        for member in &self.members {
            let records = features.select(Axis(1), &member.columns);
            let predicted: Array1<usize> = member.tree.predict(&records);
            for (row, label) in predicted.iter().enumerate() {
                votes[(row, *label)] += 1;
            }
        }

        let winners = votes
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (label, count) in row.iter().enumerate() {
                    if *count > row[best] {
                        best = label;
                    }
                }
                best
            })
            .collect();

        Ok(winners)
    }

    fn name(&self) -> &str {
        "RandomForest"
    }
}
