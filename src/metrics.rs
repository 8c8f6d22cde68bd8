use ndarray::Array1;

use crate::error::{Result, TrainerError};

/// Fraction of predictions that match the ground truth.
///
/// # Arguments
///
/// * `truth` - Expected class labels.
/// * `predicted` - Labels produced by a fitted model, aligned with `truth`.
///
/// # Returns
///
/// A value in `[0, 1]`. Fails if the arrays differ in length or are empty.
pub fn accuracy_score(truth: &Array1<usize>, predicted: &Array1<usize>) -> Result<f64> {
    if truth.len() != predicted.len() {
        return Err(TrainerError::Shape(format!(
            "{} true labels but {} predictions",
            truth.len(),
            predicted.len()
        )));
    }
    if truth.is_empty() {
        return Err(TrainerError::Shape(
            "cannot score an empty test set".to_string(),
        ));
    }

    let correct = truth
        .iter()
        .zip(predicted.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct as f64 / truth.len() as f64)
}
