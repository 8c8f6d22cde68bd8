use thiserror::Error;

/// Errors raised while preparing data, fitting models or dispatching notifications.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("model '{0}' not recognized")]
    UnknownModel(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("invalid label {value} at row {row}: labels must be non-negative integers")]
    InvalidLabel { row: usize, value: f64 },

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("observer '{0}' is not attached to this subject")]
    ObserverNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("model has not been fitted")]
    NotFitted,

    #[error("{model} failed to fit: {reason}")]
    Fit { model: &'static str, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TrainerError>;
