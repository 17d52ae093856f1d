use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by any stage of a classification run.
///
/// Every variant is fatal to the run; callers get the stage through
/// [`PipelineError::stage`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad configuration, split proportion, formula or table schema.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
    /// Missing or unusable cell values in the input table.
    #[error("Data quality problem: {message}")]
    DataQuality { message: String },
    /// The classifier could not be fitted.
    #[error("Training failed: {message}")]
    TrainingFailure { message: String },
    /// Predictions or metrics could not be produced.
    #[error("Evaluation failed: {message}")]
    EvaluationFailure { message: String },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn data_quality(message: impl Into<String>) -> Self {
        Self::DataQuality {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::TrainingFailure {
            message: message.into(),
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::EvaluationFailure {
            message: message.into(),
        }
    }

    /// Name of the pipeline stage the error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Read { .. } | Self::Csv(_) | Self::Json(_) => "load",
            Self::InvalidArgument { .. } => "input",
            Self::DataQuality { .. } => "validate",
            Self::TrainingFailure { .. } => "train",
            Self::EvaluationFailure { .. } => "evaluate",
        }
    }
}
