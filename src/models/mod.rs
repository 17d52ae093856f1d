use std::str::FromStr;

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::PipelineError;

/// A classification algorithm behind the trainer.
///
/// Implementations wrap a smartcore estimator: `train` fits it on an encoded
/// design matrix and label codes, `predict` returns one label code per row.
pub trait Model {
    fn get_name(&self) -> &str;

    fn get_supported_params(&self) -> Vec<&str>;

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), PipelineError>;

    /// Fits the estimator. `seed` drives any internal randomness.
    fn train(&mut self, x: &DenseMatrix<f64>, y: &Vec<u32>, seed: u64) -> Result<(), PipelineError>;

    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<u32>, PipelineError>;

    fn is_fitted(&self) -> bool;
}

/// Parses a model parameter value.
pub(crate) fn parse_param<T: FromStr>(model: &str, key: &str, value: &str) -> Result<T, PipelineError> {
    value.trim().parse::<T>().map_err(|_| {
        PipelineError::invalid_argument(format!(
            "invalid value '{value}' for {model} parameter '{key}'"
        ))
    })
}

pub(crate) fn unknown_param(model: &str, key: &str) -> PipelineError {
    PipelineError::invalid_argument(format!("unknown parameter '{key}' for {model}"))
}

pub(crate) fn not_fitted(model: &str) -> PipelineError {
    PipelineError::evaluation(format!("{model} has not been fitted"))
}

pub mod random_forest;
pub mod tree;
pub mod logreg;
pub mod factory;

pub use random_forest::RandomForestWrapper;
pub use tree::TreeWrapper;
pub use logreg::LogRegWrapper;
pub use factory::ModelFactory;
