use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

use super::{Model, not_fitted, parse_param, unknown_param};
use crate::error::PipelineError;

const NAME: &str = "Decision Tree";

pub struct TreeWrapper {
    model: Option<DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    max_depth: Option<u16>,
    min_samples_leaf: usize,
    min_samples_split: usize,
}

impl TreeWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
        }
    }
}

impl Default for TreeWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for TreeWrapper {
    fn get_name(&self) -> &str {
        NAME
    }

    fn get_supported_params(&self) -> Vec<&str> {
        vec!["max_depth", "min_samples_leaf", "min_samples_split"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), PipelineError> {
        match key {
            "max_depth" => self.max_depth = Some(parse_param(NAME, key, value)?),
            "min_samples_leaf" => self.min_samples_leaf = parse_param(NAME, key, value)?,
            "min_samples_split" => self.min_samples_split = parse_param(NAME, key, value)?,
            _ => return Err(unknown_param(NAME, key)),
        }
        Ok(())
    }

    // A single tree considers every feature at each split, so the seed has
    // nothing to drive.
    fn train(&mut self, x: &DenseMatrix<f64>, y: &Vec<u32>, _seed: u64) -> Result<(), PipelineError> {
        let mut params = DecisionTreeClassifierParameters::default();
        params.max_depth = self.max_depth;
        params.min_samples_leaf = self.min_samples_leaf;
        params.min_samples_split = self.min_samples_split;

        let fitted = DecisionTreeClassifier::fit(x, y, params)
            .map_err(|e| PipelineError::training(format!("{NAME}: {e}")))?;
        self.model = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<u32>, PipelineError> {
        let model = self.model.as_ref().ok_or_else(|| not_fitted(NAME))?;
        model
            .predict(x)
            .map_err(|e| PipelineError::evaluation(format!("{NAME}: {e}")))
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}
