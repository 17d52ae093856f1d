use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::{Model, not_fitted, parse_param, unknown_param};
use crate::error::PipelineError;

const NAME: &str = "Random Forest";

pub struct RandomForestWrapper {
    model: Option<RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    n_trees: u16,
    max_depth: Option<u16>,
    min_samples_leaf: usize,
    /// Features tried per split; `None` means sqrt of the feature count.
    mtry: Option<usize>,
}

impl RandomForestWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            n_trees: 500,
            max_depth: None,
            min_samples_leaf: 1,
            mtry: None,
        }
    }

    pub fn n_trees(&self) -> u16 {
        self.n_trees
    }
}

impl Default for RandomForestWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for RandomForestWrapper {
    fn get_name(&self) -> &str {
        NAME
    }

    fn get_supported_params(&self) -> Vec<&str> {
        vec!["n_trees", "max_depth", "min_samples_leaf", "mtry"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), PipelineError> {
        match key {
            "n_trees" => {
                let n_trees: u16 = parse_param(NAME, key, value)?;
                if n_trees == 0 {
                    return Err(PipelineError::invalid_argument("n_trees must be at least 1"));
                }
                self.n_trees = n_trees;
            }
            "max_depth" => self.max_depth = Some(parse_param(NAME, key, value)?),
            "min_samples_leaf" => self.min_samples_leaf = parse_param(NAME, key, value)?,
            "mtry" => self.mtry = Some(parse_param(NAME, key, value)?),
            _ => return Err(unknown_param(NAME, key)),
        }
        Ok(())
    }

    fn train(&mut self, x: &DenseMatrix<f64>, y: &Vec<u32>, seed: u64) -> Result<(), PipelineError> {
        let mut params = RandomForestClassifierParameters::default();
        params.n_trees = self.n_trees;
        params.max_depth = self.max_depth;
        params.min_samples_leaf = self.min_samples_leaf;
        params.m = self.mtry;
        params.seed = seed;

        let fitted = RandomForestClassifier::fit(x, y, params)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> (DenseMatrix<f64>, Vec<u32>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for class in 0..3u32 {
            for i in 0..10 {
                let base = class as f64 * 10.0;
                rows.push(vec![base + (i % 3) as f64 * 0.1, base - (i % 2) as f64 * 0.1]);
                labels.push(class);
            }
        }
        (DenseMatrix::from_2d_vec(&rows).unwrap(), labels)
    }

    #[test]
    fn separates_clusters() {
        let (x, y) = clusters();
        let mut model = RandomForestWrapper::new();
        model.set_param("n_trees", "25").unwrap();
        model.train(&x, &y, 2056).unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn same_seed_gives_same_predictions() {
        let (x, y) = clusters();
        let probe = DenseMatrix::from_2d_vec(&vec![vec![5.0, 5.0], vec![15.0, 14.0]]).unwrap();
        let mut a = RandomForestWrapper::new();
        let mut b = RandomForestWrapper::new();
        a.set_param("n_trees", "15").unwrap();
        b.set_param("n_trees", "15").unwrap();
        a.train(&x, &y, 7).unwrap();
        b.train(&x, &y, 7).unwrap();
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn predict_before_fit_fails() {
        let (x, _) = clusters();
        let err = RandomForestWrapper::new().predict(&x).unwrap_err();
        assert!(matches!(err, PipelineError::EvaluationFailure { .. }));
    }

    #[test]
    fn params_are_validated() {
        let mut model = RandomForestWrapper::new();
        assert!(model.set_param("n_trees", "0").is_err());
        assert!(model.set_param("n_trees", "many").is_err());
        assert!(model.set_param("learning_rate", "0.1").is_err());
        model.set_param("mtry", "2").unwrap();
        model.set_param("max_depth", "4").unwrap();
        assert_eq!(model.n_trees(), 500);
    }
}
