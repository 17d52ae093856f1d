use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

use super::{Model, not_fitted, parse_param, unknown_param};
use crate::error::PipelineError;

const NAME: &str = "Multinomial Logistic Regression";

pub struct LogRegWrapper {
    model: Option<LogisticRegression<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    alpha: f64,
}

impl LogRegWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            alpha: 0.0,
        }
    }
}

impl Default for LogRegWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for LogRegWrapper {
    fn get_name(&self) -> &str {
        NAME
    }

    fn get_supported_params(&self) -> Vec<&str> {
        vec!["alpha"]
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), PipelineError> {
        match key {
            "alpha" => {
                let alpha: f64 = parse_param(NAME, key, value)?;
                if !alpha.is_finite() || alpha < 0.0 {
                    return Err(PipelineError::invalid_argument(
                        "alpha must be a non-negative number",
                    ));
                }
                self.alpha = alpha;
                Ok(())
            }
            _ => Err(unknown_param(NAME, key)),
        }
    }

    // Deterministic solver; the seed is unused.
    fn train(&mut self, x: &DenseMatrix<f64>, y: &Vec<u32>, _seed: u64) -> Result<(), PipelineError> {
        let mut params = LogisticRegressionParameters::default();
        params.alpha = self.alpha;

        let fitted = LogisticRegression::fit(x, y, params)
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

    #[test]
    fn separates_three_classes() {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for (class, center) in [(0u32, -5.0), (1, 0.0), (2, 5.0)] {
            for offset in [-0.3, -0.1, 0.1, 0.3] {
                rows.push(vec![center + offset, center - offset]);
                y.push(class);
            }
        }
        let x = DenseMatrix::from_2d_vec(&rows).unwrap();
        let mut model = LogRegWrapper::new();
        model.set_param("alpha", "0.01").unwrap();
        model.train(&x, &y, 0).unwrap();

        let probe = DenseMatrix::from_2d_vec(&vec![vec![-5.0, -5.0], vec![5.0, 5.0]]).unwrap();
        assert_eq!(model.predict(&probe).unwrap(), vec![0, 2]);
    }

    #[test]
    fn negative_alpha_is_rejected() {
        assert!(LogRegWrapper::new().set_param("alpha", "-1").is_err());
    }
}
