use super::{LogRegWrapper, Model, RandomForestWrapper, TreeWrapper};
use crate::error::PipelineError;

/// Factory for classifiers by name.
pub struct ModelFactory;

impl ModelFactory {
    pub fn create(model_type: &str) -> Result<Box<dyn Model>, PipelineError> {
        match model_type {
            "random_forest" | "rand_forest" | "rf" => Ok(Box::new(RandomForestWrapper::new())),
            "decision_tree" | "tree" => Ok(Box::new(TreeWrapper::new())),
            "logistic_regression" | "logreg" | "multinom_reg" => Ok(Box::new(LogRegWrapper::new())),
            _ => Err(PipelineError::invalid_argument(format!(
                "unknown model: {model_type}. Available: {:?}",
                Self::available_models()
            ))),
        }
    }

    /// Creates a model and applies `params` in order. Keys outside the
    /// model's supported parameters are rejected before any value is set.
    pub fn create_with_params(
        model_type: &str,
        params: &[(String, String)],
    ) -> Result<Box<dyn Model>, PipelineError> {
        let mut model = Self::create(model_type)?;
        let supported = model.get_supported_params();
        if let Some((key, _)) = params.iter().find(|(key, _)| !supported.contains(&key.as_str())) {
            return Err(PipelineError::invalid_argument(format!(
                "unknown parameter '{key}' for {}. Supported: {supported:?}",
                model.get_name()
            )));
        }
        for (key, value) in params {
            model.set_param(key, value)?;
        }
        Ok(model)
    }

    pub fn available_models() -> Vec<&'static str> {
        vec!["random_forest", "decision_tree", "logistic_regression"]
    }

    pub fn get_model_description(model_type: &str) -> Option<&'static str> {
        match model_type {
            "random_forest" | "rand_forest" | "rf" => {
                Some("Random forest of bagged classification trees")
            }
            "decision_tree" | "tree" => Some("Single CART classification tree"),
            "logistic_regression" | "logreg" | "multinom_reg" => {
                Some("Multinomial logistic regression")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_every_available_model() {
        for name in ModelFactory::available_models() {
            let model = ModelFactory::create(name).unwrap();
            assert!(!model.is_fitted());
            assert!(ModelFactory::get_model_description(name).is_some());
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(ModelFactory::create("rand_forest").unwrap().get_name(), "Random Forest");
        assert_eq!(
            ModelFactory::create("multinom_reg").unwrap().get_name(),
            "Multinomial Logistic Regression"
        );
    }

    #[test]
    fn unknown_model_is_rejected() {
        let err = ModelFactory::create("svm").err().unwrap();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
    }

    #[test]
    fn aliases_share_descriptions() {
        for (alias, name) in [
            ("rf", "random_forest"),
            ("rand_forest", "random_forest"),
            ("tree", "decision_tree"),
            ("logreg", "logistic_regression"),
            ("multinom_reg", "logistic_regression"),
        ] {
            assert!(ModelFactory::create(alias).is_ok());
            assert_eq!(
                ModelFactory::get_model_description(alias),
                ModelFactory::get_model_description(name)
            );
        }
    }

    #[test]
    fn params_are_checked_against_supported_keys() {
        for name in ModelFactory::available_models() {
            let model = ModelFactory::create(name).unwrap();
            let supported = model.get_supported_params();
            assert!(!supported.is_empty());
            assert!(!supported.contains(&"learning_rate"));
        }

        let params = vec![
            ("max_depth".to_string(), "3".to_string()),
            ("n_trees".to_string(), "10".to_string()),
        ];
        let err = ModelFactory::create_with_params("decision_tree", &params).err().unwrap();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
        assert!(err.to_string().contains("'n_trees'"));
        assert!(err.to_string().contains("min_samples_split"));
    }

    #[test]
    fn params_are_applied() {
        let params = vec![("n_trees".to_string(), "10".to_string())];
        assert!(ModelFactory::create_with_params("random_forest", &params).is_ok());
        let bad = vec![("alpha".to_string(), "1".to_string())];
        assert!(ModelFactory::create_with_params("random_forest", &bad).is_err());
    }
}
