use super::pipeline::ClassificationPipeline;
use crate::config::{DEFAULT_LABEL, DEFAULT_MODEL, DEFAULT_SEED, DEFAULT_TRAIN_PROPORTION, PipelineConfig};
use crate::error::PipelineError;
use crate::models::ModelFactory;
use crate::processing::Formula;
use crate::splitting::Splitter;

/// Builder for [`ClassificationPipeline`]; settings are validated in `build`.
#[derive(Debug, Clone)]
pub struct ClassificationPipelineBuilder {
    label: Option<String>,
    formula: Option<String>,
    model_type: Option<String>,
    model_params: Vec<(String, String)>,
    train_proportion: Option<f64>,
    split_seed: Option<u64>,
    model_seed: Option<u64>,
    drop_incomplete_rows: bool,
}

impl ClassificationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            label: None,
            formula: None,
            model_type: None,
            model_params: Vec::new(),
            train_proportion: None,
            split_seed: None,
            model_seed: None,
            drop_incomplete_rows: false,
        }
    }

    /// Copies every setting from a loaded configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let mut builder = Self::new()
            .label(&config.label_column)
            .model(&config.model)
            .train_proportion(config.train_proportion)
            .split_seed(config.split_seed)
            .model_seed(config.model_seed)
            .drop_incomplete_rows(config.drop_incomplete_rows);

        if let Some(formula) = &config.formula {
            builder = builder.formula(formula);
        }
        for (key, value) in config.model_params()? {
            builder = builder.model_param(&key, &value);
        }
        Ok(builder)
    }

    /// Label column for a `label ~ .` formula.
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Full formula; takes precedence over `label`.
    pub fn formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }

    pub fn model(mut self, model_type: &str) -> Self {
        self.model_type = Some(model_type.to_string());
        self
    }

    pub fn model_param(mut self, key: &str, value: &str) -> Self {
        self.model_params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn train_proportion(mut self, proportion: f64) -> Self {
        self.train_proportion = Some(proportion);
        self
    }

    /// Sets both the split seed and the model seed.
    pub fn seed(self, seed: u64) -> Self {
        self.split_seed(seed).model_seed(seed)
    }

    pub fn split_seed(mut self, seed: u64) -> Self {
        self.split_seed = Some(seed);
        self
    }

    pub fn model_seed(mut self, seed: u64) -> Self {
        self.model_seed = Some(seed);
        self
    }

    pub fn drop_incomplete_rows(mut self, drop: bool) -> Self {
        self.drop_incomplete_rows = drop;
        self
    }

    pub fn build(self) -> Result<ClassificationPipeline, PipelineError> {
        let formula = match (&self.formula, &self.label) {
            (Some(text), _) => Formula::parse(text)?,
            (None, Some(label)) => Formula::all_features(label.trim()),
            (None, None) => Formula::all_features(DEFAULT_LABEL),
        };
        if formula.label().is_empty() {
            return Err(PipelineError::invalid_argument("label column name is empty"));
        }

        let model_type = self.model_type.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        // Fail on unknown models and parameters before any data is touched.
        ModelFactory::create_with_params(&model_type, &self.model_params)?;

        let splitter = Splitter::new(
            self.train_proportion.unwrap_or(DEFAULT_TRAIN_PROPORTION),
            self.split_seed.unwrap_or(DEFAULT_SEED),
        )?;

        Ok(ClassificationPipeline {
            formula,
            model_type,
            model_params: self.model_params,
            splitter,
            model_seed: self.model_seed.unwrap_or(DEFAULT_SEED),
            drop_incomplete_rows: self.drop_incomplete_rows,
        })
    }
}

impl Default for ClassificationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
