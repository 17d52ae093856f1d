use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const DEFAULT_LABEL: &str = "species";
pub const DEFAULT_TRAIN_PROPORTION: f64 = 0.7;
pub const DEFAULT_SEED: u64 = 2056;
pub const DEFAULT_MODEL: &str = "random_forest";

/// Run configuration, loadable from a JSON file. Every field is optional in
/// the file and falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub label_column: String,
    /// `label ~ .` when unset.
    pub formula: Option<String>,
    pub train_proportion: f64,
    pub split_seed: u64,
    pub model_seed: u64,
    pub model: String,
    /// Values may be JSON strings or numbers.
    pub model_params: BTreeMap<String, serde_json::Value>,
    /// Drop rows with missing cells instead of failing validation.
    pub drop_incomplete_rows: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label_column: DEFAULT_LABEL.to_string(),
            formula: None,
            train_proportion: DEFAULT_TRAIN_PROPORTION,
            split_seed: DEFAULT_SEED,
            model_seed: DEFAULT_SEED,
            model: DEFAULT_MODEL.to_string(),
            model_params: BTreeMap::new(),
            drop_incomplete_rows: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Model parameters as (key, value) strings.
    pub fn model_params(&self) -> Result<Vec<(String, String)>, PipelineError> {
        self.model_params
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(PipelineError::invalid_argument(format!(
                            "model parameter '{key}' has unsupported value {other}"
                        )));
                    }
                };
                Ok((key.clone(), value))
            })
            .collect()
    }
}
