use std::fmt;
use std::str::FromStr;

use crate::data_loading::Table;
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSet {
    /// Every column except the label (`label ~ .`).
    AllOthers,
    Columns(Vec<String>),
}

/// Model formula: which column is predicted and which columns predict it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    label: String,
    features: FeatureSet,
}

impl Formula {
    pub fn all_features(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            features: FeatureSet::AllOthers,
        }
    }

    pub fn with_features(label: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            label: label.into(),
            features: FeatureSet::Columns(features),
        }
    }

    /// Parses `label ~ .` or `label ~ a + b + c`.
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        let (lhs, rhs) = text.split_once('~').ok_or_else(|| {
            PipelineError::invalid_argument(format!("formula '{text}' has no '~'"))
        })?;

        let label = lhs.trim();
        if label.is_empty() {
            return Err(PipelineError::invalid_argument(format!(
                "formula '{text}' has no label"
            )));
        }

        let rhs = rhs.trim();
        if rhs == "." {
            return Ok(Self::all_features(label));
        }

        let terms: Vec<String> = rhs.split('+').map(|t| t.trim().to_string()).collect();
        if terms.iter().any(|t| t.is_empty() || t == "." || t.contains('~')) {
            return Err(PipelineError::invalid_argument(format!(
                "formula '{text}' has a malformed feature list"
            )));
        }
        Ok(Self::with_features(label, terms))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Feature column names for `table`, in table order for `label ~ .`
    /// and in formula order otherwise.
    pub fn resolve_features(&self, table: &Table) -> Result<Vec<String>, PipelineError> {
        let resolved: Vec<String> = match &self.features {
            FeatureSet::AllOthers => table
                .column_names()
                .into_iter()
                .filter(|name| *name != self.label)
                .map(str::to_string)
                .collect(),
            FeatureSet::Columns(columns) => {
                let mut resolved: Vec<String> = Vec::with_capacity(columns.len());
                for name in columns {
                    if name == &self.label {
                        return Err(PipelineError::invalid_argument(format!(
                            "label '{name}' cannot also be a feature"
                        )));
                    }
                    if resolved.contains(name) {
                        return Err(PipelineError::invalid_argument(format!(
                            "feature '{name}' is listed twice"
                        )));
                    }
                    table.require_column(name)?;
                    resolved.push(name.clone());
                }
                resolved
            }
        };

        if resolved.is_empty() {
            return Err(PipelineError::invalid_argument(format!(
                "formula '{self}' selects no feature columns"
            )));
        }
        Ok(resolved)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.features {
            FeatureSet::AllOthers => write!(f, "{} ~ .", self.label),
            FeatureSet::Columns(columns) => write!(f, "{} ~ {}", self.label, columns.join(" + ")),
        }
    }
}

impl FromStr for Formula {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
