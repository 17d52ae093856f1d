use std::collections::BTreeSet;

use crate::data_loading::{ColumnData, Table};
use crate::error::PipelineError;

/// Maps label levels to the integer codes the classifiers train on.
///
/// Codes are positions in the label column's sorted level domain, so they
/// also give the canonical row/column order of the confusion matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    column: String,
    levels: Vec<String>,
}

impl LabelEncoder {
    pub fn new(column: impl Into<String>, levels: Vec<String>) -> Self {
        Self {
            column: column.into(),
            levels,
        }
    }

    pub fn fit(table: &Table, label: &str) -> Result<Self, PipelineError> {
        let column = table.require_column(label)?;
        let levels = column.levels().ok_or_else(|| {
            PipelineError::invalid_argument(format!(
                "label column '{label}' must be categorical"
            ))
        })?;
        Ok(Self::new(label, levels.to_vec()))
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.levels.get(code as usize).map(String::as_str)
    }

    /// Label codes for every row of `table`.
    pub fn encode(&self, table: &Table) -> Result<Vec<u32>, PipelineError> {
        let column = table.require_column(&self.column)?;
        let ColumnData::Categorical { levels, codes } = column.data() else {
            return Err(PipelineError::invalid_argument(format!(
                "label column '{}' must be categorical",
                self.column
            )));
        };

        codes
            .iter()
            .enumerate()
            .map(|(position, code)| {
                let code = code.ok_or_else(|| {
                    PipelineError::data_quality(format!(
                        "missing label in '{}' (row {})",
                        self.column,
                        table.row_ids()[position] + 1
                    ))
                })?;
                let level = &levels[code as usize];
                self.levels
                    .iter()
                    .position(|l| l == level)
                    .map(|idx| idx as u32)
                    .ok_or_else(|| {
                        PipelineError::invalid_argument(format!(
                            "label level '{level}' is not in the known domain {:?}",
                            self.levels
                        ))
                    })
            })
            .collect()
    }
}

/// Number of distinct codes actually present.
pub fn distinct_count(codes: &[u32]) -> usize {
    codes.iter().collect::<BTreeSet<_>>().len()
}
