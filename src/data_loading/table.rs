use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::PipelineError;

/// Cell spellings treated as missing when parsing text input.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "na", "N/A", "null", "NULL", "NaN", "nan"];

pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Column storage. Categorical columns keep their level domain sorted, and
/// codes index into it.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical {
        levels: Vec<String>,
        codes: Vec<Option<u32>>,
    },
}

/// Borrowed view of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Category(&'a str),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Builds a categorical column; the level domain is the sorted set of
    /// distinct non-missing values.
    pub fn categorical<S: AsRef<str>>(name: impl Into<String>, values: &[Option<S>]) -> Self {
        let levels: Vec<String> = values
            .iter()
            .flatten()
            .map(|v| v.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let codes = values
            .iter()
            .map(|v| {
                v.as_ref().and_then(|s| {
                    levels
                        .binary_search_by(|level| level.as_str().cmp(s.as_ref()))
                        .ok()
                        .map(|idx| idx as u32)
                })
            })
            .collect();

        Self {
            name: name.into(),
            data: ColumnData::Categorical { levels, codes },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical { .. } => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn levels(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::Categorical { levels, .. } => Some(levels),
            ColumnData::Numeric(_) => None,
        }
    }

    pub fn value(&self, row: usize) -> Value<'_> {
        match &self.data {
            ColumnData::Numeric(values) => match values.get(row).copied().flatten() {
                Some(v) => Value::Number(v),
                None => Value::Missing,
            },
            ColumnData::Categorical { levels, codes } => {
                match codes.get(row).copied().flatten() {
                    Some(code) => Value::Category(&levels[code as usize]),
                    None => Value::Missing,
                }
            }
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        matches!(self.value(row), Value::Missing)
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical { codes, .. } => codes.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Non-missing numeric values, in row order. Empty for categorical columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().flatten().copied().collect(),
            ColumnData::Categorical { .. } => Vec::new(),
        }
    }

    // Subsets share the parent's level domain.
    fn take(&self, positions: &[usize]) -> Column {
        let data = match &self.data {
            ColumnData::Numeric(values) => {
                ColumnData::Numeric(positions.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Categorical { levels, codes } => ColumnData::Categorical {
                levels: levels.clone(),
                codes: positions.iter().map(|&i| codes[i]).collect(),
            },
        };
        Column {
            name: self.name.clone(),
            data,
        }
    }
}

/// In-memory observation table. Rows are ordered and each carries the
/// identity it had in the loaded input.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_ids: Vec<usize>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, PipelineError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        Self::with_row_ids(columns, (0..n_rows).collect())
    }

    pub fn with_row_ids(columns: Vec<Column>, row_ids: Vec<usize>) -> Result<Self, PipelineError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(PipelineError::invalid_argument(format!(
                    "duplicate column '{}'",
                    column.name()
                )));
            }
            if column.len() != row_ids.len() {
                return Err(PipelineError::invalid_argument(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_ids.len()
                )));
            }
        }
        Ok(Self { columns, row_ids })
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn require_column(&self, name: &str) -> Result<&Column, PipelineError> {
        self.column(name).ok_or_else(|| {
            PipelineError::invalid_argument(format!(
                "column '{}' not found. Available columns: {:?}",
                name,
                self.column_names()
            ))
        })
    }

    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    /// New table holding the rows at the given positions, in that order.
    pub fn take(&self, positions: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(positions)).collect(),
            row_ids: positions.iter().map(|&i| self.row_ids[i]).collect(),
        }
    }

    /// (column, missing count) for every column with at least one missing cell.
    pub fn missing_summary(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.missing_count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    pub fn validate_complete(&self) -> Result<(), PipelineError> {
        let missing = self.missing_summary();
        if missing.is_empty() {
            return Ok(());
        }
        let detail: Vec<String> = missing
            .iter()
            .map(|(name, n)| format!("{name}: {n}"))
            .collect();
        Err(PipelineError::data_quality(format!(
            "missing values present ({})",
            detail.join(", ")
        )))
    }

    pub fn incomplete_rows(&self) -> usize {
        (0..self.n_rows())
            .filter(|&i| self.columns.iter().any(|c| c.is_missing(i)))
            .count()
    }

    /// Copy of the table without rows that have any missing cell.
    pub fn drop_incomplete(&self) -> Table {
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&i| self.columns.iter().all(|c| !c.is_missing(i)))
            .collect();
        self.take(&keep)
    }
}
