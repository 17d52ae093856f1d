//! Descriptive statistics for a first look at the data.
//!
//! Missing cells are counted but excluded from every statistic.

use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

use crate::data_loading::{Column, ColumnData, Table};
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub name: String,
    pub missing: usize,
    /// (level, count) in level order.
    pub counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Mean of every numeric column within one label class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMeans {
    pub class: String,
    pub count: usize,
    pub means: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub rows: usize,
    pub label: String,
    pub columns: Vec<ColumnSummary>,
    pub by_class: Vec<ClassMeans>,
}

impl Exploration {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| match c {
            ColumnSummary::Numeric(s) => s.name == name,
            ColumnSummary::Categorical(s) => s.name == name,
        })
    }

    pub fn class_means(&self, class: &str) -> Option<&ClassMeans> {
        self.by_class.iter().find(|c| c.class == class)
    }
}

pub fn summarize_numeric(name: &str, values: &[f64], missing: usize) -> NumericSummary {
    if values.is_empty() {
        return NumericSummary {
            name: name.to_string(),
            count: 0,
            missing,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            median: f64::NAN,
            max: f64::NAN,
        };
    }

    NumericSummary {
        name: name.to_string(),
        count: values.len(),
        missing,
        mean: values.iter().mean(),
        std_dev: values.iter().std_dev(),
        min: Statistics::min(values.iter()),
        median: Data::new(values.to_vec()).median(),
        max: Statistics::max(values.iter()),
    }
}

fn summarize_column(column: &Column) -> ColumnSummary {
    match column.data() {
        ColumnData::Numeric(_) => ColumnSummary::Numeric(summarize_numeric(
            column.name(),
            &column.numeric_values(),
            column.missing_count(),
        )),
        ColumnData::Categorical { levels, codes } => {
            let mut counts = vec![0usize; levels.len()];
            for code in codes.iter().flatten() {
                counts[*code as usize] += 1;
            }
            ColumnSummary::Categorical(CategoricalSummary {
                name: column.name().to_string(),
                missing: column.missing_count(),
                counts: levels.iter().cloned().zip(counts).collect(),
            })
        }
    }
}

/// Per-column summaries plus per-class means of the numeric columns.
pub fn explore(table: &Table, label: &str) -> Result<Exploration, PipelineError> {
    let label_column = table.require_column(label)?;
    let ColumnData::Categorical { levels, codes } = label_column.data() else {
        return Err(PipelineError::invalid_argument(format!(
            "label column '{label}' must be categorical"
        )));
    };

    let columns = table.columns().iter().map(summarize_column).collect();

    let numeric: Vec<(&str, &Vec<Option<f64>>)> = table
        .columns()
        .iter()
        .filter_map(|c| match c.data() {
            ColumnData::Numeric(values) => Some((c.name(), values)),
            ColumnData::Categorical { .. } => None,
        })
        .collect();

    let mut by_class = Vec::with_capacity(levels.len());
    for (class_code, class) in levels.iter().enumerate() {
        let positions: Vec<usize> = codes
            .iter()
            .enumerate()
            .filter(|(_, code)| **code == Some(class_code as u32))
            .map(|(pos, _)| pos)
            .collect();

        let means = numeric
            .iter()
            .map(|(name, values)| {
                let present: Vec<f64> = positions.iter().filter_map(|&p| values[p]).collect();
                let mean = if present.is_empty() {
                    f64::NAN
                } else {
                    present.iter().mean()
                };
                (name.to_string(), mean)
            })
            .collect();

        by_class.push(ClassMeans {
            class: class.clone(),
            count: positions.len(),
            means,
        });
    }

    Ok(Exploration {
        rows: table.n_rows(),
        label: label.to_string(),
        columns,
        by_class,
    })
}
