use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

use crate::data_loading::{ColumnData, Table};
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq)]
enum EncodedFeature {
    Numeric { name: String },
    OneHot { name: String, levels: Vec<String> },
}

impl EncodedFeature {
    fn width(&self) -> usize {
        match self {
            EncodedFeature::Numeric { .. } => 1,
            EncodedFeature::OneHot { levels, .. } => levels.len(),
        }
    }
}

/// Turns formula feature columns into a numeric design matrix.
///
/// Numeric columns pass through; categorical columns are one-hot encoded over
/// the level domain seen at fit time. The label column is never read.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    features: Vec<EncodedFeature>,
}

impl FeatureEncoder {
    pub fn fit(table: &Table, feature_names: &[String]) -> Result<Self, PipelineError> {
        let mut features = Vec::with_capacity(feature_names.len());
        for name in feature_names {
            let column = table.require_column(name)?;
            let feature = match column.data() {
                ColumnData::Numeric(_) => EncodedFeature::Numeric { name: name.clone() },
                ColumnData::Categorical { levels, .. } => EncodedFeature::OneHot {
                    name: name.clone(),
                    levels: levels.clone(),
                },
            };
            features.push(feature);
        }

        let encoder = Self { features };
        debug!(
            sources = feature_names.len(),
            width = encoder.width(),
            "Fitted feature encoder"
        );
        Ok(encoder)
    }

    /// Number of encoded columns.
    pub fn width(&self) -> usize {
        self.features.iter().map(EncodedFeature::width).sum()
    }

    pub fn source_columns(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(|f| match f {
                EncodedFeature::Numeric { name } | EncodedFeature::OneHot { name, .. } => {
                    name.as_str()
                }
            })
            .collect()
    }

    /// Encoded column names, e.g. `island_Biscoe` for a one-hot level.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for feature in &self.features {
            match feature {
                EncodedFeature::Numeric { name } => names.push(name.clone()),
                EncodedFeature::OneHot { name, levels } => {
                    names.extend(levels.iter().map(|level| format!("{name}_{level}")));
                }
            }
        }
        names
    }

    /// Encodes every row of `table`. Missing cells are a data quality error;
    /// categorical levels unknown at fit time encode as all zeros.
    pub fn transform(&self, table: &Table) -> Result<DenseMatrix<f64>, PipelineError> {
        if table.is_empty() {
            return Err(PipelineError::invalid_argument(
                "cannot encode an empty table",
            ));
        }

        let mut rows = vec![Vec::with_capacity(self.width()); table.n_rows()];
        for feature in &self.features {
            match feature {
                EncodedFeature::Numeric { name } => {
                    let column = table.require_column(name)?;
                    let ColumnData::Numeric(values) = column.data() else {
                        return Err(PipelineError::invalid_argument(format!(
                            "feature '{name}' was numeric at fit time but is categorical"
                        )));
                    };
                    for (row_idx, value) in values.iter().enumerate() {
                        let value = value.ok_or_else(|| missing_cell(name, table, row_idx))?;
                        rows[row_idx].push(value);
                    }
                }
                EncodedFeature::OneHot { name, levels } => {
                    let column = table.require_column(name)?;
                    let ColumnData::Categorical {
                        levels: column_levels,
                        codes,
                    } = column.data()
                    else {
                        return Err(PipelineError::invalid_argument(format!(
                            "feature '{name}' was categorical at fit time but is numeric"
                        )));
                    };
                    for (row_idx, code) in codes.iter().enumerate() {
                        let code = code.ok_or_else(|| missing_cell(name, table, row_idx))?;
                        let level = &column_levels[code as usize];
                        let mut one_hot = vec![0.0; levels.len()];
                        if let Some(pos) = levels.iter().position(|l| l == level) {
                            one_hot[pos] = 1.0;
                        }
                        rows[row_idx].extend(one_hot);
                    }
                }
            }
        }

        DenseMatrix::from_2d_vec(&rows).map_err(|e| {
            PipelineError::invalid_argument(format!("could not build feature matrix: {e}"))
        })
    }
}

fn missing_cell(column: &str, table: &Table, position: usize) -> PipelineError {
    PipelineError::data_quality(format!(
        "missing value in feature '{column}' (row {})",
        table.row_ids()[position] + 1
    ))
}
