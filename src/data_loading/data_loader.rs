use std::path::Path;

use tracing::debug;

use super::table::{Column, Table, is_missing_marker};
use crate::error::PipelineError;

/// Strategy pattern for reading observation tables from different formats.
pub trait DataLoader {
    fn get_name(&self) -> &str;

    /// Parses the full input text into a typed table.
    fn load_from_string(&self, data: &str) -> Result<Table, PipelineError>;

    fn get_available_columns(&self, data: &str) -> Result<Vec<String>, PipelineError>;

    /// Cheap structural checks run before parsing.
    fn validate_format(&self, data: &str) -> Result<(), PipelineError>;

    fn load_from_path(&self, path: &Path) -> Result<Table, PipelineError> {
        let data = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.load_from_string(&data)?;
        debug!(
            loader = self.get_name(),
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_cols(),
            "Loaded table"
        );
        Ok(table)
    }
}

/// Parses a numeric cell, accepting a decimal comma as a fallback.
pub(crate) fn parse_numeric_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replace(',', ".").parse::<f64>())
        .ok()
}

/// Builds a typed table from header names and raw text records.
///
/// A column is numeric when every non-missing cell parses as a number,
/// otherwise it is categorical.
pub(crate) fn build_table(
    headers: &[String],
    records: &[Vec<String>],
) -> Result<Table, PipelineError> {
    if headers.is_empty() {
        return Err(PipelineError::invalid_argument("input has no columns"));
    }
    if records.is_empty() {
        return Err(PipelineError::invalid_argument("input has no data rows"));
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let cells: Vec<Option<&str>> = records
            .iter()
            .map(|record| {
                let cell = record[col_idx].as_str();
                if is_missing_marker(cell) {
                    None
                } else {
                    Some(cell.trim())
                }
            })
            .collect();

        let parsed: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| cell.and_then(parse_numeric_value))
            .collect();
        let numeric = cells
            .iter()
            .zip(&parsed)
            .all(|(cell, value)| cell.is_none() || value.is_some());
        let any_present = cells.iter().any(Option::is_some);

        if numeric && any_present {
            if let Some(row) = parsed.iter().position(|v| v.is_some_and(|v| !v.is_finite())) {
                return Err(PipelineError::data_quality(format!(
                    "non-finite value '{}' in column '{header}' (row {})",
                    cells[row].unwrap_or_default(),
                    row + 1
                )));
            }
            columns.push(Column::numeric(header.clone(), parsed));
        } else {
            columns.push(Column::categorical(header.clone(), &cells));
        }
    }

    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loading::ColumnKind;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decimal_comma_is_accepted() {
        assert_eq!(parse_numeric_value("18,7"), Some(18.7));
        assert_eq!(parse_numeric_value(" 42 "), Some(42.0));
        assert_eq!(parse_numeric_value("Torgersen"), None);
    }

    #[test]
    fn column_kinds_are_inferred() {
        let headers = strings(&["species", "flipper_length_mm", "sex"]);
        let records = vec![
            strings(&["Adelie", "181", "male"]),
            strings(&["Gentoo", "NA", "NA"]),
        ];
        let table = build_table(&headers, &records).unwrap();
        assert_eq!(table.columns()[0].kind(), ColumnKind::Categorical);
        assert_eq!(table.columns()[1].kind(), ColumnKind::Numeric);
        assert_eq!(table.columns()[2].kind(), ColumnKind::Categorical);
        assert_eq!(table.columns()[1].missing_count(), 1);
        assert_eq!(table.columns()[2].missing_count(), 1);
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let headers = strings(&["species", "body_mass_g"]);
        for bad in ["inf", "-Infinity", "infinity"] {
            let records = vec![
                strings(&["Adelie", "3750"]),
                strings(&["Gentoo", bad]),
            ];
            let err = build_table(&headers, &records).unwrap_err();
            assert!(matches!(err, PipelineError::DataQuality { .. }), "{bad}");
            assert!(err.to_string().contains("'body_mass_g' (row 2)"));
        }
    }

    #[test]
    fn all_missing_column_is_categorical() {
        let headers = strings(&["x"]);
        let records = vec![strings(&["NA"]), strings(&[""])];
        let table = build_table(&headers, &records).unwrap();
        assert_eq!(table.columns()[0].kind(), ColumnKind::Categorical);
        assert_eq!(table.columns()[0].missing_count(), 2);
    }

    #[test]
    fn empty_records_are_rejected() {
        let err = build_table(&strings(&["a"]), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
    }
}
