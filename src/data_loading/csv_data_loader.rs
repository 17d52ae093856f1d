use std::collections::HashSet;

use csv::ReaderBuilder;

use super::data_loader::{DataLoader, build_table};
use super::table::Table;
use crate::error::PipelineError;

/// CSV loader; the first line must hold the column names.
pub struct CsvDataLoader {
    delimiter: u8,
}

impl CsvDataLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn parse_csv(&self, csv_text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), PipelineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(PipelineError::invalid_argument("CSV has no columns"));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(PipelineError::invalid_argument(format!(
                "CSV header repeats column '{dup}'"
            )));
        }

        let mut records = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(PipelineError::invalid_argument(format!(
                    "row {} has {} columns, expected {}",
                    idx + 1,
                    record.len(),
                    headers.len()
                )));
            }
            records.push(record.iter().map(str::to_string).collect());
        }

        if records.is_empty() {
            return Err(PipelineError::invalid_argument("CSV contains no data rows"));
        }

        Ok((headers, records))
    }
}

impl DataLoader for CsvDataLoader {
    fn get_name(&self) -> &str {
        "CSV Data Loader"
    }

    fn load_from_string(&self, data: &str) -> Result<Table, PipelineError> {
        self.validate_format(data)?;
        let (headers, records) = self.parse_csv(data)?;
        build_table(&headers, &records)
    }

    fn get_available_columns(&self, data: &str) -> Result<Vec<String>, PipelineError> {
        let (headers, _) = self.parse_csv(data)?;
        Ok(headers)
    }

    fn validate_format(&self, data: &str) -> Result<(), PipelineError> {
        if data.trim().is_empty() {
            return Err(PipelineError::invalid_argument("CSV input is empty"));
        }
        if data.trim().lines().count() < 2 {
            return Err(PipelineError::invalid_argument(
                "CSV must contain a header and at least one data row",
            ));
        }
        Ok(())
    }
}

impl Default for CsvDataLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loading::{ColumnKind, Value};

    const PENGUINS: &str = "\
species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
Adelie,Torgersen,39.1,18.7,181,3750,male,2007
Adelie,Torgersen,NA,NA,NA,NA,NA,2007
Gentoo,Biscoe,46.1,13.2,211,4500,female,2007
Chinstrap,Dream,46.5,17.9,192,3500,female,2007
";

    #[test]
    fn loads_penguin_rows() {
        let table = CsvDataLoader::new().load_from_string(PENGUINS).unwrap();
        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.n_cols(), 8);
        let species = table.column("species").unwrap();
        assert_eq!(species.levels().unwrap(), ["Adelie", "Chinstrap", "Gentoo"]);
        assert_eq!(table.column("body_mass_g").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(table.column("island").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(table.column("bill_length_mm").unwrap().value(1), Value::Missing);
    }

    #[test]
    fn lists_columns() {
        let columns = CsvDataLoader::new()
            .get_available_columns(PENGUINS)
            .unwrap();
        assert_eq!(columns[0], "species");
        assert_eq!(columns.len(), 8);
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = CsvDataLoader::new()
            .load_from_string("a,b\n1,2\n3\n")
            .unwrap_err();
        assert!(err.to_string().contains("row 2 has 1 columns, expected 2"));
    }

    #[test]
    fn header_only_is_rejected() {
        let err = CsvDataLoader::new().load_from_string("a,b\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = CsvDataLoader::new()
            .load_from_string("a,a\n1,2\n")
            .unwrap_err();
        assert!(err.to_string().contains("repeats column 'a'"));
    }

    #[test]
    fn semicolon_delimiter() {
        let table = CsvDataLoader::with_delimiter(b';')
            .load_from_string("species;mass\nAdelie;3,5\nGentoo;4,1\n")
            .unwrap();
        assert_eq!(table.column("mass").unwrap().value(0), Value::Number(3.5));
    }
}
