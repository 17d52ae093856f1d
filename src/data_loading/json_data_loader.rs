use serde_json::Value;

use super::data_loader::{DataLoader, build_table};
use super::table::Table;
use crate::error::PipelineError;

/// JSON loader for an array of flat objects.
/// Example: `[{"species": "Adelie", "bill_length_mm": 39.1}, ...]`
pub struct JsonDataLoader;

impl JsonDataLoader {
    pub fn new() -> Self {
        Self
    }

    fn parse_json_array(&self, json_text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), PipelineError> {
        let parsed: Value = serde_json::from_str(json_text)?;

        let array = parsed
            .as_array()
            .ok_or_else(|| PipelineError::invalid_argument("JSON input must be an array of objects"))?;

        let first = array
            .first()
            .ok_or_else(|| PipelineError::invalid_argument("JSON array is empty"))?
            .as_object()
            .ok_or_else(|| PipelineError::invalid_argument("element 0 is not an object"))?;

        // Column order follows the first object's keys.
        let headers: Vec<String> = first.keys().cloned().collect();

        let mut records = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| {
                PipelineError::invalid_argument(format!("element {idx} is not an object"))
            })?;

            let mut record = Vec::with_capacity(headers.len());
            for header in &headers {
                let value = obj.get(header).ok_or_else(|| {
                    PipelineError::invalid_argument(format!(
                        "element {idx} is missing key '{header}'"
                    ))
                })?;

                let cell = match value {
                    Value::Null => String::new(),
                    Value::Number(n) => n.to_string(),
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(PipelineError::invalid_argument(format!(
                            "unsupported value for key '{header}' in element {idx}"
                        )));
                    }
                };
                record.push(cell);
            }
            records.push(record);
        }

        Ok((headers, records))
    }
}

impl DataLoader for JsonDataLoader {
    fn get_name(&self) -> &str {
        "JSON Data Loader"
    }

    fn load_from_string(&self, data: &str) -> Result<Table, PipelineError> {
        self.validate_format(data)?;
        let (headers, records) = self.parse_json_array(data)?;
        build_table(&headers, &records)
    }

    fn get_available_columns(&self, data: &str) -> Result<Vec<String>, PipelineError> {
        let (headers, _) = self.parse_json_array(data)?;
        Ok(headers)
    }

    fn validate_format(&self, data: &str) -> Result<(), PipelineError> {
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::invalid_argument("JSON input is empty"));
        }
        if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
            return Err(PipelineError::invalid_argument(
                "JSON input must be an array (start with '[' and end with ']')",
            ));
        }
        Ok(())
    }
}

impl Default for JsonDataLoader {
    fn default() -> Self {
        Self::new()
    }
}
