use std::path::Path;

use super::csv_data_loader::CsvDataLoader;
use super::data_loader::DataLoader;
use super::json_data_loader::JsonDataLoader;
use crate::error::PipelineError;

/// Factory for data loaders by format name.
pub struct DataLoaderFactory;

impl DataLoaderFactory {
    pub fn create(loader_type: &str) -> Result<Box<dyn DataLoader>, PipelineError> {
        match loader_type.to_lowercase().as_str() {
            "csv" => Ok(Box::new(CsvDataLoader::new())),
            "tsv" => Ok(Box::new(CsvDataLoader::with_delimiter(b'\t'))),
            "json" => Ok(Box::new(JsonDataLoader::new())),
            _ => Err(PipelineError::invalid_argument(format!(
                "unknown loader type: {loader_type}"
            ))),
        }
    }

    /// Picks a loader from the file extension.
    pub fn for_path(path: &Path) -> Result<Box<dyn DataLoader>, PipelineError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                PipelineError::invalid_argument(format!(
                    "cannot infer the format of {} without an extension",
                    path.display()
                ))
            })?;
        Self::create(extension)
    }

    /// Detects the format from the content.
    pub fn create_auto(data: &str) -> Result<Box<dyn DataLoader>, PipelineError> {
        let trimmed = data.trim();

        if trimmed.starts_with('[') && trimmed.contains('{') {
            Ok(Box::new(JsonDataLoader::new()))
        } else if trimmed.contains(',') || trimmed.contains('\n') {
            Ok(Box::new(CsvDataLoader::new()))
        } else {
            Err(PipelineError::invalid_argument(
                "could not detect the data format",
            ))
        }
    }

    pub fn available_formats() -> Vec<&'static str> {
        vec!["csv", "tsv", "json"]
    }

    pub fn get_format_description(format: &str) -> Option<&'static str> {
        match format.to_lowercase().as_str() {
            "csv" => Some("CSV (comma-separated values) with a header row"),
            "tsv" => Some("Tab-separated values with a header row"),
            "json" => Some("JSON array of flat objects"),
            _ => None,
        }
    }
}
