pub mod config;
pub mod data_loading;
pub mod error;
pub mod evaluation;
pub mod exploration;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod reporting;
pub mod splitting;
pub mod training;

pub use config::PipelineConfig;
pub use data_loading::{DataLoader, DataLoaderFactory, Table};
pub use error::PipelineError;
pub use evaluation::{ConfusionMatrix, MetricsTable, ModelEvaluator};
pub use models::{Model, ModelFactory};
pub use pipeline::{ClassificationPipeline, ClassificationPipelineBuilder, PipelineReport};
pub use processing::Formula;
pub use reporting::Reporter;
pub use splitting::Splitter;
pub use training::{FittedModel, Trainer};
