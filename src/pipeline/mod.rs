pub mod pipeline;
pub mod builder;

pub use pipeline::{ClassificationPipeline, PipelineInfo, PipelineReport};
pub use builder::ClassificationPipelineBuilder;
