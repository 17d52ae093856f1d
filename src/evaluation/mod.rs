pub mod confusion;
pub mod evaluator;
pub mod metrics;

pub use confusion::ConfusionMatrix;
pub use evaluator::{Evaluation, ModelEvaluator, PredictionRow, PredictionTable};
pub use metrics::{MetricRow, MetricsTable};
