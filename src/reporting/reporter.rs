use std::fmt::Write as _;

use crate::evaluation::{ConfusionMatrix, MetricsTable, PredictionTable};
use crate::exploration::{ColumnSummary, Exploration};
use crate::error::PipelineError;
use crate::pipeline::PipelineReport;

/// Plain text and JSON rendering of run results.
pub struct Reporter;

impl Reporter {
    /// Confusion matrix with predictions as rows and truth as columns.
    pub fn format_confusion_matrix(cm: &ConfusionMatrix) -> String {
        let levels = cm.levels();
        let width = levels
            .iter()
            .map(String::len)
            .chain(["Prediction".len()])
            .chain(std::iter::once(cm.total().to_string().len()))
            .max()
            .unwrap_or(10)
            + 2;

        let mut out = String::new();
        let _ = writeln!(out, "{:>width$}  Truth", "");
        let _ = write!(out, "{:<width$}", "Prediction");
        for level in levels {
            let _ = write!(out, "{level:>width$}");
        }
        out.push('\n');
        for (p, level) in levels.iter().enumerate() {
            let _ = write!(out, "{level:<width$}");
            for t in 0..levels.len() {
                let _ = write!(out, "{:>width$}", cm.count(t, p));
            }
            out.push('\n');
        }
        out
    }

    pub fn format_metrics(metrics: &MetricsTable) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<10}{:<12}{:<12}{:>10}", ".metric", ".estimator", "class", ".estimate");
        for row in metrics.rows() {
            let _ = writeln!(
                out,
                "{:<10}{:<12}{:<12}{:>10}",
                row.metric,
                row.estimator,
                row.class.as_deref().unwrap_or("-"),
                format_estimate(row.estimate)
            );
        }
        out
    }

    /// First `limit` prediction rows.
    pub fn format_predictions(predictions: &PredictionTable, limit: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>6}  {:<12}{:<12}", "row", "truth", ".pred_class");
        for row in predictions.rows().iter().take(limit) {
            let _ = writeln!(out, "{:>6}  {:<12}{:<12}", row.row_id + 1, row.truth, row.pred_class);
        }
        if predictions.len() > limit {
            let _ = writeln!(out, "# ... with {} more rows", predictions.len() - limit);
        }
        out
    }

    pub fn format_exploration(exploration: &Exploration) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Rows: {}", exploration.rows);
        for column in &exploration.columns {
            match column {
                ColumnSummary::Numeric(s) => {
                    let _ = writeln!(
                        out,
                        "{:<20} n={:<4} missing={:<3} mean={} sd={} min={} median={} max={}",
                        s.name,
                        s.count,
                        s.missing,
                        format_estimate(s.mean),
                        format_estimate(s.std_dev),
                        format_estimate(s.min),
                        format_estimate(s.median),
                        format_estimate(s.max)
                    );
                }
                ColumnSummary::Categorical(s) => {
                    let levels: Vec<String> = s
                        .counts
                        .iter()
                        .map(|(level, n)| format!("{level}: {n}"))
                        .collect();
                    let _ = writeln!(
                        out,
                        "{:<20} missing={:<3} {}",
                        s.name,
                        s.missing,
                        levels.join(", ")
                    );
                }
            }
        }

        let _ = writeln!(out, "\nMeans by {}:", exploration.label);
        for class in &exploration.by_class {
            let means: Vec<String> = class
                .means
                .iter()
                .map(|(name, mean)| format!("{name}={}", format_estimate(*mean)))
                .collect();
            let _ = writeln!(out, "{:<12} n={:<4} {}", class.class, class.count, means.join(" "));
        }
        out
    }

    pub fn format_report(report: &PipelineReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model: {} ({})", report.model_name, report.info.formula);
        let _ = writeln!(
            out,
            "Split: {} rows -> {} training / {} testing (p = {}, seed = {})",
            report.total_rows,
            report.training_rows,
            report.testing_rows,
            report.info.train_proportion,
            report.info.split_seed
        );
        let _ = writeln!(out, "\nPredictions:");
        out.push_str(&Self::format_predictions(&report.predictions, 10));
        let _ = writeln!(out, "\nConfusion matrix:");
        out.push_str(&Self::format_confusion_matrix(&report.confusion));
        let _ = writeln!(out, "\nMetrics:");
        out.push_str(&Self::format_metrics(&report.metrics));
        out
    }

    pub fn to_json(report: &PipelineReport) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

fn format_estimate(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.3}")
    }
}
