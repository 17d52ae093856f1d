use serde::Serialize;

use super::confusion::ConfusionMatrix;

pub const ACCURACY: &str = "accuracy";
pub const KAPPA: &str = "kap";
pub const SENSITIVITY: &str = "sens";
pub const SPECIFICITY: &str = "spec";
pub const PPV: &str = "ppv";
pub const NPV: &str = "npv";
pub const F_MEAS: &str = "f_meas";

/// One metric estimate. `class` is set for per-class rows only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    #[serde(rename = ".metric")]
    pub metric: String,
    #[serde(rename = ".estimator")]
    pub estimator: String,
    pub class: Option<String>,
    /// NaN (serialized as null) when undefined.
    #[serde(rename = ".estimate")]
    pub estimate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTable {
    rows: Vec<MetricRow>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overall rows (accuracy, kappa, macro averages) followed by per-class
    /// rows in level order.
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let mut table = Self::new();
        table.add_metric(ACCURACY, "multiclass", None, cm.accuracy());
        table.add_metric(KAPPA, "multiclass", None, cm.kappa());

        type PerClass = fn(&ConfusionMatrix, usize) -> f64;
        let per_class: [(&str, PerClass); 5] = [
            (SENSITIVITY, ConfusionMatrix::sensitivity),
            (SPECIFICITY, ConfusionMatrix::specificity),
            (PPV, ConfusionMatrix::positive_predictive_value),
            (NPV, ConfusionMatrix::negative_predictive_value),
            (F_MEAS, ConfusionMatrix::f_meas),
        ];

        for (name, metric) in per_class {
            let values: Vec<f64> = (0..cm.n_classes()).map(|k| metric(cm, k)).collect();
            table.add_metric(name, "macro", None, macro_average(&values));
        }

        for (k, level) in cm.levels().iter().enumerate() {
            for (name, metric) in per_class {
                table.add_metric(name, "class", Some(level.clone()), metric(cm, k));
            }
        }

        table
    }

    pub fn add_metric(&mut self, metric: &str, estimator: &str, class: Option<String>, estimate: f64) {
        self.rows.push(MetricRow {
            metric: metric.to_string(),
            estimator: estimator.to_string(),
            class,
            estimate,
        });
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Overall (non per-class) estimate for `metric`.
    pub fn get_metric(&self, metric: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.metric == metric && row.class.is_none())
            .map(|row| row.estimate)
    }

    pub fn get_class_metric(&self, metric: &str, class: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.metric == metric && row.class.as_deref() == Some(class))
            .map(|row| row.estimate)
    }

    pub fn overall(&self) -> impl Iterator<Item = &MetricRow> {
        self.rows.iter().filter(|row| row.class.is_none())
    }

    pub fn per_class(&self) -> impl Iterator<Item = &MetricRow> {
        self.rows.iter().filter(|row| row.class.is_some())
    }
}

/// Mean over the defined (non-NaN) values; NaN if none is defined.
pub fn macro_average(values: &[f64]) -> f64 {
    let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if defined.is_empty() {
        f64::NAN
    } else {
        defined.iter().sum::<f64>() / defined.len() as f64
    }
}
