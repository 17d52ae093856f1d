use serde::Serialize;
use tracing::info;

use super::confusion::ConfusionMatrix;
use super::metrics::{ACCURACY, MetricsTable};
use crate::data_loading::Table;
use crate::error::PipelineError;
use crate::training::FittedModel;

/// A test row's true label next to its prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRow {
    pub row_id: usize,
    pub truth: String,
    #[serde(rename = ".pred_class")]
    pub pred_class: String,
}

/// Predictions aligned 1:1 with the testing subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictionTable {
    rows: Vec<PredictionRow>,
}

impl PredictionTable {
    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn correct(&self) -> usize {
        self.rows.iter().filter(|r| r.truth == r.pred_class).count()
    }
}

impl From<Vec<PredictionRow>> for PredictionTable {
    fn from(rows: Vec<PredictionRow>) -> Self {
        Self { rows }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub predictions: PredictionTable,
    pub confusion: ConfusionMatrix,
    pub metrics: MetricsTable,
}

pub struct ModelEvaluator;

impl ModelEvaluator {
    /// Predicts every testing row, joins the predictions with the true labels
    /// by position and scores them.
    pub fn evaluate(model: &FittedModel, testing: &Table) -> Result<Evaluation, PipelineError> {
        if testing.is_empty() {
            return Err(PipelineError::evaluation("testing subset is empty"));
        }
        if !model.is_fitted() {
            return Err(PipelineError::evaluation(format!(
                "{} has not been fitted",
                model.model_name()
            )));
        }

        let labels = model.label_encoder();
        let truth = labels.encode(testing)?;
        let predicted = model.predict_codes(testing)?;

        let confusion = ConfusionMatrix::from_codes(labels.levels().to_vec(), &truth, &predicted)?;
        let metrics = MetricsTable::from_confusion(&confusion);

        let mut rows = Vec::with_capacity(truth.len());
        for ((&row_id, &t), &p) in testing.row_ids().iter().zip(&truth).zip(&predicted) {
            rows.push(PredictionRow {
                row_id,
                truth: decode(model, t)?,
                pred_class: decode(model, p)?,
            });
        }

        info!(
            rows = testing.n_rows(),
            correct = confusion.correct(),
            accuracy = metrics.get_metric(ACCURACY).unwrap_or(f64::NAN),
            "Evaluated classifier"
        );

        Ok(Evaluation {
            predictions: PredictionTable { rows },
            confusion,
            metrics,
        })
    }
}

fn decode(model: &FittedModel, code: u32) -> Result<String, PipelineError> {
    model
        .label_encoder()
        .decode(code)
        .map(str::to_string)
        .ok_or_else(|| PipelineError::evaluation(format!("unknown class code {code}")))
}
