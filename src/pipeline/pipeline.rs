use serde::Serialize;
use tracing::{info, info_span, warn};

use super::builder::ClassificationPipelineBuilder;
use crate::data_loading::Table;
use crate::error::PipelineError;
use crate::evaluation::{ConfusionMatrix, Evaluation, MetricsTable, ModelEvaluator, PredictionTable};
use crate::processing::Formula;
use crate::splitting::{Split, Splitter};
use crate::training::{FittedModel, Trainer};

/// Facade over the whole run: validate, split, fit, evaluate.
#[derive(Debug, Clone)]
pub struct ClassificationPipeline {
    pub(crate) formula: Formula,
    pub(crate) model_type: String,
    pub(crate) model_params: Vec<(String, String)>,
    pub(crate) splitter: Splitter,
    pub(crate) model_seed: u64,
    pub(crate) drop_incomplete_rows: bool,
}

impl ClassificationPipeline {
    pub fn builder() -> ClassificationPipelineBuilder {
        ClassificationPipelineBuilder::new()
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Checks for missing values, or drops incomplete rows when configured to.
    pub fn prepare(&self, table: &Table) -> Result<Table, PipelineError> {
        if !self.drop_incomplete_rows {
            table.validate_complete()?;
            return Ok(table.clone());
        }

        let incomplete = table.incomplete_rows();
        if incomplete > 0 {
            warn!(
                dropped = incomplete,
                remaining = table.n_rows() - incomplete,
                "Dropping rows with missing values"
            );
        }
        Ok(table.drop_incomplete())
    }

    pub fn split(&self, table: &Table) -> Result<Split, PipelineError> {
        self.splitter.split(table)
    }

    pub fn train(&self, training: &Table) -> Result<FittedModel, PipelineError> {
        Trainer::new(self.model_type.clone())
            .with_params(&self.model_params)
            .fit(training, &self.formula, self.model_seed)
    }

    pub fn evaluate(&self, model: &FittedModel, testing: &Table) -> Result<Evaluation, PipelineError> {
        ModelEvaluator::evaluate(model, testing)
    }

    /// Complete workflow on an already loaded table.
    pub fn run(&self, table: &Table) -> Result<PipelineReport, PipelineError> {
        let prepared = {
            let _span = info_span!("validate").entered();
            self.prepare(table)?
        };
        let split = {
            let _span = info_span!("split").entered();
            self.split(&prepared)?
        };
        let model = {
            let _span = info_span!("train").entered();
            self.train(split.training())?
        };
        let evaluation = {
            let _span = info_span!("evaluate").entered();
            self.evaluate(&model, split.testing())?
        };

        let report = PipelineReport {
            info: self.info(),
            model_name: model.model_name().to_string(),
            feature_names: model.feature_names(),
            label_levels: model.label_levels().to_vec(),
            total_rows: prepared.n_rows(),
            training_rows: split.training().n_rows(),
            testing_rows: split.testing().n_rows(),
            predictions: evaluation.predictions,
            confusion: evaluation.confusion,
            metrics: evaluation.metrics,
        };
        info!(
            model = %report.model_name,
            testing_rows = report.testing_rows,
            "Pipeline finished"
        );
        Ok(report)
    }

    pub fn info(&self) -> PipelineInfo {
        PipelineInfo {
            model_type: self.model_type.clone(),
            formula: self.formula.to_string(),
            train_proportion: self.splitter.proportion(),
            split_seed: self.splitter.seed(),
            model_seed: self.model_seed,
            model_params: self.model_params.clone(),
            drop_incomplete_rows: self.drop_incomplete_rows,
        }
    }
}

/// Settings the pipeline was built with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineInfo {
    pub model_type: String,
    pub formula: String,
    pub train_proportion: f64,
    pub split_seed: u64,
    pub model_seed: u64,
    pub model_params: Vec<(String, String)>,
    pub drop_incomplete_rows: bool,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub info: PipelineInfo,
    pub model_name: String,
    pub feature_names: Vec<String>,
    pub label_levels: Vec<String>,
    pub total_rows: usize,
    pub training_rows: usize,
    pub testing_rows: usize,
    pub predictions: PredictionTable,
    pub confusion: ConfusionMatrix,
    pub metrics: MetricsTable,
}
