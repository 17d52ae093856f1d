use tracing::info;

use crate::data_loading::{ColumnKind, Table};
use crate::error::PipelineError;
use crate::models::{Model, ModelFactory};
use crate::processing::label_encoder::distinct_count;
use crate::processing::{FeatureEncoder, Formula, LabelEncoder};

/// A classifier fitted on the training subset, together with the encodings
/// needed to feed it new rows.
pub struct FittedModel {
    model: Box<dyn Model>,
    model_type: String,
    formula: Formula,
    encoder: FeatureEncoder,
    labels: LabelEncoder,
}

impl FittedModel {
    pub fn new(
        model: Box<dyn Model>,
        model_type: impl Into<String>,
        formula: Formula,
        encoder: FeatureEncoder,
        labels: LabelEncoder,
    ) -> Self {
        Self {
            model,
            model_type: model_type.into(),
            formula,
            encoder,
            labels,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.get_name()
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.labels
    }

    pub fn label_levels(&self) -> &[String] {
        self.labels.levels()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.encoder.feature_names()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    /// Predicted label codes, one per row, read from feature columns only.
    pub fn predict_codes(&self, table: &Table) -> Result<Vec<u32>, PipelineError> {
        if !self.model.is_fitted() {
            return Err(PipelineError::evaluation(format!(
                "{} has not been fitted",
                self.model.get_name()
            )));
        }
        let x = self.encoder.transform(table)?;
        let codes = self.model.predict(&x)?;
        if codes.len() != table.n_rows() {
            return Err(PipelineError::evaluation(format!(
                "model returned {} predictions for {} rows",
                codes.len(),
                table.n_rows()
            )));
        }
        Ok(codes)
    }

    /// Predicted labels, one per row, in row order.
    pub fn predict(&self, table: &Table) -> Result<Vec<String>, PipelineError> {
        self.predict_codes(table)?
            .into_iter()
            .map(|code| {
                self.labels
                    .decode(code)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        PipelineError::evaluation(format!("model predicted unknown class code {code}"))
                    })
            })
            .collect()
    }
}

/// Fits a named classifier against a training table.
#[derive(Debug, Clone)]
pub struct Trainer {
    model_type: String,
    params: Vec<(String, String)>,
}

impl Trainer {
    pub fn new(model_type: impl Into<String>) -> Self {
        Self {
            model_type: model_type.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_params(mut self, params: &[(String, String)]) -> Self {
        self.params.extend_from_slice(params);
        self
    }

    pub fn fit(&self, training: &Table, formula: &Formula, seed: u64) -> Result<FittedModel, PipelineError> {
        if training.is_empty() {
            return Err(PipelineError::training("training subset is empty"));
        }

        let label = formula.label();
        match training.column(label).map(|c| c.kind()) {
            None => {
                return Err(PipelineError::training(format!(
                    "label column '{label}' is absent"
                )));
            }
            Some(ColumnKind::Numeric) => {
                return Err(PipelineError::training(format!(
                    "label column '{label}' is numeric; a categorical label is required"
                )));
            }
            Some(ColumnKind::Categorical) => {}
        }

        let feature_names = formula.resolve_features(training)?;
        let labels = LabelEncoder::fit(training, label)?;
        let y = labels.encode(training)?;

        let distinct = distinct_count(&y);
        if distinct < 2 {
            return Err(PipelineError::training(format!(
                "label '{label}' has {distinct} distinct value(s) in the training subset; at least 2 are required"
            )));
        }

        let encoder = FeatureEncoder::fit(training, &feature_names)?;
        let x = encoder.transform(training)?;

        let mut model = ModelFactory::create_with_params(&self.model_type, &self.params)?;
        model.train(&x, &y, seed)?;

        info!(
            model = model.get_name(),
            formula = %formula,
            rows = training.n_rows(),
            features = encoder.width(),
            classes = distinct,
            seed,
            "Fitted classifier"
        );

        Ok(FittedModel::new(
            model,
            self.model_type.clone(),
            formula.clone(),
            encoder,
            labels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loading::Column;

    fn training_table() -> Table {
        let species = ["Adelie", "Adelie", "Adelie", "Gentoo", "Gentoo", "Gentoo"];
        let island = ["Torgersen", "Dream", "Torgersen", "Biscoe", "Biscoe", "Biscoe"];
        let mass = [3700.0, 3650.0, 3800.0, 5200.0, 5400.0, 5100.0];
        Table::new(vec![
            Column::categorical("species", &species.map(Some)),
            Column::categorical("island", &island.map(Some)),
            Column::numeric("body_mass_g", mass.map(Some).to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn fits_and_predicts_labels() {
        let table = training_table();
        let model = Trainer::new("decision_tree")
            .fit(&table, &Formula::all_features("species"), 2056)
            .unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.label_levels(), ["Adelie", "Gentoo"]);
        assert_eq!(
            model.predict(&table).unwrap(),
            ["Adelie", "Adelie", "Adelie", "Gentoo", "Gentoo", "Gentoo"]
        );
    }

    #[test]
    fn empty_training_subset_fails() {
        let table = training_table().take(&[]);
        let err = Trainer::new("random_forest")
            .fit(&table, &Formula::all_features("species"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::TrainingFailure { .. }));
    }

    #[test]
    fn absent_label_fails() {
        let err = Trainer::new("random_forest")
            .fit(&training_table(), &Formula::all_features("sex"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::TrainingFailure { .. }));
        assert!(err.to_string().contains("'sex' is absent"));
    }

    #[test]
    fn single_class_fails() {
        let table = training_table().take(&[0, 1, 2]);
        let err = Trainer::new("random_forest")
            .fit(&table, &Formula::all_features("species"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::TrainingFailure { .. }));
        assert!(err.to_string().contains("1 distinct value"));
    }

    #[test]
    fn numeric_label_fails() {
        let err = Trainer::new("random_forest")
            .fit(&training_table(), &Formula::all_features("body_mass_g"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::TrainingFailure { .. }));
    }

    #[test]
    fn bad_param_fails_before_fitting() {
        let err = Trainer::new("random_forest")
            .with_param("depth", "3")
            .fit(&training_table(), &Formula::all_features("species"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
    }

    #[test]
    fn prediction_ignores_label_column() {
        let table = training_table();
        let model = Trainer::new("decision_tree")
            .fit(&table, &Formula::all_features("species"), 0)
            .unwrap();
        let features_only = Table::new(vec![
            table.column("island").unwrap().clone(),
            table.column("body_mass_g").unwrap().clone(),
        ])
        .unwrap();
        assert_eq!(model.predict(&features_only).unwrap().len(), 6);
    }
}
