use serde::Serialize;

use crate::error::PipelineError;

/// Cross-tabulation of true against predicted labels.
///
/// `counts[truth][predicted]`, both indexed in the label domain's canonical
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    levels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    pub fn new(levels: Vec<String>) -> Self {
        let k = levels.len();
        Self {
            levels,
            counts: vec![vec![0; k]; k],
        }
    }

    pub fn from_codes(levels: Vec<String>, truth: &[u32], predicted: &[u32]) -> Result<Self, PipelineError> {
        if truth.len() != predicted.len() {
            return Err(PipelineError::evaluation(format!(
                "{} true labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }

        let mut matrix = Self::new(levels);
        for (&t, &p) in truth.iter().zip(predicted) {
            matrix.record(t as usize, p as usize)?;
        }
        Ok(matrix)
    }

    pub fn from_labels<S: AsRef<str>>(
        levels: Vec<String>,
        truth: &[S],
        predicted: &[S],
    ) -> Result<Self, PipelineError> {
        let code = |label: &S| -> Result<u32, PipelineError> {
            levels
                .iter()
                .position(|l| l == label.as_ref())
                .map(|idx| idx as u32)
                .ok_or_else(|| {
                    PipelineError::evaluation(format!(
                        "label '{}' is not one of {:?}",
                        label.as_ref(),
                        levels
                    ))
                })
        };
        let truth = truth.iter().map(code).collect::<Result<Vec<_>, _>>()?;
        let predicted = predicted.iter().map(code).collect::<Result<Vec<_>, _>>()?;
        Self::from_codes(levels, &truth, &predicted)
    }

    pub fn record(&mut self, truth: usize, predicted: usize) -> Result<(), PipelineError> {
        let k = self.levels.len();
        if truth >= k || predicted >= k {
            return Err(PipelineError::evaluation(format!(
                "class code out of range ({truth}, {predicted}) for {k} classes"
            )));
        }
        self.counts[truth][predicted] += 1;
        Ok(())
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn n_classes(&self) -> usize {
        self.levels.len()
    }

    pub fn count(&self, truth: usize, predicted: usize) -> u64 {
        self.counts[truth][predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> u64 {
        (0..self.n_classes()).map(|k| self.counts[k][k]).sum()
    }

    pub fn true_positives(&self, class: usize) -> u64 {
        self.counts[class][class]
    }

    pub fn false_positives(&self, class: usize) -> u64 {
        self.predicted_total(class) - self.true_positives(class)
    }

    pub fn false_negatives(&self, class: usize) -> u64 {
        self.truth_total(class) - self.true_positives(class)
    }

    pub fn true_negatives(&self, class: usize) -> u64 {
        self.total() - self.truth_total(class) - self.false_positives(class)
    }

    /// Rows whose true label is `class`.
    pub fn truth_total(&self, class: usize) -> u64 {
        self.counts[class].iter().sum()
    }

    /// Rows predicted as `class`.
    pub fn predicted_total(&self, class: usize) -> u64 {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Recall: TP / (TP + FN).
    pub fn sensitivity(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.truth_total(class))
    }

    /// Precision: TP / (TP + FP).
    pub fn positive_predictive_value(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.predicted_total(class))
    }

    pub fn specificity(&self, class: usize) -> f64 {
        let tn = self.true_negatives(class);
        ratio(tn, tn + self.false_positives(class))
    }

    pub fn negative_predictive_value(&self, class: usize) -> f64 {
        let tn = self.true_negatives(class);
        ratio(tn, tn + self.false_negatives(class))
    }

    /// F1: 2TP / (2TP + FP + FN).
    pub fn f_meas(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        ratio(
            2 * tp,
            2 * tp + self.false_positives(class) + self.false_negatives(class),
        )
    }

    /// Cohen's kappa; NaN when chance agreement is already perfect.
    pub fn kappa(&self) -> f64 {
        let n = self.total() as f64;
        if n == 0.0 {
            return f64::NAN;
        }
        let observed = self.correct() as f64 / n;
        let expected: f64 = (0..self.n_classes())
            .map(|k| self.truth_total(k) as f64 * self.predicted_total(k) as f64)
            .sum::<f64>()
            / (n * n);
        if (1.0 - expected).abs() < f64::EPSILON {
            return f64::NAN;
        }
        (observed - expected) / (1.0 - expected)
    }
}

/// `num / den`, NaN for a zero denominator.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn levels() -> Vec<String> {
        ["Adelie", "Chinstrap", "Gentoo"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn counts_true_predicted_pairs() {
        let truth = [0, 0, 1, 2, 2, 2];
        let pred = [0, 1, 1, 2, 2, 0];
        let cm = ConfusionMatrix::from_codes(levels(), &truth, &pred).unwrap();
        assert_eq!(cm.count(0, 1), 1);
        assert_eq!(cm.count(2, 0), 1);
        assert_eq!(cm.total(), 6);
        assert_eq!(cm.correct(), 4);
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-12);

        // Adelie: TP 1, FN 1, FP 1
        assert_eq!(cm.true_positives(0), 1);
        assert_eq!(cm.false_negatives(0), 1);
        assert_eq!(cm.false_positives(0), 1);
        assert_eq!(cm.true_negatives(0), 3);
        assert!((cm.sensitivity(0) - 0.5).abs() < 1e-12);
        assert!((cm.positive_predictive_value(0) - 0.5).abs() < 1e-12);
        assert!((cm.specificity(0) - 0.75).abs() < 1e-12);
        assert!((cm.f_meas(0) - 0.5).abs() < 1e-12);
        assert!((cm.sensitivity(2) - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.positive_predictive_value(2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_predictions_are_diagonal() {
        let codes = [0, 1, 2, 1, 0];
        let cm = ConfusionMatrix::from_codes(levels(), &codes, &codes).unwrap();
        for t in 0..3 {
            for p in 0..3 {
                if t != p {
                    assert_eq!(cm.count(t, p), 0);
                }
            }
            assert_eq!(cm.sensitivity(t), 1.0);
            assert_eq!(cm.positive_predictive_value(t), 1.0);
        }
        assert_eq!(cm.accuracy(), 1.0);
        assert_eq!(cm.kappa(), 1.0);
    }

    #[test]
    fn single_predicted_class_gives_nan_ppv() {
        let truth = [0, 1, 2, 0];
        let pred = [0, 0, 0, 0];
        let cm = ConfusionMatrix::from_codes(levels(), &truth, &pred).unwrap();
        assert!(cm.positive_predictive_value(1).is_nan());
        assert!(cm.positive_predictive_value(2).is_nan());
        assert!((cm.positive_predictive_value(0) - 0.5).abs() < 1e-12);
        assert_eq!(cm.sensitivity(0), 1.0);
        assert_eq!(cm.sensitivity(1), 0.0);
    }

    #[test]
    fn absent_class_gives_nan_sensitivity() {
        let truth = [0, 0, 2];
        let pred = [0, 0, 2];
        let cm = ConfusionMatrix::from_codes(levels(), &truth, &pred).unwrap();
        assert!(cm.sensitivity(1).is_nan());
        assert!(cm.positive_predictive_value(1).is_nan());
        assert_eq!(cm.specificity(1), 1.0);
    }

    #[test]
    fn kappa_matches_hand_computation() {
        // 2x2: [[20, 5], [10, 15]] -> po 0.7, pe 0.5, kappa 0.4
        let levels = vec!["a".to_string(), "b".to_string()];
        let mut cm = ConfusionMatrix::new(levels);
        for (t, p, n) in [(0, 0, 20), (0, 1, 5), (1, 0, 10), (1, 1, 15)] {
            for _ in 0..n {
                cm.record(t, p).unwrap();
            }
        }
        assert!((cm.kappa() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn from_labels_uses_level_order() {
        let cm = ConfusionMatrix::from_labels(
            levels(),
            &["Gentoo", "Adelie"],
            &["Gentoo", "Chinstrap"],
        )
        .unwrap();
        assert_eq!(cm.count(2, 2), 1);
        assert_eq!(cm.count(0, 1), 1);
        assert!(ConfusionMatrix::from_labels(levels(), &["Emperor"], &["Adelie"]).is_err());
    }

    #[test]
    fn length_mismatch_and_out_of_range_fail() {
        assert!(ConfusionMatrix::from_codes(levels(), &[0, 1], &[0]).is_err());
        assert!(ConfusionMatrix::from_codes(levels(), &[0], &[5]).is_err());
    }

    #[test]
    fn empty_matrix_has_nan_accuracy() {
        let cm = ConfusionMatrix::new(levels());
        assert!(cm.accuracy().is_nan());
        assert!(cm.kappa().is_nan());
    }

    /// Class count plus aligned (truth, predicted) code pairs.
    fn labelled_pairs() -> impl Strategy<Value = (usize, Vec<(u32, u32)>)> {
        (2usize..6).prop_flat_map(|k| {
            let code = 0..k as u32;
            (Just(k), prop::collection::vec((code.clone(), code), 1..200))
        })
    }

    fn class_levels(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("class_{i}")).collect()
    }

    proptest! {
        #[test]
        fn prop_cells_sum_to_row_count((k, pairs) in labelled_pairs()) {
            let (truth, pred): (Vec<u32>, Vec<u32>) = pairs.iter().copied().unzip();
            let cm = ConfusionMatrix::from_codes(class_levels(k), &truth, &pred).unwrap();

            let cells: u64 = (0..k)
                .flat_map(|t| (0..k).map(move |p| (t, p)))
                .map(|(t, p)| cm.count(t, p))
                .sum();
            prop_assert_eq!(cells, pairs.len() as u64);
            prop_assert_eq!(cm.total(), pairs.len() as u64);
        }

        #[test]
        fn prop_accuracy_is_matched_over_total((k, pairs) in labelled_pairs()) {
            let (truth, pred): (Vec<u32>, Vec<u32>) = pairs.iter().copied().unzip();
            let cm = ConfusionMatrix::from_codes(class_levels(k), &truth, &pred).unwrap();

            let matched = pairs.iter().filter(|(t, p)| t == p).count();
            let expected = matched as f64 / pairs.len() as f64;
            prop_assert!((cm.accuracy() - expected).abs() < 1e-12);
        }

        #[test]
        fn prop_sens_and_ppv_are_bounded_or_nan((k, pairs) in labelled_pairs()) {
            let (truth, pred): (Vec<u32>, Vec<u32>) = pairs.iter().copied().unzip();
            let cm = ConfusionMatrix::from_codes(class_levels(k), &truth, &pred).unwrap();

            for class in 0..k {
                let sens = cm.sensitivity(class);
                if cm.truth_total(class) > 0 {
                    prop_assert!((0.0..=1.0).contains(&sens));
                } else {
                    prop_assert!(sens.is_nan());
                }

                let ppv = cm.positive_predictive_value(class);
                if cm.predicted_total(class) > 0 {
                    prop_assert!((0.0..=1.0).contains(&ppv));
                } else {
                    prop_assert!(ppv.is_nan());
                }
            }
        }
    }
}
