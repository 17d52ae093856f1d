use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::data_loading::Table;
use crate::error::PipelineError;

/// Training and testing subsets of one table.
#[derive(Debug, Clone)]
pub struct Split {
    training: Table,
    testing: Table,
    proportion: f64,
    seed: u64,
}

impl Split {
    pub fn training(&self) -> &Table {
        &self.training
    }

    pub fn testing(&self) -> &Table {
        &self.testing
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Plain (unstratified) random train/test splitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter {
    proportion: f64,
    seed: u64,
}

impl Splitter {
    /// `proportion` is the training share and must lie strictly inside (0, 1).
    pub fn new(proportion: f64, seed: u64) -> Result<Self, PipelineError> {
        if !proportion.is_finite() || proportion <= 0.0 || proportion >= 1.0 {
            return Err(PipelineError::invalid_argument(format!(
                "split proportion must be in (0, 1), got {proportion}"
            )));
        }
        Ok(Self { proportion, seed })
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffles row positions with a generator seeded from `seed`, takes the
    /// first `round(p * n)` as training and the rest as testing. Both subsets
    /// keep the input's relative row order.
    pub fn split(&self, table: &Table) -> Result<Split, PipelineError> {
        if table.is_empty() {
            return Err(PipelineError::invalid_argument("cannot split an empty table"));
        }

        let total = table.n_rows();
        let n_train = training_size(total, self.proportion);

        let mut positions: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        positions.shuffle(&mut rng);

        let (train_positions, test_positions) = positions.split_at_mut(n_train);
        train_positions.sort_unstable();
        test_positions.sort_unstable();

        let training = table.take(train_positions);
        let testing = table.take(test_positions);

        info!(
            total,
            training = training.n_rows(),
            testing = testing.n_rows(),
            proportion = self.proportion,
            seed = self.seed,
            "Split table"
        );

        Ok(Split {
            training,
            testing,
            proportion: self.proportion,
            seed: self.seed,
        })
    }
}

/// Number of training rows for a table of `total` rows.
pub fn training_size(total: usize, proportion: f64) -> usize {
    ((proportion * total as f64).round() as usize).min(total)
}

/// Convenience wrapper: `Splitter::new(proportion, seed)?.split(table)`.
pub fn initial_split(table: &Table, proportion: f64, seed: u64) -> Result<Split, PipelineError> {
    Splitter::new(proportion, seed)?.split(table)
}
