pub mod trainer;

pub use trainer::{FittedModel, Trainer};
