pub mod splitter;

pub use splitter::{Split, Splitter, initial_split, training_size};
