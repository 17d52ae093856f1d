pub mod formula;
pub mod feature_encoder;
pub mod label_encoder;

pub use formula::{FeatureSet, Formula};
pub use feature_encoder::FeatureEncoder;
pub use label_encoder::LabelEncoder;
