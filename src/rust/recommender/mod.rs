mod error;
mod crops;
mod features;
mod scaler;
mod model;
pub mod builder;
mod recommender;

pub use error::RecommenderError;
pub use crops::Crop;
pub use features::{Feature, SoilReadings, FEATURE_COUNT, FEATURE_NAMES};
pub use scaler::{FeatureScaler, MinMaxScaler, StandardScaler};
pub use model::{LabelPredictor, OnnxClassifier};
pub use builder::RecommenderBuilder;
pub use recommender::{Recommendation, Recommender};

/// Information about what a recommender can produce and what it expects
#[derive(Debug, Clone)]
pub struct RecommenderInfo {
    /// Number of crops in the lookup table
    pub num_crops: usize,
    /// Supported crops in label order
    pub crops: Vec<Crop>,
    /// Column order of the feature batch
    pub feature_order: Vec<&'static str>,
}
