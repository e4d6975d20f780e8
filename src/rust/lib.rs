//! Crop recommendation from soil and climate readings.
//!
//! Seven readings are scaled by a fitted min-max scaler, then a fitted
//! standard scaler, and classified by an ONNX model whose integer label maps to
//! one of 22 crops.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use croprec::{Recommender, SoilReadings};
//!
//! let recommender = Recommender::builder()
//!     .with_artifacts_dir("artifacts")
//!     .build()?;
//!
//! let readings = SoilReadings {
//!     nitrogen: 90.0,
//!     phosphorus: 42.0,
//!     potassium: 43.0,
//!     temperature: 20.8,
//!     humidity: 82.0,
//!     ph: 6.5,
//!     rainfall: 202.9,
//! };
//! println!("{}", recommender.recommend(&readings)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Artifacts
//!
//! An artifact directory holds `model.onnx`, `minmaxscaler.json`,
//! `standscaler.json` and optionally `checksums.json`. See [`ArtifactStore`].

pub mod recommender;
mod runtime;
pub mod artifacts;

pub use recommender::{
    Crop, Feature, FeatureScaler, LabelPredictor, MinMaxScaler, OnnxClassifier, Recommendation,
    Recommender, RecommenderBuilder, RecommenderError, RecommenderInfo, SoilReadings,
    StandardScaler, FEATURE_COUNT, FEATURE_NAMES,
};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use artifacts::{ArtifactError, ArtifactPaths, ArtifactStore, ModelArtifacts};

pub fn init_logger() {
    env_logger::init();
}
