use ort::Error as OrtError;
use std::fmt;

use crate::artifacts::ArtifactError;

/// Represents the different types of errors that can occur while recommending a crop.
///
/// A label the lookup table does not know is not an error; it is reported as
/// [`Recommendation::Undetermined`](super::Recommendation::Undetermined).
#[derive(Debug)]
pub enum RecommenderError {
    /// Error occurred while loading or running the ONNX classifier
    ModelError(String),
    /// Error occurred during the build phase (missing or corrupt artifacts)
    BuildError(String),
    /// Error occurred while transforming features or making predictions
    PredictionError(String),
    /// Error occurred due to an invalid reading
    ValidationError(String),
}

impl fmt::Display for RecommenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for RecommenderError {}

impl From<OrtError> for RecommenderError {
    fn from(err: OrtError) -> Self {
        RecommenderError::ModelError(err.to_string())
    }
}

impl From<ArtifactError> for RecommenderError {
    fn from(err: ArtifactError) -> Self {
        RecommenderError::BuildError(err.to_string())
    }
}
