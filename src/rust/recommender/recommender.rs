use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::crops::Crop;
use super::error::RecommenderError;
use super::features::{SoilReadings, FEATURE_NAMES};
use crate::artifacts::ModelArtifacts;

/// Outcome of a single recommendation.
///
/// A label the crop table does not know is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    Crop { crop: Crop },
    Undetermined { label: i64 },
}

impl Recommendation {
    pub fn from_label(label: i64) -> Self {
        match Crop::from_label(label) {
            Some(crop) => Recommendation::Crop { crop },
            None => Recommendation::Undetermined { label },
        }
    }

    pub fn crop(&self) -> Option<Crop> {
        match self {
            Recommendation::Crop { crop } => Some(*crop),
            Recommendation::Undetermined { .. } => None,
        }
    }

    /// The label the classifier produced.
    pub fn label(&self) -> i64 {
        match self {
            Recommendation::Crop { crop } => crop.label(),
            Recommendation::Undetermined { label } => *label,
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Recommendation::Crop { crop } => format!("Recommended Crop: {}", crop),
            Recommendation::Undetermined { .. } => {
                "Sorry, we could not determine the best crop with the provided data.".to_string()
            }
        }
    }

    /// A follow-up line for a successful recommendation.
    pub fn detail(&self) -> Option<String> {
        self.crop().map(|crop| {
            format!("{} is the best crop to cultivate with the provided conditions!", crop)
        })
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Recommends crops from soil readings using a loaded set of model artifacts.
///
/// Cloning is cheap and every clone shares the same artifacts. The type is
/// `Send + Sync`, so one instance can serve concurrent callers:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use croprec::{Recommender, SoilReadings};
/// use std::sync::Arc;
/// use std::thread;
///
/// let recommender = Arc::new(Recommender::builder()
///     .with_artifacts_dir("artifacts")
///     .build()?);
///
/// let handles: Vec<_> = (0..3).map(|_| {
///     let recommender = Arc::clone(&recommender);
///     thread::spawn(move || recommender.recommend(&SoilReadings::default()))
/// }).collect();
///
/// for handle in handles {
///     println!("{}", handle.join().unwrap()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Recommender {
    artifacts: Arc<ModelArtifacts>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn verify_thread_safety() {
        assert_send_sync::<Recommender>();
    }
};

impl Recommender {
    /// Creates a new RecommenderBuilder for fluent construction
    pub fn builder() -> super::builder::RecommenderBuilder {
        super::builder::RecommenderBuilder::new()
    }

    /// Wraps an already loaded set of artifacts.
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &Arc<ModelArtifacts> {
        &self.artifacts
    }

    /// Returns information about the recommender
    pub fn info(&self) -> super::RecommenderInfo {
        super::RecommenderInfo {
            num_crops: Crop::ALL.len(),
            crops: Crop::ALL.to_vec(),
            feature_order: FEATURE_NAMES.to_vec(),
        }
    }

    /// Recommends a crop for one set of readings.
    ///
    /// The readings are scaled with the min-max scaler, then the standard
    /// scaler, then classified. The order matters: the scalers were fitted in
    /// that sequence. No range checks are applied here.
    ///
    /// # Errors
    /// - `PredictionError` if a scaler rejects the batch or the classifier returns no label
    /// - `ModelError` if the classifier fails to run
    pub fn recommend(&self, readings: &SoilReadings) -> Result<Recommendation, RecommenderError> {
        let mut recommendations = self.recommend_batch(std::slice::from_ref(readings))?;
        recommendations.pop().ok_or_else(|| {
            RecommenderError::PredictionError("Classifier returned no label".into())
        })
    }

    /// Recommends a crop for each set of readings, in one pass through the models.
    pub fn recommend_batch(&self, readings: &[SoilReadings]) -> Result<Vec<Recommendation>, RecommenderError> {
        if readings.is_empty() {
            return Ok(Vec::new());
        }

        let batch = SoilReadings::batch(readings);
        let scaled = self.artifacts.minmax_scaler.transform(&batch)?;
        let features = self.artifacts.standard_scaler.transform(&scaled)?;
        let labels = self.artifacts.classifier.predict(&features)?;

        if labels.len() != readings.len() {
            return Err(RecommenderError::PredictionError(format!(
                "Classifier returned {} labels for {} rows",
                labels.len(), readings.len()
            )));
        }

        let recommendations: Vec<Recommendation> = labels.into_iter()
            .map(Recommendation::from_label)
            .collect();
        debug!("Recommendations: {:?}", recommendations);
        Ok(recommendations)
    }
}
