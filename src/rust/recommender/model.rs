use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::path::Path;

use log::{debug, info};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::RecommenderError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Maps a batch of scaled feature rows to one integer label per row.
pub trait LabelPredictor: Send + Sync + Debug {
    fn predict(&self, batch: &Array2<f64>) -> Result<Vec<i64>, RecommenderError>;
}

/// A classifier exported to ONNX.
///
/// The graph is expected to:
/// - Accept one float tensor of shape [batch_size, n_features] as its first input
/// - Produce the predicted labels as an int64 tensor of shape [batch_size] as its first output
///
/// This is the layout skl2onnx produces for scikit-learn classifiers; any extra
/// outputs (such as class probabilities) are ignored.
pub struct OnnxClassifier {
    model_path: String,
    input_name: String,
    session: Session,
}

impl Debug for OnnxClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_path", &self.model_path)
            .field("input_name", &self.input_name)
            .finish()
    }
}

impl OnnxClassifier {
    /// Loads the model and checks that it has the expected input/output structure.
    ///
    /// # Errors
    /// - `ModelError` if the file cannot be read or is not a valid ONNX graph
    /// - `ModelError` if the graph has no inputs or no outputs
    pub fn from_file(path: impl AsRef<Path>, config: &RuntimeConfig) -> Result<Self, RecommenderError> {
        let path = path.as_ref();
        let session = create_session_builder(config)?
            .commit_from_file(path)?;

        Self::validate_model(&session)?;
        info!("Classifier structure validated successfully");

        let input_name = session.inputs[0].name.clone();
        Ok(Self {
            model_path: path.display().to_string(),
            input_name,
            session,
        })
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    fn validate_model(session: &Session) -> Result<(), RecommenderError> {
        if session.inputs.is_empty() {
            return Err(RecommenderError::ModelError(
                "Model must have at least 1 input for the feature batch".to_string()
            ));
        }
        if session.outputs.is_empty() {
            return Err(RecommenderError::ModelError(
                "Model must have at least 1 output for the predicted labels".to_string()
            ));
        }
        Ok(())
    }
}

impl LabelPredictor for OnnxClassifier {
    /// Runs the graph on `batch`, cast to f32.
    ///
    /// # Errors
    /// - `ModelError` if tensor creation, model execution or output extraction fails
    /// - `PredictionError` if the model returns a different number of labels than rows
    fn predict(&self, batch: &Array2<f64>) -> Result<Vec<i64>, RecommenderError> {
        let input_dyn = batch.mapv(|x| x as f32).into_dyn();
        let input = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), Tensor::from_array(&input)
            .map_err(|e| RecommenderError::ModelError(format!("Failed to create input tensor: {}", e)))?);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| RecommenderError::ModelError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0].try_extract_tensor::<i64>()
            .map_err(|e| RecommenderError::ModelError(format!("Failed to extract label tensor: {}", e)))?;

        let labels: Vec<i64> = labels.iter().copied().collect();
        debug!("Classifier returned labels {:?}", labels);

        if labels.len() != batch.nrows() {
            return Err(RecommenderError::PredictionError(format!(
                "Model returned {} labels for {} rows",
                labels.len(), batch.nrows()
            )));
        }
        Ok(labels)
    }
}
