use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};

use super::error::RecommenderError;
use super::recommender::Recommender;
use crate::artifacts::{ArtifactStore, ModelArtifacts};
use crate::runtime::RuntimeConfig;

/// A builder for constructing a Recommender with a fluent interface.
///
/// Artifacts come either from a directory on disk (loaded in [`build`](Self::build))
/// or from an already assembled [`ModelArtifacts`], which is how tests plug in
/// stub scalers and classifiers.
#[derive(Default, Debug)]
pub struct RecommenderBuilder {
    artifacts_dir: Option<PathBuf>,
    artifacts: Option<Arc<ModelArtifacts>>,
    runtime_config: RuntimeConfig,
}

impl RecommenderBuilder {
    /// Creates a new empty RecommenderBuilder instance with default configuration
    pub fn new() -> Self {
        Self {
            artifacts_dir: None,
            artifacts: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for the ONNX classifier
    ///
    /// # Example
    /// ```
    /// use croprec::{RecommenderBuilder, RuntimeConfig};
    ///
    /// let builder = RecommenderBuilder::new()
    ///     .with_runtime_config(RuntimeConfig::with_intra_threads(1));
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads artifacts from `dir` instead of the default location.
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Uses an already loaded set of artifacts. Takes precedence over any directory.
    pub fn with_artifacts(mut self, artifacts: Arc<ModelArtifacts>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Builds the recommender, loading artifacts from disk when none were supplied.
    ///
    /// # Errors
    /// `BuildError` if any artifact is missing, corrupt or fails verification.
    /// Nothing can be recommended in that case.
    pub fn build(self) -> Result<Recommender, RecommenderError> {
        if let Some(artifacts) = self.artifacts {
            return Ok(Recommender::new(artifacts));
        }

        let store = match self.artifacts_dir {
            Some(dir) => ArtifactStore::new(dir),
            None => ArtifactStore::new_default(),
        }
        .with_runtime_config(self.runtime_config);

        let artifacts = store.load().map_err(|e| {
            error!("Failed to build recommender: {}", e);
            RecommenderError::from(e)
        })?;
        info!("Recommender ready using artifacts from {:?}", store.artifacts_dir());
        Ok(Recommender::new(artifacts))
    }
}
