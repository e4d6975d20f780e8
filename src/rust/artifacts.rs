use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use crate::recommender::{FeatureScaler, LabelPredictor, MinMaxScaler, OnnxClassifier, StandardScaler};
use crate::runtime::RuntimeConfig;

pub const MODEL_FILE: &str = "model.onnx";
pub const MINMAX_SCALER_FILE: &str = "minmaxscaler.json";
pub const STANDARD_SCALER_FILE: &str = "standscaler.json";
pub const CHECKSUMS_FILE: &str = "checksums.json";

/// Environment variable overriding the artifact directory.
pub const ARTIFACTS_ENV: &str = "CROPREC_ARTIFACTS";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid scaler parameters in {file}: {reason}")]
    InvalidScaler { file: String, reason: String },
    #[error("Failed to load classifier: {0}")]
    Model(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

/// The three fitted objects a recommendation needs.
///
/// Immutable once built and shared read-only through an `Arc`, so any number
/// of threads can predict against the same instance.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub classifier: Arc<dyn LabelPredictor>,
    pub standard_scaler: Arc<dyn FeatureScaler>,
    pub minmax_scaler: Arc<dyn FeatureScaler>,
}

impl ModelArtifacts {
    pub fn new(
        classifier: Arc<dyn LabelPredictor>,
        standard_scaler: Arc<dyn FeatureScaler>,
        minmax_scaler: Arc<dyn FeatureScaler>,
    ) -> Self {
        Self { classifier, standard_scaler, minmax_scaler }
    }
}

/// Locations of the artifact files inside a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub minmax_scaler: PathBuf,
    pub standard_scaler: PathBuf,
    pub checksums: PathBuf,
}

impl ArtifactPaths {
    fn required(&self) -> [&Path; 3] {
        [&self.model, &self.minmax_scaler, &self.standard_scaler]
    }
}

/// Loads model artifacts from a directory, once.
///
/// The first successful [`load`](ArtifactStore::load) is cached; later calls
/// return the same `Arc`. A failed load is not cached.
#[derive(Debug)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
    runtime_config: RuntimeConfig,
    loaded: OnceCell<Arc<ModelArtifacts>>,
}

impl ArtifactStore {
    /// Creates a store rooted at [`ArtifactStore::default_artifacts_dir`].
    pub fn new_default() -> Self {
        Self::new(Self::default_artifacts_dir())
    }

    /// Returns the default artifact directory
    pub fn default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(ARTIFACTS_ENV) {
            return PathBuf::from(path);
        }

        // 2. An artifacts directory next to where we were started
        let local = PathBuf::from("artifacts");
        if local.is_dir() {
            return local;
        }

        // 3. Platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("croprec").join("artifacts");
        }

        // 4. Fallback to the system temp directory
        env::temp_dir().join("croprec").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
            runtime_config: RuntimeConfig::default(),
            loaded: OnceCell::new(),
        }
    }

    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.artifacts_dir.join(MODEL_FILE),
            minmax_scaler: self.artifacts_dir.join(MINMAX_SCALER_FILE),
            standard_scaler: self.artifacts_dir.join(STANDARD_SCALER_FILE),
            checksums: self.artifacts_dir.join(CHECKSUMS_FILE),
        }
    }

    pub fn is_complete(&self) -> bool {
        let paths = self.paths();
        log::info!("Checking artifacts in {:?}", self.artifacts_dir);
        paths.required().iter().all(|path| {
            let exists = path.exists();
            log::info!("  {:?} (exists: {})", path, exists);
            exists
        })
    }

    fn check_present(&self) -> Result<(), ArtifactError> {
        for path in self.paths().required() {
            if !path.exists() {
                return Err(ArtifactError::Missing(path.to_path_buf()));
            }
        }
        Ok(())
    }

    fn file_hash(path: &Path) -> Result<String, ArtifactError> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Reads `checksums.json`, if there is one.
    fn read_manifest(&self) -> Result<Option<BTreeMap<String, String>>, ArtifactError> {
        let path = self.paths().checksums;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let manifest = serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
            file: path.display().to_string(),
            source,
        })?;
        Ok(Some(manifest))
    }

    /// Verifies every file listed in `checksums.json` against its SHA-256.
    ///
    /// Returns `Ok(false)` when there is no manifest to check against.
    pub fn verify(&self) -> Result<bool, ArtifactError> {
        let manifest = match self.read_manifest()? {
            Some(manifest) => manifest,
            None => {
                log::warn!("No {} in {:?}, skipping verification", CHECKSUMS_FILE, self.artifacts_dir);
                return Ok(false);
            }
        };

        for (file, expected) in &manifest {
            let path = self.artifacts_dir.join(file);
            if !path.exists() {
                return Err(ArtifactError::Missing(path));
            }
            let actual = Self::file_hash(&path)?;
            log::info!("Verifying {}: {}", file, actual);
            if !actual.eq_ignore_ascii_case(expected) {
                log::error!("{} hash mismatch: expected {}, got {}", file, expected, actual);
                return Err(ArtifactError::HashMismatch {
                    file: file.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        log::info!("All {} listed artifacts verified", manifest.len());
        Ok(true)
    }

    /// Returns the loaded artifacts, loading them on the first call.
    ///
    /// # Errors
    /// Any missing, corrupt or mismatched artifact. These are not retried: the
    /// caller cannot produce a recommendation without all three objects.
    pub fn load(&self) -> Result<Arc<ModelArtifacts>, ArtifactError> {
        self.loaded
            .get_or_try_init(|| {
                self.load_uncached().map(Arc::new).map_err(|e| {
                    log::error!("Failed to load artifacts from {:?}: {}", self.artifacts_dir, e);
                    e
                })
            })
            .map(Arc::clone)
    }

    fn load_uncached(&self) -> Result<ModelArtifacts, ArtifactError> {
        log::info!("Loading artifacts from {:?}", self.artifacts_dir);
        self.check_present()?;
        self.verify()?;

        let paths = self.paths();
        let minmax_scaler = MinMaxScaler::from_file(&paths.minmax_scaler)?;
        log::info!("Min-max scaler loaded successfully");
        let standard_scaler = StandardScaler::from_file(&paths.standard_scaler)?;
        log::info!("Standard scaler loaded successfully");
        let classifier = OnnxClassifier::from_file(&paths.model, &self.runtime_config)
            .map_err(|e| ArtifactError::Model(e.to_string()))?;
        log::info!("Classifier loaded successfully");

        Ok(ModelArtifacts::new(
            Arc::new(classifier),
            Arc::new(standard_scaler),
            Arc::new(minmax_scaler),
        ))
    }
}
