use std::fmt::Debug;
use std::fs;
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use serde::Deserialize;

use super::error::RecommenderError;
use super::features::FEATURE_COUNT;
use crate::artifacts::ArtifactError;

/// A feature transform fitted offline and applied read-only at prediction time.
///
/// Implementations must keep the batch shape unchanged.
pub trait FeatureScaler: Send + Sync + Debug {
    fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, RecommenderError>;
}

fn check_width(name: &str, batch: &Array2<f64>, expected: usize) -> Result<(), RecommenderError> {
    if batch.ncols() != expected {
        return Err(RecommenderError::PredictionError(format!(
            "{} expects {} features per row, got {}",
            name, expected, batch.ncols()
        )));
    }
    Ok(())
}

fn check_params(file: &str, name: &str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.len() != FEATURE_COUNT {
        return Err(ArtifactError::InvalidScaler {
            file: file.to_string(),
            reason: format!("'{}' has {} entries, expected {}", name, values.len(), FEATURE_COUNT),
        });
    }
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(ArtifactError::InvalidScaler {
            file: file.to_string(),
            reason: format!("'{}' entry {} is not finite", name, pos),
        });
    }
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
        file: path.display().to_string(),
        source,
    })
}

/// Rescales each feature into the fitted range: `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinMaxScaler {
    #[serde(alias = "min_")]
    min: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let scaler = Self { min, scale };
        scaler.validate("<memory>")?;
        Ok(scaler)
    }

    /// Loads fitted parameters from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let scaler: Self = read_json(path)?;
        scaler.validate(&path.display().to_string())?;
        Ok(scaler)
    }

    fn validate(&self, file: &str) -> Result<(), ArtifactError> {
        check_params(file, "min", &self.min)?;
        check_params(file, "scale", &self.scale)
    }
}

impl FeatureScaler for MinMaxScaler {
    fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, RecommenderError> {
        check_width("MinMaxScaler", batch, self.min.len())?;
        Ok(batch * &ArrayView1::from(&self.scale[..]) + &ArrayView1::from(&self.min[..]))
    }
}

/// Centers and scales each feature: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    mean: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let scaler = Self { mean, scale };
        scaler.validate("<memory>")?;
        Ok(scaler)
    }

    /// Loads fitted parameters from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let scaler: Self = read_json(path)?;
        scaler.validate(&path.display().to_string())?;
        Ok(scaler)
    }

    fn validate(&self, file: &str) -> Result<(), ArtifactError> {
        check_params(file, "mean", &self.mean)?;
        check_params(file, "scale", &self.scale)?;
        if let Some(pos) = self.scale.iter().position(|&s| s == 0.0) {
            return Err(ArtifactError::InvalidScaler {
                file: file.to_string(),
                reason: format!("'scale' entry {} is zero", pos),
            });
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, RecommenderError> {
        check_width("StandardScaler", batch, self.mean.len())?;
        Ok((batch - &ArrayView1::from(&self.mean[..])) / &ArrayView1::from(&self.scale[..]))
    }
}
