use std::fmt;
use std::ops::RangeInclusive;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::error::RecommenderError;

/// Number of readings the scalers and classifier were fitted on.
pub const FEATURE_COUNT: usize = 7;

/// Column order of the feature batch. Fixed by the training process.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "nitrogen",
    "phosphorus",
    "potassium",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// One input reading, with the range a front end should accept for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    /// All features in batch column order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    pub fn name(self) -> &'static str {
        FEATURE_NAMES[self as usize]
    }

    /// Human readable label used by prompts and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen (N)",
            Feature::Phosphorus => "Phosphorus (P)",
            Feature::Potassium => "Potassium (K)",
            Feature::Temperature => "Temperature (°C)",
            Feature::Humidity => "Humidity (%)",
            Feature::Ph => "pH Level",
            Feature::Rainfall => "Rainfall (mm)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Feature::Temperature => "°C",
            Feature::Humidity => "%",
            Feature::Rainfall => "mm",
            _ => "",
        }
    }

    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium => 0.0..=200.0,
            Feature::Temperature => -10.0..=50.0,
            Feature::Humidity => 0.0..=100.0,
            Feature::Ph => 0.0..=14.0,
            Feature::Rainfall => 0.0..=500.0,
        }
    }

    pub fn default_value(self) -> f64 {
        match self {
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium => 50.0,
            Feature::Temperature => 25.0,
            Feature::Humidity => 60.0,
            Feature::Ph => 7.0,
            Feature::Rainfall => 100.0,
        }
    }

    /// Checks that `value` is finite and inside [`Feature::range`].
    ///
    /// This is a front-end concern: [`Recommender::recommend`](super::Recommender::recommend)
    /// never calls it and forwards whatever it is given to the model.
    pub fn check(self, value: f64) -> Result<f64, RecommenderError> {
        let range = self.range();
        if !value.is_finite() {
            return Err(RecommenderError::ValidationError(
                format!("{} must be a finite number", self.label())
            ));
        }
        if !range.contains(&value) {
            return Err(RecommenderError::ValidationError(
                format!(
                    "{} must be between {} and {}, got {}",
                    self.label(), range.start(), range.end(), value
                )
            ));
        }
        Ok(value)
    }

    /// Soil nutrients and pH are grouped apart from climate conditions in summaries.
    pub fn is_soil(self) -> bool {
        matches!(
            self,
            Feature::Nitrogen | Feature::Phosphorus | Feature::Potassium | Feature::Ph
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The seven soil and climate readings for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilReadings {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl SoilReadings {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Nitrogen => self.nitrogen,
            Feature::Phosphorus => self.phosphorus,
            Feature::Potassium => self.potassium,
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::Ph => self.ph,
            Feature::Rainfall => self.rainfall,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::Nitrogen => &mut self.nitrogen,
            Feature::Phosphorus => &mut self.phosphorus,
            Feature::Potassium => &mut self.potassium,
            Feature::Temperature => &mut self.temperature,
            Feature::Humidity => &mut self.humidity,
            Feature::Ph => &mut self.ph,
            Feature::Rainfall => &mut self.rainfall,
        };
        *slot = value;
    }

    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|feature| self.get(feature))
    }

    /// A single-row batch of shape `(1, FEATURE_COUNT)`.
    pub fn to_batch(&self) -> Array2<f64> {
        Self::batch(std::slice::from_ref(self))
    }

    /// Stacks several readings into a batch of shape `(n, FEATURE_COUNT)`.
    pub fn batch(readings: &[SoilReadings]) -> Array2<f64> {
        let mut batch = Array2::zeros((readings.len(), FEATURE_COUNT));
        for (mut row, reading) in batch.rows_mut().into_iter().zip(readings) {
            for (cell, value) in row.iter_mut().zip(reading.to_array()) {
                *cell = value;
            }
        }
        batch
    }

    /// Runs [`Feature::check`] over every reading.
    pub fn validate(&self) -> Result<(), RecommenderError> {
        for feature in Feature::ALL {
            feature.check(self.get(feature))?;
        }
        Ok(())
    }
}

impl Default for SoilReadings {
    fn default() -> Self {
        let mut readings = SoilReadings {
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            ph: 0.0,
            rainfall: 0.0,
        };
        for feature in Feature::ALL {
            readings.set(feature, feature.default_value());
        }
        readings
    }
}
