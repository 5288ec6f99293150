//! Configuration for feature extraction
//!
//! Analysis parameters can be loaded from a JSON file so window sizes and
//! thresholds can be tuned without recompilation. Every field is optional
//! in the file; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::features::DEFAULT_ROLLOFF_PERCENTILE;
use crate::analysis::spectrogram::{DEFAULT_HOP_SIZE, DEFAULT_WINDOW_SIZE};
use crate::analysis::WindowFunction;
use crate::error::AnalysisError;

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples per analysis frame
    pub window_size: usize,
    /// Samples advanced between consecutive frames
    pub hop_size: usize,
    /// Taper applied to each frame before the FFT
    pub window_function: WindowFunction,
    /// Fraction of total magnitude used for the rolloff frequency
    pub rolloff_percentile: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            window_function: WindowFunction::Hann,
            rolloff_percentile: DEFAULT_ROLLOFF_PERCENTILE,
        }
    }
}

impl AnalysisConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    /// `InvalidInput` unless window_size > 0, 0 < hop_size <= window_size and
    /// rolloff_percentile lies in (0, 1].
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_size == 0 {
            return Err(AnalysisError::invalid("window size must be positive"));
        }
        if self.hop_size == 0 || self.hop_size > self.window_size {
            return Err(AnalysisError::invalid(format!(
                "hop size {} outside (0, {}]",
                self.hop_size, self.window_size
            )));
        }
        if !(self.rolloff_percentile > 0.0 && self.rolloff_percentile <= 1.0) {
            return Err(AnalysisError::invalid(format!(
                "rolloff percentile {} outside (0, 1]",
                self.rolloff_percentile
            )));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// the JSON is invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
