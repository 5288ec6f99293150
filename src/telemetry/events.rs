//! Event types emitted by the feature extraction pipeline.

use serde::{Deserialize, Serialize};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    MonoReduction,
    Amplitude,
    ZeroCrossing,
    Spectrogram,
    SpectralShape,
    Pitch,
}

/// Report fields that may be left undefined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Pitch,
    DominantFrequency,
    SpectralCentroid,
    SpectralRolloff,
}

/// Why a feature was left undefined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Signal shorter than one analysis window
    InsufficientSignal,
    /// Total spectral magnitude was zero
    Silent,
    /// No autocorrelation peak after lag 0
    NoPeriodicity,
}

/// Observable pipeline events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum AnalysisEvent {
    StageCompleted {
        stage: AnalysisStage,
        elapsed_us: u64,
    },
    FeatureUndefined {
        feature: Feature,
        reason: UndefinedReason,
    },
    InputRejected {
        code: i32,
        message: String,
    },
}
