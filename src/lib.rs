// Voice Features - audio feature extraction core
// Amplitude, pitch, and spectral-shape descriptors for captured voice audio

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::{
    FeatureExtractor, FeatureReport, FeatureSummary, SampleBuffer, Spectrogram, WindowFunction,
};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, ErrorCode};
