// Signal math - stateless feature primitives
//
// Module organization:
// - temporal: Time-domain features (RMS, peak amplitude, ZCR)
// - spectral: Frequency-domain features (centroid, rolloff)
// - types: Spectrogram grid and the feature report
//
// Every function here is pure: inputs are borrowed slices, outputs are
// fresh values, and invalid arguments surface as `AnalysisError`.

mod spectral;
mod temporal;
mod types;

pub use spectral::{spectral_centroid, spectral_rolloff, DEFAULT_ROLLOFF_PERCENTILE};
pub use temporal::{peak_amplitude, root_mean_square, zero_crossing_rate};
pub use types::{FeatureReport, FeatureSummary, Spectrogram};
