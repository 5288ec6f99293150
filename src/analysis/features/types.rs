// Types module - Data structures for audio features
//
// This module defines the spectrogram grid and the report assembled by the
// feature extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::analysis::notes::Note;

/// Time-frequency magnitude grid
///
/// `magnitudes[bin][frame]` pairs with `frequencies[bin]` (Hz, ascending from
/// 0 to Nyquist) and `times[frame]` (frame centers in seconds, ascending).
/// Every row has exactly `times.len()` entries, so a signal shorter than one
/// window yields bins with empty rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram {
    frequencies: Vec<f32>,
    times: Vec<f32>,
    magnitudes: Vec<Vec<f32>>,
}

impl Spectrogram {
    /// Build the grid from per-frame magnitude spectra
    ///
    /// Each frame must hold one magnitude per frequency bin.
    pub(crate) fn from_frames(frequencies: Vec<f32>, times: Vec<f32>, frames: &[Vec<f32>]) -> Self {
        debug_assert_eq!(times.len(), frames.len());

        let magnitudes = (0..frequencies.len())
            .map(|bin| frames.iter().map(|frame| frame[bin]).collect())
            .collect();

        Self {
            frequencies,
            times,
            magnitudes,
        }
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Magnitude rows indexed by frequency bin
    pub fn magnitudes(&self) -> &[Vec<f32>] {
        &self.magnitudes
    }

    pub fn bin_count(&self) -> usize {
        self.frequencies.len()
    }

    pub fn frame_count(&self) -> usize {
        self.times.len()
    }

    /// True when no analysis frame fit inside the signal
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn magnitude(&self, bin: usize, frame: usize) -> Option<f32> {
        self.magnitudes.get(bin)?.get(frame).copied()
    }

    /// Mean magnitude per frequency bin across all frames
    ///
    /// Returns `None` when the grid has no frames.
    pub fn mean_spectrum(&self) -> Option<Vec<f32>> {
        if self.is_empty() {
            return None;
        }

        let frames = self.frame_count() as f64;
        Some(
            self.magnitudes
                .iter()
                .map(|row| (row.iter().map(|&m| m as f64).sum::<f64>() / frames) as f32)
                .collect(),
        )
    }
}

/// Features extracted from one sample buffer
///
/// Optional fields are absent when the feature cannot be computed for this
/// signal (too short for a window, silent, or aperiodic); they are never
/// filled with placeholder values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    /// Source sample rate in Hz
    pub sample_rate: u32,

    /// Channel count of the source buffer before mono reduction
    pub source_channels: u16,

    /// Duration in seconds (frames / sample rate)
    pub duration_secs: f32,

    /// Largest absolute sample value of the mono signal
    pub peak_amplitude: f32,

    /// Root-mean-square amplitude of the mono signal
    pub rms: f32,

    /// Fraction of adjacent sample pairs that change sign (0.0 to 1.0)
    pub zero_crossing_rate: f32,

    /// Autocorrelation pitch estimate in Hz
    pub pitch_hz: Option<f32>,

    /// Nearest equal-tempered note for `pitch_hz`
    pub pitch_note: Option<Note>,

    /// Frequency of the strongest bin in each spectrogram frame
    pub dominant_frequencies: Vec<f32>,

    /// Strongest bin of the frame-averaged spectrum
    pub dominant_frequency: Option<f32>,

    /// Magnitude-weighted mean frequency of the frame-averaged spectrum
    pub spectral_centroid: Option<f32>,

    /// Frequency below which the configured share of magnitude lies
    pub spectral_rolloff: Option<f32>,

    #[serde(flatten)]
    pub spectrogram: Spectrogram,
}

impl FeatureReport {
    /// Scalar view of the report without the spectrogram arrays
    pub fn summary(&self) -> FeatureSummary {
        FeatureSummary {
            sample_rate: self.sample_rate,
            source_channels: self.source_channels,
            duration_secs: self.duration_secs,
            peak_amplitude: self.peak_amplitude,
            rms: self.rms,
            zero_crossing_rate: self.zero_crossing_rate,
            pitch_hz: self.pitch_hz,
            pitch_note: self.pitch_note.clone(),
            dominant_frequency: self.dominant_frequency,
            spectral_centroid: self.spectral_centroid,
            spectral_rolloff: self.spectral_rolloff,
            frame_count: self.spectrogram.frame_count(),
            bin_count: self.spectrogram.bin_count(),
        }
    }
}

/// Compact, scalar-only projection of a [`FeatureReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub sample_rate: u32,
    pub source_channels: u16,
    pub duration_secs: f32,
    pub peak_amplitude: f32,
    pub rms: f32,
    pub zero_crossing_rate: f32,
    pub pitch_hz: Option<f32>,
    pub pitch_note: Option<Note>,
    pub dominant_frequency: Option<f32>,
    pub spectral_centroid: Option<f32>,
    pub spectral_rolloff: Option<f32>,
    pub frame_count: usize,
    pub bin_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Spectrogram {
        Spectrogram::from_frames(
            vec![0.0, 100.0, 200.0],
            vec![0.01, 0.02],
            &[vec![1.0, 2.0, 3.0], vec![3.0, 0.0, 1.0]],
        )
    }

    #[test]
    fn test_from_frames_transposes_to_bin_rows() {
        let spectrogram = grid();
        assert_eq!(spectrogram.bin_count(), 3);
        assert_eq!(spectrogram.frame_count(), 2);
        assert_eq!(spectrogram.magnitudes()[0], vec![1.0, 3.0]);
        assert_eq!(spectrogram.magnitude(2, 1), Some(1.0));
        assert_eq!(spectrogram.magnitude(3, 0), None);
    }

    #[test]
    fn test_mean_spectrum() {
        assert_eq!(grid().mean_spectrum(), Some(vec![2.0, 1.0, 2.0]));
    }

    #[test]
    fn test_empty_grid_keeps_bins() {
        let spectrogram = Spectrogram::from_frames(vec![0.0, 50.0], Vec::new(), &[]);
        assert!(spectrogram.is_empty());
        assert_eq!(spectrogram.bin_count(), 2);
        assert!(spectrogram.magnitudes().iter().all(|row| row.is_empty()));
        assert_eq!(spectrogram.mean_spectrum(), None);
    }

    #[test]
    fn test_report_serializes_flattened_spectrogram() {
        let report = FeatureReport {
            sample_rate: 8000,
            source_channels: 1,
            duration_secs: 0.5,
            peak_amplitude: 1.0,
            rms: 0.7,
            zero_crossing_rate: 0.1,
            pitch_hz: None,
            pitch_note: None,
            dominant_frequencies: vec![0.0, 0.0],
            dominant_frequency: Some(0.0),
            spectral_centroid: Some(100.0),
            spectral_rolloff: Some(200.0),
            spectrogram: grid(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["frequencies"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["times"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["magnitudes"].as_array().map(Vec::len), Some(3));
        assert!(json["pitch_hz"].is_null());
        assert!(json.get("spectrogram").is_none());

        let summary = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(summary["frame_count"], 2);
        assert!(summary.get("magnitudes").is_none());
    }
}
