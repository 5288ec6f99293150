// SpectralAnalyzer - short-time magnitude spectra
//
// Slides a window of `window_size` samples across the signal in steps of
// `hop_size`, tapers each frame, and keeps the non-negative half of its
// magnitude spectrum.
//
// Framing:
// - frames start at 0, hop, 2*hop, ... while start + window_size <= len
// - a trailing partial window is dropped, never zero-padded
// - frame count = floor((len - window_size) / hop_size) + 1, or 0 when
//   the signal is shorter than one window

use crate::analysis::fft::{FftProcessor, WindowFunction};
use crate::analysis::features::Spectrogram;
use crate::error::AnalysisError;

/// Default analysis frame length in samples
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Default advance between consecutive frames in samples
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Spectrogram plus the strongest frequency of each frame
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralAnalysis {
    pub spectrogram: Spectrogram,
    /// Frequency (Hz) of the largest-magnitude bin, one per frame
    pub dominant_frequencies: Vec<f32>,
}

/// Short-time spectral analyzer
///
/// Holds only immutable framing parameters and the transform plan, so one
/// analyzer can serve any number of threads.
pub struct SpectralAnalyzer {
    fft_processor: FftProcessor,
    hop_size: usize,
    window_function: WindowFunction,
}

impl SpectralAnalyzer {
    /// Create an analyzer
    ///
    /// # Errors
    /// `InvalidInput` unless `window_size > 0` and `0 < hop_size <= window_size`.
    pub fn new(
        window_size: usize,
        hop_size: usize,
        window_function: WindowFunction,
    ) -> Result<Self, AnalysisError> {
        if window_size == 0 {
            return Err(AnalysisError::invalid("window size must be positive"));
        }
        if hop_size == 0 || hop_size > window_size {
            return Err(AnalysisError::invalid(format!(
                "hop size {} outside (0, {}]",
                hop_size, window_size
            )));
        }
        if !window_size.is_power_of_two() {
            tracing::debug!(
                "[SpectralAnalyzer] window size {} is not a power of two",
                window_size
            );
        }

        Ok(Self {
            fft_processor: FftProcessor::new(window_size, window_function),
            hop_size,
            window_function,
        })
    }

    pub fn window_size(&self) -> usize {
        self.fft_processor.fft_size()
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn window_function(&self) -> WindowFunction {
        self.window_function
    }

    /// Number of full frames that fit in a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        let window_size = self.window_size();
        if len < window_size {
            0
        } else {
            (len - window_size) / self.hop_size + 1
        }
    }

    /// Center frequency (Hz) of every non-negative bin, ascending
    pub fn bin_frequencies(&self, sample_rate: u32) -> Vec<f32> {
        let bin_width = sample_rate as f32 / self.window_size() as f32;
        (0..self.fft_processor.bin_count())
            .map(|bin| bin as f32 * bin_width)
            .collect()
    }

    /// Compute the magnitude spectrogram and per-frame dominant frequencies
    ///
    /// A signal shorter than one window is not an error: the result has
    /// every frequency bin but no frames.
    ///
    /// # Errors
    /// `InvalidInput` when `sample_rate` is zero.
    pub fn analyze(&self, signal: &[f32], sample_rate: u32) -> Result<SpectralAnalysis, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::invalid("sample rate must be positive"));
        }

        let window_size = self.window_size();
        let frequencies = self.bin_frequencies(sample_rate);
        let frame_count = self.frame_count(signal.len());

        let mut frames = Vec::with_capacity(frame_count);
        let mut times = Vec::with_capacity(frame_count);
        let mut dominant_frequencies = Vec::with_capacity(frame_count);

        for index in 0..frame_count {
            let start = index * self.hop_size;
            let spectrum = self
                .fft_processor
                .compute_magnitude_spectrum(&signal[start..start + window_size]);

            dominant_frequencies.push(frequencies[strongest_bin(&spectrum)]);
            times.push((start as f64 + window_size as f64 / 2.0) as f32 / sample_rate as f32);
            frames.push(spectrum);
        }

        Ok(SpectralAnalysis {
            spectrogram: Spectrogram::from_frames(frequencies, times, &frames),
            dominant_frequencies,
        })
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self {
            fft_processor: FftProcessor::new(DEFAULT_WINDOW_SIZE, WindowFunction::Hann),
            hop_size: DEFAULT_HOP_SIZE,
            window_function: WindowFunction::Hann,
        }
    }
}

/// Index of the largest magnitude; the lowest bin wins ties
pub(crate) fn strongest_bin(spectrum: &[f32]) -> usize {
    let mut best = 0;
    for (bin, &magnitude) in spectrum.iter().enumerate() {
        if magnitude > spectrum[best] {
            best = bin;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine_wave(sample_rate: u32, frequency: f64, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_rejects_invalid_hop_size() {
        assert!(matches!(
            SpectralAnalyzer::new(1024, 0, WindowFunction::Hann),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            SpectralAnalyzer::new(1024, 1025, WindowFunction::Hann),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(SpectralAnalyzer::new(1024, 1024, WindowFunction::Hann).is_ok());
        assert!(SpectralAnalyzer::new(0, 0, WindowFunction::Hann).is_err());
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let analyzer = SpectralAnalyzer::default();
        assert!(analyzer.analyze(&[0.0; 4096], 0).is_err());
    }

    #[test]
    fn test_frame_count_drops_partial_tail() {
        let analyzer = SpectralAnalyzer::default();
        assert_eq!(analyzer.frame_count(2047), 0);
        assert_eq!(analyzer.frame_count(2048), 1);
        assert_eq!(analyzer.frame_count(2559), 1);
        assert_eq!(analyzer.frame_count(2560), 2);
        assert_eq!(analyzer.frame_count(44100), 83);
    }

    #[test]
    fn test_short_signal_yields_empty_grid() {
        let analyzer = SpectralAnalyzer::default();
        let analysis = analyzer.analyze(&[0.25; 1000], 44100).unwrap();

        assert!(analysis.spectrogram.is_empty());
        assert_eq!(analysis.spectrogram.bin_count(), DEFAULT_WINDOW_SIZE / 2 + 1);
        assert!(analysis.dominant_frequencies.is_empty());
    }

    #[test]
    fn test_bin_frequencies_span_dc_to_nyquist() {
        let analyzer = SpectralAnalyzer::new(1024, 256, WindowFunction::Hann).unwrap();
        let frequencies = analyzer.bin_frequencies(48000);

        assert_eq!(frequencies.len(), 513);
        assert_eq!(frequencies[0], 0.0);
        assert!((frequencies[512] - 24000.0).abs() < 1e-2);
        assert!(frequencies.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_frame_times_are_window_centers() {
        let analyzer = SpectralAnalyzer::new(256, 128, WindowFunction::Hann).unwrap();
        let analysis = analyzer.analyze(&vec![0.1; 1024], 1000).unwrap();
        let times = analysis.spectrogram.times();

        assert_eq!(times.len(), 7);
        assert!((times[0] - 0.128).abs() < 1e-6);
        assert!((times[1] - 0.256).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_frequency_tracks_sine() {
        let sample_rate = 44100;
        let analyzer = SpectralAnalyzer::default();
        let signal = generate_sine_wave(sample_rate, 1000.0, sample_rate as usize / 2);
        let analysis = analyzer.analyze(&signal, sample_rate).unwrap();

        assert_eq!(
            analysis.dominant_frequencies.len(),
            analysis.spectrogram.frame_count()
        );
        for freq in &analysis.dominant_frequencies {
            assert!(
                (freq - 1000.0).abs() < 50.0,
                "Expected dominant frequency near 1000 Hz, got {} Hz",
                freq
            );
        }
    }

    #[test]
    fn test_magnitudes_non_negative() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let noise: Vec<f32> = (0..8192).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let analysis = SpectralAnalyzer::default().analyze(&noise, 16000).unwrap();

        assert!(analysis
            .spectrogram
            .magnitudes()
            .iter()
            .flatten()
            .all(|&m| m >= 0.0));
    }

    #[test]
    fn test_strongest_bin_prefers_first_tie() {
        assert_eq!(strongest_bin(&[0.0, 3.0, 3.0, 1.0]), 1);
        assert_eq!(strongest_bin(&[0.0, 0.0]), 0);
    }
}
