// FFT module - windowed magnitude spectra
//
// Applies a tapering window to a frame and returns the magnitude of the
// non-negative frequency half of its discrete Fourier transform.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

/// Tapering function applied to each analysis frame before transforming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// Raised-cosine window, the default for spectral analysis
    #[default]
    Hann,
    Hamming,
    Blackman,
    /// No tapering
    Rectangular,
}

impl WindowFunction {
    /// Compute the symmetric window coefficients for a frame of `size` samples
    pub fn coefficients(self, size: usize) -> Vec<f32> {
        if size <= 1 {
            return vec![1.0; size];
        }

        let denom = (size - 1) as f32;
        (0..size)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / denom;
                match self {
                    WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
                    WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
                    WindowFunction::Blackman => {
                        0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
                    }
                    WindowFunction::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

/// Computes windowed magnitude spectra for fixed-size frames
///
/// The transform is planned once at construction; the plan is immutable and
/// shareable across threads.
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - Frame length in samples (ideally a power of two)
    /// * `window_function` - Taper applied before transforming
    pub fn new(fft_size: usize, window_function: WindowFunction) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window: window_function.coefficients(fft_size),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of non-negative frequency bins produced per frame
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute the magnitude spectrum of one frame
    ///
    /// # Arguments
    /// * `frame` - Exactly `fft_size` time-domain samples
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        debug_assert_eq!(frame.len(), self.fft_size);

        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        buffer[..self.bin_count()].iter().map(|c| c.norm()).collect()
    }
}
