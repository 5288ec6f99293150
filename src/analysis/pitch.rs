// PitchDetector - autocorrelation fundamental-frequency estimate
//
// Algorithm:
// 1. Autocorrelate the whole signal, keeping non-negative lags 0..N-1
//    (computed through a zero-padded FFT: |FFT(x)|² -> inverse FFT)
// 2. Find the first local maximum at lag > 0
// 3. pitch = sample_rate / lag
//
// This is a best-effort estimator: it makes octave errors and reports
// `None` rather than failing when the signal has no periodic peak.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::AnalysisError;

/// Autocorrelation at lag 0 below this is treated as silence
const SILENCE_ENERGY: f64 = 1e-12;

/// Lags within this fraction of the lag-0 energy are FFT round-off and read as zero
const NOISE_FLOOR: f64 = 1e-9;

/// Estimate the fundamental frequency of `signal`
///
/// # Returns
/// `Ok(Some(hz))` for the first autocorrelation peak, `Ok(None)` when there
/// is no peak (silence, too few samples, monotonically decaying correlation).
///
/// # Errors
/// `InvalidInput` when `sample_rate` is zero.
pub fn detect_pitch(signal: &[f32], sample_rate: u32) -> Result<Option<f32>, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::invalid("sample rate must be positive"));
    }
    if signal.len() < 3 {
        return Ok(None);
    }

    let mut correlation = autocorrelation(signal);
    if correlation[0] <= SILENCE_ENERGY {
        return Ok(None);
    }
    suppress_noise_floor(&mut correlation);

    Ok(first_peak(&correlation).map(|lag| (sample_rate as f64 / lag as f64) as f32))
}

/// Non-normalized autocorrelation for lags 0..N-1
///
/// Padding to at least 2N keeps the circular correlation from wrapping, so
/// the result equals Σ x[n]·x[n+k] up to rounding.
pub fn autocorrelation(signal: &[f32]) -> Vec<f64> {
    let len = signal.len();
    if len == 0 {
        return Vec::new();
    }

    let fft_size = (2 * len).next_power_of_two();
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&x| Complex::new(x as f64, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_size)
        .collect();

    forward.process(&mut buffer);
    for value in buffer.iter_mut() {
        *value = Complex::new(value.norm_sqr(), 0.0);
    }
    inverse.process(&mut buffer);

    // rustfft leaves the inverse unscaled
    let scale = fft_size as f64;
    buffer[..len].iter().map(|c| c.re / scale).collect()
}

fn suppress_noise_floor(correlation: &mut [f64]) {
    let floor = correlation[0] * NOISE_FLOOR;
    for value in correlation.iter_mut().skip(1) {
        if value.abs() <= floor {
            *value = 0.0;
        }
    }
}

/// First local maximum strictly after lag 0
///
/// A peak must rise from its left neighbour and later fall; flat tops report
/// their middle lag. Lag 0 and the final lag can never be peaks.
fn first_peak(values: &[f64]) -> Option<usize> {
    let n = values.len();
    let mut i = 1;
    while i + 1 < n {
        if values[i - 1] < values[i] {
            let mut end = i;
            while end + 1 < n && values[end + 1] == values[i] {
                end += 1;
            }
            if end + 1 < n && values[end + 1] < values[i] {
                return Some((i + end) / 2);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    None
}
