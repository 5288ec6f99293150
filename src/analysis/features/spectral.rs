// Spectral module - Frequency-domain feature extraction
//
// Spectral shape descriptors computed from a magnitude vector and its
// parallel frequency vector (Hz, ascending).
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use crate::error::AnalysisError;

/// Default spectral rolloff threshold (85% of total magnitude)
pub const DEFAULT_ROLLOFF_PERCENTILE: f32 = 0.85;

fn validate_spectrum(
    magnitudes: &[f32],
    frequencies: &[f32],
    operation: &str,
) -> Result<(), AnalysisError> {
    if magnitudes.len() != frequencies.len() {
        return Err(AnalysisError::invalid(format!(
            "{}: {} magnitudes but {} frequencies",
            operation,
            magnitudes.len(),
            frequencies.len()
        )));
    }
    if magnitudes.is_empty() {
        return Err(AnalysisError::invalid(format!(
            "{}: empty magnitude spectrum",
            operation
        )));
    }
    if magnitudes.iter().any(|m| !m.is_finite() || *m < 0.0) {
        return Err(AnalysisError::invalid(format!(
            "{}: magnitudes must be finite and non-negative",
            operation
        )));
    }
    Ok(())
}

/// Compute spectral centroid (weighted mean frequency)
///
/// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
///
/// The spectral centroid represents the "center of mass" of the spectrum,
/// and is a measure of the brightness of a sound.
///
/// # Errors
/// * `InvalidInput` - lengths differ or the spectrum is empty
/// * `DivisionByZero` - every magnitude is zero
pub fn spectral_centroid(magnitudes: &[f32], frequencies: &[f32]) -> Result<f32, AnalysisError> {
    validate_spectrum(magnitudes, frequencies, "spectral centroid")?;

    let magnitude_sum: f64 = magnitudes.iter().map(|&m| m as f64).sum();
    if magnitude_sum <= 0.0 {
        return Err(AnalysisError::division_by_zero("spectral centroid"));
    }

    let weighted_sum: f64 = magnitudes
        .iter()
        .zip(frequencies)
        .map(|(&mag, &freq)| mag as f64 * freq as f64)
        .sum();

    Ok((weighted_sum / magnitude_sum) as f32)
}

/// Compute spectral rolloff
///
/// Walks the spectrum in the given (ascending) frequency order and returns
/// the first frequency at which the cumulative magnitude reaches
/// `percentile` of the total.
///
/// # Errors
/// * `InvalidInput` - percentile outside (0, 1], lengths differ, or empty spectrum
/// * `DivisionByZero` - every magnitude is zero
pub fn spectral_rolloff(
    magnitudes: &[f32],
    frequencies: &[f32],
    percentile: f32,
) -> Result<f32, AnalysisError> {
    if !(percentile > 0.0 && percentile <= 1.0) {
        return Err(AnalysisError::invalid(format!(
            "rolloff percentile {} outside (0, 1]",
            percentile
        )));
    }
    validate_spectrum(magnitudes, frequencies, "spectral rolloff")?;

    let total: f64 = magnitudes.iter().map(|&m| m as f64).sum();
    if total <= 0.0 {
        return Err(AnalysisError::division_by_zero("spectral rolloff"));
    }

    let threshold = percentile as f64 * total;
    let mut cumulative = 0.0f64;
    for (&mag, &freq) in magnitudes.iter().zip(frequencies) {
        cumulative += mag as f64;
        if cumulative >= threshold {
            return Ok(freq);
        }
    }

    // Rounding can leave the running sum a hair below a threshold of 1.0
    Ok(frequencies[frequencies.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQS: [f32; 3] = [100.0, 200.0, 300.0];
    const MAGS: [f32; 3] = [0.5, 0.3, 0.2];

    #[test]
    fn test_centroid_weighted_mean() {
        let centroid = spectral_centroid(&MAGS, &FREQS).unwrap();
        assert!((centroid - 170.0).abs() < 1e-3, "got {}", centroid);
    }

    #[test]
    fn test_centroid_single_peak() {
        let centroid = spectral_centroid(&[0.0, 2.0, 0.0], &FREQS).unwrap();
        assert_eq!(centroid, 200.0);
    }

    #[test]
    fn test_centroid_silent_spectrum_divides_by_zero() {
        assert!(matches!(
            spectral_centroid(&[0.0; 3], &FREQS),
            Err(AnalysisError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_centroid_rejects_mismatched_lengths() {
        assert!(matches!(
            spectral_centroid(&[1.0, 2.0], &FREQS),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            spectral_centroid(&[], &[]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rolloff_default_percentile() {
        let rolloff = spectral_rolloff(&MAGS, &FREQS, DEFAULT_ROLLOFF_PERCENTILE).unwrap();
        assert_eq!(rolloff, 300.0);
        assert!(FREQS.contains(&rolloff));
    }

    #[test]
    fn test_rolloff_low_percentile() {
        assert_eq!(spectral_rolloff(&MAGS, &FREQS, 0.4).unwrap(), 100.0);
        assert_eq!(spectral_rolloff(&MAGS, &FREQS, 0.6).unwrap(), 200.0);
        assert_eq!(spectral_rolloff(&MAGS, &FREQS, 1.0).unwrap(), 300.0);
    }

    #[test]
    fn test_rolloff_monotonic_in_percentile() {
        let freqs: Vec<f32> = (0..64).map(|i| i as f32 * 10.0).collect();
        let mags: Vec<f32> = (0..64).map(|i| ((i * 7) % 5) as f32 + 0.1).collect();

        let mut previous = 0.0;
        for step in 1..=20 {
            let p = step as f32 / 20.0;
            let rolloff = spectral_rolloff(&mags, &freqs, p).unwrap();
            assert!(
                rolloff >= previous,
                "rolloff decreased from {} to {} at p={}",
                previous,
                rolloff,
                p
            );
            previous = rolloff;
        }
    }

    #[test]
    fn test_rolloff_rejects_bad_percentile() {
        for p in [0.0, -0.1, 1.5, f32::NAN] {
            assert!(matches!(
                spectral_rolloff(&MAGS, &FREQS, p),
                Err(AnalysisError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_rolloff_silent_spectrum_divides_by_zero() {
        assert!(matches!(
            spectral_rolloff(&[0.0; 3], &FREQS, 0.85),
            Err(AnalysisError::DivisionByZero { .. })
        ));
    }
}
