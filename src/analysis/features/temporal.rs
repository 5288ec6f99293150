// Temporal module - Time-domain feature extraction
//
// Amplitude and sign-change statistics computed directly on the sample
// sequence.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use crate::error::AnalysisError;

/// Compute root-mean-square amplitude
///
/// Formula: RMS = sqrt((1 / N) × Σ x[n]²)
///
/// # Errors
/// `InvalidInput` for an empty sequence (the mean is undefined).
pub fn root_mean_square(samples: &[f32]) -> Result<f32, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::invalid(
            "root mean square of an empty sequence",
        ));
    }

    let sum_squares: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    Ok((sum_squares / samples.len() as f64).sqrt() as f32)
}

/// Largest absolute sample value
///
/// # Errors
/// `InvalidInput` for an empty sequence.
pub fn peak_amplitude(samples: &[f32]) -> Result<f32, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::invalid("peak amplitude of an empty sequence"));
    }

    Ok(samples.iter().fold(0.0f32, |peak, &x| peak.max(x.abs())))
}

/// Compute zero-crossing rate (ZCR)
///
/// Counts adjacent pairs whose signs differ and divides by the number of
/// pairs (N - 1). Zero counts as non-negative, so `0.0 -> -0.5` is a
/// crossing while `0.0 -> 0.5` is not.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0)
///
/// # Errors
/// `InvalidInput` for sequences shorter than two samples.
pub fn zero_crossing_rate(samples: &[f32]) -> Result<f32, AnalysisError> {
    if samples.len() < 2 {
        return Err(AnalysisError::invalid(format!(
            "zero-crossing rate needs at least 2 samples (got {})",
            samples.len()
        )));
    }

    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
        .count();

    Ok(crossings as f32 / (samples.len() - 1) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_mixed_signal() {
        let rms = root_mean_square(&[0.5, -0.5, 0.25, -0.25]).unwrap();
        assert!((rms - 0.375f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_rms_zero_iff_silent() {
        assert_eq!(root_mean_square(&[0.0; 16]).unwrap(), 0.0);
        assert!(root_mean_square(&[0.0, 0.0, 1e-3]).unwrap() > 0.0);
    }

    #[test]
    fn test_rms_empty_is_invalid() {
        assert!(matches!(
            root_mean_square(&[]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_peak_amplitude_uses_absolute_value() {
        assert_eq!(peak_amplitude(&[0.2, -0.9, 0.5]).unwrap(), 0.9);
        assert!(peak_amplitude(&[]).is_err());
    }

    #[test]
    fn test_zcr_alternating_signal_is_one() {
        let zcr = zero_crossing_rate(&[0.5, -0.5, 0.25, -0.25]).unwrap();
        assert_eq!(zcr, 1.0);
    }

    #[test]
    fn test_zcr_constant_sign_is_zero() {
        assert_eq!(zero_crossing_rate(&[0.1, 0.4, 0.9, 0.2]).unwrap(), 0.0);
        assert_eq!(zero_crossing_rate(&[-0.1, -0.4, -0.9]).unwrap(), 0.0);
    }

    #[test]
    fn test_zcr_treats_zero_as_non_negative() {
        // 0 -> +: no crossing, + -> 0: no crossing, 0 -> -: crossing
        let zcr = zero_crossing_rate(&[0.0, 0.5, 0.0, -0.5]).unwrap();
        assert!((zcr - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(zero_crossing_rate(&[0.0; 8]).unwrap(), 0.0);
    }

    #[test]
    fn test_zcr_requires_two_samples() {
        assert!(zero_crossing_rate(&[]).is_err());
        assert!(matches!(
            zero_crossing_rate(&[1.0]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zcr_stays_in_unit_range_for_noise() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let noise: Vec<f32> = (0..4096).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let zcr = zero_crossing_rate(&noise).unwrap();
        assert!((0.0..=1.0).contains(&zcr));
        assert!(zcr > 0.3, "expected noisy ZCR, got {}", zcr);
    }
}
