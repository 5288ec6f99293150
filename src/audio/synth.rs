// Test tone generation

use crate::analysis::SampleBuffer;
use crate::error::AnalysisError;

/// Mono sine tone of `frequency` Hz
///
/// Phase is computed in f64 so long tones stay clean of accumulated
/// rounding noise.
pub fn sine(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Result<SampleBuffer, AnalysisError> {
    if !(frequency.is_finite() && frequency >= 0.0) {
        return Err(AnalysisError::invalid(format!("frequency {} Hz", frequency)));
    }
    if !(duration_secs.is_finite() && duration_secs >= 0.0) {
        return Err(AnalysisError::invalid(format!("duration {} s", duration_secs)));
    }

    let len = (duration_secs as f64 * sample_rate as f64).round() as usize;
    let step = 2.0 * std::f64::consts::PI * frequency as f64 / sample_rate.max(1) as f64;
    let samples = (0..len)
        .map(|i| (amplitude as f64 * (step * i as f64).sin()) as f32)
        .collect();

    SampleBuffer::mono(samples, sample_rate)
}
