// SampleBuffer - validated interleaved audio handed to the pipeline

use std::borrow::Cow;

use crate::error::AnalysisError;

/// Interleaved floating-point samples with their sample rate and channel count
///
/// Construction validates the invariants once; afterwards the buffer is
/// read-only. An empty buffer is constructible but rejected by extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Wrap interleaved samples
    ///
    /// # Errors
    /// `InvalidInput` if `sample_rate` or `channels` is zero, the sample count
    /// is not a multiple of `channels`, or any sample is NaN/infinite.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::invalid("sample rate must be positive"));
        }
        if channels == 0 {
            return Err(AnalysisError::invalid("channel count must be at least 1"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AnalysisError::invalid(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::invalid(format!(
                "sample {} is not finite",
                index
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Single-channel convenience constructor
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        Self::new(samples, sample_rate, 1)
    }

    /// Normalize 16-bit PCM to [-1.0, 1.0]
    ///
    /// Scales by `i16::MAX`; `i16::MIN` clamps to -1.0.
    pub fn from_i16(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Self, AnalysisError> {
        let max = i16::MAX as f32;
        Self::new(
            samples.iter().map(|&s| (s as f32 / max).max(-1.0)).collect(),
            sample_rate,
            channels,
        )
    }

    /// Normalize integer PCM of `bits_per_sample` (8..=32) to [-1.0, 1.0]
    ///
    /// Scales by the positive full scale; the most negative code clamps to -1.0.
    pub fn from_i32(
        samples: &[i32],
        bits_per_sample: u16,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AnalysisError> {
        if !(8..=32).contains(&bits_per_sample) {
            return Err(AnalysisError::invalid(format!(
                "unsupported bits per sample {}",
                bits_per_sample
            )));
        }

        let max = ((1i64 << (bits_per_sample - 1)) - 1) as f64;
        Self::new(
            samples
                .iter()
                .map(|&s| ((s as f64 / max) as f32).max(-1.0))
                .collect(),
            sample_rate,
            channels,
        )
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Samples per channel
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        (self.frame_count() as f64 / self.sample_rate as f64) as f32
    }

    /// Average channels per frame; borrows when the buffer is already mono
    pub fn to_mono(&self) -> Cow<'_, [f32]> {
        if self.channels == 1 {
            return Cow::Borrowed(&self.samples);
        }

        let channels = self.channels as usize;
        Cow::Owned(
            self.samples
                .chunks_exact(channels)
                .map(|frame| (frame.iter().map(|&s| s as f64).sum::<f64>() / channels as f64) as f32)
                .collect(),
        )
    }
}
