// WAV decoding/encoding via hound

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::analysis::SampleBuffer;

/// Decode a WAV file into a normalized, interleaved `SampleBuffer`
///
/// Supports IEEE float and 8/16/24/32-bit integer PCM with any channel
/// count; channel reduction is left to the extractor.
pub fn read_wav(path: &Path) -> Result<SampleBuffer> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();

    let buffer = match spec.sample_format {
        hound::SampleFormat::Float => {
            let samples = reader
                .samples::<f32>()
                .map(|sample| sample.map_err(|err| anyhow!(err)))
                .collect::<Result<Vec<f32>>>()?;
            SampleBuffer::new(samples, spec.sample_rate, spec.channels)
        }
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => {
                let samples = reader
                    .samples::<i16>()
                    .map(|sample| sample.map_err(|err| anyhow!(err)))
                    .collect::<Result<Vec<i16>>>()?;
                SampleBuffer::from_i16(&samples, spec.sample_rate, spec.channels)
            }
            8 | 24 | 32 => {
                let samples = reader
                    .samples::<i32>()
                    .map(|sample| sample.map_err(|err| anyhow!(err)))
                    .collect::<Result<Vec<i32>>>()?;
                SampleBuffer::from_i32(&samples, spec.bits_per_sample, spec.sample_rate, spec.channels)
            }
            other => {
                return Err(anyhow!(
                    "Unsupported bits per sample {} in {}",
                    other,
                    path.display()
                ));
            }
        },
    };

    buffer.with_context(|| format!("decoding {}", path.display()))
}

/// Write a buffer as 16-bit PCM, clamping samples to [-1.0, 1.0]
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &sample in buffer.samples() {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer
            .write_sample(value)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}
