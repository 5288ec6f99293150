//! Integration tests for the public extraction API
//!
//! These tests drive the crate the way a caller would:
//! - WAV file -> SampleBuffer -> FeatureReport
//! - the 1 s / 440 Hz reference scenario
//! - sharing one extractor across threads
//! - error codes surfaced to callers

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use voice_features::audio::{read_wav, sine, write_wav};
use voice_features::telemetry::{AnalysisEvent, EventCollector};
use voice_features::{AnalysisConfig, AnalysisError, ErrorCode, FeatureExtractor, SampleBuffer};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "voice_features_it_{}_{}",
        std::process::id(),
        name
    ))
}

#[test]
fn test_reference_tone_scenario() {
    let tone = sine(440.0, 1.0, 44100, 1.0).unwrap();
    let config = AnalysisConfig {
        window_size: 2048,
        hop_size: 512,
        ..AnalysisConfig::default()
    };
    let report = FeatureExtractor::new(config).unwrap().extract(&tone).unwrap();

    assert_eq!(report.spectrogram.frame_count(), (44100 - 2048) / 512 + 1);
    assert_eq!(report.spectrogram.frame_count(), 83);
    assert_eq!(report.spectrogram.bin_count(), 1025);

    let mean_dominant: f32 =
        report.dominant_frequencies.iter().sum::<f32>() / report.dominant_frequencies.len() as f32;
    assert!(
        (mean_dominant - 440.0).abs() < 22.0,
        "mean dominant frequency {} Hz",
        mean_dominant
    );

    let centroid = report.spectral_centroid.unwrap();
    assert!((centroid - 440.0).abs() < 10.0, "centroid {} Hz", centroid);

    let pitch = report.pitch_hz.unwrap();
    assert!((pitch - 440.0).abs() < 10.0, "pitch {} Hz", pitch);
}

#[test]
fn test_int16_wav_file_analysis() {
    let path = scratch_path("a440.wav");
    write_wav(&path, &sine(440.0, 1.0, 44100, 1.0).unwrap()).unwrap();

    let buffer = read_wav(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let report = FeatureExtractor::default().extract(&buffer).unwrap();
    assert_eq!(report.sample_rate, 44100);
    assert!((report.duration_secs - 1.0).abs() < 0.1);
    assert!(report.peak_amplitude > 0.99);
    assert!(report.rms > 0.0);

    let dominant = report.dominant_frequency.unwrap();
    assert!((dominant - 440.0).abs() < 22.0, "dominant {} Hz", dominant);
}

#[test]
fn test_shared_extractor_across_threads() {
    let extractor = Arc::new(FeatureExtractor::default());
    let frequencies = [220.0f32, 330.0, 440.0, 660.0];

    let handles: Vec<_> = frequencies
        .iter()
        .map(|&frequency| {
            let extractor = Arc::clone(&extractor);
            thread::spawn(move || {
                let tone = sine(frequency, 0.5, 22050, 0.5).unwrap();
                (frequency, extractor.extract(&tone).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (frequency, report) = handle.join().expect("worker panicked");
        let pitch = report.pitch_hz.unwrap();
        assert!(
            (pitch - frequency).abs() < frequency * 0.05,
            "{} Hz tone detected as {} Hz",
            frequency,
            pitch
        );
    }
}

#[test]
fn test_errors_carry_codes() {
    let collector = Arc::new(EventCollector::default());
    let extractor = FeatureExtractor::default().with_observer(collector.clone());
    let empty = SampleBuffer::mono(Vec::new(), 44100).unwrap();

    let err = extractor.extract(&empty).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    assert_eq!(err.code(), 3001);

    let rejected = collector.events_where(|e| matches!(e, AnalysisEvent::InputRejected { .. }));
    assert_eq!(rejected.len(), 1);
}

#[test]
fn test_report_json_is_flat_record() {
    let tone = sine(440.0, 0.25, 8000, 0.5).unwrap();
    let report = FeatureExtractor::default().extract(&tone).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "sample_rate",
        "duration_secs",
        "peak_amplitude",
        "rms",
        "zero_crossing_rate",
        "pitch_hz",
        "dominant_frequencies",
        "spectral_centroid",
        "spectral_rolloff",
        "frequencies",
        "times",
        "magnitudes",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
}
