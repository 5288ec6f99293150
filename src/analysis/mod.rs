// Feature extraction pipeline
//
// Turns a SampleBuffer into a FeatureReport:
// 1. Reduce to mono (channel average)
// 2. Peak amplitude and RMS on the time-domain signal
// 3. Zero-crossing rate
// 4. Short-time magnitude spectrogram + per-frame dominant frequency
// 5. Centroid / rolloff / dominant frequency of the frame-averaged spectrum
// 6. Autocorrelation pitch estimate
//
// Stages run sequentially on the calling thread. The extractor holds only
// immutable configuration, so separate buffers can be analyzed in parallel
// through one shared extractor.

pub mod buffer;
pub mod features;
pub mod fft;
pub mod notes;
pub mod pitch;
pub mod spectrogram;


use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub use buffer::SampleBuffer;
pub use features::{FeatureReport, FeatureSummary, Spectrogram};
pub use fft::WindowFunction;
pub use notes::Note;
pub use spectrogram::{SpectralAnalysis, SpectralAnalyzer};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ErrorCode};
use crate::telemetry::{
    AnalysisEvent, AnalysisObserver, AnalysisStage, Feature, TracingObserver, UndefinedReason,
};

/// Spectral shape of the frame-averaged spectrum
struct SpectralShape {
    dominant_frequency: Option<f32>,
    centroid: Option<f32>,
    rolloff: Option<f32>,
}

/// FeatureExtractor coordinates the analysis stages
pub struct FeatureExtractor {
    config: AnalysisConfig,
    analyzer: SpectralAnalyzer,
    observer: Arc<dyn AnalysisObserver>,
}

impl FeatureExtractor {
    /// Create an extractor that reports through `tracing`
    ///
    /// # Errors
    /// `InvalidInput` if the configuration fails validation.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let analyzer =
            SpectralAnalyzer::new(config.window_size, config.hop_size, config.window_function)?;

        Ok(Self {
            config,
            analyzer,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the observer receiving pipeline events
    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract the full feature report from a buffer
    ///
    /// Pitch, dominant frequency, centroid and rolloff are `None` when the
    /// signal is too short for one window, silent, or aperiodic; each such
    /// downgrade is reported to the observer as `FeatureUndefined`.
    ///
    /// # Errors
    /// `InvalidInput` for an empty buffer (before any stage runs) or a
    /// single-frame buffer (zero-crossing rate needs two samples).
    pub fn extract(&self, buffer: &SampleBuffer) -> Result<FeatureReport, AnalysisError> {
        if buffer.is_empty() {
            return Err(self.reject(AnalysisError::invalid("sample buffer is empty")));
        }

        let sample_rate = buffer.sample_rate();
        let signal = self.timed(AnalysisStage::MonoReduction, || buffer.to_mono());

        let (peak_amplitude, rms) = self.checked(AnalysisStage::Amplitude, || {
            Ok((
                features::peak_amplitude(&signal)?,
                features::root_mean_square(&signal)?,
            ))
        })?;

        let zero_crossing_rate = self.checked(AnalysisStage::ZeroCrossing, || {
            features::zero_crossing_rate(&signal)
        })?;

        let analysis = self.checked(AnalysisStage::Spectrogram, || {
            self.analyzer.analyze(&signal, sample_rate)
        })?;

        let shape = self.checked(AnalysisStage::SpectralShape, || {
            self.spectral_shape(&analysis.spectrogram)
        })?;

        let pitch_hz = self.checked(AnalysisStage::Pitch, || {
            pitch::detect_pitch(&signal, sample_rate)
        })?;
        if pitch_hz.is_none() {
            self.undefined(Feature::Pitch, UndefinedReason::NoPeriodicity);
        }

        Ok(FeatureReport {
            sample_rate,
            source_channels: buffer.channels(),
            duration_secs: buffer.duration_secs(),
            peak_amplitude,
            rms,
            zero_crossing_rate,
            pitch_hz,
            pitch_note: pitch_hz.and_then(notes::nearest_note),
            dominant_frequencies: analysis.dominant_frequencies,
            dominant_frequency: shape.dominant_frequency,
            spectral_centroid: shape.centroid,
            spectral_rolloff: shape.rolloff,
            spectrogram: analysis.spectrogram,
        })
    }

    /// Extract reports for independent buffers on scoped worker threads
    ///
    /// Results keep the order of `buffers`; one failure does not affect the
    /// other buffers.
    pub fn extract_batch(
        &self,
        buffers: &[SampleBuffer],
    ) -> Vec<Result<FeatureReport, AnalysisError>> {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(buffers.len())
            .max(1);
        let chunk_size = buffers.len().div_ceil(workers).max(1);

        thread::scope(|scope| {
            let handles: Vec<_> = buffers
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|buffer| self.extract(buffer))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Centroid, rolloff and dominant bin of the frame-averaged spectrum
    ///
    /// An empty grid or an all-zero spectrum leaves the three fields
    /// undefined; any other error propagates.
    fn spectral_shape(&self, grid: &Spectrogram) -> Result<SpectralShape, AnalysisError> {
        let Some(mean) = grid.mean_spectrum() else {
            self.undefined_shape(UndefinedReason::InsufficientSignal);
            return Ok(SpectralShape {
                dominant_frequency: None,
                centroid: None,
                rolloff: None,
            });
        };

        let frequencies = grid.frequencies();
        let centroid = features::spectral_centroid(&mean, frequencies);
        let rolloff =
            features::spectral_rolloff(&mean, frequencies, self.config.rolloff_percentile);

        match (centroid, rolloff) {
            (Ok(centroid), Ok(rolloff)) => Ok(SpectralShape {
                dominant_frequency: Some(frequencies[spectrogram::strongest_bin(&mean)]),
                centroid: Some(centroid),
                rolloff: Some(rolloff),
            }),
            (Err(AnalysisError::DivisionByZero { .. }), Err(AnalysisError::DivisionByZero { .. })) => {
                self.undefined_shape(UndefinedReason::Silent);
                Ok(SpectralShape {
                    dominant_frequency: None,
                    centroid: None,
                    rolloff: None,
                })
            }
            (Err(err), _) | (_, Err(err)) => Err(err),
        }
    }

    fn undefined_shape(&self, reason: UndefinedReason) {
        self.undefined(Feature::DominantFrequency, reason);
        self.undefined(Feature::SpectralCentroid, reason);
        self.undefined(Feature::SpectralRolloff, reason);
    }

    fn undefined(&self, feature: Feature, reason: UndefinedReason) {
        self.observer
            .on_event(&AnalysisEvent::FeatureUndefined { feature, reason });
    }

    fn reject(&self, err: AnalysisError) -> AnalysisError {
        self.observer.on_event(&AnalysisEvent::InputRejected {
            code: err.code(),
            message: err.message(),
        });
        err
    }

    /// Run a fallible stage; a failure is reported as `InputRejected`
    fn checked<T>(
        &self,
        stage: AnalysisStage,
        run: impl FnOnce() -> Result<T, AnalysisError>,
    ) -> Result<T, AnalysisError> {
        self.timed(stage, run).map_err(|err| self.reject(err))
    }

    fn timed<T>(&self, stage: AnalysisStage, run: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = run();
        self.observer.on_event(&AnalysisEvent::StageCompleted {
            stage,
            elapsed_us: started.elapsed().as_micros() as u64,
        });
        result
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            analyzer: SpectralAnalyzer::default(),
            observer: Arc::new(TracingObserver),
        }
    }
}
