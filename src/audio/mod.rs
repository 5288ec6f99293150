// Audio I/O adapters
//
// The analysis core consumes in-memory buffers only; these helpers bridge
// WAV files and synthetic tones into `SampleBuffer`s for the CLI and tests.

pub mod synth;
pub mod wav;

pub use synth::sine;
pub use wav::{read_wav, write_wav};
