//! Frequency to equal-tempered note conversion (A4 = 440 Hz = MIDI 69).

use serde::{Deserialize, Serialize};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Nearest MIDI note to a frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number (0..=127)
    pub midi: u8,
    /// Scientific pitch name, e.g. `A4`
    pub name: String,
    /// Equal-tempered frequency of the note itself
    pub reference_hz: f32,
    /// Offset of the frequency from the note, in cents (-50..=50)
    pub cents: f32,
}

/// Fractional MIDI note number for a frequency in Hz
pub fn hz_to_midi(hz: f32) -> f32 {
    69.0 + 12.0 * (hz / 440.0).log2()
}

/// Frequency in Hz of a MIDI note number
pub fn midi_to_hz(midi: u8) -> f32 {
    440.0 * 2f32.powf((midi as f32 - 69.0) / 12.0)
}

/// Nearest note, or `None` outside the MIDI range or for non-positive input
pub fn nearest_note(hz: f32) -> Option<Note> {
    if !hz.is_finite() || hz <= 0.0 {
        return None;
    }

    let exact = hz_to_midi(hz);
    let rounded = exact.round();
    if !(0.0..=127.0).contains(&rounded) {
        return None;
    }

    let midi = rounded as u8;
    let octave = midi as i32 / 12 - 1;
    Some(Note {
        midi,
        name: format!("{}{}", NOTE_NAMES[midi as usize % 12], octave),
        reference_hz: midi_to_hz(midi),
        cents: (exact - rounded) * 100.0,
    })
}
