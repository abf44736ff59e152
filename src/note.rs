//! Pitch classes, the octave-4 reference table, and note events.
//!
//! Frequencies follow equal temperament with A4 = 440 Hz. The resolver
//! scales the reference frequency by powers of two per octave offset:
//! `frequency(P, O) = reference(P) * 2^(O - 4)`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPitchClass;

/// The canonical reference octave for the frequency table.
pub const REFERENCE_OCTAVE: i32 = 4;

/// Frequency substituted for an unrecognized pitch-class name (A4).
pub const FALLBACK_FREQUENCY: f64 = 440.0;

/// One of the 12 semitone names within an octave, using sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    #[serde(rename = "C#")]
    Cs,
    D,
    #[serde(rename = "D#")]
    Ds,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    G,
    #[serde(rename = "G#")]
    Gs,
    A,
    #[serde(rename = "A#")]
    As,
    B,
}

impl PitchClass {
    /// All 12 pitch classes in semitone order from C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Display name, e.g. "C#".
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a pitch-class name (case-insensitive, sharps only).
    ///
    /// An unrecognized name is an error — callers that want the legacy
    /// 440 Hz substitution use [`frequency_for_name`] instead.
    pub fn parse(name: &str) -> Result<PitchClass, UnknownPitchClass> {
        let pc = match name.trim() {
            "C" | "c" => PitchClass::C,
            "C#" | "c#" => PitchClass::Cs,
            "D" | "d" => PitchClass::D,
            "D#" | "d#" => PitchClass::Ds,
            "E" | "e" => PitchClass::E,
            "F" | "f" => PitchClass::F,
            "F#" | "f#" => PitchClass::Fs,
            "G" | "g" => PitchClass::G,
            "G#" | "g#" => PitchClass::Gs,
            "A" | "a" => PitchClass::A,
            "A#" | "a#" => PitchClass::As,
            "B" | "b" => PitchClass::B,
            other => {
                return Err(UnknownPitchClass {
                    name: other.to_string(),
                });
            }
        };
        Ok(pc)
    }

    /// Reference frequency in Hz at octave 4.
    pub fn reference_frequency(self) -> f64 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::Cs => 277.18,
            PitchClass::D => 293.66,
            PitchClass::Ds => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::Fs => 369.99,
            PitchClass::G => 392.00,
            PitchClass::Gs => 415.30,
            PitchClass::A => 440.00,
            PitchClass::As => 466.16,
            PitchClass::B => 493.88,
        }
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Playback frequency of a pitch class at the given octave.
///
/// Each octave above/below the reference octave doubles/halves the
/// frequency. Octave is not bounds-checked: values outside a sane
/// instrument range (0–8) produce physically meaningless but valid
/// frequencies.
pub fn frequency(pitch: PitchClass, octave: i32) -> f64 {
    pitch.reference_frequency() * octave_factor(octave)
}

/// Legacy string lookup: unrecognized names degrade to the 440 Hz
/// reference pitch, scaled by the octave offset.
///
/// Kept for compatibility with the original demo; the substitution can
/// mask upstream mapping bugs, so it is logged.
pub fn frequency_for_name(name: &str, octave: i32) -> f64 {
    match PitchClass::parse(name) {
        Ok(pc) => frequency(pc, octave),
        Err(e) => {
            log::warn!("{e}; substituting {FALLBACK_FREQUENCY} Hz reference");
            FALLBACK_FREQUENCY * octave_factor(octave)
        }
    }
}

fn octave_factor(octave: i32) -> f64 {
    (2.0_f64).powi(octave - REFERENCE_OCTAVE)
}

/// A single musical note to be displayed and/or played.
///
/// Read-only once produced; held in an ordered sequence for the lifetime
/// of one processed recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: PitchClass,
    pub octave: i32,
    pub duration_seconds: f64,
}

impl NoteEvent {
    pub fn new(pitch: PitchClass, octave: i32, duration_seconds: f64) -> Self {
        NoteEvent {
            pitch,
            octave,
            duration_seconds,
        }
    }

    /// Playback frequency in Hz.
    pub fn frequency(&self) -> f64 {
        frequency(self.pitch, self.octave)
    }

    /// Note duration. Non-positive or non-finite durations clamp to zero;
    /// zero-length notes are skipped by the renderer and sequencer.
    pub fn duration(&self) -> Duration {
        if self.duration_seconds.is_finite() && self.duration_seconds > 0.0 {
            Duration::from_secs_f64(self.duration_seconds)
        } else {
            Duration::ZERO
        }
    }
}
