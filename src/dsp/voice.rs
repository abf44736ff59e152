//! Voice — a single note instance combining oscillator + envelope.

use crate::note::NoteEvent;

use super::envelope::NoteEnvelope;
use super::oscillator::SineOscillator;

/// Headroom applied to every voice so envelope peaks stay comfortably
/// inside [-1, 1] on the output device.
const VOICE_GAIN: f64 = 0.8;

/// A single voice: one sine oscillator shaped by a duration-scoped envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: SineOscillator,
    envelope: NoteEnvelope,
}

impl Voice {
    /// Voice for an arbitrary frequency and duration.
    pub fn new(frequency: f64, duration_seconds: f64, sample_rate: f64) -> Self {
        Voice {
            oscillator: SineOscillator::new(frequency, sample_rate),
            envelope: NoteEnvelope::for_duration(duration_seconds, sample_rate),
        }
    }

    /// Voice for a note event, at its resolved playback frequency.
    pub fn for_note(note: &NoteEvent, sample_rate: f64) -> Self {
        Voice::new(note.frequency(), note.duration_seconds, sample_rate)
    }

    /// Number of samples this voice spans.
    pub fn total_samples(&self) -> usize {
        self.envelope.total_samples()
    }

    /// Generate the next sample; 0 once the envelope has finished.
    pub fn next_sample(&mut self) -> f64 {
        if self.envelope.is_finished() {
            return 0.0;
        }
        self.oscillator.next_sample() * self.envelope.next_sample() * VOICE_GAIN
    }

    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    #[test]
    fn voice_produces_sound() {
        let mut v = Voice::new(440.0, 0.1, 44100.0);
        let mut has_nonzero = false;
        for _ in 0..v.total_samples() {
            if v.next_sample().abs() > 0.01 {
                has_nonzero = true;
            }
        }
        assert!(has_nonzero, "Voice should produce non-zero output");
    }

    #[test]
    fn voice_output_bounded() {
        let mut v = Voice::new(880.0, 0.2, 44100.0);
        for _ in 0..v.total_samples() {
            let s = v.next_sample();
            assert!(s.abs() <= 1.0, "Voice output out of range: {s}");
        }
    }

    #[test]
    fn voice_finishes_after_duration() {
        let mut v = Voice::new(440.0, 0.05, 44100.0);
        let n = v.total_samples();
        assert_eq!(n, 2205);
        for _ in 0..n {
            v.next_sample();
        }
        assert!(v.is_finished());
        assert_eq!(v.next_sample(), 0.0);
    }

    #[test]
    fn for_note_uses_resolved_frequency() {
        let note = NoteEvent::new(PitchClass::A, 5, 0.1);
        let v = Voice::for_note(&note, 44100.0);
        assert_eq!(v.total_samples(), 4410);
        assert!((v.oscillator.frequency - 880.0).abs() < 1e-9);
    }
}
