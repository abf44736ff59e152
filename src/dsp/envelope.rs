//! Duration-scoped amplitude envelope.
//!
//! Unlike a gate-driven ADSR, the note's full duration is known up front:
//! the release ramp is positioned so the level returns to zero exactly on
//! the final sample. All segments are linear in amplitude, so the envelope
//! has no instantaneous jumps (no audible clicks).

/// Attack ramp time in seconds, capped at a quarter of the note.
const ATTACK_TIME: f64 = 0.015;
/// Decay ramp time in seconds, capped at a quarter of the note.
const DECAY_TIME: f64 = 0.06;
/// Sustain level after decay.
const SUSTAIN_LEVEL: f64 = 0.7;
/// Release ramp time in seconds, capped at a quarter of the note.
const RELEASE_TIME: f64 = 0.08;

/// Linear attack/decay/sustain/release envelope over a fixed sample count.
#[derive(Debug, Clone)]
pub struct NoteEnvelope {
    total_samples: usize,
    attack_end: usize,
    decay_end: usize,
    release_start: usize,
    sustain: f64,
    pos: usize,
}

impl NoteEnvelope {
    /// Build an envelope spanning `duration_seconds` at `sample_rate`.
    ///
    /// Ramps are capped at 25% of the duration each, so even very short
    /// notes keep the attack → sustain → release shape scaled down rather
    /// than clipping mid-ramp.
    pub fn for_duration(duration_seconds: f64, sample_rate: f64) -> Self {
        let total_samples = ((duration_seconds * sample_rate).round() as usize).max(1);
        let quarter = duration_seconds / 4.0;

        let attack = (ATTACK_TIME.min(quarter) * sample_rate) as usize;
        let decay = (DECAY_TIME.min(quarter) * sample_rate) as usize;
        let release = (RELEASE_TIME.min(quarter) * sample_rate) as usize;

        let attack_end = attack.min(total_samples);
        let decay_end = (attack_end + decay).min(total_samples);
        // Ramp caps guarantee attack + decay ends before the release starts
        let release_start = total_samples - release.min(total_samples - decay_end);

        NoteEnvelope {
            total_samples,
            attack_end,
            decay_end,
            release_start,
            sustain: SUSTAIN_LEVEL,
            pos: 0,
        }
    }

    /// Total number of samples this envelope spans.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Generate the next envelope sample in [0, 1]; 0 once finished.
    pub fn next_sample(&mut self) -> f64 {
        if self.pos >= self.total_samples {
            return 0.0;
        }
        let level = self.level_at(self.pos);
        self.pos += 1;
        level
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.total_samples
    }

    fn level_at(&self, pos: usize) -> f64 {
        if pos < self.attack_end {
            // 0 → 1
            (pos as f64 + 1.0) / self.attack_end as f64
        } else if pos < self.decay_end {
            // 1 → sustain
            let t = (pos - self.attack_end) as f64 / (self.decay_end - self.attack_end) as f64;
            1.0 - (1.0 - self.sustain) * t
        } else if pos < self.release_start {
            self.sustain
        } else if self.release_start < self.total_samples {
            // sustain → 0, reaching 0 on the final sample
            let len = (self.total_samples - self.release_start) as f64;
            let t = (pos + 1 - self.release_start) as f64 / len;
            self.sustain * (1.0 - t)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(env: &mut NoteEnvelope) -> Vec<f64> {
        let n = env.total_samples();
        (0..n).map(|_| env.next_sample()).collect()
    }

    #[test]
    fn spans_exact_duration() {
        let env = NoteEnvelope::for_duration(0.5, 44100.0);
        assert_eq!(env.total_samples(), 22050);
    }

    #[test]
    fn starts_low_ends_at_zero() {
        let mut env = NoteEnvelope::for_duration(0.5, 44100.0);
        let samples = render(&mut env);
        assert!(samples[0] < 0.01, "First sample should be near 0, got {}", samples[0]);
        assert!(
            samples[samples.len() - 1].abs() < 1e-9,
            "Final sample should be 0, got {}",
            samples[samples.len() - 1]
        );
        assert!(env.is_finished());
    }

    #[test]
    fn reaches_peak_then_sustain() {
        let mut env = NoteEnvelope::for_duration(1.0, 44100.0);
        let samples = render(&mut env);
        let peak = samples.iter().cloned().fold(0.0_f64, f64::max);
        assert!((peak - 1.0).abs() < 0.01, "Peak should reach ~1.0, got {peak}");

        // Middle of the note sits at the sustain level
        let mid = samples[samples.len() / 2];
        assert!(
            (mid - SUSTAIN_LEVEL).abs() < 0.01,
            "Mid-note level should be ~{SUSTAIN_LEVEL}, got {mid}"
        );
    }

    #[test]
    fn no_discontinuities() {
        let mut env = NoteEnvelope::for_duration(0.5, 44100.0);
        let samples = render(&mut env);
        for w in samples.windows(2) {
            let step = (w[1] - w[0]).abs();
            assert!(step < 0.01, "Adjacent samples jump by {step}");
        }
    }

    #[test]
    fn output_in_range() {
        let mut env = NoteEnvelope::for_duration(0.3, 44100.0);
        for s in render(&mut env) {
            assert!((0.0..=1.0).contains(&s), "Envelope out of range: {s}");
        }
    }

    #[test]
    fn short_note_keeps_shape() {
        // 10 ms note: ramps scale down to 2.5 ms each
        let mut env = NoteEnvelope::for_duration(0.01, 44100.0);
        let samples = render(&mut env);
        assert_eq!(samples.len(), 441);
        assert!(samples[0] < 0.05);
        assert!(samples[samples.len() - 1].abs() < 1e-9);
        let peak = samples.iter().cloned().fold(0.0_f64, f64::max);
        assert!(peak > 0.5, "Even a short note should rise well above 0, got {peak}");
    }

    #[test]
    fn finished_envelope_is_silent() {
        let mut env = NoteEnvelope::for_duration(0.01, 44100.0);
        render(&mut env);
        assert!(env.is_finished());
        assert_eq!(env.next_sample(), 0.0);
    }
}
