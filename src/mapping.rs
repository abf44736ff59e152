//! Transcript-to-notes mapping.
//!
//! Converts recognized words (with word-level timestamps) into musical
//! notes: letter names ("a".."g"), solfège syllables ("do".."ti"), and
//! common phonetic variants the recognizer produces ("bee", "soh", ...).
//! A word maps if it matches a table entry whole, or failing that, if the
//! first table entry in order is a prefix of it.

use serde::{Deserialize, Serialize};

use crate::note::{NoteEvent, PitchClass};

/// Word table in match-priority order. Earlier entries win the prefix scan.
const WORD_NOTES: &[(&str, PitchClass)] = &[
    ("a", PitchClass::A),
    ("b", PitchClass::B),
    ("c", PitchClass::C),
    ("d", PitchClass::D),
    ("e", PitchClass::E),
    ("f", PitchClass::F),
    ("g", PitchClass::G),
    ("do", PitchClass::C),
    ("re", PitchClass::D),
    ("mi", PitchClass::E),
    ("fa", PitchClass::F),
    ("sol", PitchClass::G),
    ("la", PitchClass::A),
    ("si", PitchClass::B),
    ("ti", PitchClass::B),
    // Phonetic variations
    ("ay", PitchClass::A),
    ("bee", PitchClass::B),
    ("see", PitchClass::C),
    ("dee", PitchClass::D),
    ("ee", PitchClass::E),
    ("ef", PitchClass::F),
    ("gee", PitchClass::G),
    ("doh", PitchClass::C),
    ("ray", PitchClass::D),
    ("me", PitchClass::E),
    ("fah", PitchClass::F),
    ("soh", PitchClass::G),
    ("lah", PitchClass::A),
    ("tee", PitchClass::B),
];

/// Octave assigned to mapped notes; the demo plays everything in the
/// middle octave.
pub const MAPPED_OCTAVE: i32 = 4;

/// One recognized word with millisecond timestamps, as returned by the
/// speech-recognition collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribedWord {
    pub text: String,
    /// Word start, in milliseconds from the beginning of the recording.
    pub start_ms: u64,
    /// Word end, in milliseconds.
    pub end_ms: u64,
}

/// A note detected in the transcript, with timing in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedNote {
    pub note: PitchClass,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl MappedNote {
    /// Convert to a playable note event in the mapped octave.
    pub fn to_event(&self) -> NoteEvent {
        NoteEvent::new(self.note, MAPPED_OCTAVE, self.duration)
    }
}

/// Find a musical note within a single word, or None if it carries no note.
pub fn find_note_in_word(word: &str) -> Option<PitchClass> {
    let cleaned = normalize(word);
    if cleaned.is_empty() {
        return None;
    }

    // Whole-word match first
    if let Some(&(_, pc)) = WORD_NOTES.iter().find(|(w, _)| *w == cleaned) {
        return Some(pc);
    }

    // Then word beginnings, first entry in table order wins
    WORD_NOTES
        .iter()
        .find(|(w, _)| cleaned.starts_with(w))
        .map(|&(_, pc)| pc)
}

/// Lowercase and strip punctuation; keeps alphanumeric characters only.
fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Convert transcribed words into notes with timing information.
///
/// Words that carry no note are skipped. Output order follows input order.
pub fn map_words(words: &[TranscribedWord]) -> Vec<MappedNote> {
    let mut notes = Vec::new();
    for word in words {
        let Some(pc) = find_note_in_word(&word.text) else {
            log::debug!("no note in word {:?}", word.text);
            continue;
        };
        let start = word.start_ms as f64 / 1000.0;
        let end = word.end_ms as f64 / 1000.0;
        log::debug!("word {:?} -> {pc} ({start:.3}s..{end:.3}s)", word.text);
        notes.push(MappedNote {
            note: pc,
            start,
            end,
            duration: end - start,
        });
    }
    notes
}

/// Convert transcribed words straight to playable note events.
pub fn map_words_to_events(words: &[TranscribedWord]) -> Vec<NoteEvent> {
    map_words(words).iter().map(MappedNote::to_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start_ms: u64, end_ms: u64) -> TranscribedWord {
        TranscribedWord {
            text: text.to_string(),
            start_ms,
            end_ms,
        }
    }

    #[test]
    fn whole_word_letters() {
        assert_eq!(find_note_in_word("A"), Some(PitchClass::A));
        assert_eq!(find_note_in_word("g"), Some(PitchClass::G));
    }

    #[test]
    fn whole_word_solfege() {
        assert_eq!(find_note_in_word("do"), Some(PitchClass::C));
        assert_eq!(find_note_in_word("re"), Some(PitchClass::D));
        assert_eq!(find_note_in_word("mi"), Some(PitchClass::E));
        assert_eq!(find_note_in_word("fa"), Some(PitchClass::F));
        assert_eq!(find_note_in_word("sol"), Some(PitchClass::G));
        assert_eq!(find_note_in_word("la"), Some(PitchClass::A));
        assert_eq!(find_note_in_word("si"), Some(PitchClass::B));
        assert_eq!(find_note_in_word("ti"), Some(PitchClass::B));
    }

    #[test]
    fn phonetic_variants() {
        assert_eq!(find_note_in_word("bee"), Some(PitchClass::B));
        assert_eq!(find_note_in_word("soh"), Some(PitchClass::G));
        assert_eq!(find_note_in_word("ray"), Some(PitchClass::D));
    }

    #[test]
    fn prefix_match_in_table_order() {
        // "solo" is not a whole-word match; "sol" prefixes it
        assert_eq!(find_note_in_word("solo"), Some(PitchClass::G));
        // Any word starting with a letter entry maps to that letter —
        // original demo behavior, "apple" begins with "a"
        assert_eq!(find_note_in_word("apple"), Some(PitchClass::A));
        // Whole-word match beats an earlier prefix entry: "see" is in the
        // table as C even though "s" prefixes nothing earlier
        assert_eq!(find_note_in_word("see"), Some(PitchClass::C));
    }

    #[test]
    fn punctuation_and_case_stripped() {
        assert_eq!(find_note_in_word("Do,"), Some(PitchClass::C));
        assert_eq!(find_note_in_word("  Ti! "), Some(PitchClass::B));
    }

    #[test]
    fn unmapped_words_skipped() {
        assert_eq!(find_note_in_word("hello"), None);
        assert_eq!(find_note_in_word("zebra"), None);
        assert_eq!(find_note_in_word(""), None);
        assert_eq!(find_note_in_word("..."), None);
    }

    #[test]
    fn map_words_timing_in_seconds() {
        let words = vec![
            word("do", 0, 500),
            word("hello", 500, 900),
            word("re", 1000, 1400),
        ];
        let notes = map_words(&words);
        assert_eq!(notes.len(), 2);

        assert_eq!(notes[0].note, PitchClass::C);
        assert!((notes[0].start - 0.0).abs() < 1e-9);
        assert!((notes[0].end - 0.5).abs() < 1e-9);
        assert!((notes[0].duration - 0.5).abs() < 1e-9);

        assert_eq!(notes[1].note, PitchClass::D);
        assert!((notes[1].start - 1.0).abs() < 1e-9);
        assert!((notes[1].duration - 0.4).abs() < 1e-9);
    }

    #[test]
    fn events_use_mapped_octave() {
        let words = vec![word("la", 200, 700)];
        let events = map_words_to_events(&words);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pitch, PitchClass::A);
        assert_eq!(events[0].octave, MAPPED_OCTAVE);
        assert!((events[0].duration_seconds - 0.5).abs() < 1e-9);
        assert!((events[0].frequency() - 440.0).abs() < 1e-9);
    }

    #[test]
    fn mapped_note_json_shape() {
        let notes = map_words(&[word("mi", 100, 350)]);
        let json = serde_json::to_value(&notes[0]).unwrap();
        assert_eq!(json["note"], "E");
        assert!((json["start"].as_f64().unwrap() - 0.1).abs() < 1e-9);
        assert!((json["duration"].as_f64().unwrap() - 0.25).abs() < 1e-9);
    }
}
