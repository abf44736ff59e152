pub mod dsp;
pub mod error;
pub mod mapping;
pub mod note;
#[cfg(feature = "playback")]
pub mod playback;

use crate::mapping::TranscribedWord;
use crate::note::NoteEvent;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the solfa-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: map transcribed words (with millisecond timestamps) to
/// the detected musical notes, in the transcript's order.
#[wasm_bindgen]
pub fn map_transcript(words: JsValue) -> Result<JsValue, JsValue> {
    let words: Vec<TranscribedWord> =
        serde_wasm_bindgen::from_value(words).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let notes = mapping::map_words(&words);
    serde_wasm_bindgen::to_value(&notes).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render a note-event sequence to a WAV byte array.
#[wasm_bindgen]
pub fn render_notes_wav(notes: JsValue, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let notes: Vec<NoteEvent> =
        serde_wasm_bindgen::from_value(notes).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(dsp::renderer::render_wav(&notes, sample_rate))
}

/// WASM-exposed: render a note-event sequence to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_notes_samples(notes: JsValue, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let notes: Vec<NoteEvent> =
        serde_wasm_bindgen::from_value(notes).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(dsp::renderer::render_samples(&notes, sample_rate))
}

/// WASM-exposed: full pipeline — map transcribed words to notes and render
/// them to a WAV byte array in one call.
#[wasm_bindgen]
pub fn render_transcript_wav(words: JsValue, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let words: Vec<TranscribedWord> =
        serde_wasm_bindgen::from_value(words).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let events = mapping::map_words_to_events(&words);
    Ok(dsp::renderer::render_wav(&events, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline_words_to_wav() {
        // End-to-end: transcript -> notes -> rendered WAV
        let words = vec![
            TranscribedWord {
                text: "do".to_string(),
                start_ms: 0,
                end_ms: 400,
            },
            TranscribedWord {
                text: "and".to_string(),
                start_ms: 400,
                end_ms: 600,
            },
            TranscribedWord {
                text: "mi".to_string(),
                start_ms: 600,
                end_ms: 1000,
            },
        ];

        let events = mapping::map_words_to_events(&words);
        assert_eq!(events.len(), 2);

        let wav = dsp::renderer::render_wav(&events, 22050);
        assert_eq!(&wav[0..4], b"RIFF");
        assert!(wav.len() > 44, "WAV should have audio data");

        // Verify it's not all silence
        let mut has_nonzero = false;
        for i in (44..wav.len()).step_by(2) {
            if i + 1 < wav.len() {
                let sample = i16::from_le_bytes([wav[i], wav[i + 1]]);
                if sample != 0 {
                    has_nonzero = true;
                    break;
                }
            }
        }
        assert!(has_nonzero, "Rendered WAV should contain non-silent audio");
    }
}
