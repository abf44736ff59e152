//! Offline renderer — renders a note sequence to samples or a WAV buffer.
//!
//! Notes play strictly one after another (never overlapping), matching the
//! sequencer's live behavior. The same buffers back the WASM AudioWorklet
//! path and WAV export.

use crate::note::NoteEvent;

use super::voice::Voice;

/// Render a note sequence to mono f64 samples, one note after another.
///
/// Zero-duration notes contribute no samples. Output length is the sum of
/// each note's rounded sample count.
pub fn render(notes: &[NoteEvent], sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    let mut output = Vec::new();
    for note in notes {
        if note.duration().is_zero() {
            continue;
        }
        let mut voice = Voice::for_note(note, sr);
        output.reserve(voice.total_samples());
        for _ in 0..voice.total_samples() {
            output.push(voice.next_sample());
        }
    }
    output
}

/// Render to mono f32 samples for AudioWorklet playback.
pub fn render_samples(notes: &[NoteEvent], sample_rate: u32) -> Vec<f32> {
    render(notes, sample_rate)
        .iter()
        .map(|&s| s as f32)
        .collect()
}

/// Render a note sequence to a WAV file as bytes (16-bit mono PCM).
pub fn render_wav(notes: &[NoteEvent], sample_rate: u32) -> Vec<u8> {
    let pcm: Vec<i16> = render(notes, sample_rate)
        .iter()
        .map(|&s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect();
    encode_wav(&pcm, sample_rate, 1)
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
