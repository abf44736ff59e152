//! DSP core — pure Rust tone synthesis.
//!
//! Deterministic and wasm-safe: the same voices back the offline renderer
//! (AudioWorklet buffers, WAV export) and the native playback sink.

pub mod envelope;
pub mod oscillator;
pub mod renderer;
pub mod voice;
