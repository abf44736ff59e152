//! Native playback — the audio output device and the async note sequencer.

pub mod sequencer;
pub mod sink;

pub use sequencer::{PlayOutcome, PlaybackState, Sequencer, StopToken};
pub use sink::{CpalSink, Tone, ToneSink};
