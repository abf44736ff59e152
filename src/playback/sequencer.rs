//! Note sequencer — plays a sequence end to end, one note at a time.
//!
//! At most one playback pass is active per sequencer: the Idle/Playing
//! guard is a single atomic, so no locking is needed around the playback
//! state — there is exactly one mutator while a pass runs. UI-facing state
//! goes through a watch channel whose receivers only ever observe the
//! latest value, decoupled from audio timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::time::sleep;

use crate::error::PlaybackError;
use crate::note::NoteEvent;

use super::sink::{CpalSink, Tone, ToneSink};

/// UI-facing playback state: whether a pass is active and which note is
/// currently sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_index: Option<usize>,
}

impl PlaybackState {
    pub const IDLE: PlaybackState = PlaybackState {
        is_playing: false,
        current_index: None,
    };
}

/// How a playback pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Every note in the sequence sounded.
    Completed,
    /// The pass was cancelled through a [`StopToken`].
    Stopped,
}

/// Clonable cancellation token for a playback pass.
///
/// `stop()` takes effect within one note's duration: the sequencer checks
/// the token before each note and races it against the note's sleep.
#[derive(Debug, Clone)]
pub struct StopToken {
    tx: Arc<watch::Sender<bool>>,
}

impl StopToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        StopToken { tx: Arc::new(tx) }
    }

    /// Request cancellation of the pass holding this token.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `stop()` has been called; never resolves otherwise.
    async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender kept alive by self, so this is unreachable; park
                // rather than resolve spuriously.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for StopToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays note sequences through a [`ToneSink`], one pass at a time.
#[derive(Clone)]
pub struct Sequencer {
    sink: Arc<dyn ToneSink>,
    playing: Arc<AtomicBool>,
    state: Arc<watch::Sender<PlaybackState>>,
}

impl Sequencer {
    /// Sequencer on the default audio output device (opened lazily on the
    /// first note).
    pub fn new() -> Self {
        Sequencer::with_sink(Arc::new(CpalSink::new()))
    }

    pub fn with_sink(sink: Arc<dyn ToneSink>) -> Self {
        let (tx, _rx) = watch::channel(PlaybackState::IDLE);
        Sequencer {
            sink,
            playing: Arc::new(AtomicBool::new(false)),
            state: Arc::new(tx),
        }
    }

    /// Subscribe to playback-state updates for UI highlighting. Receivers
    /// observe the latest state at their own cadence; rapid note changes
    /// coalesce instead of queueing.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    /// Current playback state snapshot.
    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Play each note in order, end to end, non-overlapping.
    ///
    /// An empty sequence completes immediately without entering the
    /// Playing state. If a pass is already active the call is rejected
    /// with [`PlaybackError::AlreadyPlaying`]. Zero-duration notes are
    /// skipped. On return — completed, stopped, or failed — the state is
    /// back to Idle.
    pub async fn play_sequence(
        &self,
        notes: &[NoteEvent],
        stop: &StopToken,
    ) -> Result<PlayOutcome, PlaybackError> {
        if notes.is_empty() {
            return Ok(PlayOutcome::Completed);
        }

        self.playing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PlaybackError::AlreadyPlaying)?;
        let _guard = PassGuard {
            playing: &self.playing,
            state: &self.state,
        };

        for (index, note) in notes.iter().enumerate() {
            if stop.is_stopped() {
                self.sink.quiet();
                return Ok(PlayOutcome::Stopped);
            }

            let duration = note.duration();
            if duration.is_zero() {
                continue;
            }

            self.state.send_replace(PlaybackState {
                is_playing: true,
                current_index: Some(index),
            });

            self.sink.begin(Tone {
                frequency: note.frequency(),
                duration,
            })?;

            tokio::select! {
                _ = sleep(duration) => {}
                _ = stop.stopped() => {
                    self.sink.quiet();
                    return Ok(PlayOutcome::Stopped);
                }
            }
        }

        Ok(PlayOutcome::Completed)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets the pass to Idle on every exit path, including errors.
struct PassGuard<'a> {
    playing: &'a AtomicBool,
    state: &'a watch::Sender<PlaybackState>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(PlaybackState::IDLE);
        self.playing.store(false, Ordering::Release);
    }
}
