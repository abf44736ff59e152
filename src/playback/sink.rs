//! Tone sink — the seam between the sequencer and the audio output device.
//!
//! `CpalSink` runs a dedicated audio thread that owns the cpal stream; the
//! device is opened lazily on the first tone and reused for every pass
//! afterwards, keeping a single coherent time base. Commands reach the
//! thread over a crossbeam channel; the thread exits when the sink drops.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::dsp::voice::Voice;
use crate::error::PlaybackError;

/// One tone request: resolved frequency plus how long it should sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f64,
    pub duration: Duration,
}

/// Where synthesized tones go. Implemented by [`CpalSink`] for the real
/// device and by in-memory fakes in tests.
pub trait ToneSink: Send + Sync {
    /// Start sounding a tone; it decays on its own after `tone.duration`.
    fn begin(&self, tone: Tone) -> Result<(), PlaybackError>;
    /// Cut the current tone short (playback stopped).
    fn quiet(&self);
}

enum SinkCommand {
    Begin(Tone),
    Quiet,
}

/// Tone sink backed by the process-wide default audio output device.
pub struct CpalSink {
    commands: Mutex<Option<Sender<SinkCommand>>>,
}

impl CpalSink {
    /// Create the sink without touching the device; the stream is opened
    /// on the first [`begin`](ToneSink::begin).
    pub fn new() -> Self {
        CpalSink {
            commands: Mutex::new(None),
        }
    }

    fn send(&self, cmd: SinkCommand) -> Result<(), PlaybackError> {
        let mut guard = self.commands.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(start_audio_thread()?);
        }
        let tx = guard.as_ref().ok_or(PlaybackError::SinkClosed)?;
        if tx.send(cmd).is_err() {
            // Audio thread died; drop the stale handle so a later call
            // can reconnect.
            *guard = None;
            return Err(PlaybackError::SinkClosed);
        }
        Ok(())
    }
}

impl Default for CpalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneSink for CpalSink {
    fn begin(&self, tone: Tone) -> Result<(), PlaybackError> {
        self.send(SinkCommand::Begin(tone))
    }

    fn quiet(&self) {
        let _ = self.send(SinkCommand::Quiet);
    }
}

/// Spawn the audio thread and wait for it to open the output stream.
fn start_audio_thread() -> Result<Sender<SinkCommand>, PlaybackError> {
    let (cmd_tx, cmd_rx) = unbounded::<SinkCommand>();
    let (ready_tx, ready_rx) = bounded::<Result<u32, PlaybackError>>(1);

    thread::Builder::new()
        .name("solfa-audio".into())
        .spawn(move || audio_thread(cmd_rx, ready_tx))
        .map_err(|e| PlaybackError::Stream(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(sample_rate)) => {
            log::info!("audio output ready at {sample_rate} Hz");
            Ok(cmd_tx)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(PlaybackError::SinkClosed),
    }
}

fn audio_thread(cmd_rx: Receiver<SinkCommand>, ready_tx: Sender<Result<u32, PlaybackError>>) {
    let slot: Arc<Mutex<Option<Voice>>> = Arc::new(Mutex::new(None));

    let stream = match open_stream(slot.clone()) {
        Ok((stream, sample_rate)) => {
            let _ = ready_tx.send(Ok(sample_rate));
            (stream, sample_rate)
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    let (_stream, sample_rate) = stream;

    // The stream stays alive for as long as this loop runs; the loop ends
    // when the sink (and its command sender) is dropped.
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            SinkCommand::Begin(tone) => {
                let voice = Voice::new(
                    tone.frequency,
                    tone.duration.as_secs_f64(),
                    sample_rate as f64,
                );
                *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(voice);
            }
            SinkCommand::Quiet => {
                *slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
            }
        }
    }
}

fn open_stream(
    slot: Arc<Mutex<Option<Voice>>>,
) -> Result<(cpal::Stream, u32), PlaybackError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(PlaybackError::NoOutputDevice)?;
    let config = device.default_output_config()?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(PlaybackError::UnsupportedFormat(format!(
            "{:?}",
            config.sample_format()
        )));
    }

    let sample_rate = config.sample_rate().0;
    let stream_config: cpal::StreamConfig = config.into();
    let channels = stream_config.channels as usize;

    let err_fn = |err: cpal::StreamError| {
        log::warn!("audio stream error: {err}");
    };

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let mut voice = slot.lock().unwrap_or_else(|e| e.into_inner());
            for frame in data.chunks_mut(channels) {
                let sample = match voice.as_mut() {
                    Some(v) => v.next_sample() as f32,
                    None => 0.0,
                };
                for out in frame.iter_mut() {
                    *out = sample;
                }
            }
            if voice.as_ref().is_some_and(|v| v.is_finished()) {
                *voice = None;
            }
        },
        err_fn,
        None,
    )?;
    stream.play()?;

    Ok((stream, sample_rate))
}
