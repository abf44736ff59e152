use std::fmt;

/// A pitch-class name outside the closed 12-name vocabulary.
///
/// Returned by [`crate::note::PitchClass::parse`] so callers decide whether
/// to substitute a default or reject the note, instead of a silent fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPitchClass {
    pub name: String,
}

impl fmt::Display for UnknownPitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown pitch class '{}'", self.name)
    }
}

impl std::error::Error for UnknownPitchClass {}

/// Errors from the playback subsystem (tone sink + sequencer).
#[cfg(feature = "playback")]
#[derive(Debug)]
pub enum PlaybackError {
    /// A playback pass is already active; at most one runs at a time.
    AlreadyPlaying,
    /// No default audio output device on this host.
    NoOutputDevice,
    /// The output device does not offer an f32 stream format.
    UnsupportedFormat(String),
    /// The audio stream could not be created or started.
    Stream(String),
    /// The audio thread is gone; commands can no longer reach the device.
    SinkClosed,
}

#[cfg(feature = "playback")]
impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::AlreadyPlaying => write!(f, "A playback pass is already active"),
            PlaybackError::NoOutputDevice => write!(f, "No audio output device available"),
            PlaybackError::UnsupportedFormat(fmt_name) => {
                write!(f, "Unsupported output sample format: {fmt_name}")
            }
            PlaybackError::Stream(msg) => write!(f, "Audio stream error: {msg}"),
            PlaybackError::SinkClosed => write!(f, "Audio output thread has shut down"),
        }
    }
}

#[cfg(feature = "playback")]
impl std::error::Error for PlaybackError {}

#[cfg(feature = "playback")]
impl From<cpal::BuildStreamError> for PlaybackError {
    fn from(e: cpal::BuildStreamError) -> Self {
        PlaybackError::Stream(e.to_string())
    }
}

#[cfg(feature = "playback")]
impl From<cpal::PlayStreamError> for PlaybackError {
    fn from(e: cpal::PlayStreamError) -> Self {
        PlaybackError::Stream(e.to_string())
    }
}

#[cfg(feature = "playback")]
impl From<cpal::DefaultStreamConfigError> for PlaybackError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        PlaybackError::Stream(e.to_string())
    }
}
