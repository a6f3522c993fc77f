use thiserror::Error;

/// Errors that can occur while recording or playing back a clip.
///
/// Every variant is reported to the caller; none is fatal to the process,
/// and nothing is retried automatically — recording is user-driven.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// The capture device was denied or is missing. The session stays idle
    /// and the caller may retry.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// `start()` was called while a session is already capturing.
    #[error("a recording session is already active")]
    AlreadyRecording,

    /// `stop()` was called with no active session.
    #[error("no recording in progress")]
    NotRecording,

    /// `play()` was called before any recording was stopped.
    #[error("nothing has been recorded")]
    NothingRecorded,

    /// The two channel sequences handed to the interleaver differ in length.
    #[error("channel length mismatch: left={left}, right={right}")]
    ChannelLengthMismatch { left: usize, right: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A byte sequence could not be decoded as a WAV container.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("storage error: {0}")]
    Storage(String),
}
