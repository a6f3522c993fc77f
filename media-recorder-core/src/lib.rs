//! # media-recorder-core
//!
//! Platform-agnostic recording core.
//!
//! Accumulates per-channel sample blocks from a capture backend for the
//! duration of a session, then merges them into contiguous channels,
//! interleaves into stereo, and encodes a 16-bit PCM WAV container held
//! in memory for storage or playback. Backends implement the
//! `CaptureSource` trait and plug into the generic `Recorder`.
//!
//! ## Architecture
//!
//! ```text
//! media-recorder-core (this crate)
//! ├── traits/       ← CaptureSource, PlaybackSink, RecorderDelegate
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig, WavClip, ...
//! ├── processing/   ← ChannelAccumulator, merge/interleave, WAV encoding
//! ├── session/      ← Recorder (generic orchestrator)
//! └── storage/      ← clip persistence + JSON sidecar metadata
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::clip::{ClipMetadata, WavClip};
pub use models::config::RecorderConfig;
pub use models::error::RecorderError;
pub use models::source::{SessionDiagnostics, SourceInfo};
pub use models::state::RecorderState;
pub use processing::accumulator::{Channel, ChannelAccumulator};
pub use processing::wav::WavHeader;
pub use session::recorder::Recorder;
pub use traits::capture_source::{BlockCallback, CaptureSource};
pub use traits::playback_sink::{PlaybackObserver, PlaybackSink};
pub use traits::recorder_delegate::RecorderDelegate;
