//! # media-recorder-cpal
//!
//! cpal backend for media-recorder.
//!
//! Provides:
//! - `CpalMicSource` — microphone capture via the system default input device
//! - `CpalPlaybackSink` — clip playback via the system default output device
//!
//! ## Usage
//! ```ignore
//! use media_recorder_core::{Recorder, RecorderConfig};
//! use media_recorder_cpal::{CpalMicSource, CpalPlaybackSink};
//!
//! let mic = CpalMicSource::default_device()?;
//! let config = RecorderConfig {
//!     sample_rate: mic.sample_rate(),
//!     ..Default::default()
//! };
//! let sink = CpalPlaybackSink::default_device()?;
//! let mut recorder = Recorder::with_config(mic, sink, config);
//!
//! recorder.start()?;
//! // ... capture runs until ...
//! recorder.stop()?;
//! recorder.play()?;
//! ```

pub mod mic;
pub mod playback;

pub use mic::CpalMicSource;
pub use playback::CpalPlaybackSink;
