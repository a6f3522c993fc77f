use std::sync::Arc;

use crate::models::clip::WavClip;
use crate::models::error::RecorderError;

/// Playback lifecycle signals, consumed by the session controller.
pub trait PlaybackObserver: Send + Sync {
    /// The sink has accepted the clip and playback can begin.
    fn on_ready(&self);

    /// Playback reached the end of the clip.
    fn on_ended(&self);
}

/// Interface for playback endpoints.
///
/// A sink receives a complete encoded container and an observer for its
/// ready/ended signals. Sinks that play asynchronously may invoke the
/// observer from their own thread; the sink itself is driven from the
/// session's thread.
pub trait PlaybackSink {
    fn play(&mut self, clip: &WavClip, observer: Arc<dyn PlaybackObserver>) -> Result<(), RecorderError>;
}
