use crate::models::clip::WavClip;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// Event delegate for recording session notifications.
///
/// Methods may be called from the drain thread or a sink's playback
/// thread, not necessarily the thread driving the session.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: RecorderState) {
        let _ = state;
    }

    /// Called when a stopped session has produced its encoded clip.
    fn on_clip_ready(&self, clip: &WavClip) {
        let _ = clip;
    }

    /// Called when the playback endpoint accepts a clip.
    fn on_playback_ready(&self) {}

    /// Called when the playback endpoint finishes a clip.
    fn on_playback_ended(&self) {}

    /// Called when an error surfaces outside a direct method return.
    fn on_error(&self, error: &RecorderError) {
        let _ = error;
    }
}
