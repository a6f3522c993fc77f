use std::sync::Arc;

use crate::models::error::RecorderError;
use crate::models::source::SourceInfo;

/// Callback invoked once per captured block.
///
/// Parameters are the left and right channel samples of one block, both the
/// same length, normalized to [-1.0, 1.0]. The slices are only valid for
/// the duration of the call — the source may reuse its buffers — so
/// receivers must copy what they keep.
pub type BlockCallback = Arc<dyn Fn(&[f32], &[f32]) + Send + Sync + 'static>;

/// Interface for audio input backends.
///
/// Implementations deliver split-channel blocks at a fixed device-driven
/// cadence while started. The callback fires on the backend's capture
/// thread — keep processing minimal. The session drives the source itself
/// from a single thread, so implementations holding non-`Send` stream
/// handles are fine.
pub trait CaptureSource {
    /// Whether the underlying device is currently available.
    fn is_available(&self) -> bool;

    /// Begin capture, delivering blocks via `callback` until `stop`.
    ///
    /// A missing or denied device is reported as
    /// `RecorderError::CaptureUnavailable`.
    fn start(&mut self, callback: BlockCallback) -> Result<(), RecorderError>;

    /// Stop capture and release the device.
    fn stop(&mut self) -> Result<(), RecorderError>;

    /// The device backing this source.
    fn info(&self) -> SourceInfo;
}
