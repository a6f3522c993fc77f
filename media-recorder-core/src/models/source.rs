/// A capture device backing a `CaptureSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Counters for debugging a recording session.
///
/// Reset when a session starts; updated by the drain thread while capturing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    /// Blocks that arrived from the capture source.
    pub blocks_delivered: u64,

    /// Blocks dropped whole because the block queue was full.
    pub blocks_dropped: u64,

    /// Frames appended to each channel list so far.
    pub frames_accumulated: u64,
}
