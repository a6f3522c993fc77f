/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → capturing → stopped
///            ↑           |
///            └── start ──┘
/// ```
///
/// `Stopped` is terminal until a new session is explicitly started, which
/// discards the held clip and returns to `Capturing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Capturing,
    Stopped,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}
