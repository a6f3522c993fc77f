/// Which half of the stereo stream a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Accumulates per-channel sample blocks for the duration of a session.
///
/// Blocks are deep-copied on append — the capture source may recycle its
/// delivery buffer as soon as the callback returns. Lists grow without
/// bound while a session is active; recordings are bounded by the operator
/// stopping them, so linear growth is the accepted cost.
///
/// Wrap in `Arc<parking_lot::Mutex<_>>` for cross-thread access: the drain
/// thread appends while the application thread reads counters, and `stop`
/// takes the lists only after the drain thread has been joined.
#[derive(Debug, Default)]
pub struct ChannelAccumulator {
    left: Vec<Vec<f32>>,
    right: Vec<Vec<f32>>,
}

impl ChannelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an owned copy of `block` to `channel`'s list.
    pub fn append(&mut self, channel: Channel, block: &[f32]) {
        let list = match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
        };
        list.push(block.to_vec());
    }

    /// Clear both lists. Called exactly once at session start.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    /// Number of blocks per channel.
    ///
    /// Both channels are fed from the same synchronized stream, so the two
    /// lists stay in lockstep.
    pub fn block_count(&self) -> usize {
        debug_assert_eq!(self.left.len(), self.right.len());
        self.left.len()
    }

    /// Total frames accumulated per channel.
    pub fn frames(&self) -> usize {
        self.left.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Move both lists out, leaving the accumulator empty.
    pub fn take(&mut self) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
        (std::mem::take(&mut self.left), std::mem::take(&mut self.right))
    }
}
