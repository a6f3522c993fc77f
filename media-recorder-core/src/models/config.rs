/// Configuration for a recording session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    /// Output sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Linear gain applied during 16-bit quantization (default: 1.0).
    pub volume: f32,

    /// Capacity of the block queue between the capture callback and the
    /// accumulator, in blocks (default: 64). When full, newly delivered
    /// blocks are dropped whole and counted in the session diagnostics.
    pub queue_blocks: usize,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!("invalid volume: {}", self.volume));
        }
        if self.queue_blocks == 0 {
            return Err("queue capacity must be at least one block".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            volume: 1.0,
            queue_blocks: 64,
        }
    }
}
