use serde::{Deserialize, Serialize};

/// An encoded WAV container held in memory.
///
/// Immutable once created: a fixed 44-byte header followed by interleaved
/// signed 16-bit little-endian PCM data. The session controller holds one
/// clip per stopped session and replaces it wholesale when a new recording
/// stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavClip {
    bytes: Vec<u8>,
    sample_rate: u32,
    channels: u16,
    frames: u64,
}

impl WavClip {
    pub fn new(bytes: Vec<u8>, sample_rate: u32, channels: u16, frames: u64) -> Self {
        Self {
            bytes,
            sample_rate,
            channels,
            frames,
        }
    }

    /// The full container, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total container size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel) in the data chunk.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Metadata stored alongside a persisted clip.
///
/// Serializable for the JSON sidecar written by `storage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipMetadata {
    pub id: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
}

impl ClipMetadata {
    pub fn for_clip(clip: &WavClip, file_path: &str, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            duration_secs: clip.duration_secs(),
            sample_rate: clip.sample_rate(),
            channels: clip.channels(),
            frames: clip.frames(),
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
