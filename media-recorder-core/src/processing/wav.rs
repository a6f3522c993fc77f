//! WAV container encoding.
//!
//! Produces the one byte-exact external artifact of the pipeline: a fixed
//! 44-byte RIFF header followed by interleaved signed 16-bit little-endian
//! PCM data. The layout must stay stable for interoperability with
//! standard WAV consumers.

use crate::models::error::RecorderError;

/// Size of the RIFF header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

/// Generate the 44-byte header for a 16-bit PCM container.
///
/// `data_len` is the size of the data chunk in bytes. Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_len
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte rate = sample_rate * channels
/// [32-33]  block align = channels * 2
/// [34-35]  16 (bits per sample)
/// [36-39]  "data"
/// [40-43]  data_len
/// ```
pub fn wav_header(sample_rate: u32, channels: u16, data_len: u32) -> [u8; WAV_HEADER_LEN] {
    let byte_rate = sample_rate * channels as u32;
    let block_align = channels * 2;
    let chunk_size = 36 + data_len;

    let mut header = [0u8; WAV_HEADER_LEN];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&16u16.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());

    header
}

/// Quantize one normalized sample to signed 16-bit PCM.
///
/// `volume` is a linear multiplier applied before quantization. The scaled
/// value is rounded, then clamped at the integer rails: full-scale inputs
/// map to ±32767 and only over-range negative input reaches -32768.
pub fn quantize(sample: f32, volume: f32) -> i16 {
    let scaled = (sample as f64 * 32767.0 * volume as f64).round();
    scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Encode interleaved normalized samples into a complete WAV container.
///
/// Output length is always `44 + samples.len() * 2` bytes.
pub fn encode(samples: &[f32], sample_rate: u32, channels: u16, volume: f32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;

    let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2);
    bytes.extend_from_slice(&wav_header(sample_rate, channels, data_len));
    for &sample in samples {
        bytes.extend_from_slice(&quantize(sample, volume).to_le_bytes());
    }
    bytes
}

/// Header fields decoded back out of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Decode the fixed header at the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, RecorderError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(RecorderError::MalformedContainer(format!(
                "container too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(RecorderError::MalformedContainer("missing RIFF/WAVE magic".into()));
        }
        if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
            return Err(RecorderError::MalformedContainer("missing fmt/data chunks".into()));
        }

        Ok(Self {
            channels: u16::from_le_bytes([bytes[22], bytes[23]]),
            sample_rate: u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            bits_per_sample: u16::from_le_bytes([bytes[34], bytes[35]]),
            data_len: u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]),
        })
    }

    /// Frames in the data chunk.
    pub fn frames(&self) -> u64 {
        let frame_bytes = self.channels as u64 * (self.bits_per_sample as u64 / 8);
        if frame_bytes == 0 {
            return 0;
        }
        self.data_len as u64 / frame_bytes
    }
}
