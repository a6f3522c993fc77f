use crate::models::error::RecorderError;

/// Flatten a channel's block list into one contiguous sample sequence.
///
/// Blocks are copied in arrival order with no resampling or gain. Block
/// lengths may differ (in practice only the last block can be short).
/// O(total samples), single allocation.
pub fn merge_blocks(blocks: &[Vec<f32>]) -> Vec<f32> {
    let total: usize = blocks.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for block in blocks {
        merged.extend_from_slice(block);
    }
    merged
}

/// Combine two equal-length channel sequences into one interleaved stereo
/// sequence `[L0, R0, L1, R1, ...]`.
///
/// A length mismatch means the capture path delivered the channels out of
/// lockstep; that is reported as `ChannelLengthMismatch` rather than
/// truncated away, since truncation would mask the delivery bug.
pub fn interleave(left: &[f32], right: &[f32]) -> Result<Vec<f32>, RecorderError> {
    if left.len() != right.len() {
        return Err(RecorderError::ChannelLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut stereo = vec![0.0f32; left.len() * 2];
    for i in 0..left.len() {
        stereo[i * 2] = left[i];
        stereo[i * 2 + 1] = right[i];
    }
    Ok(stereo)
}
