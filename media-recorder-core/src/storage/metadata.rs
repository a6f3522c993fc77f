use std::fs;
use std::path::Path;

use crate::models::clip::ClipMetadata;
use crate::models::error::RecorderError;

/// Write clip metadata as a JSON sidecar file.
///
/// Creates `{clip_path}.metadata.json` alongside the clip.
pub fn write_metadata(metadata: &ClipMetadata, clip_path: &Path) -> Result<(), RecorderError> {
    let metadata_path = clip_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| RecorderError::Storage(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| RecorderError::Storage(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read clip metadata from a JSON sidecar file.
pub fn read_metadata(clip_path: &Path) -> Result<ClipMetadata, RecorderError> {
    let metadata_path = clip_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| RecorderError::Storage(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| RecorderError::Storage(format!("failed to parse metadata: {}", e)))
}
