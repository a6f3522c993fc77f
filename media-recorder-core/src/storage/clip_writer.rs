use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::clip::{ClipMetadata, WavClip};
use crate::models::error::RecorderError;

/// Persist an encoded clip to `path` and return its sidecar metadata.
///
/// Creates missing parent directories. The metadata carries a SHA-256
/// checksum of the container bytes so a consumer can verify the file
/// before playing it.
pub fn save_clip(clip: &WavClip, path: &Path) -> Result<ClipMetadata, RecorderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RecorderError::Storage(format!("failed to create directory: {}", e)))?;
    }

    fs::write(path, clip.as_bytes())
        .map_err(|e| RecorderError::Storage(format!("failed to write clip: {}", e)))?;

    let checksum = sha256_hex(clip.as_bytes());
    log::info!("saved {} byte clip to {}", clip.len(), path.display());

    Ok(ClipMetadata::for_clip(clip, &path.to_string_lossy(), &checksum))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::wav;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("media_recorder_test_{}", name))
    }

    fn test_clip() -> WavClip {
        let bytes = wav::encode(&[0.1, 0.2, -0.1, -0.2], 44_100, 2, 1.0);
        WavClip::new(bytes, 44_100, 2, 2)
    }

    #[test]
    fn saves_container_bytes_verbatim() {
        let path = temp_path("verbatim.wav");
        let clip = test_clip();

        let metadata = save_clip(&clip, &path).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(written, clip.as_bytes());
        assert_eq!(written.len(), 44 + 8);
        assert_eq!(&written[0..4], b"RIFF");

        assert_eq!(metadata.file_path, path.to_string_lossy());
        assert_eq!(metadata.frames, 2);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn checksum_is_hex_sha256_of_container() {
        let path = temp_path("checksum.wav");
        let clip = test_clip();

        let metadata = save_clip(&clip, &path).unwrap();

        assert_eq!(metadata.checksum.len(), 64);
        assert_eq!(metadata.checksum, sha256_hex(clip.as_bytes()));

        fs::remove_file(&path).ok();
    }
}
