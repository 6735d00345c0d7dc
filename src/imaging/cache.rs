//! Content-addressed thumbnail names.
//!
//! Encoding is the expensive part of serving a thumbnail, so every output
//! file is named after what it contains: the SHA-256 of the source bytes plus
//! the SHA-256 of the generation parameters. If a file with that name already
//! exists, the backend reuses it instead of decoding and re-encoding.
//!
//! - **source hash**: content-based rather than mtime-based, so it survives
//!   `git checkout` and copies that reset modification times.
//! - **params hash**: size, crop flag, and quality. Changing any of them
//!   yields a new name, so stale thumbnails are never served.
//!
//! Renaming or moving a source image keeps its thumbnails valid; editing it
//! produces new ones.

use crate::size::Size;
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

/// Number of hex characters of the combined digest kept in file names.
const NAME_HASH_LEN: usize = 16;

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of the parameters that shape a thumbnail.
pub fn hash_thumbnail_params(size: Size, crop: bool, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    hasher.update(size.width().to_le_bytes());
    hasher.update(size.height().to_le_bytes());
    hasher.update([u8::from(crop)]);
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// File name for a thumbnail: `{stem}-{size}-{hash}.{ext}`.
///
/// The stem keeps names readable; only the hash part identifies content.
pub fn thumbnail_filename(
    stem: &str,
    size: Size,
    source_hash: &str,
    params_hash: &str,
    extension: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_hash.as_bytes());
    hasher.update(b":");
    hasher.update(params_hash.as_bytes());
    let combined = format!("{:x}", hasher.finalize());
    format!(
        "{}-{}-{}.{}",
        stem,
        size,
        &combined[..NAME_HASH_LEN],
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn size(w: u32, h: u32) -> Size {
        Size::new(w, h).unwrap()
    }

    #[test]
    fn hash_file_is_content_based() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let b = tmp.path().join("b.jpg");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());

        fs::write(&b, b"other bytes").unwrap();
        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn hash_file_missing_is_error() {
        assert!(hash_file(Path::new("/nonexistent/source.jpg")).is_err());
    }

    #[test]
    fn params_hash_changes_with_each_input() {
        let base = hash_thumbnail_params(size(640, 360), true, 85);
        assert_eq!(base, hash_thumbnail_params(size(640, 360), true, 85));
        assert_ne!(base, hash_thumbnail_params(size(641, 360), true, 85));
        assert_ne!(base, hash_thumbnail_params(size(640, 361), true, 85));
        assert_ne!(base, hash_thumbnail_params(size(640, 360), false, 85));
        assert_ne!(base, hash_thumbnail_params(size(640, 360), true, 90));
    }

    #[test]
    fn filename_layout() {
        let name = thumbnail_filename("photo", size(640, 360), "aaa", "bbb", "jpg");
        assert!(name.starts_with("photo-640x360-"));
        assert!(name.ends_with(".jpg"));
        let hash = name
            .trim_start_matches("photo-640x360-")
            .trim_end_matches(".jpg");
        assert_eq!(hash.len(), NAME_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn filename_depends_on_source_and_params() {
        let a = thumbnail_filename("photo", size(640, 360), "src1", "p", "jpg");
        let b = thumbnail_filename("photo", size(640, 360), "src2", "p", "jpg");
        let c = thumbnail_filename("photo", size(640, 360), "src1", "q", "jpg");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
