//! Parameter types for thumbnail operations.
//!
//! These structs describe *what* to produce, not *how*. The
//! [`RustBackend`](super::rust_backend::RustBackend) plans a
//! [`ThumbnailParams`] for every request and then executes it, so the
//! planning step can be tested without decoding any pixels.

use crate::size::Size;
use std::path::{Path, PathBuf};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Encoded format of a generated thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// JPEG for photographic sources, PNG for formats that may carry alpha.
    pub fn for_source(source: &Path) -> Self {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "png" | "webp" | "gif" => OutputFormat::Png,
            _ => OutputFormat::Jpeg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Full specification of one thumbnail to write.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Requested dimensions. With `crop`, the output matches them exactly.
    pub size: Size,
    /// Fill-resize then center-crop instead of fitting within `size`.
    pub crop: bool,
    pub format: OutputFormat,
    pub quality: Quality,
}
