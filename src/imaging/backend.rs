//! Thumbnail backend trait and shared types.
//!
//! The [`ThumbnailBackend`] trait is the single seam between size arithmetic
//! and pixel work: given a source image and a [`Size`], produce a thumbnail
//! and report where it lives. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).
//!
//! Callers always pass `crop = true` so the delivered asset matches the
//! requested size exactly.

use crate::size::Size;
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Thumbnail generation failed. Propagated to callers unchanged.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source image not found: {0}")]
    MissingSource(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// A generated (or previously generated) thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Trait for thumbnail backends.
///
/// Implementations may block on disk or network I/O. `Sync` so one backend can
/// serve the parallel breakpoint generation in [`render`](crate::render).
pub trait ThumbnailBackend: Sync {
    /// Produce a thumbnail of `source` at `size`.
    ///
    /// With `crop`, the result is fill-resized and center-cropped to exactly
    /// `size`; without it, the image is fitted within `size`.
    fn generate(&self, source: &Path, size: Size, crop: bool) -> Result<Thumbnail, BackendError>;

    /// Produce one thumbnail per entry of `sizes`, in the same order.
    ///
    /// The default generates in parallel through [`generate`](Self::generate).
    /// Backends with per-source setup (hashing, decoding) override this to do
    /// that work once.
    fn generate_all(
        &self,
        source: &Path,
        sizes: &[Size],
        crop: bool,
    ) -> Result<Vec<Thumbnail>, BackendError> {
        sizes
            .par_iter()
            .map(|&size| self.generate(source, size, crop))
            .collect()
    }
}
