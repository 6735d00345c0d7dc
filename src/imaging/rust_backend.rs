//! Pure Rust thumbnail backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF) | `image::ImageReader` |
//! | Crop-fill | `image::DynamicImage::resize_to_fill` (Lanczos3) |
//! | Fit within | `image::DynamicImage::resize` (Lanczos3) |
//! | Encode | `JpegEncoder` with quality, or PNG for alpha-capable sources |
//! | Naming | SHA-256 content addressing, see [`cache`](super::cache) |
//!
//! Output files are written to a temporary name and renamed into place, so a
//! concurrent request for the same thumbnail never observes a partial file.
//! A [`generate_all`](ThumbnailBackend::generate_all) batch hashes the source
//! once and generates its sizes in parallel.

use super::backend::{BackendError, Thumbnail, ThumbnailBackend};
use super::cache::{hash_file, hash_thumbnail_params, thumbnail_filename};
use super::params::{OutputFormat, Quality, ThumbnailParams};
use crate::size::Size;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Thumbnail backend writing into a single output directory.
///
/// `url_prefix` is joined with the generated file name to form the public URL
/// (e.g. `/media/thumbnails` + `photo-640x360-….jpg`).
pub struct RustBackend {
    output_dir: PathBuf,
    url_prefix: String,
    quality: Quality,
}

impl RustBackend {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
        quality: Quality,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            url_prefix: url_prefix.into(),
            quality,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Plan a thumbnail without decoding or writing anything.
    ///
    /// Reads the source bytes to compute its content hash.
    pub fn plan(
        &self,
        source: &Path,
        size: Size,
        crop: bool,
    ) -> Result<ThumbnailParams, BackendError> {
        let source_hash = hash_source(source)?;
        Ok(self.plan_with_hash(source, &source_hash, size, crop))
    }

    fn plan_with_hash(
        &self,
        source: &Path,
        source_hash: &str,
        size: Size,
        crop: bool,
    ) -> ThumbnailParams {
        let format = OutputFormat::for_source(source);
        let params_hash = hash_thumbnail_params(size, crop, self.quality.value());
        let name = thumbnail_filename(
            &file_stem(source),
            size,
            source_hash,
            &params_hash,
            format.extension(),
        );
        ThumbnailParams {
            source: source.to_path_buf(),
            output: self.output_dir.join(name),
            size,
            crop,
            format,
            quality: self.quality,
        }
    }

    /// `{url_prefix}/{name}`; the bare name when the prefix is empty.
    fn url_for(&self, output: &Path) -> String {
        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.url_prefix.is_empty() {
            return name;
        }
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), name)
    }

    /// Reuse the planned output if it exists, otherwise write it.
    fn produce(&self, params: ThumbnailParams) -> Result<Thumbnail, BackendError> {
        let (width, height) = if params.output.is_file() {
            debug!(output = %params.output.display(), "reusing existing thumbnail");
            image::image_dimensions(&params.output).map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to read dimensions of {}: {}",
                    params.output.display(),
                    e
                ))
            })?
        } else {
            let dims = execute(&params)?;
            info!(
                source = %params.source.display(),
                size = %params.size,
                output = %params.output.display(),
                "generated thumbnail"
            );
            dims
        };

        Ok(Thumbnail {
            url: self.url_for(&params.output),
            width,
            height,
        })
    }
}

impl ThumbnailBackend for RustBackend {
    fn generate(&self, source: &Path, size: Size, crop: bool) -> Result<Thumbnail, BackendError> {
        self.produce(self.plan(source, size, crop)?)
    }

    fn generate_all(
        &self,
        source: &Path,
        sizes: &[Size],
        crop: bool,
    ) -> Result<Vec<Thumbnail>, BackendError> {
        let source_hash = hash_source(source)?;
        sizes
            .par_iter()
            .map(|&size| self.produce(self.plan_with_hash(source, &source_hash, size, crop)))
            .collect()
    }
}

/// SHA-256 of the source bytes, failing with `MissingSource` if it is not a file.
fn hash_source(source: &Path) -> Result<String, BackendError> {
    if !source.is_file() {
        return Err(BackendError::MissingSource(source.display().to_string()));
    }
    Ok(hash_file(source)?)
}

/// URL-safe file stem: ASCII alphanumerics, `-` and `_`; everything else becomes `-`.
fn file_stem(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "thumbnail".to_string()
    } else {
        cleaned
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Decode, resize, encode, and atomically write one thumbnail.
///
/// Returns the dimensions of the written image.
fn execute(params: &ThumbnailParams) -> Result<(u32, u32), BackendError> {
    let img = load_image(&params.source)?;
    let (w, h) = (params.size.width(), params.size.height());

    // Fill-resize then center-crop to exact dimensions
    let resized = if params.crop {
        img.resize_to_fill(w, h, FilterType::Lanczos3)
    } else {
        img.resize(w, h, FilterType::Lanczos3)
    };

    let bytes = encode(&resized, params.format, params.quality)?;
    if let Some(parent) = params.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let part = params.output.with_extension(format!(
        "{}.{}.part",
        std::process::id(),
        PART_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&part, bytes)?;
    std::fs::rename(&part, &params.output)?;

    Ok((resized.width(), resized.height()))
}

fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            rgb.write_with_encoder(encoder)
        }
        OutputFormat::Png => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png),
    };
    result.map_err(|e| BackendError::ProcessingFailed(format!("Encode failed: {}", e)))?;
    Ok(buf)
}
