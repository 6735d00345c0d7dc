//! Thumbnail generation in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop-fill thumbnail** | `resize_to_fill` (Lanczos3) |
//! | **Encode** | JPEG with quality, PNG for alpha-capable sources |
//! | **Naming / reuse** | SHA-256 content addressing |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing a thumbnail to write
//! - **Backend**: [`ThumbnailBackend`] trait + [`RustBackend`]
//! - **Cache**: content-addressed output names

pub mod backend;
pub mod cache;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Thumbnail, ThumbnailBackend};
pub use params::{OutputFormat, Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
