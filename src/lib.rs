//! # Responsive Image
//!
//! Crop-safe thumbnail sizing and responsive background-image markup.
//!
//! Given an aspect ratio (`"16x9"`) and a size policy (a `360x360` quality
//! floor, a `2000x2000` ceiling), this crate computes exactly which thumbnail
//! sizes to request from an image backend, then renders an `<img>` plus a
//! background layer whose image is swapped by CSS media queries as the
//! viewport grows.
//!
//! ```text
//! ratio + bounds  →  base size + breakpoint ladder  →  thumbnails  →  HTML + CSS
//!   (size)              (calculator)                   (imaging)      (render)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`size`] | `Size` value type: parsing, cover scale factor, ceiling scaling |
//! | [`calculator`] | Base thumbnail size, size for a width, breakpoint ladder |
//! | [`imaging`] | `ThumbnailBackend` trait and the `image`-crate backend |
//! | [`render`] | Maud markup and per-breakpoint CSS, per-page render state |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Crop-Cover Sizing
//!
//! Every thumbnail is requested crop-to-fill, so every computed size must be
//! at least as large as the box it fills on both axes. Scale factors are
//! integer ceilings and real-valued scaling rounds up; nothing in the sizing
//! path ever rounds down.
//!
//! ## Named Arithmetic Over Operators
//!
//! Dividing two sizes yields an integer scale factor, not a size. That is
//! surprising enough to deserve a name: [`Size::cover_scale_factor`] and
//! [`Size::scaled_by`] instead of `Div` / `Mul` impls.
//!
//! ## Explicit Bounds
//!
//! Size bounds are constructor parameters ([`SizeBounds`]) with documented
//! defaults rather than process-wide settings. Configuration is validated
//! when loaded; a malformed ratio fails only the image that uses it.
//!
//! ## Content-Addressed Thumbnails
//!
//! Thumbnail file names embed a hash of the source bytes and generation
//! parameters. Re-rendering a page reuses every thumbnail whose inputs did not
//! change, without a separate cache index.

pub mod calculator;
pub mod config;
pub mod imaging;
pub mod output;
pub mod render;
pub mod size;

pub use calculator::{
    Breakpoint, PolicyBoundsError, ResponsiveSizeCalculator, SizeBounds, SizingError,
};
pub use size::{Size, SizeFormatError, SizeSpec};

#[cfg(test)]
pub(crate) mod test_helpers;
