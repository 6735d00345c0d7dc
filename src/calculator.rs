//! Thumbnail sizing for a fixed aspect ratio.
//!
//! A [`ResponsiveSizeCalculator`] turns a ratio token plus policy bounds into
//! the concrete sizes to request from the thumbnail backend. The ratio is
//! reduced to lowest terms first, so `16x9`, `32x18` and `1920x1080` all
//! produce the same sizes:
//!
//! - the **base** size: smallest ratio-preserving size that is no smaller than
//!   the minimum bound on either axis (`16x9` with a `360x360` floor → `640x360`),
//! - the size that covers an arbitrary display width,
//! - a **breakpoint ladder** of `(min-width, size)` pairs in ascending width
//!   order, capped by the maximum bound.
//!
//! All functions here are pure: no I/O, no images.

use crate::size::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Viewport distance between two consecutive breakpoints, in CSS pixels.
pub const DEFAULT_BREAKPOINT_STEP: u32 = 300;

/// The minimum bound exceeds the maximum bound on at least one axis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("minimum size {min} exceeds maximum size {max}")]
pub struct PolicyBoundsError {
    pub min: Size,
    pub max: Size,
}

/// A calculator could not be built, or a size could not be computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error(transparent)]
    Bounds(#[from] PolicyBoundsError),
    #[error("ratio {ratio} cannot cover {min} within 32-bit pixel dimensions")]
    BaseOverflow { ratio: Size, min: Size },
    #[error("ratio {ratio} cannot cover width {width} within 32-bit pixel dimensions")]
    WidthOverflow { ratio: Size, width: u32 },
}

/// Quality floor and size ceiling for generated thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: Size,
    pub max: Size,
}

impl SizeBounds {
    /// Build bounds, rejecting a minimum that is larger than the maximum.
    pub fn new(min: Size, max: Size) -> Result<Self, PolicyBoundsError> {
        if !min.fits_within(&max) {
            return Err(PolicyBoundsError { min, max });
        }
        Ok(Self { min, max })
    }
}

impl Default for SizeBounds {
    /// `360x360` floor, `2000x2000` ceiling.
    fn default() -> Self {
        Self {
            min: Size::new(360, 360).expect("default minimum is non-zero"),
            max: Size::new(2000, 2000).expect("default maximum is non-zero"),
        }
    }
}

/// One step of a breakpoint ladder: from `min_width` CSS pixels upwards,
/// display a thumbnail of `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub min_width: u32,
    pub size: Size,
}

/// Computes crop-safe thumbnail sizes for one aspect ratio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveSizeCalculator {
    ratio: Size,
    bounds: SizeBounds,
    base_size: Size,
}

impl ResponsiveSizeCalculator {
    /// Build a calculator for `ratio` under `bounds`.
    ///
    /// Fails when `bounds.min` exceeds `bounds.max` on either axis, or when
    /// covering `bounds.min` would overflow a `u32` axis.
    pub fn new(ratio: Size, bounds: SizeBounds) -> Result<Self, SizingError> {
        let bounds = SizeBounds::new(bounds.min, bounds.max)?;
        Self::with_checked_bounds(ratio, bounds)
    }

    /// Calculator with the default `360x360` / `2000x2000` bounds.
    pub fn with_default_bounds(ratio: Size) -> Result<Self, SizingError> {
        Self::with_checked_bounds(ratio, SizeBounds::default())
    }

    fn with_checked_bounds(ratio: Size, bounds: SizeBounds) -> Result<Self, SizingError> {
        let ratio = ratio.reduced();
        let base_size = ratio
            .scaled_by(ratio.cover_scale_factor(&bounds.min))
            .ok_or(SizingError::BaseOverflow {
                ratio,
                min: bounds.min,
            })?;
        debug!(%ratio, min = %bounds.min, %base_size, "computed base thumbnail size");
        if !base_size.fits_within(&bounds.max) {
            warn!(
                %ratio,
                %base_size,
                max = %bounds.max,
                "base thumbnail already exceeds the maximum size"
            );
        }
        Ok(Self {
            ratio,
            bounds,
            base_size,
        })
    }

    /// The ratio in lowest terms.
    pub fn ratio(&self) -> Size {
        self.ratio
    }

    pub fn bounds(&self) -> SizeBounds {
        self.bounds
    }

    /// Smallest ratio-preserving size that covers the minimum bound.
    pub fn base_thumbnail_size(&self) -> Size {
        self.base_size
    }

    /// Ratio-preserving size whose width is at least `width`.
    ///
    /// The factor is `ceil(width / ratio.width)`; a width of zero maps to the
    /// ratio itself. The minimum bound does not apply here. `None` when the
    /// result would overflow a `u32` axis.
    pub fn size_for_width(&self, width: u32) -> Option<Size> {
        let factor = width.div_ceil(self.ratio.width());
        self.ratio.scaled_by(factor)
    }

    /// [`size_for_width`](Self::size_for_width), reporting overflow as an error.
    pub fn try_size_for_width(&self, width: u32) -> Result<Size, SizingError> {
        self.size_for_width(width)
            .ok_or(SizingError::WidthOverflow {
                ratio: self.ratio,
                width,
            })
    }

    /// Ascending `(min_width, size)` pairs for responsive delivery.
    ///
    /// The first entry is always `(0, base size)`. Further entries sit at
    /// multiples of `step` and carry [`size_for_width`](Self::size_for_width)
    /// for that width. Entries that would not grow the thumbnail are skipped,
    /// and the ladder stops at the first size exceeding the maximum bound
    /// (an overflowing size counts as exceeding it). A `step` of zero yields
    /// only the base entry.
    pub fn breakpoint_ladder(&self, step: u32) -> Vec<Breakpoint> {
        let mut ladder = vec![Breakpoint {
            min_width: 0,
            size: self.base_size,
        }];
        if step == 0 {
            return ladder;
        }

        let mut width = step;
        loop {
            let Some(size) = self
                .size_for_width(width)
                .filter(|size| size.fits_within(&self.bounds.max))
            else {
                break;
            };
            let previous = ladder[ladder.len() - 1].size;
            if size.width() > previous.width() {
                debug!(min_width = width, %size, "breakpoint");
                ladder.push(Breakpoint {
                    min_width: width,
                    size,
                });
            }
            match width.checked_add(step) {
                Some(next) => width = next,
                None => break,
            }
        }
        ladder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::size;

    fn calculator(ratio: &str) -> ResponsiveSizeCalculator {
        ResponsiveSizeCalculator::new(Size::parse(ratio).unwrap(), SizeBounds::default()).unwrap()
    }

    fn width_of(calc: &ResponsiveSizeCalculator, width: u32) -> Size {
        calc.size_for_width(width).unwrap()
    }

    // =========================================================================
    // Bounds tests
    // =========================================================================

    #[test]
    fn default_bounds() {
        let bounds = SizeBounds::default();
        assert_eq!(bounds.min, size(360, 360));
        assert_eq!(bounds.max, size(2000, 2000));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = SizeBounds::new(size(2000, 2000), size(360, 360)).unwrap_err();
        assert_eq!(err.min, size(2000, 2000));
        assert_eq!(err.max, size(360, 360));
    }

    #[test]
    fn bounds_inverted_on_one_axis_rejected() {
        assert!(SizeBounds::new(size(100, 500), size(400, 400)).is_err());
    }

    #[test]
    fn equal_bounds_accepted() {
        assert!(SizeBounds::new(size(400, 400), size(400, 400)).is_ok());
    }

    #[test]
    fn calculator_rejects_inverted_bounds() {
        let bounds = SizeBounds {
            min: size(2000, 2000),
            max: size(360, 360),
        };
        let result = ResponsiveSizeCalculator::new(size(16, 9), bounds);
        assert!(matches!(result, Err(SizingError::Bounds(PolicyBoundsError { .. }))));
    }

    // =========================================================================
    // base_thumbnail_size tests
    // =========================================================================

    #[test]
    fn base_size_landscape() {
        // max(360/16, 360/9) = 40 → 640x360
        assert_eq!(calculator("16x9").base_thumbnail_size(), size(640, 360));
    }

    #[test]
    fn base_size_portrait() {
        // max(360/4, 360/5) = 90 → 360x450
        assert_eq!(calculator("4x5").base_thumbnail_size(), size(360, 450));
    }

    #[test]
    fn base_size_from_large_ratio_token() {
        // 1920x1080 reduces to 16x9 before covering the floor
        assert_eq!(calculator("1920x1080").base_thumbnail_size(), size(640, 360));
        assert_eq!(calculator("1920x1080").ratio(), size(16, 9));
    }

    #[test]
    fn ratio_magnitude_does_not_change_sizes() {
        let reference = calculator("16x9");
        for token in ["32x18", "1920x1080", "160x90"] {
            let calc = calculator(token);
            assert_eq!(calc, reference, "{token}");
            assert_eq!(calc.base_thumbnail_size(), size(640, 360), "{token}");
            assert_eq!(width_of(&calc, 520), size(528, 297), "{token}");
            assert_eq!(calc.breakpoint_ladder(300), reference.breakpoint_ladder(300));
        }
    }

    #[test]
    fn base_overflow_is_an_error() {
        // Reduced ratio is already coprime; covering 360 tall needs factor 360
        let ratio = size(4_000_000_000, 1);
        let result = ResponsiveSizeCalculator::with_default_bounds(ratio);
        assert!(matches!(result, Err(SizingError::BaseOverflow { .. })));
    }

    #[test]
    fn base_size_with_uneven_division() {
        // 360/7 = 51.4 → 52, 360/3 = 120 → 120
        assert_eq!(calculator("7x3").base_thumbnail_size(), size(840, 360));
    }

    #[test]
    fn base_size_covers_minimum() {
        for ratio in ["1x1", "3x2", "2x3", "21x9", "5x13", "1000x1"] {
            let calc = calculator(ratio);
            assert!(
                calc.base_thumbnail_size().covers(&calc.bounds().min),
                "{ratio}"
            );
        }
    }

    #[test]
    fn with_default_bounds_matches_new() {
        let ratio = size(16, 9);
        assert_eq!(
            ResponsiveSizeCalculator::with_default_bounds(ratio).unwrap(),
            ResponsiveSizeCalculator::new(ratio, SizeBounds::default()).unwrap()
        );
    }

    // =========================================================================
    // size_for_width tests
    // =========================================================================

    #[test]
    fn size_for_width_rounds_up() {
        // 500/16 = 31.25 → 32 → 512x288
        let result = width_of(&calculator("16x9"), 500);
        assert_eq!(result, size(512, 288));
        assert!(result.width() >= 500);
        assert_eq!(result.width() * 9, result.height() * 16);
    }

    #[test]
    fn size_for_width_exact_division() {
        assert_eq!(width_of(&calculator("16x9"), 640), size(640, 360));
    }

    #[test]
    fn size_for_width_zero_returns_ratio() {
        assert_eq!(width_of(&calculator("16x9"), 0), size(16, 9));
    }

    #[test]
    fn size_for_width_overflow_keeps_ratio_or_fails() {
        let calc = calculator("16x9");
        assert_eq!(calc.size_for_width(u32::MAX), None);
        assert!(matches!(
            calc.try_size_for_width(u32::MAX),
            Err(SizingError::WidthOverflow { width: u32::MAX, .. })
        ));
        let largest = width_of(&calc, u32::MAX - 15);
        assert_eq!(u64::from(largest.width()) * 9, u64::from(largest.height()) * 16);
    }

    #[test]
    fn ladder_treats_overflow_as_exceeding_max() {
        let bounds = SizeBounds::new(size(1, 1), size(u32::MAX, u32::MAX)).unwrap();
        let calc = ResponsiveSizeCalculator::new(size(16, 9), bounds).unwrap();
        let ladder = calc.breakpoint_ladder(u32::MAX / 2);
        let widths: Vec<u32> = ladder.iter().map(|b| b.min_width).collect();
        assert_eq!(widths, vec![0, u32::MAX / 2]);
    }

    #[test]
    fn size_for_width_always_covers_width() {
        let calc = calculator("7x3");
        for width in 1..1500 {
            let result = width_of(&calc, width);
            assert!(result.width() >= width);
            assert!(result.width() < width + 7);
        }
    }

    // =========================================================================
    // breakpoint_ladder tests
    // =========================================================================

    #[test]
    fn ladder_starts_with_base_entry() {
        let calc = calculator("16x9");
        let ladder = calc.breakpoint_ladder(DEFAULT_BREAKPOINT_STEP);
        assert_eq!(
            ladder[0],
            Breakpoint {
                min_width: 0,
                size: calc.base_thumbnail_size()
            }
        );
    }

    #[test]
    fn ladder_16x9_default_step() {
        // 300 → 304x171 and 600 → 608x342 do not grow past 640x360
        let ladder = calculator("16x9").breakpoint_ladder(300);
        let widths: Vec<u32> = ladder.iter().map(|b| b.min_width).collect();
        assert_eq!(widths, vec![0, 900, 1200, 1500, 1800]);
        assert_eq!(ladder[1].size, size(912, 513));
        assert_eq!(ladder.last().unwrap().size, size(1808, 1017));
    }

    #[test]
    fn ladder_is_strictly_ascending() {
        for ratio in ["16x9", "4x5", "1x1", "21x9", "3x7"] {
            let ladder = calculator(ratio).breakpoint_ladder(150);
            for pair in ladder.windows(2) {
                assert!(pair[0].min_width < pair[1].min_width, "{ratio}");
                assert!(pair[0].size.width() < pair[1].size.width(), "{ratio}");
            }
        }
    }

    #[test]
    fn ladder_stays_within_max() {
        for ratio in ["16x9", "4x5", "1x1", "21x9"] {
            let calc = calculator(ratio);
            for entry in calc.breakpoint_ladder(300) {
                assert!(entry.size.fits_within(&calc.bounds().max), "{ratio}");
            }
        }
    }

    #[test]
    fn ladder_includes_last_fitting_and_excludes_first_exceeding() {
        // 1x1 ratio: size_for_width(w) == w x w
        let bounds = SizeBounds::new(size(100, 100), size(1000, 1000)).unwrap();
        let calc = ResponsiveSizeCalculator::new(size(1, 1), bounds).unwrap();
        let ladder = calc.breakpoint_ladder(250);
        let widths: Vec<u32> = ladder.iter().map(|b| b.min_width).collect();
        assert_eq!(widths, vec![0, 250, 500, 750, 1000]);
        assert_eq!(ladder.last().unwrap().size, size(1000, 1000));
    }

    #[test]
    fn ladder_stops_on_height_bound() {
        // Tall ratio hits the height ceiling first: 1x4 at width 500 → 500x2000
        let calc = calculator("1x4");
        let ladder = calc.breakpoint_ladder(100);
        let last = ladder.last().unwrap();
        assert_eq!(last.size, size(500, 2000));
        assert!(!width_of(&calc, last.min_width + 100).fits_within(&calc.bounds().max));
    }

    #[test]
    fn ladder_keeps_base_entry_when_base_exceeds_max() {
        // 1x10 needs 360x3600 to cover the floor
        let calc = calculator("1x10");
        let ladder = calc.breakpoint_ladder(300);
        assert_eq!(ladder.len(), 1);
        assert_eq!(ladder[0].size, size(360, 3600));
    }

    #[test]
    fn ladder_with_zero_step_is_base_only() {
        let ladder = calculator("16x9").breakpoint_ladder(0);
        assert_eq!(ladder.len(), 1);
        assert_eq!(ladder[0].min_width, 0);
    }
}
