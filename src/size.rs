//! Integer pixel dimensions with ratio-preserving arithmetic.
//!
//! A [`Size`] is both a concrete thumbnail dimension (`640x360`) and an aspect
//! ratio token (`16x9`): only the relationship between the axes matters when
//! it is used as a ratio. Both axes are always positive; construction rejects
//! anything else.
//!
//! ## Accepted shapes
//!
//! | Input | Example |
//! |---|---|
//! | `"<width>x<height>"` token | `"16x9"`, `" 360 x 360 "` |
//! | Pair of integers | `(16, 9)`, `[360, 360]` |
//! | Pair of integer-valued strings or floats | `["16", "9"]`, `[16.0, 9.0]` |
//!
//! The same component rule applies to both shapes: a component must be a
//! whole, positive number. Fractional floats are rejected, never truncated.
//!
//! ## Arithmetic
//!
//! Scaling is exposed through named methods rather than operators:
//!
//! - [`Size::cover_scale_factor`] answers "by how much must I grow this
//!   ratio so it covers that box?" and returns an integer, not a size.
//! - [`Size::scaled_by`] multiplies both axes by an integer factor.
//! - [`Size::reduced`] divides both axes by their greatest common divisor,
//!   so `1920x1080` and `32x18` both become `16x9`.
//! - [`Size::scaled_by_real`] multiplies by a real factor, rounding up.
//!
//! For any `f >= a.cover_scale_factor(b)`, `a.scaled_by(f)` covers `b` on both
//! axes. Thumbnails are always requested crop-to-fill, so a size that falls
//! short on either axis would force the backend to upscale or letterbox.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A malformed size or ratio value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "size initialized with inappropriate argument {value}; expected <width>x<height> or a pair of positive integers"
)]
pub struct SizeFormatError {
    /// The offending input, rendered as text.
    pub value: String,
}

impl SizeFormatError {
    fn new(value: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// One component of a pair-shaped size value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Component {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Component {
    /// Coerce to a positive integer, or `None`.
    fn to_dimension(&self) -> Option<u32> {
        let value = match self {
            Component::Int(n) => *n,
            Component::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
            Component::Float(_) => return None,
            Component::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        u32::try_from(value).ok().filter(|&v| v > 0)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Int(n) => write!(f, "{n}"),
            Component::Float(v) => write!(f, "{v}"),
            Component::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Raw, unvalidated size input: either a token or a sequence of components.
///
/// This is what configuration files and template arguments deserialize into
/// before [`Size::parse`] validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    Token(String),
    Pair(Vec<Component>),
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Token(s) => write!(f, "{s:?}"),
            SizeSpec::Pair(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for SizeSpec {
    fn from(value: &str) -> Self {
        SizeSpec::Token(value.to_string())
    }
}

impl From<String> for SizeSpec {
    fn from(value: String) -> Self {
        SizeSpec::Token(value)
    }
}

impl From<(i64, i64)> for SizeSpec {
    fn from((w, h): (i64, i64)) -> Self {
        SizeSpec::Pair(vec![Component::Int(w), Component::Int(h)])
    }
}

impl From<[u32; 2]> for SizeSpec {
    fn from([w, h]: [u32; 2]) -> Self {
        SizeSpec::Pair(vec![Component::Int(w.into()), Component::Int(h.into())])
    }
}

impl From<&[i64]> for SizeSpec {
    fn from(values: &[i64]) -> Self {
        SizeSpec::Pair(values.iter().copied().map(Component::Int).collect())
    }
}

impl From<Vec<Component>> for SizeSpec {
    fn from(values: Vec<Component>) -> Self {
        SizeSpec::Pair(values)
    }
}

/// A positive `width x height` pixel dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SizeSpec", into = "String")]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    /// Build a size from two axes. Both must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SizeFormatError> {
        if width == 0 || height == 0 {
            return Err(SizeFormatError::new(format!("{width}x{height}")));
        }
        Ok(Self { width, height })
    }

    /// Parse a token (`"16x9"`) or a pair (`(16, 9)`).
    pub fn parse(value: impl Into<SizeSpec>) -> Result<Self, SizeFormatError> {
        let spec = value.into();
        let components = match &spec {
            SizeSpec::Token(token) => parse_token(token),
            SizeSpec::Pair(items) => match items.as_slice() {
                [w, h] => w.to_dimension().zip(h.to_dimension()),
                _ => None,
            },
        };
        components
            .map(|(width, height)| Self { width, height })
            .ok_or_else(|| SizeFormatError::new(&spec))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Smallest integer factor by which `self` must be scaled to cover `target`.
    ///
    /// Equals `ceil(max(target.width / self.width, target.height / self.height))`:
    /// the binding axis decides. Never less than one.
    pub fn cover_scale_factor(&self, target: &Size) -> u32 {
        let by_width = target.width.div_ceil(self.width);
        let by_height = target.height.div_ceil(self.height);
        by_width.max(by_height).max(1)
    }

    /// Multiply both axes by an integer factor.
    ///
    /// A factor of zero is treated as one so the result stays a valid size.
    /// Returns `None` when an axis would not fit in a `u32`.
    pub fn scaled_by(&self, factor: u32) -> Option<Size> {
        let factor = factor.max(1);
        Some(Size {
            width: self.width.checked_mul(factor)?,
            height: self.height.checked_mul(factor)?,
        })
    }

    /// Same aspect ratio in lowest terms.
    pub fn reduced(&self) -> Size {
        let divisor = gcd(self.width, self.height);
        Size {
            width: self.width / divisor,
            height: self.height / divisor,
        }
    }

    /// Multiply both axes by a real factor, rounding each axis up.
    ///
    /// Returns `None` for non-finite or non-positive factors, and when an axis
    /// would not fit in a `u32`.
    pub fn scaled_by_real(&self, factor: f64) -> Option<Size> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        let scale = |axis: u32| {
            let scaled = (f64::from(axis) * factor).ceil();
            (scaled <= f64::from(u32::MAX)).then_some(scaled as u32)
        };
        Some(Size {
            width: scale(self.width)?.max(1),
            height: scale(self.height)?.max(1),
        })
    }

    /// True if `self` is at least as large as `other` on both axes.
    pub fn covers(&self, other: &Size) -> bool {
        self.width >= other.width && self.height >= other.height
    }

    /// True if `self` is no larger than `bound` on either axis.
    pub fn fits_within(&self, bound: &Size) -> bool {
        bound.covers(self)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Split `"<w>x<h>"` and coerce both halves.
fn parse_token(token: &str) -> Option<(u32, u32)> {
    let (w, h) = token.split_once('x')?;
    if h.contains('x') {
        return None;
    }
    let w = Component::Text(w.to_string()).to_dimension()?;
    let h = Component::Text(h.to_string()).to_dimension()?;
    Some((w, h))
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = SizeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::parse(s)
    }
}

impl TryFrom<SizeSpec> for Size {
    type Error = SizeFormatError;

    fn try_from(value: SizeSpec) -> Result<Self, Self::Error> {
        Size::parse(value)
    }
}

impl TryFrom<(i64, i64)> for Size {
    type Error = SizeFormatError;

    fn try_from(value: (i64, i64)) -> Result<Self, Self::Error> {
        Size::parse(value)
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.to_string()
    }
}
