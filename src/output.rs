//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! ## Plan
//!
//! ```text
//! Ratio 16x9
//!     Bounds: 360x360 .. 2000x2000
//!     Base: 640x360
//!     Width 500: 512x288
//! Breakpoints
//!     0px: 640x360
//!     900px: 912x513
//! ```
//!
//! ## Render
//!
//! ```text
//! 001 dawn.jpg
//!     Source: content/dawn.jpg
//! 002 broken.jpg
//!     Error: Thumbnail generation failed: ...
//!
//! Rendered 1 image, 1 failed → dist/index.html
//! ```

use crate::calculator::{Breakpoint, ResponsiveSizeCalculator, SizeBounds, SizingError};
use crate::size::Size;
use serde::Serialize;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Everything `plan` computes for one ratio. Serializable for `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub ratio: Size,
    pub bounds: SizeBounds,
    pub base: Size,
    /// `(width, size)` when a display width was requested.
    pub for_width: Option<(u32, Size)>,
    pub breakpoints: Vec<Breakpoint>,
}

impl PlanReport {
    /// Fails only when `width` cannot be covered within `u32` pixels.
    pub fn new(
        calculator: &ResponsiveSizeCalculator,
        width: Option<u32>,
        step: u32,
    ) -> Result<Self, SizingError> {
        let for_width = match width {
            Some(w) => Some((w, calculator.try_size_for_width(w)?)),
            None => None,
        };
        Ok(Self {
            ratio: calculator.ratio(),
            bounds: calculator.bounds(),
            base: calculator.base_thumbnail_size(),
            for_width,
            breakpoints: calculator.breakpoint_ladder(step),
        })
    }
}

pub fn format_plan(report: &PlanReport) -> Vec<String> {
    let mut lines = vec![
        format!("Ratio {}", report.ratio),
        format!(
            "{}Bounds: {} .. {}",
            indent(1),
            report.bounds.min,
            report.bounds.max
        ),
        format!("{}Base: {}", indent(1), report.base),
    ];
    if let Some((width, size)) = report.for_width {
        lines.push(format!("{}Width {}: {}", indent(1), width, size));
    }
    lines.push("Breakpoints".to_string());
    for bp in &report.breakpoints {
        lines.push(format!("{}{}px: {}", indent(1), bp.min_width, bp.size));
    }
    lines
}

pub fn print_plan(report: &PlanReport) {
    for line in format_plan(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

/// Outcome of rendering one image, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Failed(String),
}

/// Lines for one image: header, then either its source or its error.
pub fn format_render_entry(index: usize, source: &Path, outcome: &RenderOutcome) -> Vec<String> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string());
    let detail = match outcome {
        RenderOutcome::Rendered => format!("{}Source: {}", indent(1), source.display()),
        RenderOutcome::Failed(err) => format!("{}Error: {}", indent(1), err),
    };
    vec![format!("{} {}", format_index(index), name), detail]
}

pub fn format_render_summary(rendered: usize, failed: usize, document: &Path) -> String {
    let mut summary = format!("Rendered {}", plural(rendered, "image"));
    if failed > 0 {
        summary.push_str(&format!(", {} failed", failed));
    }
    format!("{} → {}", summary, document.display())
}

pub fn print_render_entry(index: usize, source: &Path, outcome: &RenderOutcome) {
    for line in format_render_entry(index, source, outcome) {
        println!("{}", line);
    }
}
