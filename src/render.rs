//! Responsive image markup.
//!
//! Every rendered image becomes an `<img>` carrying the base thumbnail, with a
//! background layer stacked on top of it:
//!
//! ```html
//! <div class="responsive-image">
//!     <img src="thumbnails/photo-640x360-….jpg" alt="photo">
//!     <div class="responsive-image__background responsive-image__background-1"></div>
//! </div>
//! ```
//!
//! Each breakpoint of the image's ladder contributes one `<style>` block that
//! swaps the layer's background for a larger thumbnail once the viewport is
//! wide enough:
//!
//! ```css
//! @media (min-width: 900px) {
//!     .responsive-image__background-1 {
//!         background-image: url('thumbnails/photo-912x513-….jpg');
//!     }
//! }
//! ```
//!
//! Styles are emitted in ascending breakpoint order, so a wider viewport's
//! rule always comes later and wins.
//!
//! [`ResponsivePage`] carries the per-page state: the image counter that keeps
//! background classes unique, and the collected styles. A failure while
//! rendering one image leaves both untouched, so the remaining images on the
//! page still render.

use crate::calculator::{
    Breakpoint, DEFAULT_BREAKPOINT_STEP, PolicyBoundsError, ResponsiveSizeCalculator, SizeBounds,
    SizingError,
};
use crate::config::SiteConfig;
use crate::imaging::{BackendError, ThumbnailBackend};
use crate::size::{Size, SizeFormatError, SizeSpec};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid ratio: {0}")]
    SizeFormat(#[from] SizeFormatError),
    #[error("Cannot size thumbnails: {0}")]
    Sizing(#[from] SizingError),
    #[error("Thumbnail generation failed: {0}")]
    Generation(#[from] BackendError),
}

/// Layout shared by every responsive image on a page. Emitted once.
const GLOBAL_STYLE: &str = r#"
.responsive-image {
    position: relative;
}
.responsive-image img {
    width: 100%;
}
.responsive-image__background {
    background-size: 100% 100%;
    bottom: 0;
    position: absolute;
    left: 0;
    right: 0;
    top: 0;
}
"#;

/// URL of a single thumbnail for `source` at `ratio`.
///
/// Single-shot mode: no breakpoints, no page state. Without `width` the base
/// thumbnail is used; with it, the smallest thumbnail covering that display
/// width.
pub fn responsive_image_src(
    backend: &impl ThumbnailBackend,
    source: &Path,
    ratio: impl Into<SizeSpec>,
    bounds: SizeBounds,
    width: Option<u32>,
) -> Result<String, RenderError> {
    let calculator = ResponsiveSizeCalculator::new(Size::parse(ratio)?, bounds)?;
    let size = match width {
        Some(width) => calculator.try_size_for_width(width)?,
        None => calculator.base_thumbnail_size(),
    };
    let thumbnail = backend.generate(source, size, true)?;
    Ok(thumbnail.url)
}

/// Render state for one page of responsive images.
#[derive(Debug, Clone)]
pub struct ResponsivePage {
    bounds: SizeBounds,
    step: u32,
    next_index: u32,
    breakpoint_styles: Vec<String>,
}

impl ResponsivePage {
    pub fn new(bounds: SizeBounds, step: u32) -> Self {
        Self {
            bounds,
            step,
            next_index: 1,
            breakpoint_styles: Vec::new(),
        }
    }

    /// Page using the configured bounds and breakpoint step.
    pub fn from_config(config: &SiteConfig) -> Result<Self, PolicyBoundsError> {
        Ok(Self::new(config.bounds()?, config.responsive.breakpoint_step))
    }

    /// Number of images rendered successfully so far.
    pub fn image_count(&self) -> u32 {
        self.next_index - 1
    }

    /// Render one image block and record its breakpoint styles.
    ///
    /// All thumbnails are requested crop-to-fill in one batch, so the backend
    /// reads the source once per image. The first generation error aborts
    /// this image only.
    pub fn render_image(
        &mut self,
        backend: &impl ThumbnailBackend,
        source: &Path,
        ratio: impl Into<SizeSpec>,
        alt: &str,
    ) -> Result<Markup, RenderError> {
        let calculator = ResponsiveSizeCalculator::new(Size::parse(ratio)?, self.bounds)?;
        let ladder = calculator.breakpoint_ladder(self.step);
        let sizes: Vec<Size> = ladder.iter().map(|bp| bp.size).collect();
        let thumbnails = backend.generate_all(source, &sizes, true)?;
        let Some((base, rest)) = thumbnails.split_first() else {
            return Err(BackendError::ProcessingFailed(format!(
                "no thumbnails returned for {}",
                source.display()
            ))
            .into());
        };
        let breakpoints: Vec<(&Breakpoint, _)> = ladder[1..].iter().zip(rest).collect();

        let index = self.next_index;
        debug!(
            source = %source.display(),
            index,
            breakpoints = breakpoints.len(),
            "rendered responsive image"
        );
        self.next_index += 1;
        self.breakpoint_styles.extend(
            breakpoints
                .iter()
                .map(|(bp, thumb)| breakpoint_css(bp.min_width, index, &thumb.url)),
        );

        Ok(html! {
            div.responsive-image {
                img src=(base.url) alt=(alt);
                div class={ "responsive-image__background responsive-image__background-" (index) } {}
            }
        })
    }

    /// All `<style>` blocks for the page: the shared layout first, then one
    /// block per breakpoint in render order. Empty if nothing rendered.
    pub fn styles(&self) -> Markup {
        html! {
            @if self.image_count() > 0 {
                style { (PreEscaped(GLOBAL_STYLE)) }
            }
            @for css in &self.breakpoint_styles {
                style { (PreEscaped(css)) }
            }
        }
    }
}

impl Default for ResponsivePage {
    fn default() -> Self {
        Self::new(SizeBounds::default(), DEFAULT_BREAKPOINT_STEP)
    }
}

/// CSS rule swapping image `index`'s background at `min_width`.
fn breakpoint_css(min_width: u32, index: u32, url: &str) -> String {
    format!(
        r#"
@media (min-width: {min_width}px) {{
    .responsive-image__background-{index} {{
        background-image: url('{url}');
    }}
}}
"#,
        url = css_url(url),
    )
}

/// Percent-encode characters that could end a quoted CSS `url()` or the
/// enclosing `<style>` element.
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' | '"' | '\\' | '(' | ')' | '<' | '>' | ' ' | '\n' | '\r' | '\t' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Full HTML document wrapping rendered blocks with the page's styles.
pub fn render_document(title: &str, page: &ResponsivePage, blocks: &[Markup]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                (page.styles())
            }
            body {
                @for block in blocks {
                    (block)
                }
            }
        }
    }
}
