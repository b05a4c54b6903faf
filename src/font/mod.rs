//! Fonts: faces, sized font instances with their metric cache, and the
//! family registry.

pub mod face;
pub mod registry;

pub use face::{BlockFace, FontFace, GlyphFace, VerticalMetrics};
pub use registry::{FontFamily, FontRegistry};

use bitflags::bitflags;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Points to pixels at 96 dpi.
const PX_PER_PT_NUM: f64 = 96.0;
const PX_PER_PT_DEN: f64 = 72.0;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u8 {
        const REGULAR = 0;
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKEOUT = 1 << 3;
    }
}

/// Line metrics cached on a font the first time it is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Full line height in whole pixels.
    pub height: f64,
    /// Offset from the top of the line box to the underline, in whole pixels.
    pub underline_offset: f64,
}

impl FontMetrics {
    fn compute(v: VerticalMetrics) -> Self {
        let height = v.line_spacing().ceil();
        let underline_offset = (height - v.descent + 0.5).round();
        Self {
            height,
            underline_offset,
        }
    }
}

/// A face at a given size and style.
///
/// Holds the metric cache, so it must stay on the thread that measures
/// with it. Share it with `Rc`, not across threads.
pub struct FontAdapter {
    face: Arc<dyn FontFace>,
    size: f64,
    style: FontStyle,
    metrics: OnceCell<FontMetrics>,
    whitespace_width: OnceCell<f64>,
}

impl FontAdapter {
    /// `size` is in points.
    pub fn new(face: Arc<dyn FontFace>, size: f64, style: FontStyle) -> Self {
        Self {
            face,
            size,
            style,
            metrics: OnceCell::new(),
            whitespace_width: OnceCell::new(),
        }
    }

    pub fn face(&self) -> &dyn FontFace {
        self.face.as_ref()
    }

    pub fn family_name(&self) -> &str {
        self.face.family_name()
    }

    /// Size in points.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Size in pixels per em.
    pub fn em_px(&self) -> f64 {
        self.size * PX_PER_PT_NUM / PX_PER_PT_DEN
    }

    pub fn vertical_metrics(&self) -> VerticalMetrics {
        self.face.vertical_metrics(self.em_px())
    }

    /// Cached line height; `None` until the font has been measured once.
    pub fn height(&self) -> Option<f64> {
        self.metrics.get().map(|m| m.height)
    }

    /// Cached underline offset; `None` until the font has been measured once.
    pub fn underline_offset(&self) -> Option<f64> {
        self.metrics.get().map(|m| m.underline_offset)
    }

    pub fn left_padding(&self) -> Option<f64> {
        self.height().map(|h| h / 6.0)
    }

    pub fn cached_metrics(&self) -> Option<FontMetrics> {
        self.metrics.get().copied()
    }

    /// Computes the line metrics on first use and returns the cached value
    /// afterwards.
    pub(crate) fn metrics(&self) -> FontMetrics {
        *self.metrics.get_or_init(|| {
            let m = FontMetrics::compute(self.vertical_metrics());
            log::trace!(
                "metrics for {} {}pt: height={} underline={}",
                self.family_name(),
                self.size,
                m.height,
                m.underline_offset
            );
            m
        })
    }

    /// Width of a single space, measured once.
    pub fn whitespace_width(&self) -> f64 {
        *self
            .whitespace_width
            .get_or_init(|| crate::rendering::measure::measure_extent(" ", self).width)
    }
}

impl fmt::Debug for FontAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontAdapter")
            .field("family", &self.family_name())
            .field("size", &self.size)
            .field("style", &self.style)
            .field("metrics", &self.metrics.get())
            .finish()
    }
}
