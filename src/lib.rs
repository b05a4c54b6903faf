//! rfpaint
//!
//! A raster paint surface and text measurement engine for an HTML layout
//! core. The layout core measures text while breaking lines and then paints
//! boxes, borders, images and glyphs through a [`GraphicsAdapter`]; fonts,
//! brushes and images come from a [`RenderAdapter`].
//!
//! # Features
//!
//! - **Text measurement**: natural extent of a string and the longest prefix
//!   that fits a pixel budget, with per-font cached line metrics
//! - **Surface adapter**: clip stack, shape/image/text drawing into a
//!   `tiny-skia` pixmap, owned or borrowed
//! - **Explicit font registry**: built at startup and injected, never global
//!
//! # Example
//!
//! ```
//! use rfpaint::{Color, FontStyle, GraphicsAdapter, Pixmap, PointF, RenderAdapter, TextDirection};
//!
//! let adapter = RenderAdapter::default();
//! let font = adapter.create_font("Arial", 12.0, FontStyle::REGULAR);
//!
//! let mut pixmap = Pixmap::new(200, 40).unwrap();
//! let mut g = GraphicsAdapter::new(&mut pixmap);
//! g.clear(Color::WHITE);
//!
//! let size = g.measure_string("Hello", &font);
//! let fit = g.measure_string_fit("Hello World", &font, 60.0);
//! assert!(fit.char_fit_width < 60.0);
//!
//! let at = PointF::new(4.0, 4.0);
//! g.draw_string("Hello", &font, Color::BLACK, at, size, TextDirection::LeftToRight);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod adapter;
pub mod brush;
pub mod error;
pub mod font;
pub mod geometry;
pub mod image;
pub mod rendering;
pub mod resource;

pub use adapter::RenderAdapter;
pub use brush::{Brush, DashStyle, Pen};
pub use error::{Error, Result};
pub use font::{BlockFace, FontAdapter, FontFace, FontFamily, FontRegistry, FontStyle, GlyphFace};
pub use geometry::{Color, PointF, RectF, SizeF};
pub use image::ImageAdapter;
pub use rendering::{
    measure_extent, measure_fit, render_to_image, render_to_png, Corner, FitResult, GraphicsAdapter,
    GraphicsPath, HtmlContainer, PageGeometry, Screenshot, SmoothingMode, TextDirection,
};
pub use resource::Resource;
pub use tiny_skia::Pixmap;

/// Family a [`RenderAdapter`] falls back to when a requested family is not
/// installed.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Rendering configuration
///
/// Used by [`render_to_image`] and by [`RenderAdapter::from_options`]. The
/// defaults render a 1280x720 page on white with anti-aliased shapes and no
/// margin.
///
/// Every field is optional when loading from JSON; missing fields take
/// their default.
///
/// # Examples
///
/// ```
/// let json = r#"{ "margin": 8, "background": "ivory" }"#;
/// let opts = rfpaint::RenderOptions::from_json_str(json).unwrap();
/// assert_eq!(opts.margin, 8);
/// assert_eq!(opts.viewport.width, 1280);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Surface dimensions
    pub viewport: Viewport,
    /// Blank space kept on every side of the content, in pixels
    pub margin: u32,
    /// Color the surface is cleared to; must not be fully transparent
    pub background: Color,
    /// Shape smoothing for the drawing session
    pub smoothing: SmoothingMode,
    /// Extra font files, or directories scanned for them
    pub font_dirs: Vec<PathBuf>,
    /// Family used when a requested family is not installed
    pub default_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            margin: 0,
            background: Color::WHITE,
            smoothing: SmoothingMode::AntiAlias,
            font_dirs: Vec::new(),
            default_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks the options before any surface is allocated.
    pub fn validate(&self) -> Result<()> {
        if self.background.is_fully_transparent() {
            return Err(Error::InvalidBackground(self.background.to_string()));
        }
        let twice = self.margin as u64 * 2;
        if twice > self.viewport.width as u64 || twice > self.viewport.height as u64 {
            return Err(Error::ConfigError(format!(
                "margin {} leaves no room in a {}x{} viewport",
                self.margin, self.viewport.width, self.viewport.height
            )));
        }
        Ok(())
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = RenderOptions::default();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.default_family, "Arial");
        assert_eq!(opts.smoothing, SmoothingMode::AntiAlias);
    }

    #[test]
    fn json_fields_override_defaults() {
        let opts = RenderOptions::from_json_str(
            r##"{
                "viewport": { "width": 300, "height": 200 },
                "background": "#80ff0000",
                "smoothing": "high_speed"
            }"##,
        )
        .unwrap();
        assert_eq!(opts.viewport, Viewport { width: 300, height: 200 });
        assert_eq!(opts.background, Color::from_argb(0x80, 255, 0, 0));
        assert_eq!(opts.smoothing, SmoothingMode::HighSpeed);
        assert_eq!(opts.margin, 0);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = RenderOptions::from_json_str(r#"{ "background": "plaid" }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn transparent_background_fails_validation() {
        let opts = RenderOptions {
            background: Color::EMPTY,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(Error::InvalidBackground(_))));
    }

    #[test]
    fn oversized_margin_fails_validation() {
        let opts = RenderOptions {
            viewport: Viewport { width: 10, height: 100 },
            margin: 6,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(Error::ConfigError(_))));
    }
}
