//! Whole-document rendering into a fixed-size surface.
//!
//! The layout core itself lives outside this crate; it plugs in through
//! [`HtmlContainer`] and paints back through the [`GraphicsAdapter`] we
//! hand it.

use super::graphics::GraphicsAdapter;
use crate::adapter::RenderAdapter;
use crate::error::{Error, Result};
use crate::geometry::{PointF, SizeF};
use crate::{RenderOptions, Viewport};
use sha2::{Digest, Sha256};
use tiny_skia::Pixmap;

/// Encoded output of a render.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<Self> {
        let png_data = pixmap
            .encode_png()
            .map_err(|e| Error::RenderError(format!("png encoding failed: {}", e)))?;
        Ok(Self {
            width: pixmap.width(),
            height: pixmap.height(),
            png_data,
        })
    }

    /// Hex SHA-256 of the encoded PNG.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

/// Hex SHA-256 over the raw premultiplied pixels, independent of PNG encoder
/// settings.
pub fn pixmap_digest(pixmap: &Pixmap) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pixmap.width().to_le_bytes());
    hasher.update(pixmap.height().to_le_bytes());
    hasher.update(pixmap.data());
    hex::encode(hasher.finalize())
}

/// Where the document is laid out on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_size: SizeF,
    /// Top-left corner of the content area.
    pub location: PointF,
    /// Largest size the content may grow to.
    pub max_size: SizeF,
}

impl PageGeometry {
    /// A page of `width` x `height` with `margin` on every side.
    pub fn with_margin(width: u32, height: u32, margin: u32) -> Self {
        let (w, h, m) = (width as f64, height as f64, margin as f64);
        Self {
            page_size: SizeF::new(w, h),
            location: PointF::new(m, m),
            max_size: SizeF::new(w - m * 2.0, h - m * 2.0),
        }
    }
}

/// An HTML layout and paint engine driven by [`render_to_image`].
pub trait HtmlContainer {
    fn set_html(&mut self, html: &str, adapter: &RenderAdapter) -> Result<()>;

    fn set_page(&mut self, page: PageGeometry);

    /// Lays the document out, measuring text through `g`.
    fn perform_layout(
        &mut self,
        g: &mut GraphicsAdapter<'_>,
        adapter: &RenderAdapter,
    ) -> Result<()>;

    fn perform_paint(&mut self, g: &mut GraphicsAdapter<'_>, adapter: &RenderAdapter) -> Result<()>;
}

/// Renders `html` into a new surface the size of the viewport.
///
/// Returns `Ok(None)` for blank input. A fully transparent background is
/// rejected before anything is allocated.
pub fn render_to_image(
    html: &str,
    options: &RenderOptions,
    adapter: &RenderAdapter,
    container: &mut dyn HtmlContainer,
) -> Result<Option<Pixmap>> {
    if html.trim().is_empty() {
        return Ok(None);
    }
    options.validate()?;

    let Viewport { width, height } = options.viewport;
    let mut pixmap = Pixmap::new(width, height).ok_or(Error::SurfaceAllocation { width, height })?;
    log::debug!("allocated {}x{} surface", width, height);

    {
        let mut g = GraphicsAdapter::new(&mut pixmap).with_smoothing(options.smoothing);
        g.clear(options.background);

        container.set_page(PageGeometry::with_margin(width, height, options.margin));
        container.set_html(html, adapter)?;
        container.perform_layout(&mut g, adapter)?;
        container.perform_paint(&mut g, adapter)?;
    }

    Ok(Some(pixmap))
}

/// [`render_to_image`] followed by PNG encoding.
pub fn render_to_png(
    html: &str,
    options: &RenderOptions,
    adapter: &RenderAdapter,
    container: &mut dyn HtmlContainer,
) -> Result<Option<Screenshot>> {
    render_to_image(html, options, adapter, container)?
        .map(|p| Screenshot::from_pixmap(&p))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        page: Option<PageGeometry>,
    }

    impl HtmlContainer for Recorder {
        fn set_html(&mut self, _html: &str, _adapter: &RenderAdapter) -> Result<()> {
            self.calls.push("html");
            Ok(())
        }

        fn set_page(&mut self, page: PageGeometry) {
            self.calls.push("page");
            self.page = Some(page);
        }

        fn perform_layout(
            &mut self,
            _g: &mut GraphicsAdapter<'_>,
            _a: &RenderAdapter,
        ) -> Result<()> {
            self.calls.push("layout");
            Ok(())
        }

        fn perform_paint(
            &mut self,
            _g: &mut GraphicsAdapter<'_>,
            _a: &RenderAdapter,
        ) -> Result<()> {
            self.calls.push("paint");
            Ok(())
        }
    }

    fn options(w: u32, h: u32) -> RenderOptions {
        RenderOptions {
            viewport: Viewport { width: w, height: h },
            margin: 2,
            ..Default::default()
        }
    }

    #[test]
    fn layout_runs_before_paint() {
        let adapter = RenderAdapter::default();
        let mut c = Recorder::default();
        let img = render_to_image("<p>x</p>", &options(20, 10), &adapter, &mut c).unwrap().unwrap();
        assert_eq!(c.calls, vec!["page", "html", "layout", "paint"]);
        assert_eq!(c.page.unwrap().max_size, SizeF::new(16.0, 6.0));
        assert_eq!((img.width(), img.height()), (20, 10));
        let px = img.pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn blank_html_renders_nothing() {
        let adapter = RenderAdapter::default();
        let mut c = Recorder::default();
        assert!(render_to_image("  \n", &options(20, 10), &adapter, &mut c).unwrap().is_none());
        assert!(c.calls.is_empty());
    }

    #[test]
    fn transparent_background_is_rejected() {
        let adapter = RenderAdapter::default();
        let mut c = Recorder::default();
        let mut opts = options(20, 10);
        opts.background = Color::TRANSPARENT;
        let err = render_to_image("<p/>", &opts, &adapter, &mut c).unwrap_err();
        assert!(matches!(err, Error::InvalidBackground(_)));
        assert!(c.calls.is_empty());
    }

    #[test]
    fn zero_sized_surface_fails_allocation() {
        let adapter = RenderAdapter::default();
        let mut c = Recorder::default();
        let mut opts = options(0, 10);
        opts.margin = 0;
        let err = render_to_image("<p/>", &opts, &adapter, &mut c).unwrap_err();
        assert!(matches!(err, Error::SurfaceAllocation { width: 0, height: 10 }));
    }

    #[test]
    fn png_digest_is_stable() {
        let adapter = RenderAdapter::default();
        let shot = || {
            render_to_png("<p/>", &options(8, 8), &adapter, &mut Recorder::default())
                .unwrap()
                .unwrap()
        };
        let (a, b) = (shot(), shot());
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }
}
