//! Resource factory handed to the layout core: colors, pens, brushes,
//! images and fonts, all resolved against one [`FontRegistry`].

use crate::brush::{Brush, Pen};
use crate::error::Result;
use crate::font::{BlockFace, FontAdapter, FontFace, FontFamily, FontRegistry, FontStyle};
use crate::geometry::{Color, PointF, RectF};
use crate::image::ImageAdapter;
use crate::resource::Resource;
use crate::RenderOptions;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tiny_skia::Pixmap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    size_bits: u64,
    style: FontStyle,
}

impl FontKey {
    fn new(family: &str, size: f64, style: FontStyle) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            size_bits: size.to_bits(),
            style,
        }
    }
}

/// Creates the resources the layout core paints with.
///
/// Fonts are cached per (family, size, style), so repeated requests share
/// one [`FontAdapter`] and therefore one metric cache. The cache is not
/// thread-safe; use one adapter per rendering thread.
pub struct RenderAdapter {
    registry: FontRegistry,
    default_family: String,
    fallback: Arc<dyn FontFace>,
    fonts: RefCell<HashMap<FontKey, Rc<FontAdapter>>>,
}

impl RenderAdapter {
    pub fn new(registry: FontRegistry) -> Self {
        Self {
            registry,
            default_family: crate::DEFAULT_FONT_FAMILY.to_string(),
            fallback: Arc::new(BlockFace::new()),
            fonts: RefCell::new(HashMap::new()),
        }
    }

    /// Family used when a requested family is not installed.
    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = family.into();
        self
    }

    /// Builds the registry described by `options`: system fonts (with the
    /// `system-fonts` feature) plus every configured font directory.
    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        #[cfg(feature = "system-fonts")]
        let mut registry = FontRegistry::with_system_fonts();
        #[cfg(not(feature = "system-fonts"))]
        let mut registry = FontRegistry::new();

        for path in &options.font_dirs {
            if path.is_file() {
                registry.load_font_file(path)?;
            } else {
                registry.load_fonts_dir(path)?;
            }
        }
        if !registry.contains_family(&options.default_family) {
            log::warn!(
                "default family '{}' is not installed; text falls back to the built-in face",
                options.default_family
            );
        }
        Ok(Self::new(registry).with_default_family(options.default_family.clone()))
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    /// Parses a color name or `#hex` value. Unknown names give
    /// [`Color::EMPTY`].
    pub fn get_color(&self, name: &str) -> Color {
        let parsed = if name.trim_start().starts_with('#') {
            Color::from_hex(name)
        } else {
            Color::from_name(name)
        };
        parsed.unwrap_or(Color::EMPTY)
    }

    pub fn get_pen(&self, color: Color) -> Pen {
        Pen::new(color)
    }

    pub fn get_solid_brush(&self, color: Color) -> Resource<Brush> {
        Brush::solid(color)
    }

    pub fn get_linear_gradient_brush(
        &self,
        rect: RectF,
        color1: Color,
        color2: Color,
        angle: f64,
    ) -> Resource<Brush> {
        Brush::linear_gradient(rect, color1, color2, angle)
    }

    pub fn get_texture_brush(
        &self,
        image: &ImageAdapter,
        rect: RectF,
        translate: PointF,
    ) -> Option<Resource<Brush>> {
        Brush::texture(image, rect, translate)
    }

    pub fn image_from_bytes(&self, bytes: &[u8]) -> Result<ImageAdapter> {
        ImageAdapter::from_bytes(bytes)
    }

    pub fn convert_image(&self, pixmap: Option<Pixmap>) -> Option<ImageAdapter> {
        pixmap.map(ImageAdapter::from_pixmap)
    }

    /// Font of `family` at `size` points.
    pub fn create_font(&self, family: &str, size: f64, style: FontStyle) -> Rc<FontAdapter> {
        let key = FontKey::new(family, size, style);
        if let Some(font) = self.fonts.borrow().get(&key) {
            return font.clone();
        }
        let face = self.resolve_face(family, style);
        let font = Rc::new(FontAdapter::new(face, size, style));
        self.fonts.borrow_mut().insert(key, font.clone());
        font
    }

    pub fn create_font_from_family(
        &self,
        family: &FontFamily,
        size: f64,
        style: FontStyle,
    ) -> Rc<FontAdapter> {
        self.create_font(family.name(), size, style)
    }

    fn resolve_face(&self, family: &str, style: FontStyle) -> Arc<dyn FontFace> {
        match self.registry.face(family, style) {
            Ok(face) => return face,
            Err(e) => log::debug!("{}; trying default family {}", e, self.default_family),
        }
        if let Ok(face) = self.registry.face(&self.default_family, style) {
            return face;
        }
        log::warn!(
            "no face for '{}' or default family '{}'; using built-in block face",
            family,
            self.default_family
        );
        self.fallback.clone()
    }
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self::new(FontRegistry::new())
    }
}
