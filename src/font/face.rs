//! Font faces: the host capability that answers metric and outline queries.

use crate::error::{Error, Result};
use ab_glyph::{Font as _, FontArc, FontVec, OutlineCurve};
use std::fmt;
use tiny_skia::{Path, PathBuilder};

/// Vertical metrics at a given em size, all in pixels and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub line_gap: f64,
}

impl VerticalMetrics {
    pub fn line_spacing(&self) -> f64 {
        self.ascent + self.descent + self.line_gap
    }
}

/// A scalable face. All sizes are pixels per em.
pub trait FontFace: fmt::Debug + Send + Sync {
    fn family_name(&self) -> &str;

    fn vertical_metrics(&self, em_px: f64) -> VerticalMetrics;

    /// Horizontal advance of `ch`.
    fn advance(&self, ch: char, em_px: f64) -> f64;

    /// Adjustment applied between `left` and `right` when they are adjacent.
    fn kerning(&self, _left: char, _right: char, _em_px: f64) -> f64 {
        0.0
    }

    /// Outline of `ch` with its pen origin on the baseline at (`x`, `baseline`).
    fn glyph_outline(&self, ch: char, em_px: f64, x: f64, baseline: f64) -> Option<Path>;
}

/// TrueType/OpenType face backed by `ab_glyph`.
pub struct GlyphFace {
    family: String,
    font: FontArc,
    units_per_em: f64,
}

impl GlyphFace {
    pub fn from_bytes(family: impl Into<String>, data: Vec<u8>, index: u32) -> Result<Self> {
        let family = family.into();
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| Error::FontLoad(format!("{}: {}", family, e)))?;
        let units_per_em = font
            .units_per_em()
            .ok_or_else(|| Error::FontLoad(format!("{}: missing units per em", family)))?;
        Ok(Self {
            family,
            font: FontArc::new(font),
            units_per_em: units_per_em as f64,
        })
    }

    fn scale(&self, em_px: f64) -> f64 {
        em_px / self.units_per_em
    }
}

impl fmt::Debug for GlyphFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphFace")
            .field("family", &self.family)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontFace for GlyphFace {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn vertical_metrics(&self, em_px: f64) -> VerticalMetrics {
        let s = self.scale(em_px);
        VerticalMetrics {
            ascent: self.font.ascent_unscaled() as f64 * s,
            descent: -(self.font.descent_unscaled() as f64) * s,
            line_gap: self.font.line_gap_unscaled() as f64 * s,
        }
    }

    fn advance(&self, ch: char, em_px: f64) -> f64 {
        let id = self.font.glyph_id(ch);
        self.font.h_advance_unscaled(id) as f64 * self.scale(em_px)
    }

    fn kerning(&self, left: char, right: char, em_px: f64) -> f64 {
        let a = self.font.glyph_id(left);
        let b = self.font.glyph_id(right);
        self.font.kern_unscaled(a, b) as f64 * self.scale(em_px)
    }

    fn glyph_outline(&self, ch: char, em_px: f64, x: f64, baseline: f64) -> Option<Path> {
        let outline = self.font.outline(self.font.glyph_id(ch))?;
        let s = self.scale(em_px);
        // font units are y-up
        let map = |p: ab_glyph::Point| {
            ((x + p.x as f64 * s) as f32, (baseline - p.y as f64 * s) as f32)
        };

        let mut pb = PathBuilder::new();
        let mut last: Option<ab_glyph::Point> = None;
        for curve in &outline.curves {
            let (from, to) = match curve {
                OutlineCurve::Line(a, b) => (*a, *b),
                OutlineCurve::Quad(a, _, b) => (*a, *b),
                OutlineCurve::Cubic(a, _, _, b) => (*a, *b),
            };
            if last != Some(from) {
                if last.is_some() {
                    pb.close();
                }
                let (mx, my) = map(from);
                pb.move_to(mx, my);
            }
            match curve {
                OutlineCurve::Line(_, b) => {
                    let (bx, by) = map(*b);
                    pb.line_to(bx, by);
                }
                OutlineCurve::Quad(_, c, b) => {
                    let (cx, cy) = map(*c);
                    let (bx, by) = map(*b);
                    pb.quad_to(cx, cy, bx, by);
                }
                OutlineCurve::Cubic(_, c1, c2, b) => {
                    let (c1x, c1y) = map(*c1);
                    let (c2x, c2y) = map(*c2);
                    let (bx, by) = map(*b);
                    pb.cubic_to(c1x, c1y, c2x, c2y, bx, by);
                }
            }
            last = Some(to);
        }
        if last.is_some() {
            pb.close();
        }
        pb.finish()
    }
}

/// Built-in face with fixed metrics and box glyphs.
///
/// Every printable character advances half an em, tabs advance two ems and
/// other control characters have no advance. Ascent is three quarters of
/// the em and descent one quarter, so metrics are exact in binary floating
/// point. Used when no installed face matches and for deterministic output.
#[derive(Debug, Clone)]
pub struct BlockFace {
    family: String,
}

impl BlockFace {
    pub const FAMILY: &'static str = "rfpaint-block";

    pub fn new() -> Self {
        Self::named(Self::FAMILY)
    }

    /// Same face registered under another family name.
    pub fn named(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

impl Default for BlockFace {
    fn default() -> Self {
        Self::new()
    }
}

impl FontFace for BlockFace {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn vertical_metrics(&self, em_px: f64) -> VerticalMetrics {
        VerticalMetrics {
            ascent: em_px * 0.75,
            descent: em_px * 0.25,
            line_gap: 0.0,
        }
    }

    fn advance(&self, ch: char, em_px: f64) -> f64 {
        match ch {
            '\t' => em_px * 2.0,
            c if c.is_control() => 0.0,
            _ => em_px * 0.5,
        }
    }

    fn glyph_outline(&self, ch: char, em_px: f64, x: f64, baseline: f64) -> Option<Path> {
        if ch.is_whitespace() || ch.is_control() {
            return None;
        }
        let inset = em_px / 16.0;
        let left = x + inset;
        let width = em_px * 0.5 - inset * 2.0;
        let top = baseline - em_px * 0.625;
        let height = em_px * 0.625;
        let rect =
            tiny_skia::Rect::from_xywh(left as f32, top as f32, width as f32, height as f32)?;
        Some(PathBuilder::from_rect(rect))
    }
}
