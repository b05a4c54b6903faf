//! Surface adapter: a pixmap plus the clip stack, smoothing mode and text
//! direction state of one drawing session.
//!
//! The layout core measures through [`GraphicsAdapter::measure_string`] and
//! [`GraphicsAdapter::measure_string_fit`] while breaking lines, then paints
//! through the `draw_*` / `fill_*` calls. Geometry arrives as `f64` layout
//! pixels and is converted to tiny-skia types only here.

use super::clip::ClipStack;
use super::measure::{measure_extent, measure_fit, FitResult, TextCursor};
use super::path::GraphicsPath;
use crate::brush::{Brush, Pen};
use crate::font::{FontAdapter, FontStyle};
use crate::geometry::{text_origin, to_skia_rect, Color, PointF, RectF, SizeF};
use crate::image::ImageAdapter;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pattern, Pixmap, SpreadMode, Transform,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    pub fn from_rtl(rtl: bool) -> Self {
        if rtl {
            TextDirection::RightToLeft
        } else {
            TextDirection::LeftToRight
        }
    }

    pub fn is_rtl(self) -> bool {
        self == TextDirection::RightToLeft
    }
}

/// Edge smoothing for shapes. Text is always anti-aliased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    #[default]
    Default,
    AntiAlias,
    HighQuality,
    HighSpeed,
}

impl SmoothingMode {
    pub fn anti_alias(self) -> bool {
        matches!(self, SmoothingMode::AntiAlias | SmoothingMode::HighQuality)
    }
}

/// The smoothing mode in effect before an override; hand it back to
/// [`GraphicsAdapter::return_previous_smoothing_mode`] to restore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SmoothingToken(SmoothingMode);

/// Last text direction used on this adapter.
#[derive(Debug, Default)]
struct TextFormat {
    direction: TextDirection,
    changes: usize,
}

impl TextFormat {
    fn apply(&mut self, direction: TextDirection) {
        if self.direction != direction {
            self.direction = direction;
            self.changes += 1;
        }
    }
}

enum SurfaceTarget<'a> {
    Owned(Pixmap),
    Borrowed(&'a mut Pixmap),
}

impl SurfaceTarget<'_> {
    fn pixmap(&self) -> &Pixmap {
        match self {
            SurfaceTarget::Owned(p) => p,
            SurfaceTarget::Borrowed(p) => p,
        }
    }

    fn pixmap_mut(&mut self) -> &mut Pixmap {
        match self {
            SurfaceTarget::Owned(p) => p,
            SurfaceTarget::Borrowed(p) => p,
        }
    }
}

pub struct GraphicsAdapter<'a> {
    target: SurfaceTarget<'a>,
    clips: ClipStack,
    /// Host clip; `None` while drawing is unclipped.
    clip_mask: Option<Mask>,
    smoothing: SmoothingMode,
    format: TextFormat,
}

impl<'a> GraphicsAdapter<'a> {
    /// Draws into a surface owned by the caller.
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        Self::with_target(SurfaceTarget::Borrowed(pixmap))
    }

    /// Takes ownership of `pixmap`; it is released with the adapter unless
    /// reclaimed through [`GraphicsAdapter::into_pixmap`].
    pub fn owning(pixmap: Pixmap) -> GraphicsAdapter<'static> {
        GraphicsAdapter::with_target(SurfaceTarget::Owned(pixmap))
    }

    fn with_target(target: SurfaceTarget<'a>) -> Self {
        let p = target.pixmap();
        let root = RectF::new(0.0, 0.0, p.width() as f64, p.height() as f64);
        Self {
            target,
            clips: ClipStack::new(root),
            clip_mask: None,
            smoothing: SmoothingMode::Default,
            format: TextFormat::default(),
        }
    }

    pub fn with_smoothing(mut self, mode: SmoothingMode) -> Self {
        self.smoothing = mode;
        self
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.target, SurfaceTarget::Owned(_))
    }

    pub fn pixmap(&self) -> &Pixmap {
        self.target.pixmap()
    }

    /// The owned surface, or `None` when the surface was borrowed.
    pub fn into_pixmap(self) -> Option<Pixmap> {
        match self.target {
            SurfaceTarget::Owned(p) => Some(p),
            SurfaceTarget::Borrowed(_) => None,
        }
    }

    /// Fills the whole surface, ignoring the clip.
    pub fn clear(&mut self, color: Color) {
        self.target.pixmap_mut().fill(color.to_skia());
    }

    // --- clipping ---

    pub fn clip_bounds(&self) -> RectF {
        self.clips.top()
    }

    pub fn clip_depth(&self) -> usize {
        self.clips.depth()
    }

    /// Restricts drawing to `rect` until the matching [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: RectF) {
        self.clips.push(rect);
        self.clip_mask = self.rect_mask(rect);
    }

    /// Hides `rect` from drawing without changing the logical clip.
    pub fn push_clip_exclude(&mut self, rect: RectF) {
        self.clips.push_top();
        let mask = match self.clip_mask.take() {
            Some(m) => Some(m),
            None => self.new_mask(255),
        };
        self.clip_mask = mask.map(|mut m| {
            fill_mask_rect(&mut m, rect, 0);
            m
        });
    }

    /// Drops the innermost clip scope and reapplies the enclosing rectangle.
    ///
    /// Exclusions made inside enclosing scopes are not reapplied.
    ///
    /// # Panics
    ///
    /// Panics if there is no scope to pop.
    pub fn pop_clip(&mut self) {
        let top = self.clips.pop();
        self.clip_mask = if self.clips.depth() == 1 {
            None
        } else {
            self.rect_mask(top)
        };
    }

    fn new_mask(&self, fill: u8) -> Option<Mask> {
        let p = self.target.pixmap();
        let mut mask = Mask::new(p.width(), p.height())?;
        if fill != 0 {
            mask.data_mut().fill(fill);
        }
        Some(mask)
    }

    fn rect_mask(&self, rect: RectF) -> Option<Mask> {
        let mut mask = self.new_mask(0)?;
        fill_mask_rect(&mut mask, rect, 255);
        Some(mask)
    }

    // --- smoothing ---

    pub fn smoothing_mode(&self) -> SmoothingMode {
        self.smoothing
    }

    /// Switches shape smoothing to anti-aliased, returning the mode it replaced.
    pub fn set_anti_alias_smoothing_mode(&mut self) -> SmoothingToken {
        let prev = self.smoothing;
        self.smoothing = SmoothingMode::AntiAlias;
        SmoothingToken(prev)
    }

    /// Restores the mode captured in `token`; `None` leaves the mode as is.
    pub fn return_previous_smoothing_mode(&mut self, token: Option<SmoothingToken>) {
        if let Some(SmoothingToken(mode)) = token {
            self.smoothing = mode;
        }
    }

    // --- text ---

    pub fn measure_string(&self, text: &str, font: &FontAdapter) -> SizeF {
        measure_extent(text, font)
    }

    pub fn measure_string_fit(&self, text: &str, font: &FontAdapter, max_width: f64) -> FitResult {
        measure_fit(text, font, max_width)
    }

    /// Direction of the most recent text draw.
    pub fn text_direction(&self) -> TextDirection {
        self.format.direction
    }

    /// How many times text draws switched direction on this adapter.
    pub fn text_direction_changes(&self) -> usize {
        self.format.changes
    }

    /// Draws `text` in the box at `point` of `size`.
    ///
    /// Left-to-right text starts at the left edge of the box. Right-to-left
    /// text is anchored at the right edge, each line ending there.
    pub fn draw_string(
        &mut self,
        text: &str,
        font: &FontAdapter,
        color: Color,
        point: PointF,
        size: SizeF,
        direction: TextDirection,
    ) {
        self.format.apply(direction);
        let origin = text_origin(point, size, direction.is_rtl());
        if text.is_empty() || color.is_fully_transparent() {
            return;
        }

        let metrics = font.metrics();
        let ascent = font.vertical_metrics().ascent;
        let em_px = font.em_px();
        let line_widths: Vec<f64> = text
            .split('\n')
            .map(|l| measure_extent(l, font).width)
            .collect();
        let line_start = |line: usize| {
            let width = line_widths.get(line).copied().unwrap_or(0.0);
            if direction.is_rtl() {
                origin.x - width
            } else {
                origin.x
            }
        };

        let brush = Brush::solid(color);
        let paint = brush.to_paint(true);
        let mask = self.clip_mask.as_ref();
        let pixmap = self.target.pixmap_mut();

        let mut cursor = TextCursor::new(font);
        for ch in text.chars() {
            let Some(placed) = cursor.push(ch) else {
                continue;
            };
            let line = placed.line as usize;
            let baseline = origin.y + line as f64 * metrics.height + ascent;
            let x = line_start(line) + placed.x;
            if let Some(path) = font.face().glyph_outline(ch, em_px, x, baseline) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
            }
        }

        let style = font.style();
        if !style.intersects(FontStyle::UNDERLINE | FontStyle::STRIKEOUT) {
            return;
        }
        let thickness = (em_px / 14.0).round().max(1.0);
        for (line, width) in line_widths.iter().enumerate() {
            let top = origin.y + line as f64 * metrics.height;
            let mut bars = Vec::with_capacity(2);
            if style.contains(FontStyle::UNDERLINE) {
                bars.push(top + metrics.underline_offset);
            }
            if style.contains(FontStyle::STRIKEOUT) {
                bars.push((top + ascent * 0.7).round());
            }
            for y in bars {
                if let Some(r) = to_skia_rect(RectF::new(line_start(line), y, *width, thickness)) {
                    pixmap.fill_rect(r, &paint, Transform::identity(), mask);
                }
            }
        }
    }

    // --- resources ---

    /// Brush tiling the `dst_rect` region of `image`, shifted by `translate`.
    pub fn get_texture_brush(
        &self,
        image: &ImageAdapter,
        dst_rect: RectF,
        translate: PointF,
    ) -> Option<Resource<Brush>> {
        Brush::texture(image, dst_rect, translate)
    }

    pub fn get_graphics_path(&self) -> GraphicsPath {
        GraphicsPath::new()
    }

    // --- shapes ---

    pub fn draw_line(&mut self, pen: &Pen, x1: f64, y1: f64, x2: f64, y2: f64) {
        let mut pb = PathBuilder::new();
        pb.move_to(x1 as f32, y1 as f32);
        pb.line_to(x2 as f32, y2 as f32);
        if let Some(path) = pb.finish() {
            let paint = pen.to_paint(self.smoothing.anti_alias());
            let mask = self.clip_mask.as_ref();
            self.target
                .pixmap_mut()
                .stroke_path(&path, &paint, &pen.to_stroke(), Transform::identity(), mask);
        }
    }

    pub fn draw_rectangle(&mut self, pen: &Pen, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = to_skia_rect(RectF::new(x, y, width, height)) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let paint = pen.to_paint(self.smoothing.anti_alias());
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .stroke_path(&path, &paint, &pen.to_stroke(), Transform::identity(), mask);
    }

    pub fn fill_rectangle(&mut self, brush: &Brush, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = to_skia_rect(RectF::new(x, y, width, height)) else {
            return;
        };
        let paint = brush.to_paint(self.smoothing.anti_alias());
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .fill_rect(rect, &paint, Transform::identity(), mask);
    }

    pub fn draw_path(&mut self, pen: &Pen, path: &GraphicsPath) {
        let Some(path) = path.to_skia() else {
            return;
        };
        let paint = pen.to_paint(self.smoothing.anti_alias());
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .stroke_path(&path, &paint, &pen.to_stroke(), Transform::identity(), mask);
    }

    pub fn fill_path(&mut self, brush: &Brush, path: &GraphicsPath) {
        let Some(path) = path.to_skia() else {
            return;
        };
        let paint = brush.to_paint(self.smoothing.anti_alias());
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    /// Fills the polygon through `points` (even-odd rule). No points, no-op.
    pub fn fill_polygon(&mut self, brush: &Brush, points: &[PointF]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = brush.to_paint(self.smoothing.anti_alias());
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), mask);
    }

    // --- images ---

    /// Draws the whole of `image` scaled into `dest`.
    pub fn draw_image(&mut self, image: &ImageAdapter, dest: RectF) {
        let source = RectF::new(0.0, 0.0, image.width(), image.height());
        self.draw_image_region(image, dest, source);
    }

    /// Draws the `source` region of `image` scaled into `dest`.
    pub fn draw_image_region(&mut self, image: &ImageAdapter, dest: RectF, source: RectF) {
        if source.is_empty() {
            return;
        }
        let Some(dest_rect) = to_skia_rect(dest) else {
            return;
        };
        let sx = dest.width / source.width;
        let sy = dest.height / source.height;
        let quality = if sx == 1.0 && sy == 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let transform = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            (dest.x - source.x * sx) as f32,
            (dest.y - source.y * sy) as f32,
        );
        let paint = Paint {
            shader: Pattern::new(image.pixmap().as_ref(), SpreadMode::Pad, quality, 1.0, transform),
            anti_alias: self.smoothing.anti_alias(),
            ..Paint::default()
        };
        let mask = self.clip_mask.as_ref();
        self.target
            .pixmap_mut()
            .fill_rect(dest_rect, &paint, Transform::identity(), mask);
    }
}

/// Sets the pixels of `rect`, rounded to whole pixels and clamped to the
/// mask, to `value`.
fn fill_mask_rect(mask: &mut Mask, rect: RectF, value: u8) {
    // edges stay in f64 until clamped, so unbounded rects cover the mask
    let w = f64::from(mask.width());
    let h = f64::from(mask.height());
    let left = rect.x.round();
    let top = rect.y.round();
    let x1 = (left + rect.width.round()).clamp(0.0, w) as usize;
    let y1 = (top + rect.height.round()).clamp(0.0, h) as usize;
    let x0 = left.clamp(0.0, w) as usize;
    let y0 = top.clamp(0.0, h) as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let stride = mask.width() as usize;
    let data = mask.data_mut();
    for y in y0..y1 {
        data[y * stride + x0..y * stride + x1].fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BlockFace;
    use std::sync::Arc;

    fn surface() -> Pixmap {
        let mut p = Pixmap::new(40, 30).unwrap();
        p.fill(tiny_skia::Color::WHITE);
        p
    }

    fn rgb_at(g: &GraphicsAdapter<'_>, x: u32, y: u32) -> (u8, u8, u8) {
        let px = g.pixmap().pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue())
    }

    const RED: Color = Color::from_rgb(255, 0, 0);

    #[test]
    fn borrowed_surface_is_not_returned() {
        let mut p = surface();
        let g = GraphicsAdapter::new(&mut p);
        assert!(!g.is_owned());
        assert!(g.into_pixmap().is_none());

        let g = GraphicsAdapter::owning(surface());
        assert!(g.is_owned());
        assert_eq!(g.into_pixmap().unwrap().width(), 40);
    }

    #[test]
    fn push_clip_limits_fill() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        g.push_clip(RectF::new(0.0, 0.0, 10.0, 10.0));
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 5, 5), (255, 0, 0));
        assert_eq!(rgb_at(&g, 20, 20), (255, 255, 255));
    }

    #[test]
    fn pop_clip_restores_unclipped_drawing() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        let before = g.clip_bounds();
        g.push_clip(RectF::new(0.0, 0.0, 10.0, 10.0));
        g.pop_clip();
        assert_eq!(g.clip_bounds(), before);
        assert_eq!(g.clip_depth(), 1);
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 30, 25), (255, 0, 0));
    }

    #[test]
    fn exclude_hides_rect_but_keeps_logical_clip() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        g.push_clip(RectF::new(0.0, 0.0, 20.0, 20.0));
        g.push_clip_exclude(RectF::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(g.clip_bounds(), RectF::new(0.0, 0.0, 20.0, 20.0));
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 7, 7), (255, 255, 255));
        assert_eq!(rgb_at(&g, 2, 2), (255, 0, 0));
        assert_eq!(rgb_at(&g, 25, 25), (255, 255, 255));
    }

    #[test]
    fn unbounded_clip_covers_rest_of_surface() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        g.push_clip(RectF::new(5.0, 0.0, 1e300, 1e300));
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 2, 10), (255, 255, 255));
        assert_eq!(rgb_at(&g, 5, 0), (255, 0, 0));
        assert_eq!(rgb_at(&g, 39, 29), (255, 0, 0));
    }

    #[test]
    fn infinite_exclude_hides_to_the_edge() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        g.push_clip_exclude(RectF::new(1.0, 1.0, f64::INFINITY, 3.0));
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 0, 2), (255, 0, 0));
        assert_eq!(rgb_at(&g, 39, 2), (255, 255, 255));
        assert_eq!(rgb_at(&g, 39, 10), (255, 0, 0));
    }

    #[test]
    fn nan_clip_hides_everything() {
        let mut p = surface();
        let mut g = GraphicsAdapter::new(&mut p);
        g.push_clip(RectF::new(f64::NAN, 0.0, 10.0, 10.0));
        g.fill_rectangle(&Brush::Solid(RED), 0.0, 0.0, 40.0, 30.0);
        assert_eq!(rgb_at(&g, 5, 5), (255, 255, 255));
    }

    #[test]
    #[should_panic(expected = "clip stack underflow")]
    fn pop_without_push_panics() {
        let mut g = GraphicsAdapter::owning(surface());
        g.pop_clip();
    }

    #[test]
    fn smoothing_token_restores_previous_mode() {
        let mut g = GraphicsAdapter::owning(surface()).with_smoothing(SmoothingMode::HighSpeed);
        let token = g.set_anti_alias_smoothing_mode();
        assert_eq!(g.smoothing_mode(), SmoothingMode::AntiAlias);
        g.return_previous_smoothing_mode(Some(token));
        assert_eq!(g.smoothing_mode(), SmoothingMode::HighSpeed);
        g.return_previous_smoothing_mode(None);
        assert_eq!(g.smoothing_mode(), SmoothingMode::HighSpeed);
    }

    #[test]
    fn direction_changes_only_counted_on_switch() {
        let font = FontAdapter::new(Arc::new(BlockFace::new()), 12.0, FontStyle::REGULAR);
        let mut g = GraphicsAdapter::owning(surface());
        let at = PointF::new(0.0, 0.0);
        let size = SizeF::new(8.0, 16.0);
        g.draw_string("a", &font, Color::BLACK, at, size, TextDirection::LeftToRight);
        g.draw_string("a", &font, Color::BLACK, at, size, TextDirection::RightToLeft);
        g.draw_string("a", &font, Color::BLACK, at, size, TextDirection::RightToLeft);
        g.draw_string("a", &font, Color::BLACK, at, size, TextDirection::LeftToRight);
        assert_eq!(g.text_direction_changes(), 2);
        assert_eq!(g.text_direction(), TextDirection::LeftToRight);
    }

    #[test]
    fn rtl_text_ends_at_right_edge_of_box() {
        let font = FontAdapter::new(Arc::new(BlockFace::new()), 12.0, FontStyle::REGULAR);
        let mut g = GraphicsAdapter::owning(surface());
        // one 8px glyph in a 30px box: RTL places it at 22..30
        g.draw_string(
            "a",
            &font,
            Color::BLACK,
            PointF::new(0.0, 0.0),
            SizeF::new(30.0, 16.0),
            TextDirection::RightToLeft,
        );
        assert_eq!(rgb_at(&g, 26, 8), (0, 0, 0));
        assert_eq!(rgb_at(&g, 4, 8), (255, 255, 255));
    }

    #[test]
    fn empty_polygon_is_noop() {
        let mut p = surface();
        let before = p.data().to_vec();
        let mut g = GraphicsAdapter::new(&mut p);
        g.fill_polygon(&Brush::Solid(RED), &[]);
        drop(g);
        assert_eq!(p.data(), &before[..]);
    }

    #[test]
    fn image_region_blits_exact_pixels() {
        let mut src = Pixmap::new(4, 4).unwrap();
        src.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        let img = ImageAdapter::from_pixmap(src);
        let mut g = GraphicsAdapter::owning(surface());
        g.draw_image_region(&img, RectF::new(10.0, 10.0, 2.0, 2.0), RectF::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(rgb_at(&g, 11, 11), (0, 0, 255));
        assert_eq!(rgb_at(&g, 12, 12), (255, 255, 255));
    }
}
