//! Brushes and pens, and their translation into tiny-skia paints.

use crate::geometry::{to_skia_point, Color, PointF, RectF};
use crate::image::ImageAdapter;
use crate::resource::Resource;
use tiny_skia::{
    FilterQuality, GradientStop, LinearGradient, Paint, Pattern, Pixmap, Shader, SpreadMode,
    Stroke, StrokeDash, Transform,
};

static WHITE_BRUSH: Brush = Brush::Solid(Color::WHITE);
static BLACK_BRUSH: Brush = Brush::Solid(Color::BLACK);
static TRANSPARENT_BRUSH: Brush = Brush::Solid(Color::TRANSPARENT);

/// A fill source.
#[derive(Debug, Clone)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        rect: RectF,
        start: Color,
        end: Color,
        /// Degrees, clockwise from the positive x axis.
        angle: f64,
    },
    Texture {
        /// The image region that tiles the fill.
        tile: Pixmap,
        translate: PointF,
    },
}

impl Brush {
    /// Solid brush, borrowing one of the stock brushes when the color has one.
    pub fn solid(color: Color) -> Resource<Brush> {
        if color == Color::WHITE {
            Resource::Stock(&WHITE_BRUSH)
        } else if color == Color::BLACK {
            Resource::Stock(&BLACK_BRUSH)
        } else if color.a < 1 {
            Resource::Stock(&TRANSPARENT_BRUSH)
        } else {
            Resource::Owned(Brush::Solid(color))
        }
    }

    pub fn linear_gradient(rect: RectF, start: Color, end: Color, angle: f64) -> Resource<Brush> {
        Resource::Owned(Brush::LinearGradient {
            rect,
            start,
            end,
            angle,
        })
    }

    /// Texture brush tiling the `source` region of `image`, shifted by `translate`.
    ///
    /// Returns `None` when `source` does not overlap the image.
    pub fn texture(
        image: &ImageAdapter,
        source: RectF,
        translate: PointF,
    ) -> Option<Resource<Brush>> {
        let region = crate::geometry::round_rect(source)?;
        let tile = image.pixmap().clone_rect(region)?;
        Some(Resource::Owned(Brush::Texture { tile, translate }))
    }

    pub(crate) fn to_paint(&self, anti_alias: bool) -> Paint<'_> {
        let mut paint = Paint {
            anti_alias,
            ..Paint::default()
        };
        match self {
            Brush::Solid(c) => paint.set_color(c.to_skia()),
            Brush::LinearGradient {
                rect,
                start,
                end,
                angle,
            } => {
                paint.shader = gradient_shader(*rect, *start, *end, *angle)
                    .unwrap_or(Shader::SolidColor(start.to_skia()));
            }
            Brush::Texture { tile, translate } => {
                paint.shader = Pattern::new(
                    tile.as_ref(),
                    SpreadMode::Repeat,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::from_translate(translate.x as f32, translate.y as f32),
                );
            }
        }
        paint
    }
}

/// Gradient running through the center of `rect` along `angle`, reaching
/// the corners of the rectangle at both ends.
fn gradient_shader(rect: RectF, start: Color, end: Color, angle: f64) -> Option<Shader<'static>> {
    let (sin, cos) = angle.to_radians().sin_cos();
    let half = (rect.width * cos.abs() + rect.height * sin.abs()) / 2.0;
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    let p0 = PointF::new(cx - cos * half, cy - sin * half);
    let p1 = PointF::new(cx + cos * half, cy + sin * half);
    LinearGradient::new(
        to_skia_point(p0),
        to_skia_point(p1),
        vec![
            GradientStop::new(0.0, start.to_skia()),
            GradientStop::new(1.0, end.to_skia()),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

impl DashStyle {
    /// On/off pattern in multiples of the pen width.
    fn pattern(self) -> &'static [f32] {
        match self {
            DashStyle::Solid => &[],
            DashStyle::Dash => &[3.0, 1.0],
            DashStyle::Dot => &[1.0, 1.0],
            DashStyle::DashDot => &[3.0, 1.0, 1.0, 1.0],
            DashStyle::DashDotDot => &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// A stroke source.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub dash: DashStyle,
}

impl Pen {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            width: 1.0,
            dash: DashStyle::Solid,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_dash(mut self, dash: DashStyle) -> Self {
        self.dash = dash;
        self
    }

    pub(crate) fn to_paint(&self, anti_alias: bool) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias,
            ..Paint::default()
        };
        paint.set_color(self.color.to_skia());
        paint
    }

    pub(crate) fn to_stroke(&self) -> Stroke {
        let width = self.width.max(0.0) as f32;
        let pattern = self.dash.pattern();
        let dash = if pattern.is_empty() || width <= 0.0 {
            None
        } else {
            StrokeDash::new(pattern.iter().map(|v| v * width).collect(), 0.0)
        };
        Stroke {
            width,
            dash,
            ..Stroke::default()
        }
    }
}
