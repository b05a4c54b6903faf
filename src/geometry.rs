//! Geometry and color values exchanged with the layout core.
//!
//! Everything the layout core hands us is in device-independent pixels as
//! `f64`. Conversion to the host's `f32`/integer precision happens only in
//! the `to_skia_*` / `round_*` helpers below, at the moment a value crosses
//! into tiny-skia.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const ZERO: SizeF = SizeF::new(0.0, 0.0);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: PointF, size: SizeF) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// An ARGB color, 8 bits per channel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_argb(255, 255, 255, 255);
    pub const BLACK: Color = Color::from_argb(255, 0, 0, 0);
    /// The named transparent color (white with zero alpha).
    pub const TRANSPARENT: Color = Color::from_argb(0, 255, 255, 255);
    /// All channels zero; what an unknown color name resolves to upstream.
    pub const EMPTY: Color = Color::from_argb(0, 0, 0, 0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parses `#rgb`, `#rrggbb` or `#aarrggbb`.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = byte(&hex[0..1].repeat(2))?;
                let g = byte(&hex[1..2].repeat(2))?;
                let b = byte(&hex[2..3].repeat(2))?;
                Some(Color::from_rgb(r, g, b))
            }
            6 => Some(Color::from_rgb(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
            )),
            8 => Some(Color::from_argb(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Looks up a named color, case-insensitively.
    pub fn from_name(name: &str) -> Option<Color> {
        let c = match name.trim().to_ascii_lowercase().as_str() {
            "transparent" => Color::TRANSPARENT,
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::from_rgb(255, 0, 0),
            "green" => Color::from_rgb(0, 128, 0),
            "lime" => Color::from_rgb(0, 255, 0),
            "blue" => Color::from_rgb(0, 0, 255),
            "navy" => Color::from_rgb(0, 0, 128),
            "yellow" => Color::from_rgb(255, 255, 0),
            "cyan" | "aqua" => Color::from_rgb(0, 255, 255),
            "magenta" | "fuchsia" => Color::from_rgb(255, 0, 255),
            "gray" | "grey" => Color::from_rgb(128, 128, 128),
            "darkgray" | "darkgrey" => Color::from_rgb(169, 169, 169),
            "lightgray" | "lightgrey" => Color::from_rgb(211, 211, 211),
            "silver" => Color::from_rgb(192, 192, 192),
            "maroon" => Color::from_rgb(128, 0, 0),
            "olive" => Color::from_rgb(128, 128, 0),
            "purple" => Color::from_rgb(128, 0, 128),
            "teal" => Color::from_rgb(0, 128, 128),
            "orange" => Color::from_rgb(255, 165, 0),
            "pink" => Color::from_rgb(255, 192, 203),
            "brown" => Color::from_rgb(165, 42, 42),
            "gold" => Color::from_rgb(255, 215, 0),
            "indigo" => Color::from_rgb(75, 0, 130),
            "violet" => Color::from_rgb(238, 130, 238),
            "coral" => Color::from_rgb(255, 127, 80),
            "salmon" => Color::from_rgb(250, 128, 114),
            "khaki" => Color::from_rgb(240, 230, 140),
            "beige" => Color::from_rgb(245, 245, 220),
            "ivory" => Color::from_rgb(255, 255, 240),
            "whitesmoke" => Color::from_rgb(245, 245, 245),
            "gainsboro" => Color::from_rgb(220, 220, 220),
            "darkblue" => Color::from_rgb(0, 0, 139),
            "darkred" => Color::from_rgb(139, 0, 0),
            "darkgreen" => Color::from_rgb(0, 100, 0),
            "lightblue" => Color::from_rgb(173, 216, 230),
            "lightgreen" => Color::from_rgb(144, 238, 144),
            "lightyellow" => Color::from_rgb(255, 255, 224),
            "steelblue" => Color::from_rgb(70, 130, 180),
            "royalblue" => Color::from_rgb(65, 105, 225),
            "dodgerblue" => Color::from_rgb(30, 144, 255),
            "skyblue" => Color::from_rgb(135, 206, 235),
            "tomato" => Color::from_rgb(255, 99, 71),
            "crimson" => Color::from_rgb(220, 20, 60),
            "chocolate" => Color::from_rgb(210, 105, 30),
            "tan" => Color::from_rgb(210, 180, 140),
            "orchid" => Color::from_rgb(218, 112, 214),
            "plum" => Color::from_rgb(221, 160, 221),
            "slategray" | "slategrey" => Color::from_rgb(112, 128, 144),
            "dimgray" | "dimgrey" => Color::from_rgb(105, 105, 105),
            _ => return None,
        };
        Some(c)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:02x}{:02x}{:02x}{:02x})", self.a, self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = if value.trim_start().starts_with('#') {
            Color::from_hex(&value)
        } else {
            Color::from_name(&value)
        };
        parsed.ok_or_else(|| format!("unrecognized color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

// --- host boundary conversions ---

pub fn to_skia_point(p: PointF) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

/// Float rectangle for the host; `None` when the rectangle has no area.
pub fn to_skia_rect(r: RectF) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
}

pub fn round_point(p: PointF) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

pub fn round_size(s: SizeF) -> (i32, i32) {
    (s.width.round() as i32, s.height.round() as i32)
}

/// Integer rectangle for the host, each component rounded independently.
pub fn round_rect(r: RectF) -> Option<tiny_skia::IntRect> {
    let (x, y) = round_point(PointF::new(r.x, r.y));
    let (w, h) = round_size(SizeF::new(r.width, r.height));
    if w <= 0 || h <= 0 {
        return None;
    }
    tiny_skia::IntRect::from_xywh(x, y, w as u32, h as u32)
}

/// Where text drawn at `point` inside a box of `size` starts on the host.
///
/// Right-to-left runs are anchored at the right edge of their box, so the
/// origin moves by the box width. The x coordinate is rounded before the
/// width is added and the sum truncated to whole pixels.
pub fn text_origin(point: PointF, size: SizeF, right_to_left: bool) -> PointF {
    let shift = if right_to_left { size.width } else { 0.0 };
    PointF::new((point.x.round() + shift).trunc(), point.y.round())
}
