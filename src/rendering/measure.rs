//! Text measurement: natural extent of a string and the longest prefix that
//! fits in a pixel budget.

use crate::font::FontAdapter;
use crate::geometry::SizeF;

/// How much of a string fits in a width budget.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitResult {
    /// Number of leading characters that fit.
    pub char_fit: usize,
    /// Measured width of those characters; 0 when none fit.
    pub char_fit_width: f64,
}

impl FitResult {
    /// The fitting prefix of `text`.
    pub fn prefix<'t>(&self, text: &'t str) -> &'t str {
        match text.char_indices().nth(self.char_fit) {
            Some((i, _)) => &text[..i],
            None => text,
        }
    }
}

/// Pen position of a glyph relative to the text origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GlyphPlacement {
    pub x: f64,
    pub line: u32,
}

/// Walks a string one character at a time, tracking the running extent.
///
/// Extent and fit measurement share this walk so the width reported for a
/// prefix is bit-identical to measuring that prefix on its own.
pub(crate) struct TextCursor<'f> {
    font: &'f FontAdapter,
    em_px: f64,
    line_height: f64,
    widest: f64,
    line_width: f64,
    lines: u32,
    prev: Option<char>,
}

impl<'f> TextCursor<'f> {
    pub fn new(font: &'f FontAdapter) -> Self {
        Self {
            font,
            em_px: font.em_px(),
            line_height: font.metrics().height,
            widest: 0.0,
            line_width: 0.0,
            lines: 0,
            prev: None,
        }
    }

    /// Advances past `ch`, returning where its glyph sits (none for line
    /// breaks).
    pub fn push(&mut self, ch: char) -> Option<GlyphPlacement> {
        if self.lines == 0 {
            self.lines = 1;
        }
        match ch {
            '\n' => {
                self.widest = self.widest.max(self.line_width);
                self.line_width = 0.0;
                self.lines += 1;
                self.prev = None;
                None
            }
            '\r' => None,
            _ => {
                let face = self.font.face();
                if let Some(prev) = self.prev {
                    self.line_width += face.kerning(prev, ch, self.em_px);
                }
                let placed = GlyphPlacement {
                    x: self.line_width,
                    line: self.lines - 1,
                };
                self.line_width += face.advance(ch, self.em_px);
                self.prev = Some(ch);
                Some(placed)
            }
        }
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(
            self.widest.max(self.line_width),
            self.lines as f64 * self.line_height,
        )
    }
}

/// Natural, unwrapped size of `text` in `font`, trailing spaces included.
///
/// The first call for a font computes and caches its line metrics.
pub fn measure_extent(text: &str, font: &FontAdapter) -> SizeF {
    let mut cursor = TextCursor::new(font);
    for ch in text.chars() {
        cursor.push(ch);
    }
    cursor.size()
}

/// Longest prefix of `text` narrower than `max_width`.
///
/// Prefixes are tried in increasing length. A prefix is accepted when its
/// width is strictly less than `max_width` and its height does not exceed
/// the height of the whole string; the scan stops at the first prefix that
/// is rejected. Runs in one pass using cumulative advances.
pub fn measure_fit(text: &str, font: &FontAdapter, max_width: f64) -> FitResult {
    let full = measure_extent(text, font);
    let mut fit = FitResult::default();
    if text.is_empty() || !(max_width > 0.0) {
        return fit;
    }

    let mut cursor = TextCursor::new(font);
    for (i, ch) in text.chars().enumerate() {
        cursor.push(ch);
        let size = cursor.size();
        if size.height <= full.height && size.width < max_width {
            fit = FitResult {
                char_fit: i + 1,
                char_fit_width: size.width,
            };
        } else {
            break;
        }
    }
    fit
}

/// Same result as [`measure_fit`], measuring every prefix from scratch.
///
/// Quadratic in the length of `text`; kept as the reference the cumulative
/// scan is checked and benchmarked against.
pub fn measure_fit_rescan(text: &str, font: &FontAdapter, max_width: f64) -> FitResult {
    let full = measure_extent(text, font);
    let mut fit = FitResult::default();
    if text.is_empty() || !(max_width > 0.0) {
        return fit;
    }

    for (i, (offset, ch)) in text.char_indices().enumerate() {
        let prefix = &text[..offset + ch.len_utf8()];
        let size = measure_extent(prefix, font);
        if size.height <= full.height && size.width < max_width {
            fit = FitResult {
                char_fit: i + 1,
                char_fit_width: size.width,
            };
        } else {
            break;
        }
    }
    fit
}
