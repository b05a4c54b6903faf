//! Path builder handed to the layout core for rounded borders and shapes.

use crate::geometry::PointF;
use tiny_skia::{Path, PathBuilder};

/// Cubic control-point factor for a quarter circle.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Which corner of a box a quarter arc rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Move(PointF),
    Line(PointF),
    Cubic(PointF, PointF, PointF),
    Close,
}

/// Records path segments in layout coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicsPath {
    segments: Vec<Segment>,
    last: PointF,
}

impl GraphicsPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, x: f64, y: f64) {
        self.last = PointF::new(x, y);
        self.segments.push(Segment::Move(self.last));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.last = PointF::new(x, y);
        self.segments.push(Segment::Line(self.last));
    }

    /// Quarter arc from the current point to (`x`, `y`) rounding `corner`.
    ///
    /// The arc is tangent to the box edges meeting at the corner, so the two
    /// endpoints already determine its radii; `size` is the nominal radius
    /// and only a zero or negative size degrades the arc to a line.
    pub fn arc_to(&mut self, x: f64, y: f64, size: f64, corner: Corner) {
        let from = self.last;
        let to = PointF::new(x, y);
        if !(size > 0.0) {
            self.line_to(x, y);
            return;
        }
        let knee = match corner {
            Corner::TopLeft | Corner::BottomRight => PointF::new(from.x, to.y),
            Corner::TopRight | Corner::BottomLeft => PointF::new(to.x, from.y),
        };
        let c1 = PointF::new(
            from.x + (knee.x - from.x) * KAPPA,
            from.y + (knee.y - from.y) * KAPPA,
        );
        let c2 = PointF::new(to.x + (knee.x - to.x) * KAPPA, to.y + (knee.y - to.y) * KAPPA);
        self.last = to;
        self.segments.push(Segment::Cubic(c1, c2, to));
    }

    pub fn close(&mut self) {
        self.segments.push(Segment::Close);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Host path; `None` when the recorded segments enclose nothing drawable.
    pub fn to_skia(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        let f = |p: PointF| (p.x as f32, p.y as f32);
        for seg in &self.segments {
            match *seg {
                Segment::Move(p) => {
                    let (x, y) = f(p);
                    pb.move_to(x, y);
                }
                Segment::Line(p) => {
                    let (x, y) = f(p);
                    pb.line_to(x, y);
                }
                Segment::Cubic(c1, c2, p) => {
                    let (x1, y1) = f(c1);
                    let (x2, y2) = f(c2);
                    let (x, y) = f(p);
                    pb.cubic_to(x1, y1, x2, y2, x, y);
                }
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }
}
