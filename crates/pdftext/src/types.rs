use serde::{Deserialize, Serialize};

/// Default vertical tolerance (layout units) for grouping glyphs into lines.
pub const DEFAULT_LINE_TOL: f64 = 2.0;

/// Default multiplier on the mean glyph width used to detect word gaps.
pub const DEFAULT_SPACE_FACTOR: f64 = 0.2;

/// One rendered character and the horizontal extent of its bounding box.
///
/// The bottom edge (`y1`) of the source box is not kept: only the top edge is
/// needed to decide which line a glyph belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Glyph {
    /// 0-based index of the page in document order.
    pub page: usize,
    pub y0: f64,
    pub x0: f64,
    pub x1: f64,
    pub text: String,
}

impl Glyph {
    pub fn new(page: usize, y0: f64, x0: f64, x1: f64, text: impl Into<String>) -> Self {
        Glyph {
            page,
            y0,
            x0,
            x1,
            text: text.into(),
        }
    }

    /// Horizontal extent, or `None` for zero-width and inverted boxes.
    pub fn width(&self) -> Option<f64> {
        (self.x1 > self.x0).then(|| self.x1 - self.x0)
    }
}

/// Glyphs judged to share a text line.
///
/// `y` is the `y0` of the first glyph assigned to the line and never moves
/// as more glyphs join. Glyphs are kept in arrival order; the collapser sorts
/// them by `x0`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Line {
    pub page: usize,
    pub y: f64,
    pub glyphs: Vec<Glyph>,
}

impl Line {
    pub fn new(first: Glyph) -> Self {
        Line {
            page: first.page,
            y: first.y0,
            glyphs: vec![first],
        }
    }
}

/// Geometric tuning knobs threaded through the grouper and the collapser.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub line_tol: f64,
    pub space_factor: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tol: DEFAULT_LINE_TOL,
            space_factor: DEFAULT_SPACE_FACTOR,
        }
    }
}

/// A reconstructed line as reported to callers that want more than the
/// final text (see the `lines` command of `pdf2txt`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub page: usize,
    pub y: f64,
    pub text: String,
}
