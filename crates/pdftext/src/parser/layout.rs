//! Line grouping and line collapsing.
//!
//! Both stages are pure transformations over [`Glyph`]s:
//!
//! ```text
//! Glyph[]  ->  Line[]  ->  String[]
//!        group_lines    collapse_line
//! ```


use crate::{Glyph, LayoutOptions, Line, RenderedLine};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Mean glyph width assumed when a line has no glyph with positive width.
const FALLBACK_GLYPH_WIDTH: f64 = 4.0;

/// Smallest horizontal gap (layout units) that can ever count as a space.
/// Keeps tightly kerned pairs together when glyphs are narrow.
const MIN_WORD_GAP: f64 = 1.5;

/// Fraction of the previous glyph's width that a gap must also exceed.
const WIDTH_GUARD_RATIO: f64 = 0.45;

// ---------------------------------------------------------------------------
// Public API: line grouping
// ---------------------------------------------------------------------------

/// Partition glyphs into lines.
///
/// Glyphs are visited in `(page, y0, x0)` order. A glyph opens a new line
/// when it is on another page or when its `y0` is more than `line_tol` away
/// from the `y0` of the line's first glyph. The reference never follows later
/// glyphs, so a slightly sloped baseline may split into several lines.
///
/// Lines come back ordered by page, then top to bottom.
pub fn group_lines(mut glyphs: Vec<Glyph>, line_tol: f64) -> Vec<Line> {
    if glyphs.is_empty() {
        return Vec::new();
    }

    glyphs.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.y0.total_cmp(&b.y0))
            .then(a.x0.total_cmp(&b.x0))
    });

    let mut lines: Vec<Line> = Vec::new();
    for glyph in glyphs {
        match lines.last_mut() {
            Some(line) if line.page == glyph.page && (glyph.y0 - line.y).abs() <= line_tol => {
                line.glyphs.push(glyph);
            }
            _ => lines.push(Line::new(glyph)),
        }
    }

    lines.sort_by(|a, b| a.page.cmp(&b.page).then(a.y.total_cmp(&b.y)));

    log::debug!("grouped glyphs into {} lines", lines.len());

    lines
}

// ---------------------------------------------------------------------------
// Public API: line collapsing
// ---------------------------------------------------------------------------

/// Render a line's glyphs left to right, inserting a single space wherever
/// the horizontal gap looks like a word boundary.
///
/// A gap counts as a space when it exceeds both
/// `max(1.5, mean_width * space_factor)` and 45% of the width of the last
/// glyph that had a positive width. Zero-width marks do not reset that
/// width. Trailing whitespace is removed.
pub fn collapse_line(glyphs: &[Glyph], space_factor: f64) -> String {
    if glyphs.is_empty() {
        return String::new();
    }

    let mut ordered: Vec<&Glyph> = glyphs.iter().collect();
    ordered.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let widths: Vec<f64> = ordered.iter().filter_map(|g| g.width()).collect();
    let avg_width = if widths.is_empty() {
        FALLBACK_GLYPH_WIDTH
    } else {
        widths.iter().sum::<f64>() / widths.len() as f64
    };
    let min_gap = MIN_WORD_GAP.max(avg_width * space_factor);

    let mut out = String::new();
    let mut prev_x1: Option<f64> = None;
    let mut prev_width: Option<f64> = None;

    for glyph in ordered {
        if let Some(x1) = prev_x1 {
            let gap = glyph.x0 - x1;
            let width_guard = prev_width.map_or(0.0, |w| w * WIDTH_GUARD_RATIO);
            if gap > min_gap.max(width_guard) {
                out.push(' ');
            }
        }
        out.push_str(&glyph.text);
        prev_x1 = Some(glyph.x1);
        prev_width = glyph.width().or(prev_width);
    }

    out.truncate(out.trim_end().len());
    out
}

/// Group and collapse in one go, keeping each line's page and reference y.
pub fn render_lines(glyphs: Vec<Glyph>, options: &LayoutOptions) -> Vec<RenderedLine> {
    group_lines(glyphs, options.line_tol)
        .into_iter()
        .map(|line| RenderedLine {
            page: line.page,
            y: line.y,
            text: collapse_line(&line.glyphs, options.space_factor),
        })
        .collect()
}
