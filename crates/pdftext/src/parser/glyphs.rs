//! Glyph loading from the renderer's structured text output.
//!
//! Ghostscript's `txtwrite` device (with `-dTextFormat=0`) emits a bare
//! sequence of `<page>` elements, each holding `<span>`s of `<char>`s:
//!
//! ```text
//! <page>
//! <span bbox="72 86 146 97" font="Helvetica" size="11.0000">
//! <char bbox="72 86 78 97" c="H"/>
//! ...
//! ```
//!
//! The fragment has no single root, so it is wrapped in a `<document>`
//! element before parsing.

use crate::{Glyph, PdfError};

const ROOT_OPEN: &str = "<document>\n";
const ROOT_CLOSE: &str = "\n</document>";

/// Parse a structured glyph document into a flat list of [`Glyph`]s.
///
/// Pages are numbered by their position among the root's `<page>` children,
/// starting at 0. A `<char>` without a `c` value, or whose `bbox` is missing
/// or is not exactly four finite numbers, is skipped. Markup that is not
/// well-formed even after wrapping fails with [`PdfError::Xml`].
pub fn load_glyphs(raw: &str) -> Result<Vec<Glyph>, PdfError> {
    let wrapped = wrap_fragment(raw);
    let doc = roxmltree::Document::parse(&wrapped)?;

    let mut glyphs = Vec::new();
    let mut skipped = 0usize;

    for (page_idx, page) in child_elements(doc.root_element(), "page").enumerate() {
        for span in child_elements(page, "span") {
            for ch in child_elements(span, "char") {
                match glyph_from_char(page_idx, &ch) {
                    Some(glyph) => glyphs.push(glyph),
                    None => {
                        log::trace!(
                            "skipping char record on page {} (c={:?}, bbox={:?})",
                            page_idx,
                            ch.attribute("c"),
                            ch.attribute("bbox")
                        );
                        skipped += 1;
                    }
                }
            }
        }
    }

    log::debug!(
        "loaded {} glyphs ({} malformed records skipped)",
        glyphs.len(),
        skipped
    );

    Ok(glyphs)
}

/// Decode renderer output bytes, dropping anything that is not valid UTF-8.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Parse a `bbox` attribute into `(x0, y0, x1, y1)`.
pub fn parse_bbox(value: &str) -> Option<(f64, f64, f64, f64)> {
    let mut nums = value.split_whitespace().map(|v| v.parse::<f64>());
    let bbox = match (nums.next(), nums.next(), nums.next(), nums.next()) {
        (Some(Ok(x0)), Some(Ok(y0)), Some(Ok(x1)), Some(Ok(y1))) => (x0, y0, x1, y1),
        _ => return None,
    };
    if nums.next().is_some() {
        return None;
    }
    let (x0, y0, x1, y1) = bbox;
    if [x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        Some(bbox)
    } else {
        None
    }
}

fn glyph_from_char(page: usize, node: &roxmltree::Node) -> Option<Glyph> {
    let text = node.attribute("c").filter(|c| !c.is_empty())?;
    let (x0, y0, x1, _y1) = parse_bbox(node.attribute("bbox")?)?;
    Some(Glyph::new(page, y0, x0, x1, text))
}

fn child_elements<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Wrap a root-less fragment, moving any leading XML declaration out of the
/// way so the wrapper stays the first element.
fn wrap_fragment(raw: &str) -> String {
    let body = raw.trim_start();
    let body = match body.strip_prefix("<?xml") {
        Some(rest) => rest.find("?>").map_or(body, |end| &rest[end + 2..]),
        None => body,
    };
    let mut wrapped = String::with_capacity(body.len() + ROOT_OPEN.len() + ROOT_CLOSE.len());
    wrapped.push_str(ROOT_OPEN);
    wrapped.push_str(body);
    wrapped.push_str(ROOT_CLOSE);
    wrapped
}
