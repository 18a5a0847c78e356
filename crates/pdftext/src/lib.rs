use std::path::Path;

use thiserror::Error;

use parser::backend::{LopdfBackend, PdfBackend};

pub mod parser;
pub mod render;
pub mod types;

pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Glyph document is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("No text was extracted from the PDF")]
    NoGlyphs,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Raw material for the normalizer, from one of the two extraction paths.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Already-assembled text, one entry per page.
    Direct(Vec<String>),
    /// Positioned glyphs that still need line reconstruction.
    Glyphs(Vec<Glyph>),
}

impl Extraction {
    /// True when there is nothing to render: no glyphs, or only whitespace
    /// on every page.
    pub fn is_blank(&self) -> bool {
        match self {
            Extraction::Direct(pages) => pages.iter().all(|p| p.trim().is_empty()),
            Extraction::Glyphs(glyphs) => glyphs.is_empty(),
        }
    }

    /// Turn the extraction into normalized text.
    ///
    /// An empty glyph set is an error: it usually means the renderer could
    /// not map the document's fonts to characters.
    pub fn render(self, options: &LayoutOptions) -> Result<String, PdfError> {
        match self {
            Extraction::Direct(pages) => Ok(render::cleanup::normalize_lines(
                render::cleanup::page_lines(&pages),
            )),
            Extraction::Glyphs(glyphs) if glyphs.is_empty() => Err(PdfError::NoGlyphs),
            Extraction::Glyphs(glyphs) => Ok(reconstruct_text(glyphs, options)),
        }
    }
}

/// Rebuild line-structured text from positioned glyphs.
///
/// Returns an empty string for an empty glyph set.
pub fn reconstruct_text(glyphs: Vec<Glyph>, options: &LayoutOptions) -> String {
    let lines = parser::layout::group_lines(glyphs, options.line_tol);
    render::cleanup::normalize_lines(
        lines
            .iter()
            .map(|line| parser::layout::collapse_line(&line.glyphs, options.space_factor)),
    )
}

/// Parse the renderer's structured output into an [`Extraction::Glyphs`].
pub fn glyph_extraction(raw: &str) -> Result<Extraction, PdfError> {
    Ok(Extraction::Glyphs(parser::glyphs::load_glyphs(raw)?))
}

/// Read per-page text straight from the PDF into an [`Extraction::Direct`].
pub fn direct_extraction(path: &Path) -> Result<Extraction, PdfError> {
    let backend = LopdfBackend::load(path)?;
    direct_extraction_from(&backend)
}

/// Same as [`direct_extraction`] for any [`PdfBackend`].
pub fn direct_extraction_from<B: PdfBackend + ?Sized>(backend: &B) -> Result<Extraction, PdfError> {
    let pages = parser::backend::page_texts(backend)?;
    log::debug!("direct extraction read {} pages", pages.len());
    Ok(Extraction::Direct(pages))
}
