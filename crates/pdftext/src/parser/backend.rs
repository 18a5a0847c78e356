use std::path::Path;

use crate::PdfError;

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Abstraction over a library that can hand back already-assembled text for
/// each page (currently backed by `lopdf`).
///
/// This trait exists so that the direct extraction path can be tested
/// against mock implementations without a real PDF.
pub trait PdfBackend {
    /// 1-based page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Extracted text of a single page.
    fn page_text(&self, page: u32) -> Result<String, PdfError>;
}

/// Collect the text of every page, in order.
pub fn page_texts<B: PdfBackend + ?Sized>(backend: &B) -> Result<Vec<String>, PdfError> {
    backend
        .page_numbers()
        .into_iter()
        .map(|page| backend.page_text(page))
        .collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] implementation backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Load a PDF from disk.
    pub fn load(path: &Path) -> Result<Self, PdfError> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("cannot read {}: {}", path.display(), e)))?;
        Self::load_bytes(&data)
    }

    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    fn from_document(doc: lopdf::Document) -> Result<Self, PdfError> {
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        Ok(Self { doc })
    }
}

impl PdfBackend for LopdfBackend {
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String, PdfError> {
        self.doc
            .extract_text(&[page])
            .map_err(|e| PdfError::Parse(format!("cannot extract text of page {}: {}", page, e)))
    }
}
