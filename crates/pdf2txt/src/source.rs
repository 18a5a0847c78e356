use std::path::{Path, PathBuf};

use pdftext::{Extraction, LayoutOptions, DEFAULT_LINE_TOL, DEFAULT_SPACE_FACTOR};

use crate::prelude::*;
use crate::renderer::{Renderer, RendererArgs};

#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Path to the PDF file
    #[clap(env = "PDF2TXT_INPUT")]
    pub input: PathBuf,
}

impl InputArgs {
    /// Absolute path of an existing input file.
    pub fn resolve(&self) -> Result<PathBuf> {
        let path = std::path::absolute(&self.input)
            .with_context(|| f!("Cannot resolve {}", self.input.display()))?;
        if !path.is_file() {
            return Err(Error::MissingInput(path).into());
        }
        Ok(path)
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct LayoutArgs {
    /// Y-axis tolerance (PDF units) when grouping characters into lines
    #[clap(long, env = "PDF2TXT_LINE_TOL", default_value_t = DEFAULT_LINE_TOL, value_parser = non_negative)]
    pub line_tol: f64,

    /// Multiplier on the mean glyph width that decides when to insert a space
    #[clap(long, env = "PDF2TXT_SPACE_FACTOR", default_value_t = DEFAULT_SPACE_FACTOR, value_parser = non_negative)]
    pub space_factor: f64,
}

impl LayoutArgs {
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            line_tol: self.line_tol,
            space_factor: self.space_factor,
        }
    }
}

fn non_negative(value: &str) -> std::result::Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|_| f!("'{}' is not a number", value))?;
    if parsed.is_finite() && parsed >= 0.0 {
        Ok(parsed)
    } else {
        Err(f!("'{}' must be a finite, non-negative number", value))
    }
}

/// Which extraction path to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Use the PDF's own text, falling back to glyph reconstruction when it
    /// has none
    #[default]
    Auto,
    /// Only use the text stored in the PDF
    Direct,
    /// Only rebuild text from Ghostscript glyph positions
    Glyphs,
}

/// Run the Ghostscript glyph dump and load its glyphs.
pub fn glyph_extraction(pdf: &Path, renderer: &RendererArgs) -> Result<Extraction> {
    let renderer = Renderer::locate(&renderer.program)?;
    let raw = renderer.render_glyphs(pdf)?;
    pdftext::glyph_extraction(&raw).context("Failed to parse the glyph document")
}

/// Settle on one extraction path for `pdf`.
pub fn resolve_extraction(pdf: &Path, mode: Mode, renderer: &RendererArgs) -> Result<Extraction> {
    match mode {
        Mode::Direct => pdftext::direct_extraction(pdf).context("Direct extraction failed"),
        Mode::Glyphs => glyph_extraction(pdf, renderer),
        Mode::Auto => match pdftext::direct_extraction(pdf) {
            Ok(extraction) if !extraction.is_blank() => Ok(extraction),
            Ok(_) => {
                log::warn!("PDF has no extractable text, rebuilding it from glyph positions");
                glyph_extraction(pdf, renderer)
            }
            Err(err) => {
                log::warn!("direct extraction failed ({}), rebuilding text from glyph positions", err);
                glyph_extraction(pdf, renderer)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = InputArgs {
            input: dir.path().join("missing.pdf"),
        };
        let err = args.resolve().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingInput(_))));
    }

    #[test]
    fn test_resolve_directory_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = InputArgs {
            input: dir.path().to_path_buf(),
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_resolve_existing_input_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let args = InputArgs { input: pdf };
        let resolved = args.resolve().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("doc.pdf"));
    }

    #[test]
    fn test_non_negative_parser() {
        assert_eq!(non_negative("2.5"), Ok(2.5));
        assert_eq!(non_negative("0"), Ok(0.0));
        assert!(non_negative("-1").is_err());
        assert!(non_negative("inf").is_err());
        assert!(non_negative("abc").is_err());
    }

    #[test]
    fn test_layout_args_options() {
        let args = LayoutArgs {
            line_tol: 5.0,
            space_factor: 0.3,
        };
        let opts = args.options();
        assert_eq!(opts.line_tol, 5.0);
        assert_eq!(opts.space_factor, 0.3);
    }

    #[test]
    fn test_glyph_mode_without_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let renderer = RendererArgs {
            program: "pdf2txt-no-such-renderer-3f9c".to_string(),
        };
        let err = resolve_extraction(&pdf, Mode::Glyphs, &renderer).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ToolUnavailable(_))));
    }

    #[test]
    fn test_auto_mode_falls_back_for_unreadable_pdf() {
        // lopdf cannot read this, so auto mode must try the renderer next.
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"not really a pdf").unwrap();
        let renderer = RendererArgs {
            program: "pdf2txt-no-such-renderer-3f9c".to_string(),
        };
        let err = resolve_extraction(&pdf, Mode::Auto, &renderer).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ToolUnavailable(_))));
    }

    #[test]
    fn test_direct_mode_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"not really a pdf").unwrap();
        let renderer = RendererArgs {
            program: "gs".to_string(),
        };
        let err = resolve_extraction(&pdf, Mode::Direct, &renderer).unwrap_err();
        assert!(err.downcast_ref::<pdftext::PdfError>().is_some());
    }
}
