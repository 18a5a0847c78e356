use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use crate::renderer::RendererArgs;
use crate::source::{resolve_extraction, InputArgs, LayoutArgs, Mode};

#[derive(Debug, clap::Parser)]
#[command(name = "extract")]
#[command(about = "Convert a PDF into a normalized plain-text file")]
pub struct App {
    #[clap(flatten)]
    input: InputArgs,

    /// Destination text file (defaults to the input path with a .txt extension)
    #[clap(short, long, env = "PDF2TXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Extraction path to use
    #[clap(long, env = "PDF2TXT_MODE", value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    #[clap(flatten)]
    renderer: RendererArgs,

    #[clap(flatten)]
    layout: LayoutArgs,
}

/// Module entry point
pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let pdf = app.input.resolve()?;
    let out = output_path(&pdf, app.output.as_deref())?;

    let extraction = resolve_extraction(&pdf, app.mode, &app.renderer)?;
    let text = extraction
        .render(&app.layout.options())
        .context("Failed to rebuild text")?;

    write_output(&out, &text)?;
    println!("Wrote {} ({} characters).", out.display(), text.chars().count());

    Ok(())
}

/// Absolute destination path; never the input itself.
fn output_path(pdf: &Path, requested: Option<&Path>) -> Result<PathBuf> {
    let out = match requested {
        Some(path) => std::path::absolute(path)
            .with_context(|| f!("Cannot resolve {}", path.display()))?,
        None => pdf.with_extension("txt"),
    };
    if out == pdf {
        return Err(eyre!(
            "Output path {} would overwrite the input",
            out.display()
        ));
    }
    Ok(out)
}

fn write_output(out: &Path, text: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| f!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| f!("Failed to write {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_replaces_extension() {
        let out = output_path(Path::new("/docs/resume.pdf"), None).unwrap();
        assert_eq!(out, PathBuf::from("/docs/resume.txt"));
    }

    #[test]
    fn test_explicit_output_is_absolute() {
        let out = output_path(Path::new("/docs/resume.pdf"), Some(Path::new("out/parsed.txt")))
            .unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("out/parsed.txt"));
    }

    #[test]
    fn test_output_never_overwrites_input() {
        assert!(output_path(Path::new("/docs/notes.txt"), None).is_err());
        assert!(output_path(
            Path::new("/docs/resume.pdf"),
            Some(Path::new("/docs/resume.pdf"))
        )
        .is_err());
    }

    #[test]
    fn test_write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/parsed.txt");
        write_output(&out, "Hi You\n").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "Hi You\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_fake_renderer() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-gs");
        std::fs::write(
            &script,
            r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in -sOutputFile=*) out="${arg#-sOutputFile=}" ;; esac
done
cat > "$out" <<'XML'
<page>
<span>
<char bbox="0 100 5 110" c="H"/>
<char bbox="5 100 10 110" c="i"/>
<char bbox="30 100 35 110" c="Y"/>
<char bbox="35 100 40 110" c="o"/>
<char bbox="40 100 45 110" c="u"/>
</span>
</page>
XML
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let out = dir.path().join("doc.txt");

        let app = App {
            input: InputArgs { input: pdf },
            output: None,
            mode: Mode::Glyphs,
            renderer: RendererArgs {
                program: script.to_string_lossy().into_owned(),
            },
            layout: LayoutArgs {
                line_tol: 2.0,
                space_factor: 0.2,
            },
        };
        run(app, crate::Global { verbose: false }).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "Hi You\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_without_glyphs_writes_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("empty-gs");
        std::fs::write(
            &script,
            r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in -sOutputFile=*) out="${arg#-sOutputFile=}" ;; esac
done
printf '<page></page>\n' > "$out"
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let out = dir.path().join("doc.txt");

        let app = App {
            input: InputArgs { input: pdf },
            output: None,
            mode: Mode::Glyphs,
            renderer: RendererArgs {
                program: script.to_string_lossy().into_owned(),
            },
            layout: LayoutArgs {
                line_tol: 2.0,
                space_factor: 0.2,
            },
        };
        let err = run(app, crate::Global { verbose: false }).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<pdftext::PdfError>(),
            Some(pdftext::PdfError::NoGlyphs)
        ));
        assert!(!out.exists());
    }
}
