use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::prelude::*;

/// File name of the structured glyph dump inside the scratch directory.
const GLYPH_DUMP: &str = "glyphs.xml";

#[derive(Debug, Clone, clap::Args)]
pub struct RendererArgs {
    /// Ghostscript executable used to dump glyph positions
    #[clap(long = "gs", env = "PDF2TXT_GS", default_value = "gs")]
    pub program: String,
}

/// A located Ghostscript executable.
#[derive(Debug, Clone)]
pub struct Renderer {
    name: String,
    program: PathBuf,
}

impl Renderer {
    /// Resolve `name` on `PATH` (or as a path, if it contains a separator).
    pub fn locate(name: &str) -> Result<Self, Error> {
        let program = which::which(name).map_err(|_| Error::ToolUnavailable(name.to_string()))?;
        log::debug!("using renderer {}", program.display());
        Ok(Self {
            name: name.to_string(),
            program,
        })
    }

    /// The `txtwrite` invocation that writes per-glyph boxes to `out`.
    pub fn command(&self, pdf: &Path, out: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-dBATCH", "-dNOPAUSE", "-sDEVICE=txtwrite", "-dTextFormat=0"])
            .arg(f!("-sOutputFile={}", out.display()))
            .arg(pdf);
        cmd
    }

    /// Run the renderer on `pdf` and return its structured glyph output.
    ///
    /// The dump lives in a scratch directory that is removed when this
    /// returns, whether or not the renderer succeeded.
    pub fn render_glyphs(&self, pdf: &Path) -> Result<String> {
        let scratch = tempfile::tempdir().context("Failed to create a scratch directory")?;
        let dump = scratch.path().join(GLYPH_DUMP);

        let mut cmd = self.command(pdf, &dump);
        log::debug!("running {:?}", cmd);

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ToolUnavailable(self.name.clone()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| f!("Failed to run renderer '{}'", self.name));
            }
        };

        if !output.status.success() {
            return Err(Error::ToolFailed(failure_message(&output)).into());
        }

        let bytes = std::fs::read(&dump)
            .with_context(|| f!("Renderer did not produce {}", dump.display()))?;

        Ok(pdftext::parser::glyphs::decode_lossy(&bytes))
    }
}

/// Pick the most useful diagnostic from a failed run: stderr, then stdout,
/// then the exit status itself.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return stderr.into_owned();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return stdout.into_owned();
    }
    output.status.to_string()
}
