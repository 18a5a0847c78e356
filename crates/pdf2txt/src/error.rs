use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input PDF not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Renderer executable '{0}' was not found on PATH")]
    ToolUnavailable(String),

    #[error("Renderer failed:\n{0}")]
    ToolFailed(String),
}
