use crate::prelude::*;
use clap::Parser;

mod error;
mod extract;
mod lines;
mod prelude;
mod renderer;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert PDF documents into normalized, line-structured plain text"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Log pipeline details to stderr (RUST_LOG takes precedence)
    #[clap(short, long, env = "PDF2TXT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert a PDF into a normalized plain-text file
    Extract(crate::extract::App),

    /// Show the lines rebuilt from glyph positions
    Lines(crate::lines::App),
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    init_logger(app.global.verbose);

    match app.command {
        SubCommands::Extract(sub_app) => crate::extract::run(sub_app, app.global),
        SubCommands::Lines(sub_app) => crate::lines::run(sub_app, app.global),
    }
}
