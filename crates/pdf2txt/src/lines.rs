use pdftext::{Extraction, RenderedLine};

use crate::prelude::{println, *};
use crate::renderer::RendererArgs;
use crate::source::{glyph_extraction, InputArgs, LayoutArgs};

#[derive(Debug, clap::Parser)]
#[command(name = "lines")]
#[command(about = "Show the lines rebuilt from glyph positions, for tuning the layout options")]
pub struct App {
    #[clap(flatten)]
    input: InputArgs,

    /// Print JSON instead of a table
    #[clap(long)]
    json: bool,

    #[clap(flatten)]
    renderer: RendererArgs,

    #[clap(flatten)]
    layout: LayoutArgs,
}

/// Module entry point
pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let pdf = app.input.resolve()?;

    let glyphs = match glyph_extraction(&pdf, &app.renderer)? {
        Extraction::Glyphs(glyphs) if !glyphs.is_empty() => glyphs,
        _ => return Err(pdftext::PdfError::NoGlyphs.into()),
    };

    let lines = pdftext::parser::layout::render_lines(glyphs, &app.layout.options());

    if app.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        lines_table(&lines).printstd();
    }

    Ok(())
}

fn lines_table(lines: &[RenderedLine]) -> prettytable::Table {
    let mut table = new_table();
    table.set_titles(prettytable::row!["PAGE", "Y", "TEXT"]);
    for line in lines {
        table.add_row(prettytable::row![line.page + 1, f!("{:.2}", line.y), line.text]);
    }
    table
}
