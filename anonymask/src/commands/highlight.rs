//! The `highlight` command: shows what would be masked, then the masked text.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::io::{self, Write};

use anonymask_core::{Anonymizer, HighlightOutput, HighlightSegment};

use crate::cli::HighlightCommand;
use crate::commands::common::{build_config, load_taggers, read_input, warn_if_nothing_selected};
use crate::ui::highlight_view::render_ansi;
use crate::ui::output_format::print_header;
use crate::ui::theme::ThemeMap;

#[derive(Serialize)]
struct HighlightReport<'a> {
    segments: &'a [HighlightSegment],
    masked: &'a str,
}

/// How the highlighted original is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    Ansi,
    Markup,
    Plain,
}

impl HighlightStyle {
    /// `--markup` wins; otherwise colors only when writing to a terminal.
    pub fn choose(markup: bool, is_terminal: bool) -> Self {
        match (markup, is_terminal) {
            (true, _) => HighlightStyle::Markup,
            (false, true) => HighlightStyle::Ansi,
            (false, false) => HighlightStyle::Plain,
        }
    }
}

/// Renders the highlighted original in `style`.
pub fn render_highlighted(output: &HighlightOutput, style: HighlightStyle) -> String {
    match style {
        HighlightStyle::Ansi => render_ansi(output),
        HighlightStyle::Markup => output.render_markup(),
        HighlightStyle::Plain => output.original_text(),
    }
}

pub fn run_highlight(cmd: &HighlightCommand, theme: &ThemeMap, quiet: bool) -> Result<()> {
    info!("Starting highlight operation.");

    let config = build_config(&cmd.inputs)?;
    let taggers = load_taggers(&cmd.inputs.sources)?;
    warn_if_nothing_selected(&config, taggers.len(), theme, quiet)?;
    let anonymizer = Anonymizer::new(config)?;
    let input = read_input(cmd.inputs.input_file.as_deref())?;

    let output = anonymizer
        .highlight_with_taggers(&input, &taggers)
        .context("Highlighting failed")?;
    info!("{} region(s) highlighted.", output.marked_count());

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();

    if cmd.json {
        let report = HighlightReport {
            segments: &output.segments,
            masked: &output.masked,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize highlight output")?;
        writeln!(writer, "{}", json)?;
        return Ok(());
    }

    let style = HighlightStyle::choose(cmd.markup, supports_color);
    print_header(&mut writer, "Highlighted:", theme, supports_color)?;
    writeln!(writer, "{}", render_highlighted(&output, style).trim_end_matches('\n'))?;
    writeln!(writer)?;
    print_header(&mut writer, "Masked:", theme, supports_color)?;
    writeln!(writer, "{}", output.masked.trim_end_matches('\n'))?;

    info!("Highlight operation completed.");
    Ok(())
}
