//! The `mask` command: writes the masked text.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io;

use anonymask_core::Anonymizer;

use crate::cli::MaskCommand;
use crate::commands::common::{build_config, load_taggers, read_input, warn_if_nothing_selected, write_text};
use crate::ui::output_format::print_info_message;
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Runs taggers, masks the input, and writes the result.
///
/// The summary goes to stderr so stdout carries only masked text.
pub fn run_mask(cmd: &MaskCommand, theme: &ThemeMap, quiet: bool) -> Result<()> {
    info!("Starting mask operation.");

    let config = build_config(&cmd.inputs)?;
    let taggers = load_taggers(&cmd.inputs.sources)?;
    warn_if_nothing_selected(&config, taggers.len(), theme, quiet)?;
    let anonymizer = Anonymizer::new(config)?;
    let input = read_input(cmd.inputs.input_file.as_deref())?;

    let sources = anonymizer
        .source_results(&input, &taggers)
        .context("Tagging failed")?;
    let (masked, replacements) = anonymizer
        .anonymize_detailed(&input, &sources)
        .context("Masking failed")?;
    debug!(
        "Content masked. Original length: {}, masked length: {}",
        input.len(),
        masked.len()
    );

    write_text(cmd.output.as_deref(), &masked)?;

    let stderr_supports_color = io::stderr().is_terminal();
    if let Some(path) = cmd.output.as_deref() {
        if !quiet {
            let message = format!("Masked output written to {}", path.display());
            print_info_message(&mut io::stderr(), &message, theme, stderr_supports_color)?;
        }
    }

    if cmd.summary && !quiet {
        info!("Displaying replacement summary.");
        summary::print_summary(&replacements, &mut io::stderr(), theme, stderr_supports_color)?;
    }

    info!("Mask operation completed.");
    Ok(())
}
