//! Rendering of the per-stage replacement summary.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use anonymask_core::{redact_sensitive, MaskSummaryItem};

use crate::ui::output_format::print_header;
use crate::ui::theme::{entry_color, ThemeEntry, ThemeMap};

/// Prints one line per stage, in pipeline order. Replaced texts are never
/// shown verbatim.
pub fn print_summary<W: Write>(
    summary: &[MaskSummaryItem],
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    if summary.is_empty() {
        return print_header(writer, "No replacements were made.", theme, supports_color);
    }

    print_header(writer, "Replacement Summary:", theme, supports_color)?;
    for item in summary {
        let stage = item.stage.label();
        let count = format!("{} occurrence(s)", item.occurrences);
        let samples: Vec<String> = item.original_texts.iter().map(|t| redact_sensitive(t)).collect();
        if supports_color {
            writeln!(
                writer,
                "  {}: {} {}",
                stage.color(entry_color(theme, ThemeEntry::SummaryStageName)),
                count.color(entry_color(theme, ThemeEntry::SummaryOccurrences)),
                samples.join(", ")
            )?;
        } else {
            writeln!(writer, "  {}: {} {}", stage, count, samples.join(", "))?;
        }
    }
    Ok(())
}
