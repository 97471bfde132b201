//! Formatting of status messages written to stderr.
//!
//! Color is applied only when the caller says the destination supports it,
//! so piped output and test captures stay plain.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::ui::theme::{entry_color, ThemeEntry, ThemeMap};

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    theme: &ThemeMap,
    entry: ThemeEntry,
    supports_color: bool,
) -> io::Result<()> {
    let line = format!("{}{}", prefix, message);
    if supports_color {
        writeln!(writer, "{}", line.color(entry_color(theme, entry)))
    } else {
        writeln!(writer, "{}", line)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", message, theme, ThemeEntry::Info, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Warning: ", message, theme, ThemeEntry::Warn, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Error: ", message, theme, ThemeEntry::Error, supports_color)
}

/// Writes a section title.
pub fn print_header<W: Write>(writer: &mut W, title: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", title, theme, ThemeEntry::Header, supports_color)
}
