//! Maps combined name ranges back to literal substrings of the input.
//!
//! Names are replaced with find-and-replace-all rather than by splicing
//! offsets, which masks every repeat of a name in one pass. The catch is
//! ordering: "Mary" must never be replaced before "Mary Lee", so literals are
//! sorted longest first.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::mask_match::get_loggable_content;
use crate::span::{char_byte_offsets, Range};

/// Literal name strings for `ranges`, distinct, non-empty and longest first.
///
/// Length is measured in chars. Equal-length literals keep the order of
/// their first range. Ranges are expected to fit `text`; `Anonymizer` rejects
/// any that do not before resolving, and anything past the end is clamped here.
pub fn resolve_names(text: &str, ranges: &[Range]) -> Vec<String> {
    let offsets = char_byte_offsets(text);
    let char_len = offsets.len() - 1;
    let mut names: Vec<String> = Vec::with_capacity(ranges.len());

    for range in ranges {
        let start = range.start.min(char_len);
        let end = range.end.min(char_len);
        if start >= end {
            continue;
        }
        let literal = &text[offsets[start]..offsets[end]];
        if !names.iter().any(|n| n == literal) {
            names.push(literal.to_string());
        }
    }

    names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    for name in &names {
        debug!("Resolved name literal: '{}'", get_loggable_content(name));
    }
    names
}
