//! Highlight variant: marks what the pipeline masked on a copy of the original.
//!
//! The masked text comes from the ordinary pipeline run. Each recorded
//! substitution is then looked up in the *original* text and every literal
//! occurrence is marked with the color identity of its stage. Marks never
//! nest: an occurrence that overlaps an earlier mark is left alone, so a
//! first name found inside an already marked full name is not wrapped again.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::mask_match::{MaskMatch, MaskStage};
use crate::masking::MaskOutput;
use crate::patterns::compiler::CompiledCatalogue;

pub const NAME_COLOR: &str = "red";
pub const CUSTOM_COLOR: &str = "navy";

/// A marker wrapped around one highlighted region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub stage: MaskStage,
    pub color: String,
}

/// A run of original text, marked or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    pub text: String,
    pub marker: Option<Marker>,
}

/// Output of the highlight variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOutput {
    /// Concatenating the segment texts gives back the original exactly.
    pub segments: Vec<HighlightSegment>,
    pub masked: String,
    pub matches: Vec<MaskMatch>,
}

impl HighlightOutput {
    /// The original text, without markers.
    pub fn original_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Renders the highlighted original as HTML-style markup.
    pub fn render_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match &segment.marker {
                Some(marker) => {
                    out.push_str(&format!(
                        "<mark data-kind=\"{}\" style=\"color:{}\">{}</mark>",
                        marker.stage.label(),
                        marker.color,
                        escape_markup(&segment.text)
                    ));
                }
                None => out.push_str(&escape_markup(&segment.text)),
            }
        }
        out
    }

    pub fn marked_count(&self) -> usize {
        self.segments.iter().filter(|s| s.marker.is_some()).count()
    }
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Color identity of a stage.
pub fn stage_color(stage: MaskStage, catalogue: &CompiledCatalogue) -> String {
    match stage {
        MaskStage::Name => NAME_COLOR.to_string(),
        MaskStage::Category(category) => catalogue
            .get(category)
            .map(|c| c.color.clone())
            .unwrap_or_else(|| CUSTOM_COLOR.to_string()),
        MaskStage::Custom(_) => CUSTOM_COLOR.to_string(),
    }
}

/// Byte regions of the original already wrapped in a marker.
#[derive(Debug, Default)]
struct MarkTracker {
    marks: Vec<(usize, usize, MaskStage)>,
}

impl MarkTracker {
    /// Records `[start, end)` unless it overlaps an existing mark.
    fn try_mark(&mut self, start: usize, end: usize, stage: MaskStage) -> bool {
        if self.marks.iter().any(|&(s, e, _)| start < e && s < end) {
            return false;
        }
        let pos = self.marks.partition_point(|&(s, _, _)| s < start);
        self.marks.insert(pos, (start, end, stage));
        true
    }
}

/// Builds the highlighted copy of `original` from a finished pipeline run.
///
/// Marks follow the matched text, not the match position: every occurrence
/// of a replaced literal is marked, including occurrences the pipeline left
/// alone. An anchored pattern such as `^foo` masks only the first "foo" in
/// "foo foo" but both are marked.
pub fn highlight(original: &str, output: MaskOutput, catalogue: &CompiledCatalogue) -> HighlightOutput {
    let mut tracker = MarkTracker::default();
    let mut seen: HashSet<(MaskStage, &str)> = HashSet::new();
    let mut skipped = 0usize;

    for m in &output.matches {
        if m.original.is_empty() || !seen.insert((m.stage, m.original.as_str())) {
            continue;
        }
        for (start, literal) in original.match_indices(m.original.as_str()) {
            if !tracker.try_mark(start, start + literal.len(), m.stage) {
                skipped += 1;
            }
        }
    }

    debug!(
        "Highlight: {} region(s) marked, {} nested occurrence(s) skipped.",
        tracker.marks.len(),
        skipped
    );

    let mut segments = Vec::with_capacity(tracker.marks.len() * 2 + 1);
    let mut last_end = 0usize;
    for &(start, end, stage) in &tracker.marks {
        if start > last_end {
            segments.push(HighlightSegment {
                text: original[last_end..start].to_string(),
                marker: None,
            });
        }
        segments.push(HighlightSegment {
            text: original[start..end].to_string(),
            marker: Some(Marker {
                stage,
                color: stage_color(stage, catalogue),
            }),
        });
        last_end = end;
    }
    if last_end < original.len() {
        segments.push(HighlightSegment {
            text: original[last_end..].to_string(),
            marker: None,
        });
    }

    HighlightOutput {
        segments,
        masked: output.masked,
        matches: output.matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Category, CustomPattern};
    use crate::masking::MaskingPipeline;
    use crate::patterns::compiler::{compile_custom_patterns, get_or_compile_default_catalogue};

    fn run(text: &str, names: &[&str], categories: &[Category], custom: &[CustomPattern]) -> HighlightOutput {
        let catalogue = get_or_compile_default_catalogue().unwrap();
        let custom = compile_custom_patterns(custom).unwrap();
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let output = MaskingPipeline {
            catalogue: &catalogue,
            categories,
            custom_patterns: &custom,
        }
        .run(text, &names)
        .unwrap();
        highlight(text, output, &catalogue)
    }

    fn marked(out: &HighlightOutput) -> Vec<(&str, MaskStage)> {
        out.segments
            .iter()
            .filter_map(|s| s.marker.as_ref().map(|m| (s.text.as_str(), m.stage)))
            .collect()
    }

    #[test]
    fn segments_rebuild_the_original() {
        let text = "Mary Lee met Anna, phone 91008100.";
        let out = run(text, &["Mary Lee", "Anna"], &[Category::Phone], &[]);
        assert_eq!(out.original_text(), text);
        assert_eq!(out.masked, "[Name] met [Name], phone [PHONE].");
    }

    #[test]
    fn first_name_inside_full_name_is_not_marked_twice() {
        let text = "Mary Lee called. Mary left.";
        let out = run(text, &["Mary Lee", "Mary"], &[], &[]);
        assert_eq!(
            marked(&out),
            vec![("Mary Lee", MaskStage::Name), ("Mary", MaskStage::Name)]
        );
    }

    #[test]
    fn each_stage_gets_its_own_color() {
        let text = "Anna S1234567A 91008100";
        let out = run(text, &["Anna"], &[Category::Nric, Category::Phone], &[]);
        let colors: Vec<&str> = out
            .segments
            .iter()
            .filter_map(|s| s.marker.as_ref().map(|m| m.color.as_str()))
            .collect();
        assert_eq!(colors, vec!["red", "green", "deepskyblue"]);
    }

    #[test]
    fn later_match_inside_earlier_mark_is_skipped() {
        // "9100" also occurs at the start of the phone number, already marked.
        let text = "91008100 then 9100";
        let custom = vec![CustomPattern::new(r"\b\d{4}\b", "[PIN]")];
        let out = run(text, &[], &[Category::Phone], &custom);
        assert_eq!(
            marked(&out),
            vec![
                ("91008100", MaskStage::Category(Category::Phone)),
                ("9100", MaskStage::Custom(0)),
            ]
        );
        assert_eq!(out.masked, "[PHONE] then [PIN]");
    }

    #[test]
    fn every_occurrence_of_a_replaced_literal_is_marked() {
        let text = "foo foo";
        let out = run(text, &[], &[], &[CustomPattern::new("^foo", "[F]")]);
        assert_eq!(out.masked, "[F] foo");
        assert_eq!(
            marked(&out),
            vec![("foo", MaskStage::Custom(0)), ("foo", MaskStage::Custom(0))]
        );
    }

    #[test]
    fn custom_pattern_marks_use_custom_color() {
        let text = "code red-7 ready";
        let out = run(text, &[], &[], &[CustomPattern::new(r"red-\d", "[CODE]")]);
        assert_eq!(out.segments[1].marker.as_ref().unwrap().color, CUSTOM_COLOR);
        assert_eq!(out.masked, "code [CODE] ready");
    }

    #[test]
    fn markup_escapes_text_and_wraps_marks() {
        let text = "<b>Anna</b>";
        let out = run(text, &["Anna"], &[], &[]);
        assert_eq!(
            out.render_markup(),
            "&lt;b&gt;<mark data-kind=\"name\" style=\"color:red\">Anna</mark>&lt;/b&gt;"
        );
    }

    #[test]
    fn nothing_to_mark_yields_one_plain_segment() {
        let out = run("plain text", &[], &[], &[]);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.marked_count(), 0);
    }
}
