//! Tagger spans and their normalization into per-source name ranges.
//!
//! Every tagger reports `(start, end, label)` triples in half-open character
//! offsets. Taggers split multi-token names differently, so a full name such
//! as "Mary Lee" often arrives as two spans separated by one space. The
//! normalizer folds those back into a single range per name and drops every
//! label that is not a person name.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{SpanError, SpanErrorKind};

/// Labels treated as person names when no explicit list is configured.
pub const DEFAULT_NAME_LABELS: &[&str] = &["PERSON", "PER"];

/// A labelled character interval produced by one tagger.
///
/// Offsets are half-open and counted in `char`s, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Checks the tagger contract for this span against a text of `text_len` chars.
    pub fn validate(&self, text_len: usize) -> Result<(), SpanError> {
        if self.end <= self.start {
            return Err(SpanError::new(self.start, self.end, &self.label, SpanErrorKind::Inverted));
        }
        if self.end > text_len {
            return Err(SpanError::new(
                self.start,
                self.end,
                &self.label,
                SpanErrorKind::OutOfBounds { text_len },
            ));
        }
        Ok(())
    }
}

/// A word emitted by a tagger that does not report offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub label: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            label: label.into(),
        }
    }
}

/// Label reported in errors about a name range rather than a tagger span.
const RANGE_LABEL: &str = "name range";

/// A contiguous block of character positions.
///
/// The block covers every position in `start..=end` for the purposes of set
/// algebra, and resolves to the substring of chars `start..end`. Ranges coming
/// straight out of the normalizer and ranges rebuilt by the algebra therefore
/// share one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Checks `start <= end <= text_len`, the bounds every caller-supplied
    /// range must respect for a text of `text_len` chars.
    pub fn validate(&self, text_len: usize) -> Result<(), SpanError> {
        let kind = if self.start > self.end {
            SpanErrorKind::Inverted
        } else if self.end > text_len {
            SpanErrorKind::OutOfBounds { text_len }
        } else {
            return Ok(());
        };
        Err(SpanError::new(self.start, self.end, RANGE_LABEL, kind))
    }

    /// Every position the range covers, `end` included.
    pub fn positions(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// The merged name ranges reported by a single source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceResult {
    pub source_id: String,
    pub ranges: Vec<Range>,
}

impl SourceResult {
    pub fn new(source_id: impl Into<String>, ranges: Vec<Range>) -> Self {
        Self {
            source_id: source_id.into(),
            ranges,
        }
    }

    pub fn empty(source_id: impl Into<String>) -> Self {
        Self::new(source_id, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn is_name_label(label: &str, name_labels: &[String]) -> bool {
    name_labels.iter().any(|l| l.eq_ignore_ascii_case(label))
}

/// Converts one tagger's raw spans into its `SourceResult`.
///
/// Spans are validated, filtered to `name_labels`, and folded left to right:
/// a span that starts inside the open range, right at its end, or after a
/// single separating character extends the open range; anything else closes
/// it. Spans reported out of order are sorted by start first, so the
/// resulting ranges never overlap. Blank text always yields an empty result.
pub fn normalize(
    source_id: &str,
    text: &str,
    spans: &[Span],
    name_labels: &[String],
) -> Result<SourceResult, SpanError> {
    if text.trim().is_empty() {
        debug!("Source '{}': blank input, skipping {} span(s).", source_id, spans.len());
        return Ok(SourceResult::empty(source_id));
    }

    let text_len = text.chars().count();
    let mut names: Vec<Range> = Vec::with_capacity(spans.len());
    for span in spans {
        span.validate(text_len).map_err(|e| e.with_source(source_id))?;
        if is_name_label(&span.label, name_labels) {
            names.push(Range::new(span.start, span.end));
        }
    }

    if names.windows(2).any(|w| w[1].start < w[0].start) {
        warn!(
            "Source '{}' reported name spans out of order; sorting {} span(s) by start.",
            source_id,
            names.len()
        );
        names.sort_by_key(|r| r.start);
    }

    let mut ranges: Vec<Range> = Vec::with_capacity(names.len());
    for name in names {
        match ranges.last_mut() {
            Some(open) if name.start <= open.end + 1 => open.end = open.end.max(name.end),
            _ => ranges.push(name),
        }
    }

    debug!(
        "Source '{}': {} span(s) normalized into {} name range(s).",
        source_id,
        spans.len(),
        ranges.len()
    );
    Ok(SourceResult::new(source_id, ranges))
}

/// Locates offset-less tokens in `text`, scanning strictly left to right.
///
/// Tokenizers that rewrite double quotes as ``` `` ``` or `''` get them mapped
/// back to `"` before the search. A token that cannot be found after the
/// current cursor is reported as unaligned.
pub fn align_tokens(text: &str, tokens: &[TaggedToken]) -> Result<Vec<Span>, SpanError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = text.chars().collect();
    let mut cursor = 0usize;
    let mut spans = Vec::with_capacity(tokens.len());

    for token in tokens {
        let word: Vec<char> = token.word.replace("``", "\"").replace("''", "\"").chars().collect();
        if word.is_empty() {
            return Err(SpanError::new(
                cursor,
                cursor,
                &token.label,
                SpanErrorKind::Unaligned { token: token.word.clone() },
            ));
        }

        let found = (cursor..chars.len())
            .find(|&pos| chars[pos..].starts_with(&word));

        match found {
            Some(pos) => {
                let end = pos + word.len();
                spans.push(Span::new(pos, end, &token.label));
                cursor = end;
            }
            None => {
                return Err(SpanError::new(
                    cursor,
                    chars.len(),
                    &token.label,
                    SpanErrorKind::Unaligned { token: token.word.clone() },
                ));
            }
        }
    }

    Ok(spans)
}

/// Byte offset of every char boundary in `text`, plus `text.len()` at the end.
///
/// Index `i` holds the byte offset of char `i`, so a char range `a..b` maps
/// to the byte range `offsets[a]..offsets[b]`.
pub(crate) fn char_byte_offsets(text: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    offsets.push(text.len());
    offsets
}
