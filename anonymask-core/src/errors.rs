//! errors.rs - Custom error types for the anonymask-core library.
//!
//! Three failure families are surfaced to callers: malformed tagger output
//! (`SpanError`), bad configuration (`ConfigError`) and invalid user patterns
//! (`PatternError`). `AnonymizeError` aggregates them together with tagger
//! invocation failures. Nothing here is ever swallowed: a masking call either
//! fully succeeds or returns one of these.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use thiserror::Error;

/// The specific way a span violated the tagger contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanErrorKind {
    /// `end <= start`.
    Inverted,
    /// `end` lies past the character length of the text.
    OutOfBounds { text_len: usize },
    /// A token emitted without offsets could not be located in the text.
    Unaligned { token: String },
}

/// Malformed output from a tagger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SpanError {
    pub source_id: Option<String>,
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub kind: SpanErrorKind,
}

impl SpanError {
    pub fn new(start: usize, end: usize, label: impl Into<String>, kind: SpanErrorKind) -> Self {
        Self {
            source_id: None,
            start,
            end,
            label: label.into(),
            kind,
        }
    }

    /// Attaches the id of the tagger that produced the span.
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = self
            .source_id
            .as_deref()
            .map(|s| format!(" from source '{}'", s))
            .unwrap_or_default();
        match &self.kind {
            SpanErrorKind::Inverted => write!(
                f,
                "Malformed span{} [{}, {}) labelled '{}': end must be greater than start",
                origin, self.start, self.end, self.label
            ),
            SpanErrorKind::OutOfBounds { text_len } => write!(
                f,
                "Malformed span{} [{}, {}) labelled '{}': text is only {} characters long",
                origin, self.start, self.end, self.label, text_len
            ),
            SpanErrorKind::Unaligned { token } => write!(
                f,
                "Token '{}'{} labelled '{}' could not be aligned to the text after position {}",
                token, origin, self.label, self.start
            ),
        }
    }
}

/// Missing or invalid configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("A combination policy ('union' or 'intersection') is required when {0} sources are selected")]
    MissingPolicy(usize),

    #[error("Unknown combination policy '{0}'; expected 'union' or 'intersection'")]
    UnknownPolicy(String),

    #[error("Unknown category '{0}'; expected a catalogue index 1-9 or a category name")]
    UnknownCategory(String),

    #[error("Invalid built-in category catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// An invalid user-supplied pattern, identified by its position in the list.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PatternError {
    #[error("Custom pattern #{index} ('{pattern}') failed to compile: {source}")]
    Compilation {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Custom pattern #{index}: pattern length ({len}) exceeds maximum allowed ({max})")]
    LengthExceeded { index: usize, len: usize, max: usize },

    #[error("Custom pattern #{index} has an empty {field}")]
    Empty { index: usize, field: &'static str },

    #[error("Failed to build a matcher for {count} name literal(s): {source}")]
    NameSet {
        count: usize,
        #[source]
        source: regex::Error,
    },
}

/// This enum represents all possible error types in the `anonymask-core` library.
///
/// New variants may be added in future versions, hence `#[non_exhaustive]`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnonymizeError {
    #[error(transparent)]
    Span(#[from] SpanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Tagger '{source_id}' failed: {source}")]
    Tagger {
        source_id: String,
        #[source]
        source: anyhow::Error,
    },
}
