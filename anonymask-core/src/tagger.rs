//! tagger.rs - The pluggable name-detection seam.
//!
//! A [`Tagger`] is anything that can label character intervals of a text.
//! The core never loads models itself: callers inject taggers per call, and
//! [`collect_source_results`] runs them (in parallel with the `parallel`
//! feature) and normalizes each one's output into a [`SourceResult`]. All
//! taggers finish before any combination happens; one failure fails the call.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::{debug, info};
use serde::Deserialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{AnonymizeError, SpanError};
use crate::span::{align_tokens, normalize, SourceResult, Span, TaggedToken};

/// A named-entity tagger contributing one source.
///
/// `tag` returns half-open character-offset spans. Implementations must be
/// shareable across threads, since sources may be tagged concurrently.
pub trait Tagger: Send + Sync {
    /// A stable identifier, used in logs and error messages.
    fn source_id(&self) -> &str;

    /// Labels intervals of `text`.
    fn tag(&self, text: &str) -> Result<Vec<Span>>;
}

/// A tagger that replays spans computed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputedTagger {
    source_id: String,
    spans: Vec<Span>,
}

impl PrecomputedTagger {
    pub fn new(source_id: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            source_id: source_id.into(),
            spans,
        }
    }

    /// Reads a JSON array of `{"start", "end", "label"}` objects.
    pub fn from_json_str(source_id: impl Into<String>, json: &str) -> Result<Self> {
        let spans: Vec<Span> = serde_json::from_str(json)?;
        Ok(Self::new(source_id, spans))
    }
}

impl Tagger for PrecomputedTagger {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn tag(&self, _text: &str) -> Result<Vec<Span>> {
        Ok(self.spans.clone())
    }
}

/// A tagger that replays `(word, label)` tokens without offsets.
///
/// Tokens are located in the text when `tag` is called, so the same token
/// stream only makes sense for the text it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStreamTagger {
    source_id: String,
    tokens: Vec<TaggedToken>,
}

impl TokenStreamTagger {
    pub fn new(source_id: impl Into<String>, tokens: Vec<TaggedToken>) -> Self {
        Self {
            source_id: source_id.into(),
            tokens,
        }
    }

    /// Reads a JSON array of `{"word", "label"}` objects.
    pub fn from_json_str(source_id: impl Into<String>, json: &str) -> Result<Self> {
        let tokens: Vec<TaggedToken> = serde_json::from_str(json)?;
        Ok(Self::new(source_id, tokens))
    }
}

impl Tagger for TokenStreamTagger {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn tag(&self, text: &str) -> Result<Vec<Span>> {
        Ok(align_tokens(text, &self.tokens)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaggerRecords {
    Spans(Vec<Span>),
    Tokens(Vec<TaggedToken>),
}

/// Builds a tagger from saved tagger output, accepting either spans with
/// offsets or offset-less tokens.
pub fn tagger_from_json(source_id: &str, json: &str) -> Result<Box<dyn Tagger>, AnonymizeError> {
    let records: TaggerRecords = serde_json::from_str(json).map_err(|e| AnonymizeError::Tagger {
        source_id: source_id.to_string(),
        source: anyhow::anyhow!(
            "expected a JSON array of {{start, end, label}} spans or {{word, label}} tokens: {}",
            e
        ),
    })?;
    Ok(match records {
        TaggerRecords::Spans(spans) => {
            debug!("Source '{}': loaded {} precomputed span(s).", source_id, spans.len());
            Box::new(PrecomputedTagger::new(source_id, spans))
        }
        TaggerRecords::Tokens(tokens) => {
            debug!("Source '{}': loaded {} token(s) for alignment.", source_id, tokens.len());
            Box::new(TokenStreamTagger::new(source_id, tokens))
        }
    })
}

fn run_tagger(tagger: &dyn Tagger, text: &str, name_labels: &[String]) -> Result<SourceResult, AnonymizeError> {
    let source_id = tagger.source_id();
    let spans = tagger.tag(text).map_err(|err| match err.downcast::<SpanError>() {
        Ok(span_err) => AnonymizeError::Span(span_err.with_source(source_id)),
        Err(source) => AnonymizeError::Tagger {
            source_id: source_id.to_string(),
            source,
        },
    })?;
    Ok(normalize(source_id, text, &spans, name_labels)?)
}

/// Runs every tagger over `text` and normalizes its output.
///
/// Results keep the order of `taggers`. Blank text skips the taggers entirely
/// and yields one empty result per source.
pub fn collect_source_results(
    text: &str,
    taggers: &[Box<dyn Tagger>],
    name_labels: &[String],
) -> Result<Vec<SourceResult>, AnonymizeError> {
    if text.trim().is_empty() {
        debug!("Blank input: skipping {} tagger(s).", taggers.len());
        return Ok(taggers.iter().map(|t| SourceResult::empty(t.source_id())).collect());
    }

    info!("Running {} tagger(s).", taggers.len());

    #[cfg(feature = "parallel")]
    let results = taggers
        .par_iter()
        .map(|t| run_tagger(t.as_ref(), text, name_labels))
        .collect::<Result<Vec<_>, _>>();

    #[cfg(not(feature = "parallel"))]
    let results = taggers
        .iter()
        .map(|t| run_tagger(t.as_ref(), text, name_labels))
        .collect::<Result<Vec<_>, _>>();

    results
}
