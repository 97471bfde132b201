// anonymask-core/src/lib.rs
//! # Anonymask Core Library
//!
//! `anonymask-core` provides the platform-independent logic for masking
//! personal information in free text. Person names come from one or more
//! pluggable taggers; their character spans are normalized, combined across
//! sources by a union or intersection policy, and replaced with `[Name]`.
//! A fixed catalogue of structured-identifier maskers (NRIC, phone, dates and
//! so on) and any user patterns then run over the result.
//!
//! The library holds no state between calls and performs no I/O beyond
//! reading configuration files on request. Taggers are injected by the
//! caller; the core never loads models.
//!
//! ## Modules
//!
//! * `span`: Tagger spans, token alignment, and per-source normalization.
//! * `interval`: Union / intersection of name ranges across sources.
//! * `resolver`: Maps ranges back to literal name strings, longest first.
//! * `masking`: The ordered masking pipeline.
//! * `highlight`: The highlighted-original variant.
//! * `tagger`: The `Tagger` trait and built-in replay taggers.
//! * `config`: Categories, the embedded catalogue, and `AnonymizeConfig`.
//! * `patterns`: Compilation of catalogue and custom patterns.
//! * `mask_match`: Records of what was replaced, and PII-safe logging helpers.
//! * `engine`: The `Anonymizer` facade.
//! * `headless`: One-shot convenience wrapper.
//! * `errors`: The error taxonomy.
//!
//! ## Usage Example
//!
//! ```rust
//! use anonymask_core::{headless_anonymize_string, AnonymizeConfig, Category, PrecomputedTagger, Span, Tagger};
//!
//! fn main() -> Result<(), anonymask_core::AnonymizeError> {
//!     let config = AnonymizeConfig {
//!         categories: vec![Category::Phone],
//!         ..Default::default()
//!     };
//!     let taggers: Vec<Box<dyn Tagger>> = vec![Box::new(PrecomputedTagger::new(
//!         "spacy",
//!         vec![Span::new(0, 4, "PERSON")],
//!     ))];
//!
//!     let masked = headless_anonymize_string(config, "Anna called 91008100.", &taggers)?;
//!     assert_eq!(masked, "[Name] called [PHONE].");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`AnonymizeError`], which wraps
//! [`SpanError`], [`ConfigError`], [`PatternError`] and tagger failures.
//! A call either fully succeeds or fails; there is no partial output.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod highlight;
pub mod interval;
pub mod mask_match;
pub mod masking;
pub mod patterns;
pub mod resolver;
pub mod span;
pub mod tagger;

/// Re-exports the configuration types.
pub use config::{
    merge_config, AnonymizeConfig, CatalogueEntry, Category, CategoryCatalogue, CustomPattern,
    MAX_PATTERN_LENGTH, NAME_MARKER,
};

/// Re-exports the error taxonomy.
pub use errors::{AnonymizeError, ConfigError, PatternError, SpanError, SpanErrorKind};

/// Re-exports the engine facade and its one-shot forms.
pub use engine::{anonymize, anonymize_with_highlights, Anonymizer};

pub use headless::headless_anonymize_string;

pub use highlight::{HighlightOutput, HighlightSegment, Marker, CUSTOM_COLOR, NAME_COLOR};

pub use interval::{combine, Policy};

/// Re-exports types for detailed match reporting.
pub use mask_match::{redact_sensitive, summarize, MaskMatch, MaskStage, MaskSummaryItem};

pub use masking::{MaskOutput, MaskingPipeline};

pub use patterns::compiler::{
    compile_catalogue, compile_custom_patterns, get_or_compile_default_catalogue, CompiledCatalogue,
    CompiledCategory, CompiledPattern,
};

pub use resolver::resolve_names;

pub use span::{align_tokens, normalize, Range, SourceResult, Span, TaggedToken, DEFAULT_NAME_LABELS};

pub use tagger::{collect_source_results, tagger_from_json, PrecomputedTagger, Tagger, TokenStreamTagger};
