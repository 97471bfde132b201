// anonymask-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for non-interactive use.
//! Compiles a configuration, runs the given taggers, and returns the masked
//! string in a single call.

use crate::config::AnonymizeConfig;
use crate::engine::Anonymizer;
use crate::errors::AnonymizeError;
use crate::tagger::Tagger;

/// Fully anonymizes `text` in one call.
///
/// # Arguments
///
/// * `config` - The merged configuration (file values plus any overrides).
/// * `text` - The string to be anonymized.
/// * `taggers` - The name sources to consult. May be empty, in which case
///   only the category and custom pattern stages run.
pub fn headless_anonymize_string(
    config: AnonymizeConfig,
    text: &str,
    taggers: &[Box<dyn Tagger>],
) -> Result<String, AnonymizeError> {
    let anonymizer = Anonymizer::new(config)?;
    anonymizer.anonymize_with_taggers(text, taggers)
}
