//! The masking pipeline.
//!
//! Three stages, strictly in this order, each seeing the output of the one
//! before it:
//!
//! 1. every resolved name literal, longest first, becomes `[Name]`;
//! 2. each selected built-in category, in catalogue order;
//! 3. each custom pattern, in the order given.
//!
//! Every substitution is recorded as a [`MaskMatch`] so the highlight variant
//! and the summary can be derived from the same run.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::Regex;

use crate::config::{Category, NAME_MARKER};
use crate::errors::PatternError;
use crate::mask_match::{log_mask_match_debug, MaskMatch, MaskStage};
use crate::patterns::compiler::{CompiledCatalogue, CompiledPattern};

/// The result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaskOutput {
    pub masked: String,
    /// Substitutions in the order they were made.
    pub matches: Vec<MaskMatch>,
}

/// A ready-to-run pipeline over already compiled patterns.
#[derive(Debug, Clone, Copy)]
pub struct MaskingPipeline<'a> {
    pub catalogue: &'a CompiledCatalogue,
    /// Expected in catalogue order.
    pub categories: &'a [Category],
    pub custom_patterns: &'a [CompiledPattern],
}

impl MaskingPipeline<'_> {
    /// Masks `text`. `names` must already be ordered longest first.
    ///
    /// Fails only if the name literals cannot be assembled into one matcher.
    pub fn run(&self, text: &str, names: &[String]) -> Result<MaskOutput, PatternError> {
        let mut matches = Vec::new();

        let mut masked = mask_names(text, names, &mut matches)?;

        for category in self.categories {
            let Some(compiled) = self.catalogue.get(*category) else {
                continue;
            };
            for regex in &compiled.regexes {
                masked = replace_recorded(
                    &masked,
                    regex,
                    &compiled.replace_with,
                    MaskStage::Category(*category),
                    &mut matches,
                );
            }
        }

        for custom in self.custom_patterns {
            masked = replace_recorded(
                &masked,
                &custom.regex,
                &custom.replace_with,
                MaskStage::Custom(custom.index),
                &mut matches,
            );
        }

        debug!(
            "Masking pipeline finished: {} substitution(s), {} -> {} bytes.",
            matches.len(),
            text.len(),
            masked.len()
        );
        Ok(MaskOutput { masked, matches })
    }
}

/// Replaces every name literal with the name marker in a single pass.
///
/// The literals form one alternation, longest first, so at any position the
/// longest name wins and a marker already written is never scanned again.
fn mask_names(text: &str, names: &[String], matches: &mut Vec<MaskMatch>) -> Result<String, PatternError> {
    let literals: Vec<String> = names
        .iter()
        .filter(|n| !n.is_empty())
        .map(|n| regex::escape(n))
        .collect();
    if literals.is_empty() {
        return Ok(text.to_string());
    }
    let matcher = Regex::new(&literals.join("|")).map_err(|source| PatternError::NameSet {
        count: literals.len(),
        source,
    })?;
    Ok(replace_recorded(text, &matcher, NAME_MARKER, MaskStage::Name, matches))
}

/// Replaces every match of `regex`, expanding `$n` templates, and records each one.
fn replace_recorded(
    text: &str,
    regex: &Regex,
    replacement: &str,
    stage: MaskStage,
    matches: &mut Vec<MaskMatch>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0usize;

    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let mut expanded = String::new();
        caps.expand(replacement, &mut expanded);

        out.push_str(&text[last_end..whole.start()]);
        out.push_str(&expanded);
        last_end = whole.end();

        if !whole.as_str().is_empty() {
            let m = MaskMatch {
                stage,
                original: whole.as_str().to_string(),
                replacement: expanded,
            };
            log_mask_match_debug(module_path!(), &m);
            matches.push(m);
        }
    }

    out.push_str(&text[last_end..]);
    out
}
