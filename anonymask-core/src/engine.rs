//! engine.rs - The `Anonymizer`, which ties every stage together.
//!
//! An `Anonymizer` is built once from an [`AnonymizeConfig`]: the catalogue
//! and custom patterns are compiled up front, so a bad pattern is reported
//! before any text is touched. Each call then runs
//!
//! `SourceResult`s → combination by policy → literal names → masking pipeline
//!
//! and, in the highlight variant, marks the original text as well. Nothing is
//! kept between calls.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::{debug, info};

use crate::config::{AnonymizeConfig, Category};
use crate::errors::{AnonymizeError, ConfigError, SpanError};
use crate::highlight::{highlight, HighlightOutput};
use crate::interval::{combine, Policy};
use crate::mask_match::{summarize, MaskSummaryItem};
use crate::masking::{MaskOutput, MaskingPipeline};
use crate::patterns::compiler::{
    compile_custom_patterns, get_or_compile_default_catalogue, CompiledCatalogue, CompiledPattern,
};
use crate::resolver::resolve_names;
use crate::span::SourceResult;
use crate::tagger::{collect_source_results, Tagger};

/// A configured, ready-to-use anonymizer.
#[derive(Debug)]
pub struct Anonymizer {
    catalogue: Arc<CompiledCatalogue>,
    categories: Vec<Category>,
    custom_patterns: Vec<CompiledPattern>,
    policy: Option<Policy>,
    name_labels: Vec<String>,
}

impl Anonymizer {
    /// Compiles `config` into an anonymizer.
    ///
    /// # Errors
    /// Returns [`AnonymizeError::Pattern`] if any custom pattern is invalid and
    /// [`AnonymizeError::Config`] if the built-in catalogue cannot be loaded.
    pub fn new(config: AnonymizeConfig) -> Result<Self, AnonymizeError> {
        let catalogue = get_or_compile_default_catalogue()?;
        let custom_patterns = compile_custom_patterns(&config.custom_patterns)?;
        let categories = config.selected_categories();
        let name_labels = config.name_labels();
        info!(
            "Anonymizer ready: policy={}, {} categor(ies), {} custom pattern(s).",
            config.policy.map_or_else(|| "none".to_string(), |p| p.to_string()),
            categories.len(),
            custom_patterns.len()
        );
        Ok(Self {
            catalogue,
            categories,
            custom_patterns,
            policy: config.policy,
            name_labels,
        })
    }

    pub fn policy(&self) -> Option<Policy> {
        self.policy
    }

    /// Selected categories, in catalogue order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn name_labels(&self) -> &[String] {
        &self.name_labels
    }

    pub fn catalogue(&self) -> &CompiledCatalogue {
        &self.catalogue
    }

    /// Masks `text` using names from already normalized sources.
    pub fn anonymize(&self, text: &str, sources: &[SourceResult]) -> Result<String, AnonymizeError> {
        Ok(self.run(text, sources)?.masked)
    }

    /// Like [`Anonymizer::anonymize`], also returning what each stage replaced.
    pub fn anonymize_detailed(
        &self,
        text: &str,
        sources: &[SourceResult],
    ) -> Result<(String, Vec<MaskSummaryItem>), AnonymizeError> {
        let output = self.run(text, sources)?;
        let summary = summarize(&output.matches);
        Ok((output.masked, summary))
    }

    /// Masks `text` and returns a highlighted copy of the original alongside.
    pub fn anonymize_with_highlights(
        &self,
        text: &str,
        sources: &[SourceResult],
    ) -> Result<HighlightOutput, AnonymizeError> {
        let output = self.run(text, sources)?;
        Ok(highlight(text, output, &self.catalogue))
    }

    /// Runs `taggers` over `text` and masks with their combined names.
    pub fn anonymize_with_taggers(&self, text: &str, taggers: &[Box<dyn Tagger>]) -> Result<String, AnonymizeError> {
        let sources = self.source_results(text, taggers)?;
        self.anonymize(text, &sources)
    }

    /// Tagger-driven form of [`Anonymizer::anonymize_with_highlights`].
    pub fn highlight_with_taggers(
        &self,
        text: &str,
        taggers: &[Box<dyn Tagger>],
    ) -> Result<HighlightOutput, AnonymizeError> {
        let sources = self.source_results(text, taggers)?;
        self.anonymize_with_highlights(text, &sources)
    }

    /// Runs and normalizes every tagger.
    ///
    /// A missing policy is reported before any tagger runs.
    pub fn source_results(&self, text: &str, taggers: &[Box<dyn Tagger>]) -> Result<Vec<SourceResult>, AnonymizeError> {
        self.check_policy(taggers.len())?;
        collect_source_results(text, taggers, &self.name_labels)
    }

    fn check_policy(&self, source_count: usize) -> Result<(), ConfigError> {
        if source_count > 1 && self.policy.is_none() {
            return Err(ConfigError::MissingPolicy(source_count));
        }
        Ok(())
    }

    fn run(&self, text: &str, sources: &[SourceResult]) -> Result<MaskOutput, AnonymizeError> {
        self.check_policy(sources.len())?;
        check_ranges(text, sources)?;
        if text.trim().is_empty() {
            debug!("Blank input: returning it unchanged.");
            return Ok(MaskOutput {
                masked: text.to_string(),
                matches: Vec::new(),
            });
        }

        let ranges = combine(sources, self.policy)?;
        let names = resolve_names(text, &ranges);
        debug!(
            "{} source(s) resolved to {} range(s) and {} distinct name(s).",
            sources.len(),
            ranges.len(),
            names.len()
        );

        let pipeline = MaskingPipeline {
            catalogue: &self.catalogue,
            categories: &self.categories,
            custom_patterns: &self.custom_patterns,
        };
        Ok(pipeline.run(text, &names)?)
    }
}

/// Rejects any range that does not fit inside `text`, naming its source.
fn check_ranges(text: &str, sources: &[SourceResult]) -> Result<(), SpanError> {
    let text_len = text.chars().count();
    for source in sources {
        for range in &source.ranges {
            range
                .validate(text_len)
                .map_err(|e| e.with_source(source.source_id.as_str()))?;
        }
    }
    Ok(())
}

/// One-shot masking: compiles `config`, then masks `text`.
pub fn anonymize(text: &str, sources: &[SourceResult], config: &AnonymizeConfig) -> Result<String, AnonymizeError> {
    Anonymizer::new(config.clone())?.anonymize(text, sources)
}

/// One-shot highlight variant of [`anonymize`].
pub fn anonymize_with_highlights(
    text: &str,
    sources: &[SourceResult],
    config: &AnonymizeConfig,
) -> Result<HighlightOutput, AnonymizeError> {
    Anonymizer::new(config.clone())?.anonymize_with_highlights(text, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomPattern;
    use crate::errors::SpanErrorKind;
    use crate::mask_match::MaskStage;
    use crate::span::{Range, Span};
    use crate::tagger::PrecomputedTagger;

    fn config(policy: Option<Policy>, categories: Vec<Category>) -> AnonymizeConfig {
        AnonymizeConfig {
            policy,
            categories,
            ..Default::default()
        }
    }

    #[test]
    fn single_source_needs_no_policy() {
        let text = "Mary Lee ate pasta. She met Anna.";
        let source = SourceResult::new("spacy", vec![Range::new(0, 8), Range::new(28, 32)]);
        let masked = anonymize(text, &[source], &config(None, vec![])).unwrap();
        assert_eq!(masked, "[Name] ate pasta. She met [Name].");
    }

    #[test]
    fn two_sources_without_policy_fail() {
        let a = SourceResult::new("a", vec![Range::new(0, 4)]);
        let b = SourceResult::new("b", vec![Range::new(0, 4)]);
        let err = anonymize("Anna is here", &[a, b], &config(None, vec![])).unwrap_err();
        assert!(matches!(err, AnonymizeError::Config(ConfigError::MissingPolicy(2))));
    }

    #[test]
    fn intersection_keeps_only_agreed_names() {
        let text = "Anna and Bob";
        let a = SourceResult::new("a", vec![Range::new(0, 4)]);
        let b = SourceResult::new("b", vec![Range::new(0, 4), Range::new(9, 12)]);
        let engine = Anonymizer::new(config(Some(Policy::Intersection), vec![])).unwrap();
        assert_eq!(engine.anonymize(text, &[a.clone(), b.clone()]).unwrap(), "[Name] and Bob");

        let engine = Anonymizer::new(config(Some(Policy::Union), vec![])).unwrap();
        assert_eq!(engine.anonymize(text, &[a, b]).unwrap(), "[Name] and [Name]");
    }

    #[test]
    fn zero_sources_masks_categories_only() {
        let masked = anonymize("call 91008100", &[], &config(None, vec![Category::Phone])).unwrap();
        assert_eq!(masked, "call [PHONE]");
    }

    #[test]
    fn blank_input_is_returned_unchanged() {
        let custom = AnonymizeConfig {
            custom_patterns: vec![CustomPattern::new(r"\s+", "_")],
            ..config(None, Category::ALL.to_vec())
        };
        assert_eq!(anonymize("  \t\n", &[], &custom).unwrap(), "  \t\n");
        assert_eq!(anonymize("", &[], &custom).unwrap(), "");
    }

    #[test]
    fn range_past_the_end_of_text_is_rejected() {
        let source = SourceResult::new("spacy", vec![Range::new(0, 400)]);
        match anonymize("Anna", &[source], &config(None, vec![])) {
            Err(AnonymizeError::Span(err)) => {
                assert_eq!(err.kind, SpanErrorKind::OutOfBounds { text_len: 4 });
                assert_eq!(err.source_id.as_deref(), Some("spacy"));
            }
            other => panic!("expected span error, got {:?}", other),
        }
    }

    #[test]
    fn range_outside_text_is_not_silently_ignored() {
        let source = SourceResult::new("flair", vec![Range::new(10, 20)]);
        assert!(matches!(
            anonymize("Anna", &[source], &config(None, vec![])),
            Err(AnonymizeError::Span(_))
        ));
    }

    #[test]
    fn oversized_ranges_fail_before_combining() {
        let a = SourceResult::new("a", vec![Range::new(0, 4)]);
        let b = SourceResult::new("b", vec![Range::new(0, usize::MAX / 2)]);
        let err = anonymize_with_highlights("Anna", &[a, b], &config(Some(Policy::Union), vec![])).unwrap_err();
        match err {
            AnonymizeError::Span(err) => assert_eq!(err.source_id.as_deref(), Some("b")),
            other => panic!("expected span error, got {:?}", other),
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let source = SourceResult::new("s", vec![Range::new(3, 1)]);
        match anonymize("Anna", &[source], &config(None, vec![])) {
            Err(AnonymizeError::Span(err)) => assert_eq!(err.kind, SpanErrorKind::Inverted),
            other => panic!("expected span error, got {:?}", other),
        }
    }

    #[test]
    fn range_ending_at_text_end_is_accepted() {
        let source = SourceResult::new("s", vec![Range::new(4, 8)]);
        assert_eq!(anonymize("met Anna", &[source], &config(None, vec![])).unwrap(), "met [Name]");
    }

    #[test]
    fn invalid_custom_pattern_fails_construction() {
        let bad = AnonymizeConfig {
            custom_patterns: vec![CustomPattern::new("[z-a]", "x")],
            ..Default::default()
        };
        assert!(matches!(Anonymizer::new(bad), Err(AnonymizeError::Pattern(_))));
    }

    #[test]
    fn detailed_run_summarizes_by_stage() {
        let text = "Anna: 91008100, Anna: 91008101";
        let source = SourceResult::new("s", vec![Range::new(0, 4)]);
        let engine = Anonymizer::new(config(None, vec![Category::Phone])).unwrap();
        let (masked, summary) = engine.anonymize_detailed(text, &[source]).unwrap();
        assert_eq!(masked, "[Name]: [PHONE], [Name]: [PHONE]");
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].stage, MaskStage::Name);
        assert_eq!(summary[0].occurrences, 2);
        assert_eq!(summary[1].occurrences, 2);
    }

    #[test]
    fn taggers_are_checked_for_policy_before_running() {
        let taggers: Vec<Box<dyn Tagger>> = vec![
            Box::new(PrecomputedTagger::new("a", vec![Span::new(0, 4, "PERSON")])),
            Box::new(PrecomputedTagger::new("b", vec![Span::new(0, 400, "PERSON")])),
        ];
        let engine = Anonymizer::new(config(None, vec![])).unwrap();
        // The out-of-bounds span would fail normalization; the policy check comes first.
        assert!(matches!(
            engine.anonymize_with_taggers("Anna", &taggers),
            Err(AnonymizeError::Config(ConfigError::MissingPolicy(2)))
        ));
    }

    #[test]
    fn highlight_with_taggers_returns_both_views() {
        let text = "Anna S1234567A";
        let taggers: Vec<Box<dyn Tagger>> =
            vec![Box::new(PrecomputedTagger::new("a", vec![Span::new(0, 4, "PERSON")]))];
        let engine = Anonymizer::new(config(None, vec![Category::Nric])).unwrap();
        let out = engine.highlight_with_taggers(text, &taggers).unwrap();
        assert_eq!(out.masked, "[Name] [NRIC]");
        assert_eq!(out.original_text(), text);
        assert_eq!(out.marked_count(), 2);
    }
}
