//! compiler.rs - Compiles the category catalogue and custom patterns.
//!
//! Every pattern is built case-insensitively. The embedded catalogue never
//! changes, so its compiled form is built once per process and shared.
//! Custom patterns are compiled per configuration; all of them must compile
//! before any masking starts.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};

use crate::config::{Category, CategoryCatalogue, CustomPattern, MAX_PATTERN_LENGTH};
use crate::errors::{ConfigError, PatternError};

/// Size limit for a single compiled regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled built-in category.
#[derive(Debug)]
pub struct CompiledCategory {
    pub category: Category,
    /// Applied in order.
    pub regexes: Vec<Regex>,
    pub replace_with: String,
    pub color: String,
}

/// The whole catalogue, compiled and in catalogue order.
#[derive(Debug)]
pub struct CompiledCatalogue {
    pub categories: Vec<CompiledCategory>,
}

impl CompiledCatalogue {
    pub fn get(&self, category: Category) -> Option<&CompiledCategory> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// A compiled user pattern, keeping its position in the user's list.
#[derive(Debug)]
pub struct CompiledPattern {
    pub index: usize,
    pub regex: Regex,
    pub replace_with: String,
}

static DEFAULT_CATALOGUE: OnceCell<Arc<CompiledCatalogue>> = OnceCell::new();

fn build_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

/// Compiles every entry of `catalogue`.
pub fn compile_catalogue(catalogue: &CategoryCatalogue) -> Result<CompiledCatalogue, ConfigError> {
    debug!("Starting compilation of {} catalogue categories.", catalogue.categories.len());
    let mut categories = Vec::with_capacity(catalogue.categories.len());

    for entry in &catalogue.categories {
        let regexes = entry
            .patterns
            .iter()
            .map(|p| {
                build_case_insensitive(p).map_err(|e| {
                    ConfigError::InvalidCatalogue(format!(
                        "category '{}' pattern '{}' failed to compile: {}",
                        entry.category, p, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            target: "anonymask_core::patterns",
            "Category '{}' compiled successfully ({} pattern(s)).",
            entry.category,
            regexes.len()
        );
        categories.push(CompiledCategory {
            category: entry.category,
            regexes,
            replace_with: entry.replacement.clone(),
            color: entry.color.clone(),
        });
    }

    Ok(CompiledCatalogue { categories })
}

/// Returns the compiled embedded catalogue, compiling it on first use.
pub fn get_or_compile_default_catalogue() -> Result<Arc<CompiledCatalogue>, ConfigError> {
    DEFAULT_CATALOGUE
        .get_or_try_init(|| {
            debug!("Compiled catalogue not initialized. Compiling now.");
            let catalogue = CategoryCatalogue::load_default()?;
            compile_catalogue(&catalogue).map(Arc::new)
        })
        .map(Arc::clone)
}

/// Compiles user patterns in order.
///
/// Fails on the first invalid entry, naming its index. Empty patterns,
/// empty replacements and over-long patterns are rejected before compiling.
pub fn compile_custom_patterns(patterns: &[CustomPattern]) -> Result<Vec<CompiledPattern>, PatternError> {
    debug!("Starting compilation of {} custom pattern(s).", patterns.len());
    let mut compiled = Vec::with_capacity(patterns.len());

    for (index, custom) in patterns.iter().enumerate() {
        if custom.pattern.is_empty() {
            return Err(PatternError::Empty { index, field: "pattern" });
        }
        if custom.replacement.is_empty() {
            return Err(PatternError::Empty { index, field: "replacement" });
        }
        if custom.pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::LengthExceeded {
                index,
                len: custom.pattern.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let regex = build_case_insensitive(&custom.pattern).map_err(|source| {
            warn!("Custom pattern #{} failed to compile.", index);
            PatternError::Compilation {
                index,
                pattern: custom.pattern.clone(),
                source,
            }
        })?;

        compiled.push(CompiledPattern {
            index,
            regex,
            replace_with: custom.replacement.clone(),
        });
    }

    debug!("Finished compiling custom patterns. Total compiled: {}.", compiled.len());
    Ok(compiled)
}
