//! Configuration management for `anonymask-core`.
//!
//! This module defines the built-in identifier categories, the catalogue that
//! holds their patterns, and `AnonymizeConfig`, the per-run settings (policy,
//! selected categories, custom patterns, name labels). Configurations are
//! read from YAML and validated before anything is masked.
//!
//! License: MIT OR Apache-2.0

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{AnonymizeError, ConfigError};
use crate::interval::Policy;
use crate::patterns::compiler::compile_custom_patterns;
use crate::span::DEFAULT_NAME_LABELS;

/// Maximum allowed length for a custom regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Marker substituted for every detected person name.
pub const NAME_MARKER: &str = "[Name]";

/// A built-in structured-identifier masker.
///
/// Declaration order is catalogue order, which is also the order the
/// pipeline applies selected categories in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Nric,
    CaseNumber,
    Phone,
    Id,
    Date,
    AdmissionTime,
    WardNumber,
    BedNumber,
    PatientClass,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Nric,
        Category::CaseNumber,
        Category::Phone,
        Category::Id,
        Category::Date,
        Category::AdmissionTime,
        Category::WardNumber,
        Category::BedNumber,
        Category::PatientClass,
    ];

    /// 1-based position in the catalogue.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).map_or(0, |i| i + 1)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Nric => "nric",
            Category::CaseNumber => "case_number",
            Category::Phone => "phone",
            Category::Id => "id",
            Category::Date => "date",
            Category::AdmissionTime => "admission_time",
            Category::WardNumber => "ward_number",
            Category::BedNumber => "bed_number",
            Category::PatientClass => "patient_class",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    /// Accepts a catalogue index (`"1"`..`"9"`) or a name such as
    /// `case_number` / `case-number`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Category::from_index(index).ok_or_else(|| ConfigError::UnknownCategory(s.to_string()));
        }
        let normalized = trimmed.to_ascii_lowercase().replace(['-', ' '], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// One category's patterns and replacement, as stored in the catalogue file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogueEntry {
    pub category: Category,
    pub display_name: String,
    /// Applied in order, each to the output of the previous one.
    pub patterns: Vec<String>,
    pub replacement: String,
    /// Color identity used by the highlight variant.
    pub color: String,
}

/// The fixed set of built-in category maskers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryCatalogue {
    pub categories: Vec<CatalogueEntry>,
}

impl CategoryCatalogue {
    /// Loads the catalogue embedded in the crate.
    pub fn load_default() -> Result<Self, ConfigError> {
        debug!("Loading default category catalogue from embedded string...");
        let default_yaml = include_str!("../config/default_categories.yaml");
        let mut catalogue: CategoryCatalogue = serde_yml::from_str(default_yaml)
            .map_err(|e| ConfigError::InvalidCatalogue(e.to_string()))?;
        catalogue.validate()?;
        catalogue.categories.sort_by_key(|entry| entry.category);
        debug!("Loaded {} catalogue categories.", catalogue.categories.len());
        Ok(catalogue)
    }

    pub fn entry(&self, category: Category) -> Option<&CatalogueEntry> {
        self.categories.iter().find(|e| e.category == category)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        for category in Category::ALL {
            let count = self.categories.iter().filter(|e| e.category == category).count();
            if count != 1 {
                errors.push(format!("category '{}' appears {} times", category, count));
            }
        }
        for entry in &self.categories {
            if entry.patterns.is_empty() {
                errors.push(format!("category '{}' has no patterns", entry.category));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidCatalogue(errors.join("; ")))
        }
    }
}

/// A user-supplied `(pattern, replacement)` pair, applied case-insensitively.
///
/// The replacement may reference capture groups with `$1` or `${name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CustomPattern {
    pub pattern: String,
    pub replacement: String,
}

impl CustomPattern {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Settings for one anonymization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnonymizeConfig {
    /// Required when more than one source is supplied.
    pub policy: Option<Policy>,
    /// Built-in categories to mask, by name or 1-based catalogue index.
    #[serde(deserialize_with = "deserialize_categories")]
    pub categories: Vec<Category>,
    pub custom_patterns: Vec<CustomPattern>,
    /// Tagger labels treated as person names. Defaults to `PERSON` and `PER`.
    pub name_labels: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRef {
    Index(usize),
    Name(String),
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<CategoryRef>::deserialize(deserializer)?;
    refs.into_iter()
        .map(|r| match r {
            CategoryRef::Index(i) => Category::from_index(i)
                .ok_or_else(|| ConfigError::UnknownCategory(i.to_string())),
            CategoryRef::Name(n) => n.parse::<Category>(),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

impl AnonymizeConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnonymizeError> {
        let path = path.as_ref();
        info!("Loading anonymization config from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        info!(
            "Loaded config from {}: {} categor(ies), {} custom pattern(s).",
            path.display(),
            config.categories.len(),
            config.custom_patterns.len()
        );
        Ok(config)
    }

    /// Parses and validates a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AnonymizeError> {
        let config: AnonymizeConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every custom pattern compiles, so no run starts with a bad one.
    pub fn validate(&self) -> Result<(), AnonymizeError> {
        compile_custom_patterns(&self.custom_patterns)?;
        Ok(())
    }

    /// The configured name labels, or the defaults.
    pub fn name_labels(&self) -> Vec<String> {
        match &self.name_labels {
            Some(labels) if !labels.is_empty() => labels.clone(),
            _ => DEFAULT_NAME_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Selected categories, deduplicated and in catalogue order.
    pub fn selected_categories(&self) -> Vec<Category> {
        let mut selected = self.categories.clone();
        selected.sort();
        selected.dedup();
        selected
    }
}

/// Layers `overrides` (typically command-line flags) on top of `base`.
///
/// A policy or label list in `overrides` replaces the base one; categories
/// are combined; custom patterns from `overrides` run after the base ones.
pub fn merge_config(base: AnonymizeConfig, overrides: Option<AnonymizeConfig>) -> AnonymizeConfig {
    let Some(overrides) = overrides else {
        return base;
    };
    debug!(
        "Merging config overrides: policy={:?}, {} categor(ies), {} custom pattern(s).",
        overrides.policy,
        overrides.categories.len(),
        overrides.custom_patterns.len()
    );

    let mut categories = base.categories;
    categories.extend(overrides.categories);

    let mut custom_patterns = base.custom_patterns;
    custom_patterns.extend(overrides.custom_patterns);

    AnonymizeConfig {
        policy: overrides.policy.or(base.policy),
        categories,
        custom_patterns,
        name_labels: overrides.name_labels.or(base.name_labels),
    }
}
