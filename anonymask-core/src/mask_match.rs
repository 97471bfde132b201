// anonymask-core/src/mask_match.rs
//! Provides data structures for reporting what a masking run replaced, and
//! logging helpers that keep matched PII out of debug logs by default.

use log::debug;
use serde::{Deserialize, Serialize};

use lazy_static::lazy_static;

use crate::config::Category;

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("ANONYMASK_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// The pipeline stage that produced a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum MaskStage {
    Name,
    Category(Category),
    /// Index into the user's custom pattern list.
    Custom(usize),
}

impl MaskStage {
    pub fn label(&self) -> String {
        match self {
            MaskStage::Name => "name".to_string(),
            MaskStage::Category(c) => c.name().to_string(),
            MaskStage::Custom(i) => format!("custom_{}", i),
        }
    }
}

/// A single substitution performed by the masking pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskMatch {
    pub stage: MaskStage,
    /// The text that was replaced, as it appeared when the stage ran.
    pub original: String,
    pub replacement: String,
}

/// All substitutions made by one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSummaryItem {
    pub stage: MaskStage,
    pub occurrences: usize,
    pub original_texts: Vec<String>,
}

/// Groups matches by stage, keeping pipeline order.
pub fn summarize(matches: &[MaskMatch]) -> Vec<MaskSummaryItem> {
    let mut summary: Vec<MaskSummaryItem> = Vec::new();
    for m in matches {
        match summary.iter_mut().find(|item| item.stage == m.stage) {
            Some(item) => {
                item.occurrences += 1;
                item.original_texts.push(m.original.clone());
            }
            None => summary.push(MaskSummaryItem {
                stage: m.stage,
                occurrences: 1,
                original_texts: vec![m.original.clone()],
            }),
        }
    }
    summary
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

pub(crate) fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub(crate) fn log_mask_match_debug(module_path: &str, m: &MaskMatch) {
    debug!(
        "{} Masked: Stage='{}', Original='{}', Replacement='{}'",
        module_path,
        m.stage.label(),
        get_loggable_content(&m.original),
        m.replacement
    );
}
