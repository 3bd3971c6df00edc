// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration and per-call search options.
//!
//! Every knob has a named field and a documented default. `EngineConfig` is
//! validated once, when the engine is built; after that the values are
//! trusted. Hosts that keep settings in JSON can deserialize straight into it
//! (camelCase keys, missing keys take the default).

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_MIN_SEARCH_LENGTH: usize = 10;
pub const DEFAULT_MAX_SEARCH_LENGTH: usize = 1000;
pub const DEFAULT_FUZZY_SEGMENT_LENGTH: usize = 40;
pub const DEFAULT_FUZZY_SEGMENT_OVERLAP: usize = 20;
pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_CACHE_SIZE: usize = 100;
pub const DEFAULT_SNAPSHOT_TTL_MS: u64 = 5000;

/// Queries longer than this get the fuzzy-segment treatment.
pub const FUZZY_MIN_QUERY_LENGTH: usize = 60;
/// Shortest prefix the partial strategy will try.
pub const PARTIAL_MIN_PREFIX: usize = 20;
/// Longest prefix the partial strategy will try.
pub const PARTIAL_MAX_PREFIX: usize = 60;
/// Step between partial prefix lengths.
pub const PARTIAL_PREFIX_STEP: usize = 10;

/// Class carried by every boundary wrapper.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "text-highlight";

// ============================================================================
// EXCLUSION RULES
// ============================================================================

/// Which element subtrees the text index never looks into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExclusionRules {
    /// Tag names (lowercase).
    pub tags: Vec<String>,
    /// Class names; an element carrying any of them is skipped.
    pub classes: Vec<String>,
    /// Skip `hidden` / `aria-hidden="true"` elements.
    pub skip_hidden: bool,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        ExclusionRules {
            tags: ["script", "style", "noscript", "template", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            classes: [
                DEFAULT_HIGHLIGHT_CLASS,
                "highlight-marker",
                "highlight-menu",
                "highlight-tooltip",
                "property-menu",
                "rag-panel",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            skip_hidden: true,
        }
    }
}

fn default_decoration_classes() -> Vec<String> {
    [
        "highlight-icon",
        "highlight-marker",
        "highlight-menu",
        "highlight-tooltip",
        "highlight-actions",
        "resize-handle",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Construction-time configuration of an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Shortest accepted query, in chars after trimming. Default 10.
    pub min_search_length: usize,
    /// Longest accepted query. Default 1000.
    pub max_search_length: usize,
    /// Window size of the fuzzy-segment strategy. Default 40.
    pub fuzzy_segment_length: usize,
    /// Overlap between consecutive fuzzy windows. Default 20.
    pub fuzzy_segment_overlap: usize,
    /// Default for [`SearchOptions::normalize_whitespace`]. Default true.
    pub normalize_whitespace: bool,
    /// Default for [`SearchOptions::case_sensitive`]. Default false.
    pub case_sensitive: bool,
    /// Default for [`SearchOptions::whole_words`]. Default false.
    pub whole_words: bool,
    /// Cap for `find_all_text`. Default 10.
    pub max_results: usize,
    /// Search cache capacity. Default 100.
    pub cache_size: usize,
    /// Snapshot time-to-live in milliseconds. Default 5000.
    pub snapshot_ttl_ms: u64,
    pub exclusion: ExclusionRules,
    /// Subtrees inside a wrapper that are UI chrome, not highlighted text.
    pub decoration_classes: Vec<String>,
    pub highlight_class: String,
    /// Prefix for minted highlight ids.
    pub id_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_search_length: DEFAULT_MIN_SEARCH_LENGTH,
            max_search_length: DEFAULT_MAX_SEARCH_LENGTH,
            fuzzy_segment_length: DEFAULT_FUZZY_SEGMENT_LENGTH,
            fuzzy_segment_overlap: DEFAULT_FUZZY_SEGMENT_OVERLAP,
            normalize_whitespace: true,
            case_sensitive: false,
            whole_words: false,
            max_results: DEFAULT_MAX_RESULTS,
            cache_size: DEFAULT_CACHE_SIZE,
            snapshot_ttl_ms: DEFAULT_SNAPSHOT_TTL_MS,
            exclusion: ExclusionRules::default(),
            decoration_classes: default_decoration_classes(),
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            id_prefix: "highlight".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing keys take their defaults; the result is validated.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_millis(self.snapshot_ttl_ms)
    }

    /// Reject combinations the strategies cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_search_length == 0 {
            return Err(EngineError::invalid_config(
                "minSearchLength",
                "must be at least 1",
            ));
        }
        if self.min_search_length > self.max_search_length {
            return Err(EngineError::invalid_config(
                "minSearchLength",
                format!(
                    "{} exceeds maxSearchLength {}",
                    self.min_search_length, self.max_search_length
                ),
            ));
        }
        if self.fuzzy_segment_length == 0 {
            return Err(EngineError::invalid_config(
                "fuzzySegmentLength",
                "must be at least 1",
            ));
        }
        if self.fuzzy_segment_overlap >= self.fuzzy_segment_length {
            return Err(EngineError::invalid_config(
                "fuzzySegmentOverlap",
                format!(
                    "{} must be smaller than fuzzySegmentLength {}",
                    self.fuzzy_segment_overlap, self.fuzzy_segment_length
                ),
            ));
        }
        if self.cache_size == 0 {
            return Err(EngineError::invalid_config("cacheSize", "must be at least 1"));
        }
        if self.highlight_class.trim().is_empty() {
            return Err(EngineError::invalid_config(
                "highlightClass",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Per-call options seeded from this config.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            exact_match: false,
            max_results: self.max_results,
            section: None,
            sentence_index: None,
            fuzzy_segment_length: self.fuzzy_segment_length,
            fuzzy_segment_overlap: self.fuzzy_segment_overlap,
            case_sensitive: self.case_sensitive,
            whole_words: self.whole_words,
            normalize_whitespace: self.normalize_whitespace,
        }
    }
}

// ============================================================================
// SEARCH OPTIONS
// ============================================================================

/// Knobs for a single `find_text` call. Hashable: it is half the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Stop after the exact and section-scoped strategies.
    pub exact_match: bool,
    pub max_results: usize,
    /// Restrict the section-scoped strategy to this section name.
    pub section: Option<String>,
    /// 0-based sentence inside the section scope.
    pub sentence_index: Option<usize>,
    pub fuzzy_segment_length: usize,
    pub fuzzy_segment_overlap: usize,
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub normalize_whitespace: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        EngineConfig::default().search_options()
    }
}

impl SearchOptions {
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_sentence(mut self, index: usize) -> Self {
        self.sentence_index = Some(index);
        self
    }

    pub fn exact(mut self) -> Self {
        self.exact_match = true;
        self
    }

    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.case_sensitive = on;
        self
    }

    pub fn whole_words(mut self, on: bool) -> Self {
        self.whole_words = on;
        self
    }

    /// Fuzzy window geometry that can actually slide forward.
    pub(crate) fn fuzzy_step(&self) -> Option<usize> {
        if self.fuzzy_segment_length == 0
            || self.fuzzy_segment_overlap >= self.fuzzy_segment_length
        {
            return None;
        }
        Some(self.fuzzy_segment_length - self.fuzzy_segment_overlap)
    }
}
