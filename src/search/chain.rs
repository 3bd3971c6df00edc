// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Orchestration: validate, consult the cache, run strategies in order.
//!
//! # Cache semantics
//!
//! Only hits are cached. A miss may turn into a hit after the next mutation,
//! and a cached "not found" would hide it. A cache hit is returned as-is,
//! without checking that its nodes are still attached; whoever acts on the
//! range re-validates it first.
//!
//! # Offsets
//!
//! Every [`MatchResult`] carries offsets into the whole document's snapshot,
//! whichever strategy produced it. Section hits are found in a scoped
//! snapshot and moved into document coordinates before they leave the chain.

use super::fallback::{fuzzy, normalized, normalized_all, partial};
use super::{exact, haystack, prepare, section, Found};
use crate::anchor;
use crate::cache::SearchCache;
use crate::config::{EngineConfig, SearchOptions};
use crate::document::Document;
use crate::error::EngineError;
use crate::index::{Scope, Snapshot, TextNodeIndex};
use crate::types::{MatchResult, Strategy};
use std::sync::Arc;
use tracing::debug;

/// Cache key: the trimmed query plus every option that affects the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub options: SearchOptions,
}

#[derive(Debug)]
pub struct SearchChain {
    min_length: usize,
    max_length: usize,
    cache: SearchCache<CacheKey, MatchResult>,
    hits: u64,
    misses: u64,
}

impl SearchChain {
    pub fn new(config: &EngineConfig) -> Self {
        SearchChain {
            min_length: config.min_search_length,
            max_length: config.max_search_length,
            cache: SearchCache::new(config.cache_size),
            hits: 0,
            misses: 0,
        }
    }

    /// Trim the query and enforce the length bounds (in chars).
    pub fn validate<'q>(&self, text: &'q str) -> Result<&'q str, EngineError> {
        let query = text.trim();
        let len = query.chars().count();
        if len < self.min_length {
            return Err(EngineError::QueryTooShort {
                len,
                min: self.min_length,
            });
        }
        if len > self.max_length {
            return Err(EngineError::QueryTooLong {
                len,
                max: self.max_length,
            });
        }
        Ok(query)
    }

    /// Locate `text`, returning the first strategy's hit.
    pub fn find<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: &mut TextNodeIndex,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Option<MatchResult>, EngineError> {
        let query = self.validate(text)?;
        let key = CacheKey {
            query: query.to_string(),
            options: options.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            self.hits += 1;
            debug!(strategy = %cached.strategy, "search cache hit");
            return Ok(Some(cached.clone()));
        }
        self.misses += 1;

        let Some(found) = run(doc, index, query, options) else {
            debug!(len = query.chars().count(), "no strategy matched");
            return Ok(None);
        };
        let result = to_match(&found)?;
        debug!(strategy = %result.strategy, start = result.start, end = result.end, "match");
        self.cache.set(key, result.clone());
        Ok(Some(result))
    }

    /// Up to `max_results` non-overlapping matches of the literal query, or
    /// failing that, of the first normalized variant that has any.
    pub fn find_all<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: &mut TextNodeIndex,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<MatchResult>, EngineError> {
        let query = self.validate(text)?;
        let root = index.snapshot(doc, Scope::Subtree(doc.root()));
        let needle = prepare(query, options.case_sensitive);
        let hay = haystack(&root, options.case_sensitive);

        let mut strategy = Strategy::Exact;
        let mut spans = exact::find_all(hay, &needle, options.whole_words, options.max_results);
        if spans.is_empty() && !options.exact_match {
            strategy = Strategy::Normalized;
            spans = normalized_all(&root, query, options, options.max_results);
        }
        spans
            .into_iter()
            .map(|span| to_match(&Found::new(Arc::clone(&root), span, strategy)))
            .collect()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// The strategies, in order, without cache or validation.
pub fn run<D: Document + ?Sized>(
    doc: &D,
    index: &mut TextNodeIndex,
    query: &str,
    options: &SearchOptions,
) -> Option<Found> {
    let root = index.snapshot(doc, Scope::Subtree(doc.root()));
    let needle = prepare(query, options.case_sensitive);
    if let Some(hit) = exact::find(
        haystack(&root, options.case_sensitive),
        &needle,
        options.whole_words,
    ) {
        return Some(Found::new(root, hit, Strategy::Exact));
    }

    if let Some(name) = options.section.as_deref() {
        if let Some((scoped, span)) = section::find(doc, index, name, query, options) {
            return Some(match rebase(&scoped, &root, span) {
                Some(span) => Found::new(root, span, Strategy::Section),
                None => Found::new(scoped, span, Strategy::Section),
            });
        }
    }
    if options.exact_match {
        return None;
    }

    if let Some(span) = normalized(&root, query, options) {
        return Some(Found::new(root, span, Strategy::Normalized));
    }
    if let Some(span) = fuzzy(&root, query, options) {
        return Some(Found::new(root, span, Strategy::Fuzzy));
    }
    partial(&root, query, options).map(|span| Found::new(root, span, Strategy::Partial))
}

/// Move a span found in `scoped` into `root` coordinates. Each end is mapped
/// through the text node that holds it.
fn rebase(scoped: &Snapshot, root: &Snapshot, span: (usize, usize)) -> Option<(usize, usize)> {
    let to_root = |offset: usize| -> Option<usize> {
        let i = scoped.node_index_at(offset)?;
        let node = scoped.nodes()[i];
        let j = root.nodes().iter().position(|&n| n == node)?;
        Some(root.starts()[j] + offset - scoped.starts()[i])
    };
    let start = to_root(span.0)?;
    let end = to_root(span.1.checked_sub(1)?)? + 1;
    (start < end).then_some((start, end))
}

fn to_match(found: &Found) -> Result<MatchResult, EngineError> {
    let (start, end) = found
        .snapshot
        .tighten(found.start, found.end)
        .unwrap_or((found.start, found.end));
    let range = anchor::resolve(&found.snapshot, start, end)?;
    Ok(MatchResult {
        range,
        strategy: found.strategy,
        matched_text: found.snapshot.slice(start, end),
        start,
        end,
    })
}
