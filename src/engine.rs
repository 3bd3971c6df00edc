// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The engine: one instance per document context.
//!
//! Holds the text index, the strategy chain with its cache, the applier and
//! the registry. The document itself is borrowed per call and never stored,
//! so the host stays free to mutate it between calls. After a mutation the
//! host should call [`Engine::invalidate`]; mutations made through the engine
//! invalidate on their own.
//!
//! ```text
//!   find_text ─▶ SearchChain ─▶ TextNodeIndex ─▶ Snapshot
//!                    │
//!                    ▼
//!               MatchResult ─▶ highlight_range ─▶ Applier ─▶ wrapper
//!                                                     │
//!                                                     ▼
//!                                            HighlightRegistry
//! ```

use crate::anchor;
use crate::config::{EngineConfig, SearchOptions};
use crate::document::Document;
use crate::error::EngineError;
use crate::highlight::{Applier, HighlightRegistry};
use crate::index::TextNodeIndex;
use crate::search::SearchChain;
use crate::types::{
    EngineStats, Highlight, HighlightMeta, HighlightPatch, HighlightSource, MatchResult, NodeId,
    TextRange,
};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    index: TextNodeIndex,
    chain: SearchChain,
    applier: Applier,
    registry: HighlightRegistry,
    next_id: u64,
}

impl Engine {
    /// Build an engine. The configuration is validated here and trusted after.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Engine {
            index: TextNodeIndex::new(&config.exclusion, config.snapshot_ttl()),
            chain: SearchChain::new(&config),
            applier: Applier::new(&config),
            registry: HighlightRegistry::new(),
            next_id: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Locate `text` in the document. `None` options take the config defaults.
    ///
    /// `Ok(None)` means no strategy matched; errors are only raised for
    /// queries outside the length bounds.
    pub fn find_text<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        text: &str,
        options: Option<&SearchOptions>,
    ) -> Result<Option<MatchResult>, EngineError> {
        let defaults;
        let options = match options {
            Some(options) => options,
            None => {
                defaults = self.config.search_options();
                &defaults
            }
        };
        self.chain.find(doc, &mut self.index, text, options)
    }

    /// Up to `max_results` non-overlapping matches, in document order.
    pub fn find_all_text<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        text: &str,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<MatchResult>, EngineError> {
        let defaults;
        let options = match options {
            Some(options) => options,
            None => {
                defaults = self.config.search_options();
                &defaults
            }
        };
        self.chain.find_all(doc, &mut self.index, text, options)
    }

    // =========================================================================
    // HIGHLIGHT LIFECYCLE
    // =========================================================================

    /// Wrap `range` and register the highlight.
    ///
    /// The range must still spell `meta.text`; otherwise the call fails with
    /// `StaleAnchor` and the document is left untouched.
    pub fn highlight_range<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        range: &TextRange,
        meta: HighlightMeta,
    ) -> Result<Highlight, EngineError> {
        if let Some(id) = meta.id.as_deref() {
            if self.registry.contains(id) {
                return Err(EngineError::invalid_range(format!(
                    "highlight id '{}' is already in use",
                    id
                )));
            }
        }

        anchor::validate(&*doc, range)?;
        let found = anchor::range_text(&*doc, range);
        if found != meta.text {
            warn!(id = ?meta.id, "range no longer spells the expected text");
            return Err(EngineError::StaleAnchor {
                expected: meta.text,
                found,
            });
        }
        let id = match meta.id {
            Some(id) => id,
            None => self.mint_id(),
        };

        let data = self
            .applier
            .wrapper_data(&id, &meta.property, &meta.color, meta.source);
        let wrapper = self.applier.apply(doc, range, data)?;

        let span = (0, found.chars().count());
        let highlight = Highlight {
            id,
            original_text: found.clone(),
            span,
            text: found,
            property: meta.property,
            color: meta.color,
            confidence: meta.confidence,
            section: meta.section,
            source: meta.source,
            boundary: wrapper,
        };
        self.registry.register(highlight.clone());
        debug!(id = %highlight.id, %wrapper, source = highlight.source.as_str(), "highlight applied");

        let touched = doc.parent(wrapper).unwrap_or(wrapper);
        self.invalidate(&*doc, touched);
        Ok(highlight)
    }

    /// Apply at a match, expecting the text the match was made on.
    pub fn highlight_match<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        found: &MatchResult,
        meta: HighlightMeta,
    ) -> Result<Highlight, EngineError> {
        let meta = HighlightMeta {
            text: found.matched_text.clone(),
            ..meta
        };
        self.highlight_range(doc, &found.range, meta)
    }

    /// Find `text` and highlight the first match. `Ok(None)` when nothing
    /// matched.
    pub fn highlight_text<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        text: &str,
        options: Option<&SearchOptions>,
        meta: HighlightMeta,
    ) -> Result<Option<Highlight>, EngineError> {
        let Some(found) = self.find_text(&*doc, text, options)? else {
            return Ok(None);
        };
        self.highlight_match(doc, &found, meta).map(Some)
    }

    /// Unwrap a highlight, restoring the text it covered.
    ///
    /// Returns false for unknown ids. A highlight whose wrapper the host has
    /// already removed is dropped from the registry and counts as removed.
    pub fn remove_highlight<D: Document + ?Sized>(&mut self, doc: &mut D, id: &str) -> bool {
        let Some(highlight) = self.registry.get(id) else {
            return false;
        };
        let wrapper = highlight.boundary;
        let expected = highlight.text.clone();

        if !doc.is_attached(wrapper) {
            debug!(%id, %wrapper, "wrapper already gone, unregistering");
            self.registry.unregister(id);
            return true;
        }

        let parent = doc.parent(wrapper).unwrap_or_else(|| doc.root());
        let restored = match self.applier.remove(doc, wrapper) {
            Ok(restored) => restored,
            Err(err) => {
                warn!(%id, error = %err, "failed to unwrap highlight");
                return false;
            }
        };
        if restored != expected && restored.contains(&expected) {
            let leak = EngineError::DecorationLeak {
                id: id.to_string(),
                leaked: restored.replacen(&expected, "", 1),
            };
            warn!(error = %leak, "decoration text kept in reconstruction");
        }

        self.registry.unregister(id);
        debug!(%id, "highlight removed");
        self.invalidate(&*doc, parent);
        true
    }

    /// Re-slice a highlight to `[start, end)` of the text it covered when it
    /// was created. Same id, fresh wrapper. A shrink can be grown back.
    pub fn resize_highlight<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        id: &str,
        start: usize,
        end: usize,
    ) -> Result<Option<Highlight>, EngineError> {
        let Some(highlight) = self.registry.get(id) else {
            return Ok(None);
        };
        let wrapper = highlight.boundary;
        let held = highlight.span;
        let original = highlight.original_text.clone();
        if !doc.is_attached(wrapper) {
            return Err(EngineError::invalid_range(format!(
                "wrapper of '{}' is no longer in the document",
                id
            )));
        }
        let parent = doc.parent(wrapper).unwrap_or_else(|| doc.root());
        let (fresh, text) = self
            .applier
            .resize(doc, wrapper, &original, held, (start, end))?;
        let updated = self.registry.rebind(id, fresh, text, (start, end)).cloned();
        debug!(%id, start, end, "highlight resized");
        self.invalidate(&*doc, parent);
        Ok(updated)
    }

    /// Change property, color or confidence. The wrapper's attributes follow.
    pub fn update_highlight<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        id: &str,
        patch: HighlightPatch,
    ) -> Option<Highlight> {
        let highlight = self.registry.get_mut(id)?;
        if let Some(property) = patch.property {
            highlight.property = property;
        }
        if let Some(color) = patch.color {
            highlight.color = color;
        }
        if patch.confidence.is_some() {
            highlight.confidence = patch.confidence;
        }
        let highlight = highlight.clone();
        if !self.applier.write_attrs(doc, &highlight) {
            debug!(%id, "wrapper gone, attributes not rewritten");
        }
        Some(highlight)
    }

    /// Remove every highlight. Returns how many were removed.
    pub fn clear_highlights<D: Document + ?Sized>(&mut self, doc: &mut D) -> usize {
        let mut removed = 0;
        for id in self.registry.ids() {
            if self.remove_highlight(doc, &id) {
                removed += 1;
            }
        }
        removed
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get_highlight(&self, id: &str) -> Option<&Highlight> {
        self.registry.get(id)
    }

    /// Every highlight, oldest first.
    pub fn get_all_highlights(&self) -> Vec<&Highlight> {
        self.registry.all()
    }

    pub fn get_highlight_count(&self) -> usize {
        self.registry.len()
    }

    pub fn get_highlights_by_type(&self, source: HighlightSource) -> Vec<&Highlight> {
        self.registry.by_source(source)
    }

    /// The highlight whose wrapper is `node` or one of its ancestors.
    pub fn highlight_at<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> Option<&Highlight> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(found) = self.registry.find_by_element(id) {
                return self.registry.get(found);
            }
            current = doc.parent(id);
        }
        None
    }

    // =========================================================================
    // INVALIDATION
    // =========================================================================

    /// The document under `root` changed: drop related snapshots and every
    /// cached search result.
    pub fn invalidate<D: Document + ?Sized>(&mut self, doc: &D, root: NodeId) {
        self.index.invalidate(doc, root);
        self.chain.clear_cache();
    }

    pub fn invalidate_all(&mut self) {
        self.index.invalidate_all();
        self.chain.clear_cache();
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            snapshot_builds: self.index.builds(),
            cache_hits: self.chain.hits(),
            cache_misses: self.chain.misses(),
            highlights: self.registry.len(),
        }
    }

    fn mint_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{}-{}", self.config.id_prefix, self.next_id);
            if !self.registry.contains(&id) {
                return id;
            }
        }
    }
}
