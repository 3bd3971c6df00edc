// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text node index: flattened, cached views of document subtrees.
//!
//! Every strategy searches a [`Snapshot`], never the live tree. Snapshots are
//! cached per [`Scope`] and thrown away on three triggers:
//!
//! 1. **Push**: the host calls [`TextNodeIndex::invalidate`] after it mutates
//!    the document. Only scopes related to the mutated subtree are dropped.
//! 2. **TTL**: a snapshot older than the configured TTL is rebuilt.
//! 3. **Revalidation**: a cached snapshot whose nodes were detached or whose
//!    text changed is rebuilt on its next use.
//!
//! Correctness beats reuse: when in doubt the index rebuilds.

mod exclude;
mod snapshot;

pub use exclude::Exclusion;
pub use snapshot::Snapshot;

use crate::config::ExclusionRules;
use crate::document::Document;
use crate::types::NodeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// What part of the document a snapshot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The subtree rooted at this node.
    Subtree(NodeId),
    /// The siblings after this node, up to (not including) the next heading.
    FollowingSiblings(NodeId),
}

impl Scope {
    /// The node whose subtree contains everything this scope can see.
    pub fn container<D: Document + ?Sized>(self, doc: &D) -> NodeId {
        match self {
            Scope::Subtree(node) => node,
            Scope::FollowingSiblings(anchor) => doc.parent(anchor).unwrap_or(anchor),
        }
    }

    /// Roots to walk, in document order.
    fn roots<D: Document + ?Sized>(self, doc: &D) -> Vec<NodeId> {
        match self {
            Scope::Subtree(node) => vec![node],
            Scope::FollowingSiblings(anchor) => {
                let mut roots = Vec::new();
                let mut current = doc.next_sibling(anchor);
                while let Some(node) = current {
                    if doc.element(node).is_some_and(|data| data.heading_level().is_some()) {
                        break;
                    }
                    roots.push(node);
                    current = doc.next_sibling(node);
                }
                roots
            }
        }
    }
}

#[derive(Debug)]
pub struct TextNodeIndex {
    exclusion: Exclusion,
    ttl: Duration,
    entries: HashMap<Scope, Arc<Snapshot>>,
    builds: u64,
}

impl TextNodeIndex {
    pub fn new(rules: &ExclusionRules, ttl: Duration) -> Self {
        TextNodeIndex {
            exclusion: Exclusion::new(rules),
            ttl,
            entries: HashMap::new(),
            builds: 0,
        }
    }

    pub fn exclusion(&self) -> &Exclusion {
        &self.exclusion
    }

    /// Number of snapshots built since creation.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Number of cached scopes.
    pub fn cached_scopes(&self) -> usize {
        self.entries.len()
    }

    /// Build a fresh snapshot for `scope`, bypassing the cache.
    pub fn build<D: Document + ?Sized>(&mut self, doc: &D, scope: Scope) -> Snapshot {
        self.builds += 1;
        let stamp = self.builds;
        let anchor = match scope {
            Scope::Subtree(node) | Scope::FollowingSiblings(node) => node,
        };
        if !doc.is_attached(anchor) {
            debug!(?scope, "scope root detached, empty snapshot");
            return Snapshot::empty(scope, stamp);
        }
        let roots = scope.roots(doc);
        let snapshot = Snapshot::capture(doc, scope, &roots, &self.exclusion, stamp);
        debug!(
            ?scope,
            stamp,
            nodes = snapshot.nodes().len(),
            chars = snapshot.len(),
            "snapshot built"
        );
        snapshot
    }

    /// The cached snapshot for `scope`, rebuilt if it can no longer be trusted.
    pub fn snapshot<D: Document + ?Sized>(&mut self, doc: &D, scope: Scope) -> Arc<Snapshot> {
        if let Some(cached) = self.entries.get(&scope) {
            if cached.is_current(doc, self.ttl) {
                return Arc::clone(cached);
            }
            debug!(?scope, stamp = cached.stamp(), "snapshot stale");
        }
        let fresh = Arc::new(self.build(doc, scope));
        self.entries.insert(scope, Arc::clone(&fresh));
        fresh
    }

    /// Drop every cached scope that overlaps the subtree at `root`.
    ///
    /// A scope overlaps when its container is an ancestor or descendant of
    /// `root`, or is no longer attached. If `root` itself is detached its old
    /// position is unknown, so everything goes.
    pub fn invalidate<D: Document + ?Sized>(&mut self, doc: &D, root: NodeId) {
        if !doc.is_attached(root) {
            self.invalidate_all();
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|scope, _| {
            let container = scope.container(doc);
            doc.is_attached(container)
                && !doc.contains(container, root)
                && !doc.contains(root, container)
        });
        debug!(%root, dropped = before - self.entries.len(), "snapshots invalidated");
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(dropped = self.entries.len(), "all snapshots invalidated");
        }
        self.entries.clear();
    }
}
