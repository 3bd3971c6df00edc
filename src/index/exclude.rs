// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The predicate deciding which subtrees hold no searchable content.

use crate::config::ExclusionRules;
use crate::document::{Document, ElementData};
use crate::types::NodeId;
use std::collections::HashSet;

/// Compiled form of [`ExclusionRules`].
#[derive(Debug, Clone, Default)]
pub struct Exclusion {
    tags: HashSet<String>,
    classes: HashSet<String>,
    skip_hidden: bool,
}

impl Exclusion {
    pub fn new(rules: &ExclusionRules) -> Self {
        Exclusion {
            tags: rules.tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
            classes: rules.classes.iter().cloned().collect(),
            skip_hidden: rules.skip_hidden,
        }
    }

    /// Whether this element's subtree is skipped.
    pub fn excludes(&self, data: &ElementData) -> bool {
        if self.tags.contains(&data.tag) {
            return true;
        }
        if self.skip_hidden && data.is_hidden() {
            return true;
        }
        data.classes().any(|class| self.classes.contains(class))
    }

    /// Whether `node` or any of its ancestors is excluded.
    pub fn excludes_chain<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if doc.element(id).is_some_and(|data| self.excludes(data)) {
                return true;
            }
            current = doc.parent(id);
        }
        false
    }
}
