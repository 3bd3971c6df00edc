// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The strategy chain: exact → section → normalized → fuzzy → partial.
//!
//! Each strategy is more tolerant than the one before it, and more expensive.
//! The chain runs them in that fixed order and stops at the first hit, so a
//! query that survives the copy/paste trip intact never pays for the
//! tolerant passes.
//!
//! | # | Strategy     | Runs when                 | Finds                              |
//! |---|--------------|---------------------------|------------------------------------|
//! | 1 | `exact`      | always                    | the literal query                  |
//! | 2 | `section`    | `section` option set      | query or variant inside a section  |
//! | 3 | `normalized` | not `exact_match`         | a variant, matched both directions |
//! | 4 | `fuzzy`      | query > 60 chars          | a window, expanded if it verifies  |
//! | 5 | `partial`    | query ≥ 20 chars          | the longest matching prefix        |
//!
//! Strategies work purely in snapshot coordinates and hand back [`Found`].
//! The chain turns that into a [`MatchResult`](crate::types::MatchResult).

pub mod chain;
pub mod exact;
pub mod fallback;
pub mod section;

pub use chain::{CacheKey, SearchChain};

use crate::index::Snapshot;
use crate::normalize::fold_char;
use crate::types::Strategy;
use std::sync::Arc;

/// A hit in snapshot coordinates.
#[derive(Debug, Clone)]
pub struct Found {
    pub snapshot: Arc<Snapshot>,
    pub start: usize,
    pub end: usize,
    pub strategy: Strategy,
}

impl Found {
    pub fn new(snapshot: Arc<Snapshot>, span: (usize, usize), strategy: Strategy) -> Self {
        Found {
            snapshot,
            start: span.0,
            end: span.1,
            strategy,
        }
    }
}

/// Query chars ready for comparison: folded unless matching is case-sensitive.
pub(crate) fn prepare(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars().map(fold_char).collect()
    }
}

/// The snapshot view matching [`prepare`].
pub(crate) fn haystack(snapshot: &Snapshot, case_sensitive: bool) -> &[char] {
    if case_sensitive {
        snapshot.chars()
    } else {
        snapshot.folded()
    }
}
