// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the anchoring core.
//!
//! Debug-mode assertions over the structures everything else trusts:
//!
//! 1. **Zero-cost in release builds** (`debug_assert!`)
//! 2. **Early failure** in tests, at the point the structure was built
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function              | Property                                       |
//! |--------------------------------|------------------------------------------------|
//! | `check_snapshot_well_formed`   | offset table strictly increasing, views aligned |
//! | `check_range_ordered`          | resolved start never after resolved end        |
//! | `check_projection_aligned`     | one origin per projected char, non-decreasing  |
//! | `check_registry_consistent`    | secondary indices agree with the primary map   |
//! | `check_cache_bounded`          | cache never exceeds its capacity               |

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

const _: () = {
    use crate::config::*;

    // Prefix ladder must be walkable: 60, 50, ..., 20.
    assert!(PARTIAL_MIN_PREFIX <= PARTIAL_MAX_PREFIX);
    assert!(PARTIAL_PREFIX_STEP > 0);
    assert!((PARTIAL_MAX_PREFIX - PARTIAL_MIN_PREFIX) % PARTIAL_PREFIX_STEP == 0);

    // Default fuzzy windows must slide forward.
    assert!(DEFAULT_FUZZY_SEGMENT_OVERLAP < DEFAULT_FUZZY_SEGMENT_LENGTH);

    assert!(DEFAULT_MIN_SEARCH_LENGTH <= DEFAULT_MAX_SEARCH_LENGTH);
};

use crate::index::Snapshot;
use crate::normalize::Projection;
use crate::types::TextRange;

// ============================================================================
// SNAPSHOT CONTRACTS
// ============================================================================

/// Check that a snapshot's offset table and text views agree.
///
/// # Panics (debug builds only)
/// Panics if `starts` is not strictly increasing from 0, if `nodes` and
/// `starts` differ in length, or if the char and folded views differ in length.
#[inline]
pub fn check_snapshot_well_formed(snapshot: &Snapshot) {
    let starts = snapshot.starts();
    debug_assert_eq!(
        starts.len(),
        snapshot.nodes().len(),
        "Contract violation: one start offset per node"
    );
    debug_assert_eq!(
        snapshot.chars().len(),
        snapshot.folded().len(),
        "Contract violation: folded view must stay offset-aligned"
    );
    if let Some(&first) = starts.first() {
        debug_assert_eq!(first, 0, "Contract violation: starts[0] must be 0");
    }
    for window in starts.windows(2) {
        debug_assert!(
            window[0] < window[1],
            "Contract violation: starts not strictly increasing ({} then {})",
            window[0],
            window[1]
        );
    }
    if let Some(&last) = starts.last() {
        debug_assert!(
            last < snapshot.len(),
            "Contract violation: last node starts at {} but text has {} chars",
            last,
            snapshot.len()
        );
    }
}

// ============================================================================
// RANGE CONTRACTS
// ============================================================================

/// Check a freshly resolved range.
///
/// `first` and `last` are the snapshot node indices of the two ends.
#[inline]
pub fn check_range_ordered(first: usize, last: usize, range: &TextRange) {
    debug_assert!(
        first <= last,
        "Contract violation: start node index {} after end node index {}",
        first,
        last
    );
    if range.is_single_node() {
        debug_assert!(
            range.start.offset < range.end.offset,
            "Contract violation: empty single-node range {}..{}",
            range.start.offset,
            range.end.offset
        );
    }
}

// ============================================================================
// PROJECTION CONTRACTS
// ============================================================================

/// Check that a projection can be mapped back to its source.
#[inline]
pub fn check_projection_aligned(projection: &Projection, source_len: usize) {
    debug_assert_eq!(
        projection.chars.len(),
        projection.origin.len(),
        "Contract violation: projection needs one origin per char"
    );
    for window in projection.origin.windows(2) {
        debug_assert!(
            window[0] <= window[1],
            "Contract violation: projection origins go backwards ({} then {})",
            window[0],
            window[1]
        );
    }
    if let Some(&last) = projection.origin.last() {
        debug_assert!(
            last < source_len,
            "Contract violation: origin {} outside source of {} chars",
            last,
            source_len
        );
    }
}

// ============================================================================
// REGISTRY / CACHE CONTRACTS
// ============================================================================

/// Check that the registry's secondary indices cover exactly the primary map.
#[inline]
pub fn check_registry_consistent(primary: usize, by_source: usize, by_element: usize) {
    debug_assert_eq!(
        primary, by_source,
        "Contract violation: {} highlights but {} in the source index",
        primary, by_source
    );
    debug_assert_eq!(
        primary, by_element,
        "Contract violation: {} highlights but {} in the element index",
        primary, by_element
    );
}

#[inline]
pub fn check_cache_bounded(len: usize, capacity: usize) {
    debug_assert!(
        len <= capacity,
        "Contract violation: cache holds {} entries, capacity {}",
        len,
        capacity
    );
}
