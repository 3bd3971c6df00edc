// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The tolerant strategies: normalized variants, fuzzy windows, partial prefixes.
//!
//! All three reduce to the exact matcher over some view of the snapshot. None
//! of them touch the document; they return snapshot spans.

use super::exact;
use super::{haystack, prepare};
use crate::config::{
    SearchOptions, FUZZY_MIN_QUERY_LENGTH, PARTIAL_MAX_PREFIX, PARTIAL_MIN_PREFIX,
    PARTIAL_PREFIX_STEP,
};
use crate::contracts::check_projection_aligned;
use crate::index::Snapshot;
use crate::normalize::{apply_to_str, collapse, fold_char, Projection, VariantKind};
use tracing::debug;

// ============================================================================
// NORMALIZED
// ============================================================================

/// Kinds the normalized strategy tries, in order.
fn normalized_kinds(options: &SearchOptions) -> impl Iterator<Item = VariantKind> + '_ {
    VariantKind::ALL.iter().copied().filter(move |kind| {
        *kind != VariantKind::Original
            && (options.normalize_whitespace || !kind.touches_whitespace())
    })
}

/// A variant kind prepared for matching: query side and document side.
struct Prepared {
    kind: VariantKind,
    needle: Vec<char>,
    projection: Projection,
    haystack: Vec<char>,
}

fn prepare_kind(
    snapshot: &Snapshot,
    query: &str,
    kind: VariantKind,
    options: &SearchOptions,
) -> Option<Prepared> {
    let needle = prepare(&apply_to_str(kind, query), options.case_sensitive);
    if needle.is_empty() {
        return None;
    }
    let projection = Projection::new(kind, snapshot.chars());
    check_projection_aligned(&projection, snapshot.len());
    let haystack = if options.case_sensitive {
        projection.chars.clone()
    } else {
        projection.chars.iter().copied().map(fold_char).collect()
    };
    Some(Prepared {
        kind,
        needle,
        projection,
        haystack,
    })
}

/// Match a transformed query against the same transform of the snapshot.
///
/// The transform runs on both sides, so damage on either side is undone: a
/// straight-quoted query finds curly-quoted text and the reverse.
pub fn normalized(
    snapshot: &Snapshot,
    query: &str,
    options: &SearchOptions,
) -> Option<(usize, usize)> {
    normalized_within(snapshot, query, options, (0, snapshot.len()))
}

/// [`normalized`], keeping only hits that lie inside `window` (snapshot
/// offsets). Later occurrences of a variant are tried before the next kind.
pub fn normalized_within(
    snapshot: &Snapshot,
    query: &str,
    options: &SearchOptions,
    window: (usize, usize),
) -> Option<(usize, usize)> {
    for kind in normalized_kinds(options) {
        let Some(prepared) = prepare_kind(snapshot, query, kind, options) else {
            continue;
        };
        let mut from = 0;
        while let Some(start) =
            exact::find_from(&prepared.haystack, &prepared.needle, from, options.whole_words)
        {
            let end = start + prepared.needle.len();
            from = end;
            let Some(span) = prepared.projection.to_source(start, end) else {
                continue;
            };
            if span.0 >= window.1 {
                break;
            }
            if span.0 >= window.0 && span.1 <= window.1 {
                debug!(kind = prepared.kind.as_str(), "normalized variant matched");
                return Some(span);
            }
        }
    }
    None
}

/// Every normalized occurrence for the first kind that has any.
pub fn normalized_all(
    snapshot: &Snapshot,
    query: &str,
    options: &SearchOptions,
    limit: usize,
) -> Vec<(usize, usize)> {
    for kind in normalized_kinds(options) {
        let Some(prepared) = prepare_kind(snapshot, query, kind, options) else {
            continue;
        };
        let spans: Vec<(usize, usize)> = exact::find_all(
            &prepared.haystack,
            &prepared.needle,
            options.whole_words,
            limit,
        )
        .into_iter()
        .filter_map(|(start, end)| prepared.projection.to_source(start, end))
        .collect();
        if !spans.is_empty() {
            return spans;
        }
    }
    Vec::new()
}

// ============================================================================
// FUZZY SEGMENTS
// ============================================================================

/// Window start offsets over a query of `len` chars. The last window always
/// ends at `len`.
pub fn window_starts(len: usize, segment: usize, step: usize) -> Vec<usize> {
    if len <= segment {
        return vec![0];
    }
    let last = len - segment;
    let mut starts: Vec<usize> = (0..last).step_by(step.max(1)).collect();
    starts.push(last);
    starts
}

/// Find a window of the query, then try to grow it back to the full query.
///
/// The first window that matches decides the outcome. Its hit is expanded by
/// the window's distance from each end of the query; if the expanded span
/// reads as the query (exactly, or after collapsing whitespace) that span is
/// returned, otherwise the window alone is.
pub fn fuzzy(snapshot: &Snapshot, query: &str, options: &SearchOptions) -> Option<(usize, usize)> {
    let query_chars: Vec<char> = query.chars().collect();
    let len = query_chars.len();
    if len <= FUZZY_MIN_QUERY_LENGTH {
        return None;
    }
    let step = options.fuzzy_step()?;
    let segment = options.fuzzy_segment_length.min(len);
    let needle_all = prepare(query, options.case_sensitive);
    let hay = haystack(snapshot, options.case_sensitive);

    for window_start in window_starts(len, segment, step) {
        let window = &needle_all[window_start..window_start + segment];
        let Some((hit_start, hit_end)) = exact::find(hay, window, false) else {
            continue;
        };
        let left = window_start;
        let right = len - (window_start + segment);
        if let Some(span) = expand(hay, &needle_all, hit_start, hit_end, left, right) {
            debug!(window_start, "fuzzy window expanded to full query");
            return Some(span);
        }
        debug!(window_start, "fuzzy expansion failed, returning window");
        return Some((hit_start, hit_end));
    }
    None
}

fn expand(
    hay: &[char],
    needle: &[char],
    hit_start: usize,
    hit_end: usize,
    left: usize,
    right: usize,
) -> Option<(usize, usize)> {
    let start = hit_start.checked_sub(left)?;
    let end = hit_end + right;
    if end > hay.len() {
        return None;
    }
    let candidate = &hay[start..end];
    if candidate == needle {
        return Some((start, end));
    }
    let candidate: String = candidate.iter().collect();
    let needle: String = needle.iter().collect();
    (collapse(&candidate) == collapse(&needle)).then_some((start, end))
}

// ============================================================================
// PARTIAL PREFIXES
// ============================================================================

/// Prefix lengths to try for a query of `len` chars, longest first.
pub fn prefix_lengths(len: usize) -> Vec<usize> {
    if len < PARTIAL_MIN_PREFIX {
        return Vec::new();
    }
    let mut lengths = Vec::new();
    let mut current = len.min(PARTIAL_MAX_PREFIX);
    while current > PARTIAL_MIN_PREFIX {
        lengths.push(current);
        current = current.saturating_sub(PARTIAL_PREFIX_STEP);
    }
    lengths.push(PARTIAL_MIN_PREFIX);
    lengths.retain(|&l| l < len);
    lengths
}

/// Longest leading prefix of the query present in the snapshot.
pub fn partial(snapshot: &Snapshot, query: &str, options: &SearchOptions) -> Option<(usize, usize)> {
    let needle = prepare(query, options.case_sensitive);
    let hay = haystack(snapshot, options.case_sensitive);
    prefix_lengths(needle.len()).into_iter().find_map(|length| {
        let found = exact::find(hay, &needle[..length], false);
        if found.is_some() {
            debug!(length, "partial prefix matched");
        }
        found
    })
}
