// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Literal substring search over char slices.
//!
//! Both sides arrive already folded (or not) by the caller, so this module
//! never thinks about case. Whole-word matching follows `\b` semantics: a
//! boundary sits between a word char and a non-word char, and the slice edges
//! count as non-word.

/// Letters, digits and underscore.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn at_boundary(haystack: &[char], position: usize) -> bool {
    let before = position
        .checked_sub(1)
        .and_then(|i| haystack.get(i))
        .is_some_and(|&c| is_word_char(c));
    let after = haystack.get(position).is_some_and(|&c| is_word_char(c));
    before != after
}

/// First occurrence of `needle` at or after `from`.
pub fn find_from(
    haystack: &[char],
    needle: &[char],
    from: usize,
    whole_words: bool,
) -> Option<usize> {
    let first = *needle.first()?;
    if needle.len() > haystack.len() {
        return None;
    }
    let last_start = haystack.len() - needle.len();
    let mut position = from;
    while position <= last_start {
        let offset = haystack[position..=last_start]
            .iter()
            .position(|&c| c == first)?;
        position += offset;
        if haystack[position..position + needle.len()] == *needle
            && (!whole_words
                || (at_boundary(haystack, position)
                    && at_boundary(haystack, position + needle.len())))
        {
            return Some(position);
        }
        position += 1;
    }
    None
}

/// First occurrence as a `[start, end)` span.
pub fn find(haystack: &[char], needle: &[char], whole_words: bool) -> Option<(usize, usize)> {
    find_from(haystack, needle, 0, whole_words).map(|start| (start, start + needle.len()))
}

/// Up to `limit` non-overlapping occurrences, left to right.
pub fn find_all(
    haystack: &[char],
    needle: &[char],
    whole_words: bool,
    limit: usize,
) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut from = 0;
    while spans.len() < limit {
        match find_from(haystack, needle, from, whole_words) {
            Some(start) => {
                let end = start + needle.len();
                spans.push((start, end));
                from = end;
            }
            None => break,
        }
    }
    spans
}
