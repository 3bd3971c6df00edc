// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Textual variants of a query, and the same transforms applied to documents.
//!
//! Text copied out of a page rarely survives the trip intact: curly quotes
//! become straight, a hyphenated line break becomes `word-\nword`, runs of
//! spaces collapse. Each `VariantKind` undoes one of those.
//!
//! The catch is that the damage can be on either side. A query with straight
//! quotes has to find a document with curly ones too, so every transform is
//! written over a stream of `(char, origin)` pairs. Run it over the query and
//! you get the variant text; run it over a snapshot and you get a
//! [`Projection`] whose `origin` table maps every projected char back to the
//! snapshot offset it came from.
//!
//! # Variant order
//!
//! | # | Kind          | Transform                                      |
//! |---|---------------|------------------------------------------------|
//! | 1 | `Original`    | none                                           |
//! | 2 | `Quotes`      | smart quotes → ASCII quotes                    |
//! | 3 | `Whitespace`  | whitespace runs → one space, trimmed           |
//! | 4 | `Punctuation` | punctuation dropped, then whitespace collapsed |
//! | 5 | `Dehyphenate` | `word-\nword` → `wordword`, soft hyphens gone  |
//! | 6 | `Linebreaks`  | line breaks → spaces                           |
//! | 7 | `Diacritics`  | NFD, combining marks dropped (feature-gated)   |

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// One normalization transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Original,
    Quotes,
    Whitespace,
    Punctuation,
    Dehyphenate,
    Linebreaks,
    #[cfg(feature = "unicode-normalization")]
    Diacritics,
}

impl VariantKind {
    /// Every kind, in variant order.
    pub const ALL: &'static [VariantKind] = &[
        VariantKind::Original,
        VariantKind::Quotes,
        VariantKind::Whitespace,
        VariantKind::Punctuation,
        VariantKind::Dehyphenate,
        VariantKind::Linebreaks,
        #[cfg(feature = "unicode-normalization")]
        VariantKind::Diacritics,
    ];

    /// Kinds that rewrite whitespace; skipped when whitespace normalization is off.
    pub fn touches_whitespace(self) -> bool {
        matches!(
            self,
            VariantKind::Whitespace | VariantKind::Punctuation | VariantKind::Linebreaks
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Original => "original",
            VariantKind::Quotes => "quotes",
            VariantKind::Whitespace => "whitespace",
            VariantKind::Punctuation => "punctuation",
            VariantKind::Dehyphenate => "dehyphenate",
            VariantKind::Linebreaks => "linebreaks",
            #[cfg(feature = "unicode-normalization")]
            VariantKind::Diacritics => "diacritics",
        }
    }

    fn apply(self, input: Vec<(char, usize)>) -> Vec<(char, usize)> {
        match self {
            VariantKind::Original => input,
            VariantKind::Quotes => input
                .into_iter()
                .map(|(c, origin)| (ascii_quote(c), origin))
                .collect(),
            VariantKind::Whitespace => collapse_whitespace(input),
            VariantKind::Punctuation => collapse_whitespace(
                input
                    .into_iter()
                    .filter(|(c, _)| !is_punctuation(*c))
                    .collect(),
            ),
            VariantKind::Dehyphenate => dehyphenate(input),
            VariantKind::Linebreaks => flatten_linebreaks(input),
            #[cfg(feature = "unicode-normalization")]
            VariantKind::Diacritics => strip_diacritics(input),
        }
    }
}

/// A query variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub kind: VariantKind,
    pub text: String,
}

/// Distinct variants of `text`, original first.
pub fn variants(text: &str) -> Vec<Variant> {
    variants_with(text, true)
}

/// Distinct variants of `text`, optionally without the whitespace-rewriting kinds.
pub fn variants_with(text: &str, normalize_whitespace: bool) -> Vec<Variant> {
    let mut out: Vec<Variant> = Vec::with_capacity(VariantKind::ALL.len());
    for &kind in VariantKind::ALL {
        if !normalize_whitespace && kind.touches_whitespace() {
            continue;
        }
        let variant = apply_to_str(kind, text);
        if kind == VariantKind::Original || !out.iter().any(|v| v.text == variant) {
            out.push(Variant {
                kind,
                text: variant,
            });
        }
    }
    out
}

/// Apply one transform to a plain string.
pub fn apply_to_str(kind: VariantKind, text: &str) -> String {
    let stream: Vec<(char, usize)> = text.chars().enumerate().map(|(i, c)| (c, i)).collect();
    kind.apply(stream).into_iter().map(|(c, _)| c).collect()
}

/// Text under a transform, with a map back to source char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub chars: Vec<char>,
    /// `origin[i]` is the source offset of `chars[i]`.
    pub origin: Vec<usize>,
}

impl Projection {
    pub fn new(kind: VariantKind, source: &[char]) -> Self {
        let stream: Vec<(char, usize)> = source.iter().copied().zip(0..).collect();
        let (chars, origin) = kind.apply(stream).into_iter().unzip();
        Projection { chars, origin }
    }

    /// Map a projected span `[start, end)` back to a source span.
    ///
    /// The source span starts at the first projected char's origin and ends
    /// just past the last one's, so collapsed runs inside the match are
    /// covered in full.
    pub fn to_source(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.origin.len() {
            return None;
        }
        Some((self.origin[start], self.origin[end - 1] + 1))
    }
}

/// Case folding that keeps one char per char, so offsets survive it.
#[inline]
pub fn fold_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    c.to_lowercase().next().unwrap_or(c)
}

/// Whitespace collapsed and trimmed; the cheap comparison used when
/// verifying fuzzy expansions.
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// TRANSFORMS
// ============================================================================

fn ascii_quote(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2039}'
        | '\u{203A}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => '"',
        _ => c,
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{00A1}' | '\u{00AB}' | '\u{00BB}' | '\u{00BF}' |
            '\u{2010}'..='\u{2027}' |  // dashes, quotes, bullets, ellipsis
            '\u{2030}'..='\u{205E}' |  // primes, guillemets, misc
            '\u{3001}' | '\u{3002}'    // ideographic comma and full stop
        )
}

fn collapse_whitespace(input: Vec<(char, usize)>) -> Vec<(char, usize)> {
    let mut out: Vec<(char, usize)> = Vec::with_capacity(input.len());
    let mut pending: Option<usize> = None;
    for (c, origin) in input {
        if c.is_whitespace() {
            pending.get_or_insert(origin);
            continue;
        }
        if let Some(space_origin) = pending.take() {
            if !out.is_empty() {
                out.push((' ', space_origin));
            }
        }
        out.push((c, origin));
    }
    out
}

fn dehyphenate(input: Vec<(char, usize)>) -> Vec<(char, usize)> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let (c, origin) = input[i];
        if c == '\u{00AD}' {
            i += 1;
            continue;
        }
        if c == '-' {
            // hyphen, optional trailing blanks, a line break, optional indent
            let mut j = i + 1;
            while j < input.len() && matches!(input[j].0, ' ' | '\t') {
                j += 1;
            }
            let mut broke = false;
            if j < input.len() && input[j].0 == '\r' {
                j += 1;
                broke = true;
            }
            if j < input.len() && input[j].0 == '\n' {
                j += 1;
                broke = true;
            }
            if broke {
                while j < input.len() && matches!(input[j].0, ' ' | '\t') {
                    j += 1;
                }
                i = j;
                continue;
            }
        }
        out.push((c, origin));
        i += 1;
    }
    out
}

fn flatten_linebreaks(input: Vec<(char, usize)>) -> Vec<(char, usize)> {
    let mut out = Vec::with_capacity(input.len());
    let mut previous_cr = false;
    for (c, origin) in input {
        match c {
            '\n' if previous_cr => {}
            '\r' | '\n' | '\u{2028}' | '\u{2029}' => out.push((' ', origin)),
            _ => out.push((c, origin)),
        }
        previous_cr = c == '\r';
    }
    out
}

#[cfg(feature = "unicode-normalization")]
fn strip_diacritics(input: Vec<(char, usize)>) -> Vec<(char, usize)> {
    let mut out = Vec::with_capacity(input.len());
    for (c, origin) in input {
        if c.is_ascii() {
            out.push((c, origin));
            continue;
        }
        for decomposed in std::iter::once(c).nfd() {
            if !is_combining_mark(decomposed) {
                out.push((decomposed, origin));
            }
        }
    }
    out
}

/// Combining marks (Unicode category Mn) in the blocks that matter for Latin,
/// Devanagari and Telugu text.
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{0900}'..='\u{0903}' |  // Devanagari signs
        '\u{093A}'..='\u{094F}' |  // Devanagari vowel signs
        '\u{0C00}'..='\u{0C04}' |  // Telugu signs
        '\u{0C3E}'..='\u{0C56}' |  // Telugu vowel signs
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
