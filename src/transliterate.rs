//! Latin transliteration and search-key folding.
//!
//! Window and tab titles routinely mix scripts; the search engine matches on
//! a Latin-only, lowercase, diacritic-free key so that "zhong" finds "中文"
//! and "cafe" finds "Café". Transliteration is deterministic and infallible:
//! anything that cannot be rendered simply drops out of the key.

use std::borrow::Cow;

use deunicode::deunicode;

/// Unicode ranges for Han ideographs (CJK Unified Ideographs and the
/// extension/compatibility blocks browsers actually emit in titles).
fn is_han(c: char) -> bool {
    matches!(
        c as u32,
        0x3400..=0x4DBF       // Extension A
        | 0x4E00..=0x9FFF     // Unified Ideographs
        | 0xF900..=0xFAFF     // Compatibility Ideographs
        | 0x20000..=0x2A6DF   // Extension B
        | 0x2A700..=0x2EBEF   // Extensions C-F
    )
}

pub fn contains_han(s: &str) -> bool {
    s.chars().any(is_han)
}

/// Render Han text as a Latin phonetic form with word-separating spaces;
/// identity for anything else.
pub fn transliterate(s: &str) -> Cow<'_, str> {
    if contains_han(s) {
        Cow::Owned(collapse_whitespace(&deunicode(s)))
    } else {
        Cow::Borrowed(s)
    }
}

/// The match key: Latin rendering, diacritics stripped, lowercased.
/// Both query terms and search fragments go through this before comparison.
pub fn fold(s: &str) -> String {
    deunicode(s).to_lowercase()
}

/// Transliterate, then reduce to alphanumeric words. Used for the "loose"
/// title fragments so punctuation never blocks a match.
pub fn loose_words(s: &str) -> String {
    let latin = transliterate(s);
    let spaced: String = latin
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&spaced)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
