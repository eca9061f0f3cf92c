//! Candidate scoring heuristic.
//!
//! Ranks Japanese name candidates by script composition. Native orthography
//! (kana, kana mixed with kanji) scores high; untranslated romaji and bare
//! kanji score low.

use std::sync::LazyLock;

use regex::Regex;

use crate::script::{all_chars, any_char, is_kana, is_kana_or_prolonged, is_kanji, is_katakana};

/// A `(...)` qualifier with at least one character inside.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]+\)").expect("valid parenthetical regex"));

pub const SCORE_KATAKANA: i32 = 10;
pub const SCORE_KANA_MIX: i32 = 8;
pub const SCORE_KANJI_KANA: i32 = 9;
pub const SCORE_PARENTHETICAL: i32 = 6;
pub const SCORE_ROMAJI: i32 = -10;
pub const SCORE_KANJI_ONLY: i32 = -8;

/// Checks whether a candidate carries a disambiguating qualifier in parentheses.
///
/// # Examples
///
/// ```
/// use transchara::scorer::has_parenthetical;
///
/// assert!(has_parenthetical("shiro(whitey)"));
/// assert!(!has_parenthetical("shiro()"));
/// assert!(!has_parenthetical("shiro"));
/// ```
pub fn has_parenthetical(name: &str) -> bool {
    PARENTHETICAL.is_match(name)
}

fn is_romaji(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scores a candidate name. The first matching rule wins.
///
/// # Examples
///
/// ```
/// use transchara::scorer::score;
///
/// assert_eq!(score("シロ"), 10);
/// assert_eq!(score("しろ"), 8);
/// assert_eq!(score("白ひよこ"), 9);
/// assert_eq!(score("shiro"), -10);
/// ```
pub fn score(name: &str) -> i32 {
    if all_chars(name, is_katakana) {
        SCORE_KATAKANA
    } else if all_chars(name, is_kana_or_prolonged) {
        SCORE_KANA_MIX
    } else if any_char(name, is_kanji) && any_char(name, is_kana) {
        SCORE_KANJI_KANA
    } else if has_parenthetical(name) {
        SCORE_PARENTHETICAL
    } else if all_chars(name, is_romaji) {
        SCORE_ROMAJI
    } else if any_char(name, is_kanji) {
        // Kana presence was already ruled out above
        SCORE_KANJI_ONLY
    } else {
        0
    }
}

/// Picks the highest scoring candidate; ties keep the earliest one.
pub fn best_candidate<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, i32)> = None;
    for name in candidates {
        let s = score(name);
        match best {
            Some((_, top)) if top >= s => {}
            _ => best = Some((name, s)),
        }
    }
    best.map(|(name, _)| name)
}
