//! Japanese script classification over Unicode code-point ranges.
//!
//! Ranges are kept as explicit tables so the classification stays a pure
//! function of the code point.

use std::ops::RangeInclusive;

/// Katakana letters ァ..ン, plus ヴ and the prolonged sound mark ー.
const KATAKANA: &[RangeInclusive<char>] = &[
    '\u{30A1}'..='\u{30F3}',
    '\u{30F4}'..='\u{30F4}',
    '\u{30FC}'..='\u{30FC}',
];

/// Hiragana letters ぁ..ん.
const HIRAGANA: &[RangeInclusive<char>] = &['\u{3041}'..='\u{3093}'];

/// Plain kana letters ぁ..ん and ァ..ン; neither ヴ nor ー.
const KANA_LETTERS: &[RangeInclusive<char>] = &['\u{3041}'..='\u{3093}', '\u{30A1}'..='\u{30F3}'];

pub const PROLONGED_SOUND_MARK: char = '\u{30FC}';

/// CJK Unified Ideographs block.
const KANJI: &[RangeInclusive<char>] = &['\u{4E00}'..='\u{9FFF}'];

/// Script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Katakana,
    Hiragana,
    Kanji,
    Other,
}

fn in_table(table: &[RangeInclusive<char>], c: char) -> bool {
    table.iter().any(|range| range.contains(&c))
}

pub fn classify(c: char) -> Script {
    if in_table(KATAKANA, c) {
        Script::Katakana
    } else if in_table(HIRAGANA, c) {
        Script::Hiragana
    } else if in_table(KANJI, c) {
        Script::Kanji
    } else {
        Script::Other
    }
}

pub fn is_katakana(c: char) -> bool {
    classify(c) == Script::Katakana
}

pub fn is_hiragana(c: char) -> bool {
    classify(c) == Script::Hiragana
}

/// Hiragana or katakana letter, excluding ヴ and the prolonged sound mark.
pub fn is_kana(c: char) -> bool {
    in_table(KANA_LETTERS, c)
}

/// A kana letter or ー.
pub fn is_kana_or_prolonged(c: char) -> bool {
    is_kana(c) || c == PROLONGED_SOUND_MARK
}

pub fn is_kanji(c: char) -> bool {
    classify(c) == Script::Kanji
}

/// True when `text` is non-empty and every character satisfies `pred`.
pub fn all_chars(text: &str, pred: impl Fn(char) -> bool) -> bool {
    !text.is_empty() && text.chars().all(pred)
}

/// True when at least one character of `text` satisfies `pred`.
pub fn any_char(text: &str, pred: impl Fn(char) -> bool) -> bool {
    text.chars().any(pred)
}
