//! Embedded Unicode property data.
//!
//! Grounded in the teacher's `ucd.rs`, which reads UCD-derived JSON files
//! through `serde_json` behind `lazy_static!`. This crate has no `resources/`
//! directory to read from at runtime, so the JSON is embedded at compile
//! time with `include_str!` instead of opened from disk, and parsed into the
//! same shapes the first time each table is touched.
//!
//! The data is a curated subset (ASCII, Latin-1 Supplement, Latin Extended
//! A/B, the common combining diacritics, Greek, Cyrillic, a slice of
//! Hebrew points, ligatures, Roman numerals) rather than a full UCD
//! extraction; see `DESIGN.md` for the rationale and exact coverage. Word-
//! and sentence-break classification is range-based plain Rust rather than a
//! giant generated table, since those properties partition the code space
//! into broad script-level bands.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Bit flags describing a decomposition's compatibility class, mirroring
/// `enum udecomp_type` in `original_source/src/unicode.h`. `0` is canonical.
pub const DECOMP_COMPAT: u32 = 1 << 15;

lazy_static! {
    /// code point -> (compat flags, decomposition sequence). Canonical
    /// (non-compat) entries have flags `0`.
    pub static ref DECOMPOSITION_MAPPINGS: HashMap<u32, (u32, Vec<u32>)> = {
        let raw: Vec<(u32, u32, Vec<u32>)> =
            serde_json::from_str(include_str!("../data/decomposition_mappings.json"))
                .expect("embedded decomposition_mappings.json is well-formed");
        raw.into_iter().map(|(cp, flags, seq)| (cp, (flags, seq))).collect()
    };

    /// Primary (non-exclusion) canonical composites, derived from the
    /// canonical subset of `DECOMPOSITION_MAPPINGS`: `(starter, combiner) ->
    /// composed`. Built lazily instead of hand-duplicated, the way
    /// `PRIMARY_COMPOSITES` is derived from `DECOMPOSITION_MAPPINGS` plus the
    /// composition-exclusion list in the full algorithm (this curated table
    /// carries no exclusions, so every canonical two-code-point mapping
    /// composes back).
    pub static ref PRIMARY_COMPOSITES: HashMap<(u32, u32), u32> = {
        let mut m = HashMap::new();
        for (&cp, (flags, seq)) in DECOMPOSITION_MAPPINGS.iter() {
            if *flags == 0 && seq.len() == 2 {
                m.insert((seq[0], seq[1]), cp);
            }
        }
        m
    };

    pub static ref COMBINING_CLASSES: HashMap<u32, u8> = {
        let raw: Vec<(u32, u8)> =
            serde_json::from_str(include_str!("../data/combining_class.json"))
                .expect("embedded combining_class.json is well-formed");
        raw.into_iter().collect()
    };

    pub static ref CASE_FOLDING: HashMap<u32, Vec<u32>> = {
        let raw: Vec<(u32, Vec<u32>)> =
            serde_json::from_str(include_str!("../data/case_folding.json"))
                .expect("embedded case_folding.json is well-formed");
        raw.into_iter().collect()
    };

    /// Curly quotes, guillemets, and similar punctuation folded down to a
    /// plain ASCII quote by the type map's `MAPQUOTE` transform.
    pub static ref QUOTE_FOLDING: HashMap<u32, u32> = {
        let raw: Vec<(u32, u32)> =
            serde_json::from_str(include_str!("../data/quote_folding.json"))
                .expect("embedded quote_folding.json is well-formed");
        raw.into_iter().collect()
    };

    /// Inclusive `(lo, hi)` ranges of `Default_Ignorable_Code_Point`.
    pub static ref DEFAULT_IGNORABLE_RANGES: Vec<(u32, u32)> =
        serde_json::from_str(include_str!("../data/default_ignorable.json"))
            .expect("embedded default_ignorable.json is well-formed");
}

pub fn is_default_ignorable(cp: u32) -> bool {
    DEFAULT_IGNORABLE_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Coarse word-break property, grounded in `original_source/src/wordscan.h`'s
/// `word_type` enum (there: `NEWLINE, ZWJ, EBASE, ALETTER, NUMERIC, EXTEND,
/// HEBREW, KATAKANA, REGIONAL, OTHER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBreakProp {
    Newline,
    Cr,
    Lf,
    Zwj,
    ExtendedPictographic,
    RegionalIndicator,
    Katakana,
    Hebrew,
    ALetter,
    Numeric,
    MidLetter,
    MidNum,
    MidNumLet,
    Extend,
    Format,
    Single,
    Sp,
    Other,
}

pub fn word_break_prop(cp: u32) -> WordBreakProp {
    use WordBreakProp::*;
    match cp {
        0x0A => Lf,
        0x0D => Cr,
        0x0B | 0x0C | 0x85 | 0x2028 | 0x2029 => Newline,
        0x200D => Zwj,
        0x09 | 0x20 | 0xA0 | 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000 => Sp,
        0x1F3FB..=0x1F3FF => Extend, // emoji skin-tone modifiers
        0x1F000..=0x1FFFF => ExtendedPictographic,
        0x2600..=0x27BF => ExtendedPictographic,
        0x1F1E6..=0x1F1FF => RegionalIndicator,
        0x30A1..=0x30FA | 0x30FD..=0x30FF | 0xFF66..=0xFF9D | 0x31F0..=0x31FF => Katakana,
        0x05D0..=0x05EA | 0x05F0..=0x05F4 => Hebrew,
        0x27 | 0x2019 => MidNumLet,
        0x2E | 0xFF0E => MidNumLet,
        0x3A | 0xFF1A | 0x2018 | 0x201C | 0x201D => MidLetter,
        0x2C | 0x3B | 0xFF0C | 0xFF1B => MidNum,
        0x30..=0x39 | 0x0660..=0x0669 | 0x06F0..=0x06F9 => Numeric,
        0x41..=0x5A | 0x61..=0x7A => ALetter,
        0xAA | 0xB5 | 0xBA => ALetter,
        0xC0..=0xD6 | 0xD8..=0xF6 | 0xF8..=0x2C1 => ALetter,
        0x370..=0x3FF => ALetter, // Greek
        0x400..=0x4FF => ALetter, // Cyrillic
        0x531..=0x58F => ALetter, // Armenian
        0x600..=0x6FF => ALetter, // Arabic
        0x900..=0x97F => ALetter, // Devanagari
        0x3041..=0x3096 => ALetter, // Hiragana counts as ALetter per UAX 29 Other_Alphabetic
        0x300..=0x36F => Extend,
        0x483..=0x489 => Extend,
        0x591..=0x5BD | 0x5BF | 0x5C1 | 0x5C2 | 0x5C4 | 0x5C5 | 0x5C7 => Extend,
        0x610..=0x61A | 0x64B..=0x65F | 0x670 => Extend,
        0x200B | 0x200C | 0xFEFF => Format,
        0x20D0..=0x20FF => Extend,
        0xFE00..=0xFE0F => Extend, // variation selectors
        0x1AB0..=0x1AFF => Extend,
        _ => Other,
    }
}

/// Coarse sentence-break property, grounded in the `SENT_*` states threaded
/// through `original_source/src/sentscan.c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentBreakProp {
    Cr,
    Lf,
    Sep,
    Format,
    Extend,
    Sp,
    Lower,
    Upper,
    OLetter,
    Numeric,
    ATerm,
    SContinue,
    STerm,
    Close,
    Other,
}

pub fn sent_break_prop(cp: u32) -> SentBreakProp {
    use SentBreakProp::*;
    match cp {
        0x0D => Cr,
        0x0A => Lf,
        0x85 | 0x2028 | 0x2029 => Sep,
        0x200B | 0x200C | 0xFEFF => Format,
        0x300..=0x36F | 0x483..=0x489 | 0x20D0..=0x20FF | 0xFE00..=0xFE0F => Extend,
        0x09 | 0x0B | 0x0C | 0x20 | 0xA0 | 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000 => Sp,
        0x2E | 0x2026 => ATerm,
        0x21 | 0x3F => STerm,
        0x2C | 0x3A | 0x3B | 0x2014 => SContinue,
        0x22 | 0x27 | 0x28 | 0x29 | 0x5B | 0x5D | 0xBB | 0xAB | 0x201C | 0x201D | 0x2018 | 0x2019 => Close,
        0x30..=0x39 => Numeric,
        0x61..=0x7A | 0xDF..=0xF6 | 0xF8..=0xFF => Lower,
        0x41..=0x5A | 0xC0..=0xD6 | 0xD8..=0xDE => Upper,
        0xAA | 0xB5 | 0xBA | 0xC0..=0x2C1 | 0x370..=0x3FF | 0x400..=0x4FF | 0x531..=0x58F
        | 0x600..=0x6FF | 0x900..=0x97F | 0x3041..=0x30FF => OLetter,
        _ => Other,
    }
}

/// ASCII fast-path case fold table: `b'A'..=b'Z' -> lowercase`, identity
/// otherwise. Mirrors the `ascii_map[128]` fast path in
/// `original_source/src/typemap.h`.
pub fn ascii_fold(b: u8) -> u8 {
    if b.is_ascii_uppercase() {
        b + 32
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_table_has_latin1_entries() {
        let (flags, seq) = DECOMPOSITION_MAPPINGS.get(&0x00E9).unwrap();
        assert_eq!(*flags, 0);
        assert_eq!(seq, &vec![0x65, 0x301]);
    }

    #[test]
    fn primary_composites_derived_from_decompositions() {
        assert_eq!(PRIMARY_COMPOSITES.get(&(0x65, 0x301)), Some(&0x00E9));
    }

    #[test]
    fn combining_class_lookup() {
        assert_eq!(*COMBINING_CLASSES.get(&0x0301).unwrap(), 230);
    }

    #[test]
    fn default_ignorable_ranges_cover_soft_hyphen() {
        assert!(is_default_ignorable(0x00AD));
        assert!(!is_default_ignorable(0x0041));
    }

    #[test]
    fn word_break_prop_classifies_ascii() {
        assert_eq!(word_break_prop(b'a' as u32), WordBreakProp::ALetter);
        assert_eq!(word_break_prop(b'5' as u32), WordBreakProp::Numeric);
        assert_eq!(word_break_prop(0x200D), WordBreakProp::Zwj);
    }
}
