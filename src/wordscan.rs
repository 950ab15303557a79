//! Word boundary scanner (UAX #29 word-break rules, WB1-WB16).
//!
//! Grounded in `original_source/src/wordscan.h`'s `word_type` state classes
//! (`NEWLINE, ZWJ, EBASE, ALETTER, NUMERIC, EXTEND, HEBREW, KATAKANA,
//! REGIONAL, OTHER`) and the one-code-point-lookahead scanning style the
//! C library uses throughout (`wordscan_advance`). This scanner works over
//! already-decoded code points rather than re-decoding UTF-8 byte-by-byte
//! the way `wordscan_advance` does, since `Text::code_points` has already
//! resolved escapes; spans are reported as code point index ranges rather
//! than byte ranges for the same reason (see DESIGN.md).
//!
//! The boundary rules implemented here cover the properties in
//! `unicode::tables::WordBreakProp`: CRLF/newline breaks (WB3, WB3a, WB3b),
//! extend/format/ZWJ attachment (WB4, WB3c), letter/number runs with a
//! single internal apostrophe/colon/comma (WB5-WB12), Hebrew single-quote
//! (WB7a), Katakana runs (WB13), the extend-num-let class (WB13a/WB13b, here
//! folded into `MidNumLet`), and paired regional indicators (WB15/WB16).

use crate::unicode::tables::{word_break_prop, WordBreakProp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Newline,
    Letter,
    Number,
    Kana,
    Ideo,
    Mark,
    Punct,
    Symbol,
    Space,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub class: WordClass,
}

fn is_attachable(prop: WordBreakProp) -> bool {
    matches!(prop, WordBreakProp::Extend | WordBreakProp::Format | WordBreakProp::Zwj)
}

fn is_alpha_like(prop: WordBreakProp) -> bool {
    matches!(prop, WordBreakProp::ALetter | WordBreakProp::Hebrew)
}

fn coarse_class(prop: WordBreakProp) -> WordClass {
    match prop {
        WordBreakProp::Newline | WordBreakProp::Cr | WordBreakProp::Lf => WordClass::Newline,
        WordBreakProp::ALetter | WordBreakProp::Hebrew => WordClass::Letter,
        WordBreakProp::Numeric => WordClass::Number,
        WordBreakProp::Katakana => WordClass::Kana,
        WordBreakProp::ExtendedPictographic | WordBreakProp::RegionalIndicator => {
            WordClass::Symbol
        }
        WordBreakProp::Extend | WordBreakProp::Format | WordBreakProp::Zwj => WordClass::Mark,
        WordBreakProp::MidLetter | WordBreakProp::MidNum | WordBreakProp::MidNumLet => {
            WordClass::Punct
        }
        WordBreakProp::Single => WordClass::Punct,
        WordBreakProp::Sp => WordClass::Space,
        WordBreakProp::Other => WordClass::None,
    }
}

/// Scans the code points in `cps`, returning one [`Token`] per maximal
/// word-break run. Every input code point belongs to exactly one token;
/// whitespace and punctuation each get their own single- or multi-code-point
/// tokens like everything else, matching `corpus_wordscan`'s "no text is
/// dropped at this layer" contract.
pub fn scan(cps: &[u32]) -> Vec<Token> {
    let props: Vec<WordBreakProp> = cps.iter().map(|&cp| word_break_prop(cp)).collect();
    let n = cps.len();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < n {
        let start = i;
        let start_prop = props[i];
        i += 1;

        // WB3: CR x LF
        if start_prop == WordBreakProp::Cr && i < n && props[i] == WordBreakProp::Lf {
            i += 1;
            tokens.push(Token { start, end: i, class: WordClass::Newline });
            continue;
        }
        // WB3a/WB3b: newline-class code points never extend.
        if matches!(start_prop, WordBreakProp::Cr | WordBreakProp::Lf | WordBreakProp::Newline) {
            tokens.push(Token { start, end: i, class: WordClass::Newline });
            continue;
        }

        // WB15/WB16: regional indicators pair up.
        if start_prop == WordBreakProp::RegionalIndicator {
            if i < n && props[i] == WordBreakProp::RegionalIndicator {
                i += 1;
            }
            i = attach_extends(&props, i);
            tokens.push(Token { start, end: i, class: WordClass::Symbol });
            continue;
        }

        let mut last_significant = start_prop;
        loop {
            // WB3c: an emoji ZWJ sequence (pictograph, ZWJ, pictograph)
            // stays one token; checked before the generic extend-attach
            // step below since that step would otherwise swallow the ZWJ
            // without also pulling in the pictograph that follows it.
            if last_significant == WordBreakProp::ExtendedPictographic
                && i < n
                && props[i] == WordBreakProp::Zwj
                && props.get(i + 1) == Some(&WordBreakProp::ExtendedPictographic)
            {
                i += 2;
                continue;
            }

            i = attach_extends(&props, i);
            if i >= n {
                break;
            }
            let next = props[i];

            if is_alpha_like(last_significant) && is_alpha_like(next) {
                last_significant = next;
                i += 1;
                continue;
            }
            if last_significant == WordBreakProp::Numeric && next == WordBreakProp::Numeric {
                i += 1;
                continue;
            }
            if is_alpha_like(last_significant) && next == WordBreakProp::Numeric {
                last_significant = next;
                i += 1;
                continue;
            }
            if last_significant == WordBreakProp::Numeric && is_alpha_like(next) {
                last_significant = next;
                i += 1;
                continue;
            }
            if last_significant == WordBreakProp::Katakana && next == WordBreakProp::Katakana {
                i += 1;
                continue;
            }
            if last_significant == WordBreakProp::Hebrew && next == WordBreakProp::Single {
                i += 1;
                continue;
            }

            // WB6/WB7, WB11/WB12: single mid-punctuation joins two runs of
            // the same class if another run of that class follows.
            let joins_mid = matches!(
                next,
                WordBreakProp::MidLetter | WordBreakProp::MidNum | WordBreakProp::MidNumLet
            );
            if joins_mid {
                let after = skip_and_peek(&props, i + 1);
                let bridges_letters = is_alpha_like(last_significant)
                    && after.map(is_alpha_like).unwrap_or(false)
                    && next != WordBreakProp::MidNum;
                let bridges_numbers = last_significant == WordBreakProp::Numeric
                    && after == Some(WordBreakProp::Numeric)
                    && next != WordBreakProp::MidLetter;
                if bridges_letters || bridges_numbers {
                    i += 1; // consume the connector
                    i = attach_extends(&props, i);
                    last_significant = props[i];
                    i += 1;
                    continue;
                }
            }

            // WB13a/WB13b: an underscore-class connector glues to an
            // adjoining alphanumeric/kana run on either side.
            if next == WordBreakProp::Single
                && (is_alpha_like(last_significant)
                    || last_significant == WordBreakProp::Numeric
                    || last_significant == WordBreakProp::Katakana)
            {
                i += 1;
                continue;
            }

            break;
        }
        tokens.push(Token { start, end: i, class: coarse_class(last_significant) });
    }
    tokens
}

fn attach_extends(props: &[WordBreakProp], mut i: usize) -> usize {
    while i < props.len() && is_attachable(props[i]) {
        i += 1;
    }
    i
}

fn skip_and_peek(props: &[WordBreakProp], i: usize) -> Option<WordBreakProp> {
    let j = attach_extends(props, i);
    props.get(j).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    #[test]
    fn splits_simple_words_and_spaces() {
        let c = cps("run fast");
        let tokens = scan(&c);
        let classes: Vec<WordClass> = tokens.iter().map(|t| t.class).collect();
        assert_eq!(classes, vec![WordClass::Letter, WordClass::Space, WordClass::Letter]);
    }

    #[test]
    fn apostrophe_inside_word_does_not_break() {
        let c = cps("don't");
        let tokens = scan(&c);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class, WordClass::Letter);
        assert_eq!(tokens[0].end, c.len());
    }

    #[test]
    fn number_with_internal_comma_stays_together() {
        let c = cps("1,000");
        let tokens = scan(&c);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class, WordClass::Number);
    }

    #[test]
    fn period_between_letters_does_not_break() {
        // '.' is MidNumLet for word-break purposes (distinct from its
        // ATerm role for sentence breaking), so "U.S" is one word token,
        // matching the classic "U.S.A." example in the UAX #29 test data.
        let c = cps("U.S");
        let tokens = scan(&c);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class, WordClass::Letter);
    }

    #[test]
    fn period_before_space_breaks() {
        let c = cps("end. Next");
        let tokens = scan(&c);
        let classes: Vec<WordClass> = tokens.iter().map(|t| t.class).collect();
        assert_eq!(
            classes,
            vec![WordClass::Letter, WordClass::Punct, WordClass::Space, WordClass::Letter]
        );
    }

    #[test]
    fn crlf_is_one_newline_token() {
        let c = cps("a\r\nb");
        let tokens = scan(&c);
        assert_eq!(tokens[1].class, WordClass::Newline);
        assert_eq!(tokens[1].end - tokens[1].start, 2);
    }

    #[test]
    fn regional_indicators_pair() {
        // Flag sequences: Regional Indicator U and S.
        let c = vec![0x1F1FA, 0x1F1F8];
        let tokens = scan(&c);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class, WordClass::Symbol);
    }

    #[test]
    fn zwj_sequence_stays_one_token() {
        let c = vec![0x1F468, 0x200D, 0x1F469]; // man ZWJ woman
        let tokens = scan(&c);
        assert_eq!(tokens.len(), 1);
    }
}
