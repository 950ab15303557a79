//! Sentence boundary scanner (UAX #29 sentence-break rules, SB1-SB11).
//!
//! Grounded in `original_source/src/sentscan.c`'s goto-threaded state
//! machine (`NoBreak -> CR/ParaSep`, `ATerm -> ATerm_Close -> ATerm_Close_Sp
//! -> Break`, the parallel `STerm` chain, and `has_future_lower`'s forward
//! lookahead). Reimplemented as an explicit Rust loop rather than gotos:
//! each "state" below is a plain function operating on a cursor over the
//! code points, matching the original's one-code-point-of-lookahead
//! discipline (`SCAN`/`NEXT` only ever looks at the next pending code
//! point, never further).

use crate::unicode::tables::{sent_break_prop, SentBreakProp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceBreak {
    Newline,
    ATerm,
    STerm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
    pub kind: SentenceBreak,
}

fn is_hard_break(prop: SentBreakProp) -> bool {
    matches!(prop, SentBreakProp::Cr | SentBreakProp::Lf | SentBreakProp::Sep)
}

fn is_sattem(prop: SentBreakProp) -> bool {
    matches!(prop, SentBreakProp::ATerm | SentBreakProp::STerm)
}

fn skip_extend(props: &[SentBreakProp], mut i: usize) -> usize {
    while i < props.len() && matches!(props[i], SentBreakProp::Extend | SentBreakProp::Format) {
        i += 1;
    }
    i
}

/// SB8's forward lookahead: starting just past an ATerm/Close*/Sp* run,
/// does a lowercase letter appear before any code point that would force a
/// break (`OLetter`, `Upper`, `Sep`, `CR`, `LF`, `STerm`, `ATerm`)? Grounded
/// in `sentscan.c`'s `has_future_lower`.
fn has_future_lower(props: &[SentBreakProp], mut i: usize) -> bool {
    while i < props.len() {
        i = skip_extend(props, i);
        match props.get(i) {
            Some(SentBreakProp::Lower) => return true,
            Some(SentBreakProp::OLetter)
            | Some(SentBreakProp::Upper)
            | Some(SentBreakProp::Sep)
            | Some(SentBreakProp::Cr)
            | Some(SentBreakProp::Lf)
            | Some(SentBreakProp::STerm)
            | Some(SentBreakProp::ATerm) => return false,
            Some(_) => i += 1,
            None => return false,
        }
    }
    false
}

/// Outcome of reaching an ATerm/STerm decision point: either a break at
/// `pos` with `kind`, or "keep scanning from `pos`". `hard` marks a break
/// forced by an immediately following CR/LF/paragraph separator, which
/// sentence suppression must never veto (only breaks decided by the
/// Upper/OLetter or lowercase-lookahead rules are suppressible).
pub(crate) enum Decision {
    Break { pos: usize, kind: SentenceBreak, hard: bool },
    Continue { pos: usize },
}

/// Scans from `start`, consuming an ATerm or STerm's following `Close*
/// Sp*` run, then decides whether to break. `start` indexes the code point
/// immediately after the ATerm/STerm itself. Exposed to `sentfilter`, which
/// intercepts `ATerm` decisions to consult the suppression tree before
/// committing to a break.
pub(crate) fn decide(props: &[SentBreakProp], start: usize, aterm: bool) -> Decision {
    let mut i = start;
    loop {
        i = skip_extend(props, i);
        if props.get(i) == Some(&SentBreakProp::Close) {
            i += 1;
            continue;
        }
        break;
    }
    let mut saw_sp = false;
    loop {
        i = skip_extend(props, i);
        if props.get(i) == Some(&SentBreakProp::Sp) {
            saw_sp = true;
            i += 1;
            continue;
        }
        break;
    }

    let kind = if aterm { SentenceBreak::ATerm } else { SentenceBreak::STerm };
    let next = props.get(i).copied();

    if matches!(next, Some(p) if is_hard_break(p)) {
        return Decision::Break { pos: i, kind, hard: true };
    }
    match next {
        Some(SentBreakProp::Upper) | Some(SentBreakProp::OLetter) => {
            Decision::Break { pos: i, kind, hard: false }
        }
        Some(SentBreakProp::Numeric) if aterm && !saw_sp => Decision::Continue { pos: i },
        _ => {
            if aterm {
                if has_future_lower(props, i) {
                    Decision::Continue { pos: i }
                } else {
                    Decision::Break { pos: i, kind, hard: false }
                }
            } else {
                Decision::Break { pos: i, kind, hard: false }
            }
        }
    }
}

/// Scans `cps` into sentences. Each [`Sentence`] spans from its start
/// (inclusive) to its end (exclusive), with any trailing `Close*`/`Sp*` run
/// folded into the sentence that precedes the break, matching
/// `test_space`'s "Mr. Jones." -> "Mr. " + "Jones." split in
/// `tests/check_sentfilter.c`.
pub fn scan(cps: &[u32]) -> Vec<Sentence> {
    scan_with(cps, |_, _, _| false)
}

/// As [`scan`], but every ATerm break decision is first offered to
/// `should_suppress(cps, props, aterm_pos)`; if it returns `true`, the break
/// is vetoed and scanning continues as though no sentence-ending
/// punctuation had been seen. Used by [`crate::sentfilter`] to consult a
/// suppression tree without duplicating the state machine.
pub(crate) fn scan_with(
    cps: &[u32],
    should_suppress: impl Fn(&[u32], &[SentBreakProp], usize) -> bool,
) -> Vec<Sentence> {
    let props: Vec<SentBreakProp> = cps.iter().map(|&cp| sent_break_prop(cp)).collect();
    let n = props.len();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < n {
        match props[i] {
            SentBreakProp::Cr => {
                let mut end = i + 1;
                if props.get(end) == Some(&SentBreakProp::Lf) {
                    end += 1;
                }
                sentences.push(Sentence { start, end, kind: SentenceBreak::Newline });
                start = end;
                i = end;
            }
            SentBreakProp::Lf | SentBreakProp::Sep => {
                let end = i + 1;
                sentences.push(Sentence { start, end, kind: SentenceBreak::Newline });
                start = end;
                i = end;
            }
            p if is_sattem(p) => {
                let aterm = p == SentBreakProp::ATerm;
                let aterm_pos = i;
                match decide(&props, i + 1, aterm) {
                    Decision::Break { pos, kind, hard }
                        if !hard && aterm && should_suppress(cps, &props, aterm_pos) =>
                    {
                        let _ = (pos, kind);
                        i = aterm_pos + 1;
                    }
                    Decision::Break { pos, kind, .. } => {
                        sentences.push(Sentence { start, end: pos, kind });
                        start = pos;
                        i = pos;
                    }
                    Decision::Continue { pos } => {
                        i = pos;
                    }
                }
            }
            _ => {
                i += 1;
            }
        }
    }
    if start < n {
        sentences.push(Sentence { start, end: n, kind: SentenceBreak::STerm });
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    fn spans(s: &str) -> Vec<String> {
        let c = cps(s);
        scan(&c)
            .into_iter()
            .map(|sent| {
                c[sent.start..sent.end]
                    .iter()
                    .map(|&cp| char::from_u32(cp).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn splits_on_period_space_upper() {
        assert_eq!(spans("Go now. Stop."), vec!["Go now. ", "Stop."]);
    }

    #[test]
    fn does_not_split_on_decimal_number() {
        assert_eq!(spans("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
    }

    #[test]
    fn splits_on_exclamation_and_question() {
        assert_eq!(spans("Wait! Really? Yes."), vec!["Wait! ", "Really? ", "Yes."]);
    }

    #[test]
    fn splits_on_newline_even_without_terminal_punctuation() {
        assert_eq!(spans("line one\nline two"), vec!["line one\n", "line two"]);
    }

    #[test]
    fn crlf_counts_as_one_break() {
        let sents = scan(&cps("a\r\nb"));
        assert_eq!(sents.len(), 2);
        assert_eq!(sents[0].end - sents[0].start, 2);
    }

    #[test]
    fn abbreviation_followed_by_lowercase_does_not_break() {
        // "e.g." followed by a lowercase word keeps the sentence open
        // (mirrors the has_future_lower forward check).
        assert_eq!(spans("See e.g. jones for details."), vec!["See e.g. jones for details."]);
    }
}
