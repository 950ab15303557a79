//! Suppression-aware wrapper over [`crate::sentscan`].
//!
//! `original_source/src/sentfilter.c`'s `corpus_sentfilter_suppress` builds a
//! reverse-order tree of a suppression pattern's code points (skipping
//! `Sp`-class code points, mapping any `ATerm`-class code point to the
//! literal `.`) but its own `corpus_sentfilter_advance` never actually
//! consults that tree — it passes straight through to
//! `corpus_sentscan_advance`, leaving the feature an unfinished stub in that
//! checkout. `tests/check_sentfilter.c`'s `test_suppress`, `test_nonsuppress`
//! and `test_suppress_break` cases pin down the intended behavior well
//! enough to complete it here:
//!
//! - A suppression match is only consulted at an `ATerm` break decision;
//!   `Newline`/`STerm` breaks always fire (`test_suppress_break`: "end.\nMx.
//!   Jones." still splits into two sentences even though "Mx." is
//!   suppressed, because the break there is a hard newline, not an `ATerm`
//!   decision).
//! - The match walks backward from the `ATerm` code point through the
//!   pattern tree; it is vetoed (the break still fires) unless the code
//!   point immediately preceding the matched span is itself not a letter
//!   (`test_nonsuppress`: "AMx. Split." still breaks, because the `M` in
//!   `Mx.` is preceded by `A`, not a word boundary).

use crate::error::Result;
use crate::sentscan::{self, Sentence};
use crate::tree::Tree;
use crate::unicode::tables::SentBreakProp;
use std::collections::HashSet;

pub struct SentFilter {
    tree: Tree,
    terminal: HashSet<usize>,
}

impl SentFilter {
    pub fn new() -> Self {
        SentFilter { tree: Tree::new(), terminal: HashSet::new() }
    }

    /// Registers a suppression pattern (e.g. `"Mr."`). Patterns are matched
    /// against raw code points, so `pattern` should be passed pre-folded if
    /// case-insensitive suppression is wanted; this crate's
    /// [`crate::typemap`] does not apply suppression, so callers choose.
    pub fn suppress(&mut self, pattern: &[u32]) -> Result<()> {
        let path = reverse_path(pattern);
        let node = self.tree.add(&path)?;
        self.terminal.insert(node);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.terminal.is_empty()
    }

    pub fn scan(&self, cps: &[u32]) -> Vec<Sentence> {
        sentscan::scan_with(cps, |cps, props, aterm_pos| self.should_suppress(cps, props, aterm_pos))
    }

    fn should_suppress(&self, cps: &[u32], props: &[SentBreakProp], aterm_pos: usize) -> bool {
        if self.terminal.is_empty() {
            return false;
        }
        let mut node = self.tree.root();
        let mut i = aterm_pos as isize;
        while i >= 0 {
            let cp = cps[i as usize];
            let prop = props[i as usize];
            if prop == SentBreakProp::Sp {
                i -= 1;
                continue;
            }
            let key = if prop == SentBreakProp::ATerm { b'.' as i64 } else { cp as i64 };
            match self.tree.child(node, key) {
                Some(child) => {
                    node = child;
                    if self.terminal.contains(&node) {
                        let boundary = i - 1;
                        let preceded_by_letter = boundary >= 0
                            && matches!(
                                props[boundary as usize],
                                SentBreakProp::Upper
                                    | SentBreakProp::Lower
                                    | SentBreakProp::OLetter
                            );
                        return !preceded_by_letter;
                    }
                }
                None => return false,
            }
            i -= 1;
        }
        false
    }
}

impl Default for SentFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn reverse_path(pattern: &[u32]) -> Vec<i64> {
    use crate::unicode::tables::sent_break_prop;
    pattern
        .iter()
        .rev()
        .filter_map(|&cp| match sent_break_prop(cp) {
            SentBreakProp::Sp => None,
            SentBreakProp::ATerm => Some(b'.' as i64),
            _ => Some(cp as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    fn spans(filter: &SentFilter, s: &str) -> Vec<String> {
        let c = cps(s);
        filter
            .scan(&c)
            .into_iter()
            .map(|sent| c[sent.start..sent.end].iter().map(|&cp| char::from_u32(cp).unwrap()).collect())
            .collect()
    }

    #[test]
    fn no_patterns_behaves_like_plain_sentscan() {
        let f = SentFilter::new();
        assert_eq!(spans(&f, "Mr. Jones."), vec!["Mr. ", "Jones."]);
    }

    #[test]
    fn suppressed_abbreviation_keeps_sentence_together() {
        let mut f = SentFilter::new();
        f.suppress(&cps("Mr.")).unwrap();
        f.suppress(&cps("Mrs.")).unwrap();
        f.suppress(&cps("Mx.")).unwrap();
        assert_eq!(spans(&f, "Mr. and Mrs. Jones."), vec!["Mr. and Mrs. Jones."]);
        assert_eq!(spans(&f, "Mx. Jones."), vec!["Mx. Jones."]);
    }

    #[test]
    fn suppression_does_not_match_inside_a_longer_word() {
        let mut f = SentFilter::new();
        f.suppress(&cps("Mx.")).unwrap();
        // "AMx." is not preceded by a boundary, so the break still fires.
        assert_eq!(spans(&f, "AMx. Split."), vec!["AMx. ", "Split."]);
    }

    #[test]
    fn suppression_never_overrides_a_hard_newline() {
        let mut f = SentFilter::new();
        f.suppress(&cps("Mx.")).unwrap();
        assert_eq!(spans(&f, "end.\nMx. Jones."), vec!["end.\n", "Mx. Jones."]);
    }

    #[test]
    fn suppression_of_the_pre_newline_text_still_does_not_veto_the_newline() {
        let mut f = SentFilter::new();
        f.suppress(&cps("end.")).unwrap();
        assert_eq!(spans(&f, "end.\nMore."), vec!["end.\n", "More."]);
    }

    #[test]
    fn suppression_match_is_scoped_to_its_own_aterm() {
        let mut f = SentFilter::new();
        f.suppress(&cps("Mx.")).unwrap();
        // The first break ("end." before "Mx") is a plain unsuppressed
        // ATerm break (the tree only has a pattern for "Mx.", which does
        // not match backward from that position); the second break (after
        // "Mx.") is suppressed. Net result: the text splits once, right
        // after "end.", and "Mx. Jones." stays together.
        assert_eq!(spans(&f, "end.Mx. Jones."), vec!["end.", "Mx. Jones."]);
    }
}
