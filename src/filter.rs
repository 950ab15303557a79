//! The filter: wires a word scanner, a symbol table, and combination/drop/
//! select policies together into the stream of term ids search and ranking
//! consume downstream.
//!
//! Grounded closely on `original_source/src/filter.c`: the `IGNORED`/
//! `DROPPED`/`EXCLUDED` term-id sentinels, the drop/drop-except/select
//! interactions, and the longest-match walk through a combination-rule tree
//! (`corpus_filter_combine`/`try_combine`). Idiomatic differences from the
//! C entry points: `Result`-returning methods instead of an error-code
//! return plus a caller-owned out-pointer, and the sticky `f->error` latch
//! becomes a `self.error: Option<CorpusError>` field consulted by every
//! public method (the `CHECK_ERROR` macro's job). This crate also does not
//! replicate `corpus_filter_drop`'s term-id compaction: since a type only
//! consumes a slot in the dense id space the first time it resolves to a
//! real (non-sentinel) term, a later `drop()` call can leave gaps in the
//! numbering rather than shifting subsequent ids down — the ids stay
//! unique and stable, just not perfectly packed after a retroactive drop.

use crate::error::Result;
use crate::symtab::Symtab;
use crate::textset::TextSet;
use crate::tree::Tree;
use crate::unicode;
use crate::wordscan::{self, WordClass};
use std::collections::HashMap;

pub const IGNORED: i64 = -1;
pub const DROPPED: i64 = -2;
pub const EXCLUDED: i64 = -3;

#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    pub drop_letter: bool,
    pub drop_number: bool,
    pub drop_punct: bool,
    pub drop_symbol: bool,
    /// Joins the surface tokens of a matched combination, `'_'` by
    /// default, matching `CORPUS_FILTER_CONNECTOR`.
    pub connector: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            drop_letter: false,
            drop_number: false,
            drop_punct: false,
            drop_symbol: false,
            connector: b'_',
        }
    }
}

/// One unit of filtered output. `type_id` is `None` for a combined
/// multi-token term, since a combination spans several of `symtab`'s types
/// rather than being one itself. `cp_start`/`cp_end` locate the token (or,
/// for a combination, its full span) in the code points passed to
/// [`Filter::start`], so a caller can recover the exact source bytes with
/// [`Filter::text_for_span`] instead of the normalized `text`.
#[derive(Debug, Clone)]
pub struct FilterToken {
    pub term_id: i64,
    pub type_id: Option<i64>,
    pub text: Vec<u8>,
    pub cp_start: usize,
    pub cp_end: usize,
}

pub struct Filter {
    symtab: Symtab,
    combine_tree: Tree,
    combine_term: HashMap<usize, i64>,
    type_term: HashMap<i64, i64>,
    type_class: HashMap<i64, WordClass>,
    drop_except: TextSet,
    /// Types explicitly registered via `select`, mapped to their assigned
    /// term id; consulted so a repeat `select` call on the same word is
    /// idempotent instead of colliding with the mass-exclusion step.
    selected: HashMap<i64, i64>,
    select_mode: bool,
    nterm: i64,
    config: FilterConfig,
    error: Option<crate::error::CorpusError>,
    cps: Vec<u32>,
    tokens: Vec<wordscan::Token>,
    pos: usize,
}

impl Filter {
    pub fn new(symtab: Symtab, config: FilterConfig) -> Self {
        Filter {
            symtab,
            combine_tree: Tree::new(),
            combine_term: HashMap::new(),
            type_term: HashMap::new(),
            type_class: HashMap::new(),
            drop_except: TextSet::new(),
            selected: HashMap::new(),
            select_mode: false,
            nterm: 0,
            config,
            error: None,
            cps: Vec::new(),
            tokens: Vec::new(),
            pos: 0,
        }
    }

    pub fn nterm(&self) -> i64 {
        self.nterm
    }

    fn guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn stem_except(&mut self, word: &[u8]) -> Result<()> {
        self.guard(|this| this.symtab.typemap_mut().stem_except(word))
    }

    fn classify_word(word: &[u8]) -> Result<WordClass> {
        let cps = crate::text::Text::assign(word)?.code_points()?;
        let tokens = wordscan::scan(&cps);
        Ok(tokens.first().map(|t| t.class).unwrap_or(WordClass::None))
    }

    fn classify_new_type(&mut self, type_text: &[u8], class: WordClass) -> i64 {
        if type_text.is_empty() || class == WordClass::Space {
            return IGNORED;
        }
        let drop_by_class = match class {
            WordClass::Letter => self.config.drop_letter,
            WordClass::Number => self.config.drop_number,
            WordClass::Punct => self.config.drop_punct,
            WordClass::Symbol => self.config.drop_symbol,
            _ => false,
        };
        if drop_by_class && !self.drop_except.contains(type_text) {
            return DROPPED;
        }
        if self.select_mode {
            return EXCLUDED;
        }
        let id = self.nterm;
        self.nterm += 1;
        id
    }

    fn add_type(&mut self, type_id: i64, type_text: &[u8], class: WordClass) -> i64 {
        if let Some(&term) = self.type_term.get(&type_id) {
            return term;
        }
        self.type_class.insert(type_id, class);
        let term = self.classify_new_type(type_text, class);
        self.type_term.insert(type_id, term);
        term
    }

    /// `CORPUS_FILTER_DROP_*`: types of `class` resolve to `DROPPED` from
    /// now on, and any already-seen type of that class (not in the
    /// drop-except list) is retroactively marked `DROPPED`.
    pub fn drop(&mut self, class: WordClass) {
        match class {
            WordClass::Letter => self.config.drop_letter = true,
            WordClass::Number => self.config.drop_number = true,
            WordClass::Punct => self.config.drop_punct = true,
            WordClass::Symbol => self.config.drop_symbol = true,
            _ => {}
        }
        let ids: Vec<i64> =
            self.type_class.iter().filter(|&(_, &c)| c == class).map(|(&id, _)| id).collect();
        for id in ids {
            let text = self.symtab.type_text(id).to_vec();
            if !self.drop_except.contains(&text) {
                self.type_term.insert(id, DROPPED);
            }
        }
    }

    /// Exempts `word`'s type from class-based dropping, re-admitting it
    /// (to `EXCLUDED` in select mode, or a fresh term id otherwise) if it
    /// had already been dropped.
    pub fn drop_except(&mut self, word: &[u8]) -> Result<()> {
        self.guard(|this| {
            this.drop_except.add(word)?;
            let ids: Vec<i64> = this
                .type_class
                .keys()
                .copied()
                .filter(|&id| this.symtab.type_text(id) == word)
                .collect();
            for id in ids {
                if this.type_term.get(&id) == Some(&DROPPED) {
                    let new_term = if this.select_mode {
                        EXCLUDED
                    } else {
                        let t = this.nterm;
                        this.nterm += 1;
                        t
                    };
                    this.type_term.insert(id, new_term);
                }
            }
            Ok(())
        })
    }

    /// `corpus_filter_select`: the first call switches the filter into
    /// select mode, excluding every type seen so far; every call allocates
    /// (or returns the existing) term id for `term_text`, bypassing the
    /// exclusion for that one term.
    pub fn select(&mut self, term_text: &[u8]) -> Result<i64> {
        self.guard(|this| {
            if !this.select_mode {
                this.select_mode = true;
                this.nterm = 0;
                let ids: Vec<i64> = this.type_term.keys().copied().collect();
                for id in ids {
                    let cur = this.type_term[&id];
                    if cur != IGNORED && cur != DROPPED {
                        this.type_term.insert(id, EXCLUDED);
                    }
                }
            }
            let class = Self::classify_word(term_text)?;
            let (_, type_id) = this.symtab.add_token(term_text, class)?;
            this.type_class.insert(type_id, class);
            if let Some(&id) = this.selected.get(&type_id) {
                return Ok(id);
            }
            let id = this.nterm;
            this.nterm += 1;
            this.type_term.insert(type_id, id);
            this.selected.insert(type_id, id);
            Ok(id)
        })
    }

    /// `corpus_filter_combine`: registers a multi-token term by scanning
    /// `term` the same way [`Filter::start`] scans input text, and walking a
    /// path into the combination tree over every token that does not
    /// resolve to `IGNORED`. Whitespace tokens always resolve to `IGNORED`
    /// (see [`Filter::classify_new_type`]), so a path built from `"new
    /// york"` only has edges for `new` and `york`; `try_combine` walks the
    /// same raw token stream and skips whitespace the same way, so the two
    /// stay in sync without the path needing an entry for it.
    pub fn combine(&mut self, term: &[u8]) -> Result<i64> {
        self.guard(|this| {
            let t = crate::text::Text::assign(term)?;
            let cps = t.code_points()?;
            let tokens = wordscan::scan(&cps);
            let mut path = Vec::with_capacity(tokens.len());
            for tok in &tokens {
                let mut raw = Vec::new();
                for &cp in &cps[tok.start..tok.end] {
                    unicode::encode_utf8(cp, &mut raw);
                }
                let (_, type_id) = this.symtab.add_token(&raw, tok.class)?;
                let text = this.symtab.type_text(type_id).to_vec();
                let term_id = this.add_type(type_id, &text, tok.class);
                if term_id == IGNORED {
                    continue;
                }
                path.push(type_id);
            }
            let node = this.combine_tree.add(&path)?;
            if let Some(&id) = this.combine_term.get(&node) {
                return Ok(id);
            }
            let id = this.nterm;
            this.nterm += 1;
            this.combine_term.insert(node, id);
            Ok(id)
        })
    }

    pub fn start(&mut self, text: &[u8]) -> Result<()> {
        self.guard(|this| {
            let t = crate::text::Text::assign(text)?;
            this.cps = t.code_points()?;
            this.tokens = wordscan::scan(&this.cps);
            this.pos = 0;
            Ok(())
        })
    }

    fn token_bytes(&self, tok: &wordscan::Token) -> Vec<u8> {
        let mut out = Vec::new();
        for &cp in &self.cps[tok.start..tok.end] {
            unicode::encode_utf8(cp, &mut out);
        }
        out
    }

    /// Joins the content-word tokens of a combined match with
    /// `self.config.connector`, dropping the whitespace/punctuation tokens
    /// between them -- `CORPUS_FILTER_CONNECTOR`'s documented job of
    /// "joining space-separated words in the combination rule". `consumed`
    /// still counts the whitespace tokens `try_combine` walked past to reach
    /// the match; this only affects what text is reported for it.
    fn combined_text(&self, start: usize, consumed: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for k in 0..consumed {
            let tok = &self.tokens[start + k];
            if matches!(tok.class, WordClass::None | WordClass::Space | WordClass::Punct | WordClass::Newline) {
                continue;
            }
            if !out.is_empty() {
                out.push(self.config.connector);
            }
            out.extend_from_slice(&self.token_bytes(tok));
        }
        out
    }

    /// Re-encodes the exact source bytes spanning code points
    /// `[cp_start, cp_end)`, for reconstructing a match's surface text from
    /// a [`FilterToken`]'s span rather than its normalized `text`.
    pub fn text_for_span(&self, cp_start: usize, cp_end: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for &cp in &self.cps[cp_start..cp_end] {
            unicode::encode_utf8(cp, &mut out);
        }
        out
    }

    /// Longest-match walk through the combination tree starting at
    /// `self.pos`, mirroring `corpus_filter_try_combine`'s
    /// suspend/restore-cursor search (here, a plain lookahead over
    /// `self.tokens` since nothing needs to be undone on a miss). Tokens
    /// that resolve to `IGNORED` are skipped without breaking the match,
    /// same as `corpus_filter_advance_raw`'s internal retry loop -- the
    /// combination rule itself never has a tree edge for them, since
    /// `combine` skipped them too when it built the rule.
    fn try_combine(&mut self) -> Result<Option<(i64, usize)>> {
        if self.combine_term.is_empty() {
            return Ok(None);
        }
        let mut node = self.combine_tree.root();
        let mut best: Option<(i64, usize)> = None;
        let mut i = self.pos;
        while i < self.tokens.len() {
            let tok = self.tokens[i].clone();
            let raw = self.token_bytes(&tok);
            let (_, type_id) = self.symtab.add_token(&raw, tok.class)?;
            let text = self.symtab.type_text(type_id).to_vec();
            let term_id = self.add_type(type_id, &text, tok.class);
            i += 1;
            if term_id == IGNORED {
                continue;
            }
            match self.combine_tree.child(node, type_id) {
                Some(child) => {
                    node = child;
                    if let Some(&cid) = self.combine_term.get(&node) {
                        best = Some((cid, i - self.pos));
                    }
                }
                None => break,
            }
        }
        Ok(best.filter(|&(_, consumed)| consumed > 1))
    }

    /// `corpus_filter_advance`: returns the next filtered term, looping
    /// silently past any type that folds to an empty string (`IGNORED`).
    pub fn advance(&mut self) -> Result<Option<FilterToken>> {
        self.guard(|this| this.advance_raw())
    }

    fn advance_raw(&mut self) -> Result<Option<FilterToken>> {
        loop {
            if self.pos >= self.tokens.len() {
                return Ok(None);
            }
            if let Some((term_id, consumed)) = self.try_combine()? {
                let text = self.combined_text(self.pos, consumed);
                let cp_start = self.tokens[self.pos].start;
                let cp_end = self.tokens[self.pos + consumed - 1].end;
                self.pos += consumed;
                if term_id == IGNORED {
                    continue;
                }
                return Ok(Some(FilterToken { term_id, type_id: None, text, cp_start, cp_end }));
            }
            let tok = self.tokens[self.pos].clone();
            self.pos += 1;
            let raw = self.token_bytes(&tok);
            let (_, type_id) = self.symtab.add_token(&raw, tok.class)?;
            let text = self.symtab.type_text(type_id).to_vec();
            let term_id = self.add_type(type_id, &text, tok.class);
            if term_id == IGNORED {
                continue;
            }
            return Ok(Some(FilterToken {
                term_id,
                type_id: Some(type_id),
                text,
                cp_start: tok.start,
                cp_end: tok.end,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::{TypeMap, TypeMapConfig};

    fn new_filter() -> Filter {
        let tm = TypeMap::new(TypeMapConfig { map_case: true, ..Default::default() });
        Filter::new(Symtab::new(tm), FilterConfig::default())
    }

    #[test]
    fn advance_yields_one_term_per_token() {
        let mut f = new_filter();
        f.start(b"Run fast").unwrap();
        let a = f.advance().unwrap().unwrap();
        let b = f.advance().unwrap().unwrap();
        assert_eq!(a.text, b"run");
        assert_eq!(b.text, b"fast");
        assert!(f.advance().unwrap().is_none());
    }

    #[test]
    fn whitespace_between_terms_is_ignored() {
        let mut f = new_filter();
        f.start(b"a rose is a rose is a rose.").unwrap();
        let terms: Vec<Vec<u8>> =
            std::iter::from_fn(|| f.advance().unwrap().map(|t| t.text)).collect();
        assert_eq!(
            terms,
            vec![
                b"a".to_vec(),
                b"rose".to_vec(),
                b"is".to_vec(),
                b"a".to_vec(),
                b"rose".to_vec(),
                b"is".to_vec(),
                b"a".to_vec(),
                b"rose".to_vec(),
                b".".to_vec(),
            ]
        );
    }

    #[test]
    fn repeated_word_reuses_the_same_term_id() {
        let mut f = new_filter();
        f.start(b"run run").unwrap();
        let a = f.advance().unwrap().unwrap();
        let b = f.advance().unwrap().unwrap();
        assert_eq!(a.term_id, b.term_id);
    }

    #[test]
    fn drop_letter_marks_letter_terms_dropped() {
        let mut f = new_filter();
        f.start(b"run").unwrap();
        let a = f.advance().unwrap().unwrap();
        assert_ne!(a.term_id, DROPPED);
        f.drop(WordClass::Letter);
        f.start(b"walk").unwrap();
        let b = f.advance().unwrap().unwrap();
        assert_eq!(b.term_id, DROPPED);
    }

    #[test]
    fn drop_except_exempts_a_specific_word() {
        let mut f = new_filter();
        f.drop(WordClass::Letter);
        f.drop_except(b"run").unwrap();
        f.start(b"run walk").unwrap();
        let a = f.advance().unwrap().unwrap();
        let b = f.advance().unwrap().unwrap();
        assert_ne!(a.term_id, DROPPED);
        assert_eq!(b.term_id, DROPPED);
    }

    #[test]
    fn select_excludes_everything_else() {
        let mut f = new_filter();
        f.start(b"run walk").unwrap();
        let _ = f.advance().unwrap();
        let select_id = f.select(b"run").unwrap();
        f.start(b"run walk").unwrap();
        let a = f.advance().unwrap().unwrap();
        let b = f.advance().unwrap().unwrap();
        assert_eq!(a.term_id, select_id);
        assert_eq!(b.term_id, EXCLUDED);
    }

    #[test]
    fn combine_merges_a_multi_word_term() {
        let mut f = new_filter();
        let combined_id = f.combine(b"new york").unwrap();
        f.start(b"new york city").unwrap();
        let a = f.advance().unwrap().unwrap();
        assert_eq!(a.term_id, combined_id);
        assert_eq!(a.text, b"new_york");
        let c = f.advance().unwrap().unwrap();
        assert_eq!(c.text, b"city");
    }

    #[test]
    fn sticky_error_latches_after_invalid_input() {
        let mut f = new_filter();
        assert!(f.start(&[0xFF]).is_err());
        assert!(f.advance().is_err());
    }
}
