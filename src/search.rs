//! Multi-term phrase search over a filter's output stream: a sliding window
//! of recent term ids is probed against a registered [`TermSet`] each time
//! the window grows by one, reporting the longest suffix match.
//!
//! Grounded in `original_source/src/search.c`/`.h`'s `struct corpus_search`:
//! a circular `buffer` of the most recent `length_max` (token text, term id)
//! pairs, refilled one filter token at a time by `buffer_advance`, and
//! matched by shrinking the candidate length from the whole buffer down to
//! one. `IGNORED` filter output never reaches this module (`Filter::advance`
//! already skips it), so the `buffer_ignore` merge-onto-previous-token case
//! in the original is subsumed; the `DROPPED`/`EXCLUDED` case (`type_id <
//! 0`) still needs the buffer cleared, since a dropped token breaks any
//! phrase that would have spanned it.

use crate::error::Result;
use crate::filter::{Filter, DROPPED, EXCLUDED, IGNORED};
use crate::termset::TermSet;

struct BufferEntry {
    term_id: i64,
    cp_start: usize,
    cp_end: usize,
}

struct Buffer {
    entries: Vec<BufferEntry>,
    size_max: usize,
}

impl Buffer {
    fn new() -> Self {
        Buffer { entries: Vec::new(), size_max: 0 }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn reserve(&mut self, size: usize) {
        if size > self.size_max {
            self.size_max = size;
        }
    }

    fn push(&mut self, entry: BufferEntry) {
        if self.size_max == 0 {
            return;
        }
        if self.entries.len() == self.size_max {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    fn term_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.term_id).collect()
    }
}

/// A registered search term's id, returned by [`Search::add`].
pub type TermId = i64;

/// The current match after a successful [`Search::advance`].
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub term_id: i64,
    pub cp_start: usize,
    pub cp_end: usize,
}

pub struct Search {
    terms: TermSet,
    buffer: Buffer,
    length_max: usize,
    length: usize,
    current: Option<SearchMatch>,
    started: bool,
    error: Option<crate::error::CorpusError>,
}

impl Search {
    pub fn new() -> Self {
        Search {
            terms: TermSet::new(),
            buffer: Buffer::new(),
            length_max: 0,
            length: 0,
            current: None,
            started: false,
            error: None,
        }
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

    /// Registers a term as a sequence of filter term ids. Must be called
    /// before [`Search::start`].
    pub fn add(&mut self, term_ids: &[i64]) -> Result<TermId> {
        self.guard(|this| {
            if this.started {
                return Err(crate::error::CorpusError::invalid_input(
                    0,
                    "attempted to add a search term while a search is in progress",
                ));
            }
            let id = this.terms.add(term_ids)?;
            this.length_max = this.length_max.max(term_ids.len());
            Ok(id)
        })
    }

    pub fn has(&self, term_ids: &[i64]) -> Option<TermId> {
        self.terms.has(term_ids)
    }

    /// Begins a search over `filter`'s token stream for `text`.
    pub fn start(&mut self, filter: &mut Filter, text: &[u8]) -> Result<()> {
        self.guard(|this| {
            this.buffer.clear();
            this.buffer.reserve(this.length_max);
            filter.start(text)?;
            this.started = true;
            this.current = None;
            this.length = 0;
            Ok(())
        })
    }

    /// Advances to the next match, returning `None` once the stream is
    /// exhausted.
    pub fn advance(&mut self, filter: &mut Filter) -> Result<Option<SearchMatch>> {
        self.guard(|this| this.advance_raw(filter))
    }

    fn advance_raw(&mut self, filter: &mut Filter) -> Result<Option<SearchMatch>> {
        loop {
            let nbuf = self.buffer.entries.len();
            let mut length = if self.length == 0 { nbuf } else { self.length - 1 };

            while length > 0 {
                let off = nbuf - length;
                let candidate: Vec<i64> =
                    self.buffer.entries[off..].iter().map(|e| e.term_id).collect();
                if let Some(term_id) = self.terms.has(&candidate) {
                    self.length = length;
                    let span_start = self.buffer.entries[off].cp_start;
                    let span_end = self.buffer.entries[nbuf - 1].cp_end;
                    let m = SearchMatch { term_id, cp_start: span_start, cp_end: span_end };
                    self.current = Some(m.clone());
                    return Ok(Some(m));
                }
                length -= 1;
            }
            self.length = 0;

            if !self.fill_buffer(filter)? {
                self.current = None;
                return Ok(None);
            }
        }
    }

    /// Pulls filter tokens until one extends the buffer, returning `false`
    /// once the filter's stream is exhausted.
    fn fill_buffer(&mut self, filter: &mut Filter) -> Result<bool> {
        while let Some(tok) = filter.advance()? {
            if tok.term_id == DROPPED || tok.term_id == EXCLUDED {
                self.buffer.clear();
                continue;
            }
            debug_assert_ne!(tok.term_id, IGNORED, "Filter::advance never surfaces IGNORED");
            self.buffer.push(BufferEntry {
                term_id: tok.term_id,
                cp_start: tok.cp_start,
                cp_end: tok.cp_end,
            });
            return Ok(true);
        }
        Ok(false)
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterConfig;
    use crate::symtab::Symtab;
    use crate::typemap::{TypeMap, TypeMapConfig};

    fn new_filter() -> Filter {
        let tm = TypeMap::new(TypeMapConfig { map_case: true, ..Default::default() });
        Filter::new(Symtab::new(tm), FilterConfig::default())
    }

    fn term_id_of(filter: &mut Filter, word: &[u8]) -> i64 {
        filter.start(word).unwrap();
        filter.advance().unwrap().unwrap().term_id
    }

    #[test]
    fn finds_a_single_word_term() {
        let mut filter = new_filter();
        let run_id = term_id_of(&mut filter, b"run");
        let mut search = Search::new();
        search.add(&[run_id]).unwrap();

        search.start(&mut filter, b"they run fast").unwrap();
        let m = search.advance(&mut filter).unwrap().unwrap();
        assert_eq!(m.term_id, search.has(&[run_id]).unwrap());
        assert!(search.advance(&mut filter).unwrap().is_none());
    }

    #[test]
    fn finds_a_multi_word_phrase_by_longest_match() {
        // Both ids come from one filter scanning the same text the search
        // will later run over, so they are the ids that will actually
        // appear in the buffer (whitespace between them never surfaces a
        // term of its own, see `filter::classify_new_type`).
        let mut filter = new_filter();
        filter.start(b"new york").unwrap();
        let new_id = filter.advance().unwrap().unwrap().term_id;
        let york_id = filter.advance().unwrap().unwrap().term_id;

        let mut search = Search::new();
        let phrase_id = search.add(&[new_id, york_id]).unwrap();

        search.start(&mut filter, b"new york").unwrap();
        let m = search.advance(&mut filter).unwrap().unwrap();
        assert_eq!(m.term_id, phrase_id);
        assert!(search.advance(&mut filter).unwrap().is_none());
    }

    #[test]
    fn a_dropped_token_breaks_a_phrase_match() {
        let mut filter = new_filter();
        filter.drop(crate::wordscan::WordClass::Letter);
        let stop_id = {
            filter.start(b"the").unwrap();
            filter.advance().unwrap().unwrap().term_id
        };
        assert_eq!(stop_id, DROPPED);

        let mut fresh = new_filter();
        let run_id = term_id_of(&mut fresh, b"run");
        let mut search = Search::new();
        let phrase_id = search.add(&[stop_id, run_id]).unwrap();

        let mut filter3 = new_filter();
        filter3.drop(crate::wordscan::WordClass::Letter);
        filter3.drop_except(b"run").unwrap();
        search.start(&mut filter3, b"the run").unwrap();
        let found = search.advance(&mut filter3).unwrap();
        assert!(found.is_none() || found.unwrap().term_id != phrase_id);
    }
}
