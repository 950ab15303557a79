//! A set of owned byte strings, used for stem exceptions and membership
//! lists where the caller hands in arbitrary text rather than an
//! already-interned type id.
//!
//! Grounded in `original_source/src/termset.h`'s sibling data structure; this
//! crate's `termset` module (multi-token terms keyed by type id) is distinct
//! from this single-string set, which backs `typemap`'s stem-exception list
//! and `sentfilter`'s suppression pattern registration.

use crate::error::Result;
use crate::growth::Growable;
use crate::hashtable::HashTable;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xCBF29CE484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001B3);
    }
    hash
}

#[derive(Default)]
pub struct TextSet {
    table: HashTable,
    items: Growable<Vec<u8>>,
}

impl TextSet {
    pub fn new() -> Self {
        TextSet { table: HashTable::new(), items: Growable::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, text: &[u8]) -> bool {
        self.find(text).is_some()
    }

    fn find(&self, text: &[u8]) -> Option<usize> {
        let idx = self.table.find(fnv1a(text))?;
        if self.items[idx as usize] == text {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Inserts `text`, returning its stable item index and whether it was
    /// newly added.
    pub fn add(&mut self, text: &[u8]) -> Result<(usize, bool)> {
        if let Some(idx) = self.find(text) {
            return Ok((idx, false));
        }
        let idx = self.items.len();
        self.items.push(text.to_vec())?;
        self.table.insert(fnv1a(text), idx as i64);
        Ok((idx, true))
    }

    pub fn get(&self, idx: usize) -> &[u8] {
        &self.items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dedupes() {
        let mut s = TextSet::new();
        let (a, created_a) = s.add(b"run").unwrap();
        let (b, created_b) = s.add(b"run").unwrap();
        assert!(created_a);
        assert!(!created_b);
        assert_eq!(a, b);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_ids() {
        let mut s = TextSet::new();
        let (a, _) = s.add(b"run").unwrap();
        let (b, _) = s.add(b"ran").unwrap();
        assert_ne!(a, b);
    }
}
