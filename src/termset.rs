//! A set of multi-token terms, each a sequence of type ids, stored as a
//! prefix tree so a candidate sequence can be tested (or extended) one type
//! id at a time.
//!
//! Grounded in `original_source/src/termset.c`/`.h`'s `struct
//! corpus_termset` (a `tree` of type-id paths, each terminal node's `term_id`
//! looked up via a parallel `term_ids` table, with the path itself kept in a
//! flat `buffer` for reconstruction). `crate::search::Search` probes this
//! set while growing its token-window buffer to find the longest matching
//! term ending at the current position.

use crate::error::Result;
use crate::growth::Growable;
use crate::tree::Tree;
use std::collections::HashMap;

pub struct TermSet {
    tree: Tree,
    term_of_node: HashMap<usize, i64>,
    items: Growable<Vec<i64>>,
}

impl TermSet {
    pub fn new() -> Self {
        TermSet { tree: Tree::new(), term_of_node: HashMap::new(), items: Growable::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = Tree::new();
        self.term_of_node.clear();
        self.items.clear();
    }

    /// Looks up `type_ids` without creating a node for it.
    pub fn has(&self, type_ids: &[i64]) -> Option<i64> {
        let node = self.tree.find(type_ids)?;
        self.term_of_node.get(&node).copied()
    }

    /// Looks up the node reached by `type_ids`, whether or not it is a
    /// registered term; used by `search` to know whether extending the
    /// current candidate by one more type id could still lead somewhere.
    pub fn has_prefix(&self, type_ids: &[i64]) -> bool {
        self.tree.find(type_ids).is_some()
    }

    /// Registers `type_ids` as a term, returning its (possibly pre-existing)
    /// term id.
    pub fn add(&mut self, type_ids: &[i64]) -> Result<i64> {
        let node = self.tree.add(type_ids)?;
        if let Some(&id) = self.term_of_node.get(&node) {
            return Ok(id);
        }
        let id = self.items.len() as i64;
        self.items.push(type_ids.to_vec())?;
        self.term_of_node.insert(node, id);
        Ok(id)
    }

    pub fn term(&self, term_id: i64) -> &[i64] {
        &self.items[term_id as usize]
    }
}

impl Default for TermSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_has() {
        let mut ts = TermSet::new();
        let id = ts.add(&[1, 2, 3]).unwrap();
        assert_eq!(ts.has(&[1, 2, 3]), Some(id));
        assert_eq!(ts.has(&[1, 2]), None);
        assert!(ts.has_prefix(&[1, 2]));
    }

    #[test]
    fn re_adding_returns_same_id() {
        let mut ts = TermSet::new();
        let a = ts.add(&[5, 6]).unwrap();
        let b = ts.add(&[5, 6]).unwrap();
        assert_eq!(a, b);
        assert_eq!(ts.len(), 1);
    }

    #[test]
    fn term_reconstructs_the_sequence() {
        let mut ts = TermSet::new();
        let id = ts.add(&[7, 8, 9]).unwrap();
        assert_eq!(ts.term(id), &[7, 8, 9]);
    }
}
