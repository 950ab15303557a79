//! Rooted N-ary prefix tree keyed by integer edge labels.
//!
//! Grounded in `original_source/src/tree.c`/`tree.h`: a flat `nodes` arena
//! (root is node 0), each node storing its parent id, the edge label that
//! reached it, and its children. A node's children start as a small linear
//! list and upgrade to a [`crate::hashtable::HashTable`] once the fan-out
//! passes [`CHILD_LIST_THRESHOLD`], mirroring `tree.c`'s use of
//! `corpus_table` once a node's child count grows past a handful.
//!
//! Used by the filter's combination rules (token sequences keyed by type
//! id), by `termset` (multi-token terms keyed by type id), and by
//! `sentfilter` (suppression patterns keyed by code point, walked in
//! reverse).

use crate::error::Result;
use crate::growth::Growable;
use crate::hashtable::HashTable;

pub const NONE: i64 = -1;
const CHILD_LIST_THRESHOLD: usize = 8;

enum Children {
    List(Vec<(i64, usize)>),
    Hashed(HashTable),
}

impl Children {
    fn get(&self, key: i64) -> Option<usize> {
        match self {
            Children::List(v) => v.iter().find(|(k, _)| *k == key).map(|(_, id)| *id),
            Children::Hashed(t) => t.find(key as u64).map(|v| v as usize),
        }
    }

    fn insert(&mut self, key: i64, id: usize) {
        match self {
            Children::List(v) => {
                v.push((key, id));
                if v.len() > CHILD_LIST_THRESHOLD {
                    let mut t = HashTable::new();
                    for (k, id) in v.drain(..) {
                        t.insert(k as u64, id as i64);
                    }
                    *self = Children::Hashed(t);
                }
            }
            Children::Hashed(t) => {
                t.insert(key as u64, id as i64);
            }
        }
    }
}

impl Default for Children {
    fn default() -> Self {
        Children::List(Vec::new())
    }
}

struct Node {
    parent_id: i64,
    key: i64,
    children: Children,
}

/// A prefix tree over sequences of `i64` edge labels. Node 0 is always the
/// root (`key == NONE`, `parent_id == NONE`).
pub struct Tree {
    nodes: Growable<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: Growable::from_vec(vec![Node {
                parent_id: NONE,
                key: NONE,
                children: Children::default(),
            }]),
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].children = Children::default();
    }

    pub fn parent_of(&self, id: usize) -> Option<usize> {
        let p = self.nodes[id].parent_id;
        if p == NONE {
            None
        } else {
            Some(p as usize)
        }
    }

    /// Looks up the child of `id` reached by `key`, if any.
    pub fn child(&self, id: usize, key: i64) -> Option<usize> {
        self.nodes[id].children.get(key)
    }

    /// Looks up the child of `id` reached by `key`, creating it if absent.
    /// Returns `(child_id, was_created)`.
    pub fn child_or_insert(&mut self, id: usize, key: i64) -> Result<(usize, bool)> {
        if let Some(child) = self.nodes[id].children.get(key) {
            return Ok((child, false));
        }
        let new_id = self.nodes.len();
        self.nodes.push(Node { parent_id: id as i64, key, children: Children::default() })?;
        self.nodes[id].children.insert(key, new_id);
        Ok((new_id, true))
    }

    /// Walks `path` from the root, creating nodes as needed, returning the
    /// final node id.
    pub fn add(&mut self, path: &[i64]) -> Result<usize> {
        let mut node = self.root();
        for &key in path {
            node = self.child_or_insert(node, key)?.0;
        }
        Ok(node)
    }

    /// Walks `path` from the root without creating nodes, returning the
    /// final node id if the full path exists.
    pub fn find(&self, path: &[i64]) -> Option<usize> {
        let mut node = self.root();
        for &key in path {
            node = self.child(node, key)?;
        }
        Some(node)
    }

    pub fn has(&self, path: &[i64]) -> bool {
        self.find(path).is_some()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_find_path() {
        let mut t = Tree::new();
        let id = t.add(&[1, 2, 3]).unwrap();
        assert_eq!(t.find(&[1, 2, 3]), Some(id));
        let via_1 = t.child(t.root(), 1).unwrap();
        let via_1_2 = t.child(via_1, 2).unwrap();
        assert_eq!(t.find(&[1, 2]), Some(via_1_2));
    }

    #[test]
    fn shared_prefixes_share_nodes() {
        let mut t = Tree::new();
        let a = t.add(&[1, 2]).unwrap();
        let b = t.add(&[1, 3]).unwrap();
        assert_ne!(a, b);
        let via_1 = t.child(t.root(), 1).unwrap();
        assert_eq!(t.child(via_1, 2), Some(a));
        assert_eq!(t.child(via_1, 3), Some(b));
    }

    #[test]
    fn missing_path_not_found() {
        let mut t = Tree::new();
        t.add(&[1, 2]).unwrap();
        assert_eq!(t.find(&[1, 9]), None);
        assert!(!t.has(&[9]));
    }

    #[test]
    fn upgrades_to_hashed_children_past_threshold() {
        let mut t = Tree::new();
        for k in 0..20i64 {
            t.add(&[k]).unwrap();
        }
        for k in 0..20i64 {
            assert!(t.child(t.root(), k).is_some());
        }
    }
}
