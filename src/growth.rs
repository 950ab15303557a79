//! Golden-ratio capacity growth for the crate's id-keyed arrays.
//!
//! Grounded in `original_source/src/array.c`'s `array_grow`/`array_grow_size`:
//! a dynamic array starts at `ARRAY_SIZE_INIT` and, once full, grows to
//! `ARRAY_GROW * size` (golden ratio, ~1.618) rather than doubling. spec.md
//! calls this factor out explicitly as worth preserving over a 2x policy, so
//! [`Growable`] reimplements it on top of `Vec` via `reserve_exact` rather
//! than relying on `Vec`'s own (roughly 2x) amortized growth.

use crate::error::{CorpusError, Result};

const ARRAY_SIZE_INIT: usize = 32;
const ARRAY_GROW: f64 = 1.618;

/// `array_grow_size`: the next capacity at or above `count`, stepping up
/// from `size` by the golden-ratio factor.
fn grow_capacity(count: usize, mut size: usize) -> usize {
    if size < ARRAY_SIZE_INIT && count > 0 {
        size = ARRAY_SIZE_INIT;
    }
    while size < count {
        let grown = (ARRAY_GROW * size as f64) as usize;
        size = grown.max(size + 1);
    }
    size
}

/// A `Vec`-backed array whose capacity grows by the golden-ratio factor
/// instead of `Vec`'s own doubling. Used for the crate's dense, id-indexed
/// arrays (`TextSet`'s interned items, `Symtab`'s parallel type tables,
/// `TermSet`'s registered terms, `Tree`'s node arena) -- the arrays
/// `original_source` grows with `corpus_array_grow`.
pub struct Growable<T> {
    items: Vec<T>,
}

impl<T> Growable<T> {
    pub fn new() -> Self {
        Growable { items: Vec::new() }
    }

    /// Wraps an already-built `Vec` (e.g. a tree's root node) without
    /// running it through the golden-ratio growth path.
    pub fn from_vec(items: Vec<T>) -> Self {
        Growable { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Appends `value`, growing the backing capacity by the golden-ratio
    /// factor first if the array is full.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            let target = grow_capacity(self.items.len() + 1, self.items.capacity());
            let additional = target.checked_sub(self.items.len()).ok_or_else(|| {
                CorpusError::overflow("array capacity would exceed platform limits")
            })?;
            self.items.reserve_exact(additional);
        }
        self.items.push(value);
        Ok(())
    }
}

impl<T> Default for Growable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Deref for Growable<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> std::ops::DerefMut for Growable<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_from_the_initial_size() {
        assert_eq!(grow_capacity(1, 0), ARRAY_SIZE_INIT);
        assert_eq!(grow_capacity(0, 0), 0);
    }

    #[test]
    fn steps_up_by_the_golden_ratio() {
        let size = grow_capacity(ARRAY_SIZE_INIT + 1, ARRAY_SIZE_INIT);
        assert_eq!(size, (ARRAY_GROW * ARRAY_SIZE_INIT as f64) as usize);
    }

    #[test]
    fn push_reuses_capacity_until_exhausted() {
        let mut g: Growable<i64> = Growable::new();
        for i in 0..ARRAY_SIZE_INIT {
            g.push(i as i64).unwrap();
        }
        assert_eq!(g.len(), ARRAY_SIZE_INIT);
        assert_eq!(g[0], 0);
    }
}
