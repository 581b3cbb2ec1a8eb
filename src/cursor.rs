//! Cursor: explicit key traversal across the whole table.

use crate::chain::{Chain, Entry};
use core::slice;
use thiserror::Error;

/// Error from advancing a [`Cursor`] past its last key.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cursor exhausted: every key has been yielded")]
pub struct Exhausted;

/// A key cursor walking buckets in ascending index order and each bucket's
/// chain in insertion order.
///
/// The cursor borrows the map, so the borrow checker rules out mutating the
/// map while it lives. [`has_next`](Cursor::has_next) may park the cursor
/// forward over empty buckets; it never consumes a key, and asking twice in
/// a row gives the same answer.
pub struct Cursor<'a, K, V> {
    outer: slice::Iter<'a, Chain<K, V>>,
    inner: slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(chains: &'a [Chain<K, V>]) -> Self {
        Self {
            outer: chains.iter(),
            inner: Default::default(),
        }
    }

    /// True while at least one key remains. Skips over empty buckets until
    /// it parks on a pending entry or runs off the table.
    pub fn has_next(&mut self) -> bool {
        while self.inner.as_slice().is_empty() {
            match self.outer.next() {
                Some(chain) => self.inner = chain.iter(),
                None => return false,
            }
        }
        true
    }

    /// Yields the next key, or [`Exhausted`] once the traversal is complete.
    /// Calling again after exhaustion keeps returning the error.
    pub fn try_next(&mut self) -> Result<&'a K, Exhausted> {
        if !self.has_next() {
            return Err(Exhausted);
        }
        let entry = self
            .inner
            .next()
            .expect("has_next parked on a pending entry");
        Ok(&entry.key)
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.try_next().ok()
    }
}

/// Iterator over `(&K, &V)` pairs in cursor order.
pub struct Iter<'a, K, V> {
    outer: slice::Iter<'a, Chain<K, V>>,
    inner: slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(chains: &'a [Chain<K, V>]) -> Self {
        Self {
            outer: chains.iter(),
            inner: Default::default(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.inner.next() {
                return Some((&entry.key, &entry.value));
            }
            self.inner = self.outer.next()?.iter();
        }
    }
}

/// Iterator over `(&K, &mut V)` pairs in cursor order. Keys stay shared;
/// only values are handed out mutably.
pub struct IterMut<'a, K, V> {
    outer: slice::IterMut<'a, Chain<K, V>>,
    inner: slice::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(chains: &'a mut [Chain<K, V>]) -> Self {
        Self {
            outer: chains.iter_mut(),
            inner: Default::default(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.inner.next() {
                let Entry { key, value, .. } = entry;
                return Some((&*key, value));
            }
            self.inner = self.outer.next()?.iter_mut();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chains_of(layout: &[&[&'static str]]) -> Vec<Chain<&'static str, i32>> {
        layout.iter()
            .map(|keys| {
                let mut chain = Chain::new();
                for (i, &key) in keys.iter().enumerate() {
                    chain.push(Entry {
                        key,
                        value: i as i32,
                        hash: 0,
                    });
                }
                chain
            })
            .collect()
    }

    /// Invariant: an empty table's cursor has no keys, and `try_next` keeps
    /// failing once exhausted.
    #[test]
    fn empty_table_is_exhausted() {
        let chains = chains_of(&[&[], &[], &[]]);
        let mut cursor = Cursor::new(&chains);
        assert!(!cursor.has_next());
        assert_eq!(cursor.try_next(), Err(Exhausted));
        assert_eq!(cursor.try_next(), Err(Exhausted));
    }

    /// Invariant: traversal order is ascending bucket index, then insertion
    /// order within each bucket, with empty buckets skipped.
    #[test]
    fn walks_buckets_then_chains() {
        let chains = chains_of(&[&[], &["a", "b"], &[], &["c"], &[]]);
        let mut cursor = Cursor::new(&chains);
        let mut seen = Vec::new();
        while cursor.has_next() {
            seen.push(*cursor.try_next().unwrap());
        }
        assert_eq!(seen, ["a", "b", "c"]);
        assert_eq!(cursor.try_next(), Err(Exhausted));
    }

    /// Invariant: `has_next` is a question, not a step; repeated calls do not
    /// skip or consume a key.
    #[test]
    fn has_next_does_not_consume() {
        let chains = chains_of(&[&[], &["a"]]);
        let mut cursor = Cursor::new(&chains);
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(cursor.try_next(), Ok(&"a"));
        assert!(!cursor.has_next());
        assert!(!cursor.has_next());
    }

    /// Invariant: the `Iterator` adapter yields exactly the cursor sequence
    /// and interleaves cleanly with `try_next`.
    #[test]
    fn iterator_adapter_matches_protocol() {
        let chains = chains_of(&[&["a"], &[], &["b", "c"]]);
        let keys: Vec<_> = Cursor::new(&chains).copied().collect();
        assert_eq!(keys, ["a", "b", "c"]);

        let mut cursor = Cursor::new(&chains);
        assert_eq!(cursor.next(), Some(&"a"));
        assert_eq!(cursor.try_next(), Ok(&"b"));
        assert_eq!(cursor.next(), Some(&"c"));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.try_next(), Err(Exhausted));
    }

    /// Invariant: `Iter` pairs each key with its value in cursor order.
    #[test]
    fn iter_yields_pairs() {
        let chains = chains_of(&[&["a"], &[], &["b", "c"]]);
        let pairs: Vec<_> = Iter::new(&chains).map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [("a", 0), ("b", 0), ("c", 1)]);
    }

    /// Invariant: `IterMut` reaches every value exactly once.
    #[test]
    fn iter_mut_reaches_every_value() {
        let mut chains = chains_of(&[&["a", "b"], &[], &["c"]]);
        for (_, v) in IterMut::new(&mut chains) {
            *v += 10;
        }
        let values: Vec<_> = Iter::new(&chains).map(|(_, v)| *v).collect();
        assert_eq!(values, [10, 11, 10]);
    }
}
