//! Chain: the ordered entry run of one bucket.

use core::borrow::Borrow;

/// One key-value pair plus the key's raw hash, cached at insertion.
///
/// Routing always uses the stored hash, so `K: Hash` never runs again after
/// the entry enters the table; a rehash re-reduces this value and calls no
/// user code.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

/// A single collision chain. Entries keep insertion order: overwrites happen
/// in place and removal shifts the tail instead of swapping, so a traversal
/// reaching this chain sees its surviving entries in arrival order.
#[derive(Debug)]
pub(crate) struct Chain<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Chain<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a new entry. Callers guarantee the key is not already present.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().position(|e| e.key.borrow() == key)
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().find(|e| e.key.borrow() == key)
    }

    pub(crate) fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter_mut().find(|e| e.key.borrow() == key)
    }

    /// Unlink and return the entry for `key`, shifting later entries down.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let i = self.position(key)?;
        Some(self.entries.remove(i))
    }

    /// Unlink the entry for `key` only when its value passes `matches`;
    /// otherwise the chain is untouched.
    pub(crate) fn remove_matching<Q, F>(&mut self, key: &Q, matches: F) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        F: FnOnce(&V) -> bool,
    {
        let i = self.position(key)?;
        if !matches(&self.entries[i].value) {
            return None;
        }
        Some(self.entries.remove(i))
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }

    /// Move every entry out, leaving the chain empty.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Entry<K, V>> {
        self.entries.drain(..)
    }
}
