//! ElasticHashMap: the public facade over chains, bucket array and policy.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

use hashbrown::HashSet;
use thiserror::Error;

use crate::bucket_array::BucketArray;
use crate::chain::Entry;
use crate::cursor::{Cursor, Iter, IterMut};
use crate::policy::ResizePolicy;

/// Bucket count for maps built without an explicit capacity.
const DEFAULT_INITIAL_CAPACITY: usize = 16;
/// Load ceiling for maps built without an explicit one.
const DEFAULT_MAX_LOAD: f64 = 0.75;

/// Error returned by [`ElasticHashMap::put`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PutError {
    /// The key equals the map's reserved sentinel key, which the map refuses
    /// to store (see [`ElasticHashMapBuilder::reserved_key`]).
    #[error("key is reserved as the map's absent sentinel")]
    ReservedKey,
}

/// A separate-chaining hash map that grows *and* shrinks with its load
/// factor.
///
/// Entries live in per-bucket chains in insertion order. Every entry caches
/// its key's raw hash, so rehashing after a resize re-routes entries without
/// running `K: Hash` or `K: Eq` again. The bucket count is observable via
/// [`capacity`](Self::capacity) throughout, which keeps the resize policy's
/// behavior testable from outside.
pub struct ElasticHashMap<K, V, S = RandomState> {
    buckets: BucketArray<K, V>,
    len: usize,
    policy: ResizePolicy,
    initial_capacity: usize,
    reserved: Option<K>,
    hasher: S,
}

/// Builder for [`ElasticHashMap`] with a non-default capacity, load ceiling,
/// hasher, or reserved key.
pub struct ElasticHashMapBuilder<K, S = RandomState> {
    initial_capacity: usize,
    max_load: f64,
    reserved: Option<K>,
    hasher: S,
}

impl<K> ElasticHashMapBuilder<K, RandomState> {
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load: DEFAULT_MAX_LOAD,
            reserved: None,
            hasher: RandomState::new(),
        }
    }
}

impl<K> Default for ElasticHashMapBuilder<K, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> ElasticHashMapBuilder<K, S> {
    /// Bucket count the map starts with and returns to on
    /// [`clear`](ElasticHashMap::clear). Clamped to at least one bucket.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1);
        self
    }

    /// Load ceiling above which a put grows the table. Values above `1.0`
    /// are legal; chains simply run longer.
    ///
    /// # Panics
    ///
    /// Panics unless `max_load` is positive and finite.
    pub fn max_load(mut self, max_load: f64) -> Self {
        assert!(
            max_load > 0.0 && max_load.is_finite(),
            "max load factor must be positive and finite"
        );
        self.max_load = max_load;
        self
    }

    /// Designates a key the map refuses to store: a put of exactly this key
    /// fails with [`PutError::ReservedKey`], and reads treat it as absent.
    pub fn reserved_key(mut self, key: K) -> Self {
        self.reserved = Some(key);
        self
    }

    /// Swaps in a custom hasher builder.
    pub fn hasher<T: BuildHasher>(self, hasher: T) -> ElasticHashMapBuilder<K, T> {
        ElasticHashMapBuilder {
            initial_capacity: self.initial_capacity,
            max_load: self.max_load,
            reserved: self.reserved,
            hasher,
        }
    }

    pub fn build<V>(self) -> ElasticHashMap<K, V, S>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        ElasticHashMap {
            buckets: BucketArray::new(self.initial_capacity),
            len: 0,
            policy: ResizePolicy::new(self.max_load),
            initial_capacity: self.initial_capacity,
            reserved: self.reserved,
            hasher: self.hasher,
        }
    }
}

impl<K, V> ElasticHashMap<K, V>
where
    K: Eq + Hash,
{
    /// An empty map with 16 buckets and a load ceiling of 0.75.
    pub fn new() -> Self {
        ElasticHashMapBuilder::new().build()
    }

    /// An empty map with `capacity` buckets (clamped to at least one) and
    /// the default load ceiling.
    pub fn with_capacity(capacity: usize) -> Self {
        ElasticHashMapBuilder::new().initial_capacity(capacity).build()
    }
}

impl<K, V> Default for ElasticHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ElasticHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// An empty map with default capacity and load ceiling, hashing with
    /// `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        ElasticHashMapBuilder::new().hasher(hasher).build()
    }

    /// Inserts `key` with `value`, or overwrites the stored value in place
    /// when an equal key is already present.
    ///
    /// For a new key the table first grows whenever adding the entry would
    /// push the load above [`max_load`](Self::max_load), doubling as many
    /// times as the incoming size needs; the entry then lands in the grown
    /// table. An overwrite adds no entry but re-checks the load with the
    /// unchanged size, so the bound holds after every put even when a
    /// shrink had overshot the ceiling. Fails with
    /// [`PutError::ReservedKey`] if `key` equals the reserved key, leaving
    /// the map untouched.
    pub fn put(&mut self, key: K, value: V) -> Result<(), PutError> {
        if self.reserved.as_ref() == Some(&key) {
            return Err(PutError::ReservedKey);
        }
        let hash = self.hasher.hash_one(&key);
        if let Some(entry) = self.buckets.chain_mut(hash).find_mut(&key) {
            entry.value = value;
            // Regrow if a shrink overshoot left the load above the ceiling.
            if let Some(target) = self.policy.grow_target(self.len, self.buckets.capacity()) {
                self.rebuild(target);
            }
            return Ok(());
        }
        if let Some(target) = self.policy.grow_target(self.len + 1, self.buckets.capacity()) {
            self.rebuild(target);
        }
        self.buckets.push_entry(Entry { key, value, hash });
        self.len += 1;
        Ok(())
    }

    /// The value stored for `key`, if any. The key may be any borrowed form
    /// of `K`, matching the std map convention.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        let hash = self.hasher.hash_one(key);
        self.buckets.chain(hash).find(key).map(|e| &e.value)
    }

    /// Mutable access to the value stored for `key`, if any.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        let hash = self.hasher.hash_one(key);
        self.buckets.chain_mut(hash).find_mut(key).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get(key).is_some()
    }

    /// Removes `key`'s entry and returns its value.
    ///
    /// After a successful removal a non-empty table at less than half load
    /// halves its capacity, never below one bucket. That single halving may
    /// leave the load above [`max_load`](Self::max_load) until the next put
    /// restores the bound. Removing an absent key changes nothing.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        let hash = self.hasher.hash_one(key);
        let entry = self.buckets.chain_mut(hash).remove(key)?;
        self.len -= 1;
        self.shrink_if_sparse();
        Some(entry.value)
    }

    /// Removes `key`'s entry only when its stored value equals `expected`,
    /// returning the removed value. Absent keys and mismatched values both
    /// leave the map untouched and yield `None`.
    pub fn remove_if_eq<Q>(&mut self, key: &Q, expected: &V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
        V: PartialEq,
    {
        let hash = self.hasher.hash_one(key);
        let entry = self
            .buckets
            .chain_mut(hash)
            .remove_matching(key, |stored| stored == expected)?;
        self.len -= 1;
        self.shrink_if_sparse();
        Some(entry.value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count. Grows and shrinks with the load factor.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Current load, `len / capacity`. The capacity is never zero.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.capacity() as f64
    }

    /// The configured load ceiling.
    pub fn max_load(&self) -> f64 {
        self.policy.max_load()
    }

    /// The key this map refuses to store, if one was configured.
    pub fn reserved_key(&self) -> Option<&K> {
        self.reserved.as_ref()
    }

    /// Drops every entry and returns the table to the capacity it was
    /// constructed with.
    pub fn clear(&mut self) {
        self.buckets = BucketArray::new(self.initial_capacity);
        self.len = 0;
    }

    /// Snapshots the keys into an owned set sharing this map's hasher. The
    /// snapshot is independent of later edits to the map.
    pub fn key_set(&self) -> HashSet<K, S>
    where
        K: Clone,
        S: Clone,
    {
        let mut keys = HashSet::with_capacity_and_hasher(self.len, self.hasher.clone());
        for chain in self.buckets.chains() {
            for entry in chain.iter() {
                keys.insert(entry.key.clone());
            }
        }
        keys
    }

    /// A [`Cursor`] over the keys: ascending bucket index, insertion order
    /// within each bucket.
    pub fn keys(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.buckets.chains())
    }

    /// Iterates `(&K, &V)` pairs in cursor order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.buckets.chains())
    }

    /// Iterates `(&K, &mut V)` pairs in cursor order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.buckets.chains_mut())
    }

    fn shrink_if_sparse(&mut self) {
        if let Some(target) = self.policy.shrink_target(self.len, self.buckets.capacity()) {
            self.rebuild(target);
        }
    }

    /// Full-table rehash into `new_capacity` buckets. The replacement array
    /// is filled completely from the cached hashes and then swapped in
    /// wholesale, so no user code runs mid-resize and no partial table is
    /// ever observable.
    fn rebuild(&mut self, new_capacity: usize) {
        let mut fresh = BucketArray::new(new_capacity);
        for chain in self.buckets.chains_mut() {
            for entry in chain.drain() {
                fresh.push_entry(entry);
            }
        }
        self.buckets = fresh;
        debug_assert_eq!(self.len, self.buckets.total_entries());
    }
}

impl<K, V, S> Extend<(K, V)> for ElasticHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Bulk [`put`](ElasticHashMap::put) with last-wins semantics. Pairs
    /// keyed by the reserved key are skipped, since extend has no channel to
    /// report them.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            let _ = self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ElasticHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = ElasticHashMap::new();
        map.extend(entries);
        map
    }
}
