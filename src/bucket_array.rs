//! BucketArray: a fixed run of chains plus hash-to-bucket reduction.

use crate::chain::{Chain, Entry};

/// Reduces a raw hash to a bucket index in `[0, capacity)`.
///
/// The hash is reinterpreted as a two's-complement signed value and reduced
/// with a Euclidean remainder, so hashes with the top bit set ("negative"
/// codes) still land on a valid bucket for any positive capacity, power of
/// two or not.
pub(crate) fn reduced_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket array must have at least one bucket");
    (hash as i64).rem_euclid(capacity as i64) as usize
}

/// The table's backing storage: `capacity` independent chains. The array
/// itself never resizes; the map swaps in a whole new one instead.
pub(crate) struct BucketArray<K, V> {
    chains: Vec<Chain<K, V>>,
}

impl<K, V> BucketArray<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut chains = Vec::with_capacity(capacity);
        chains.resize_with(capacity, Chain::new);
        Self { chains }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn chain(&self, hash: u64) -> &Chain<K, V> {
        &self.chains[reduced_index(hash, self.chains.len())]
    }

    pub(crate) fn chain_mut(&mut self, hash: u64) -> &mut Chain<K, V> {
        let i = reduced_index(hash, self.chains.len());
        &mut self.chains[i]
    }

    /// Route an entry to its bucket by the cached hash. Callers guarantee the
    /// key is not already present anywhere in the array.
    pub(crate) fn push_entry(&mut self, entry: Entry<K, V>) {
        self.chain_mut(entry.hash).push(entry);
    }

    pub(crate) fn chains(&self) -> &[Chain<K, V>] {
        &self.chains
    }

    pub(crate) fn chains_mut(&mut self) -> &mut [Chain<K, V>] {
        &mut self.chains
    }

    /// Sum of all chain lengths; the map's entry count must always equal it.
    pub(crate) fn total_entries(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }
}
