//! elastic-hashmap: A single-threaded, separate-chaining map that grows
//! *and* shrinks with its load factor and exposes an explicit key cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build ElasticHashMap in small, verifiable layers so the resize
//!   policy, bucket placement and traversal can be reasoned about (and
//!   tested) independently.
//! - Layers:
//!   - Chain: one bucket's entry run in insertion order; linear scans,
//!     in-place overwrite, shifting removal.
//!   - BucketArray<K, V>: a fixed run of chains plus hash-to-index
//!     reduction; never resized in place, only replaced wholesale.
//!   - ResizePolicy: pure grow/shrink decisions computed from
//!     `(len, capacity)`; owns no table state.
//!   - ElasticHashMap<K, V, S>: public facade owning the length, hasher,
//!     reserved key and the resize loop.
//!   - Cursor: key traversal in ascending-bucket then insertion order,
//!     with an explicit `has_next`/`try_next` protocol.
//!
//! Constraints
//! - Single-threaded: mutation goes through `&mut self`, and a live cursor
//!   borrow statically excludes mutation during traversal.
//! - Growth happens on the put whose resulting size would sit above the
//!   load ceiling, doubling until that size fits; overwrites re-check with
//!   the unchanged size, so `len / capacity <= max_load` holds right after
//!   every put.
//! - Shrinking happens after a removal leaves a non-empty table strictly
//!   below half load; one halving per removal, never below one bucket. A
//!   halving may overshoot the ceiling until the next put.
//! - Resizes run inline on the triggering call; costs amortize but are
//!   never deferred to a background step.
//!
//! Why this split?
//! - Localize invariants: the policy is arithmetic over two integers, the
//!   array owns index reduction, the facade owns bookkeeping.
//! - The cursor reads the same chain slices the map writes, so traversal
//!   order falls out of the storage layout instead of a parallel index.
//!
//! Bucket placement
//! - The raw 64-bit hash is reinterpreted as a two's-complement signed
//!   value and reduced with a Euclidean remainder. Hash codes with the top
//!   bit set therefore land on a valid bucket at any capacity, power of
//!   two or not.
//!
//! Hasher and rehashing invariants
//! - Each entry stores a precomputed `u64` hash and routing always uses
//!   the stored hash; `K: Hash` is never invoked after insertion, and a
//!   rehash runs no user code at all.
//!
//! Notes and non-goals
//! - No incremental rehashing, no entry API, no value-indexed lookups.
//! - Not an open-addressing table; lookup cost tracks chain length, which
//!   the load ceiling bounds in expectation.
//! - An optional reserved key (builder-configured) is refused by `put` and
//!   invisible to reads; the map itself never stores it.
//! - Keys are immutable post-insert; there is no `key_mut`.
//! - Public API surface is `ElasticHashMap`, its builder, and the cursor
//!   types; lower layers are implementation details.

mod bucket_array;
mod chain;
pub mod cursor;
pub mod elastic_hash_map;
mod elastic_hash_map_proptest;
mod policy;

// Public surface
pub use cursor::{Cursor, Exhausted, Iter, IterMut};
pub use elastic_hash_map::{ElasticHashMap, ElasticHashMapBuilder, PutError};
