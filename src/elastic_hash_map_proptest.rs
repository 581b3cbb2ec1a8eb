#![cfg(test)]
//! Model-based property tests: every operation interleaving must leave
//! ElasticHashMap agreeing with a reference map.

use core::hash::{BuildHasher, Hasher};

use hashbrown::HashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::elastic_hash_map::{ElasticHashMap, ElasticHashMapBuilder};

/// Hasher that returns a constant, forcing every key into one bucket.
struct ConstHasher(u64);

impl Hasher for ConstHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

#[derive(Clone)]
struct ConstBuildHasher(u64);

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;

    fn build_hasher(&self) -> ConstHasher {
        ConstHasher(self.0)
    }
}

/// Hasher whose output is the key's own `i64` bits, exercising signed index
/// reduction at every capacity a run visits.
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    fn write_i64(&mut self, i: i64) {
        self.0 = i as u64;
    }
}

#[derive(Clone, Default)]
struct IdentityBuildHasher;

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> IdentityHasher {
        IdentityHasher(0)
    }
}

/// Operations drawn over a small shared key pool, so sequences revisit keys
/// often enough to exercise overwrite, removal and re-insertion.
#[derive(Debug, Clone)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    GetMut(usize, i32),
    Remove(usize),
    RemoveIfEq(usize, i32),
    Contains(usize),
    Clear,
}

fn arb_op(pool: usize) -> impl Strategy<Value = OpI> {
    prop_oneof![
        4 => (0..pool, any::<i32>()).prop_map(|(k, v)| OpI::Put(k, v)),
        2 => (0..pool).prop_map(OpI::Get),
        1 => (0..pool, any::<i32>()).prop_map(|(k, v)| OpI::GetMut(k, v)),
        2 => (0..pool).prop_map(OpI::Remove),
        1 => (0..pool, any::<i32>()).prop_map(|(k, v)| OpI::RemoveIfEq(k, v)),
        1 => (0..pool).prop_map(OpI::Contains),
        1 => Just(OpI::Clear),
    ]
}

fn arb_scenario() -> impl Strategy<Value = Vec<OpI>> {
    (1..16usize).prop_flat_map(|pool| prop::collection::vec(arb_op(pool), 0..120))
}

fn run_scenario<S>(
    map: &mut ElasticHashMap<String, i32, S>,
    ops: &[OpI],
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match *op {
            OpI::Put(k, v) => {
                let key = format!("key{k}");
                map.put(key.clone(), v).expect("no reserved key configured");
                model.insert(key, v);
                // The load bound must hold right after every put.
                prop_assert!(map.load_factor() <= map.max_load());
            }
            OpI::Get(k) => {
                let key = format!("key{k}");
                prop_assert_eq!(map.get(key.as_str()), model.get(key.as_str()));
            }
            OpI::GetMut(k, v) => {
                let key = format!("key{k}");
                let got = map.get_mut(key.as_str());
                let want = model.get_mut(key.as_str());
                prop_assert_eq!(got.is_some(), want.is_some());
                if let (Some(slot), Some(model_slot)) = (got, want) {
                    *slot = v;
                    *model_slot = v;
                }
            }
            OpI::Remove(k) => {
                let key = format!("key{k}");
                prop_assert_eq!(map.remove(key.as_str()), model.remove(key.as_str()));
            }
            OpI::RemoveIfEq(k, v) => {
                let key = format!("key{k}");
                let expected = if model.get(key.as_str()) == Some(&v) {
                    model.remove(key.as_str())
                } else {
                    None
                };
                prop_assert_eq!(map.remove_if_eq(key.as_str(), &v), expected);
            }
            OpI::Contains(k) => {
                let key = format!("key{k}");
                prop_assert_eq!(map.contains_key(key.as_str()), model.contains_key(key.as_str()));
            }
            OpI::Clear => {
                map.clear();
                model.clear();
            }
        }
        prop_assert_eq!(map.len(), model.len());
        prop_assert_eq!(map.is_empty(), model.is_empty());
        prop_assert!(map.capacity() >= 1);
    }

    // Terminal key agreement three ways: key_set, cursor walk, and model.
    let set = map.key_set();
    prop_assert_eq!(set.len(), model.len());
    for key in model.keys() {
        prop_assert!(set.contains(key.as_str()));
    }
    let walked: Vec<&String> = map.keys().collect();
    prop_assert_eq!(walked.len(), model.len());
    for key in walked {
        prop_assert_eq!(map.get(key.as_str()), model.get(key.as_str()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// Invariant: under the default hasher the map agrees with a reference
    /// map after every operation, at every capacity the sequence reaches.
    #[test]
    fn matches_model(ops in arb_scenario()) {
        let mut map = ElasticHashMap::new();
        run_scenario(&mut map, &ops)?;
    }

    /// Invariant: agreement survives total hash collisions, where every key
    /// shares one chain.
    #[test]
    fn matches_model_under_full_collision(ops in arb_scenario()) {
        let mut map = ElasticHashMapBuilder::new()
            .hasher(ConstBuildHasher(11))
            .build();
        run_scenario(&mut map, &ops)?;
    }

    /// Invariant: agreement holds from a one-bucket start, which forces the
    /// densest grow/shrink traffic.
    #[test]
    fn matches_model_from_one_bucket(ops in arb_scenario()) {
        let mut map = ElasticHashMapBuilder::new().initial_capacity(1).build();
        run_scenario(&mut map, &ops)?;
    }

    /// Invariant: signed hash codes, negatives included, keep the map in
    /// agreement with the model through arbitrary grow/shrink traffic at
    /// non-power-of-two capacities.
    #[test]
    fn matches_model_with_signed_hashes(
        ops in prop::collection::vec((-8i64..8, any::<bool>()), 1..200),
    ) {
        let mut map = ElasticHashMapBuilder::new()
            .initial_capacity(10)
            .hasher(IdentityBuildHasher)
            .build();
        let mut model: HashMap<i64, i64> = HashMap::new();
        for (key, insert) in ops {
            if insert {
                map.put(key, key.wrapping_mul(3)).expect("no reserved key configured");
                model.insert(key, key.wrapping_mul(3));
            } else {
                prop_assert_eq!(map.remove(&key), model.remove(&key));
            }
            prop_assert_eq!(map.len(), model.len());
        }
        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }
}
