// Property tests over the public surface only.
//
// These complement the in-crate model tests by driving the map the way an
// external user can: arbitrary starting capacities, arbitrary load
// ceilings, and long interleavings of puts and removes.
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use elastic_hashmap::{ElasticHashMap, ElasticHashMapBuilder};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // Test: the load bound under arbitrary configuration.
    // Verifies: for any starting capacity (zero clamps to one) and any
    // positive ceiling, size/capacity <= max_load after every put.
    #[test]
    fn load_bound_holds_for_any_ceiling(
        capacity in 0..40usize,
        max_load in 0.05f64..3.0,
        keys in prop_vec(any::<u16>(), 1..300),
    ) {
        let mut map = ElasticHashMapBuilder::new()
            .initial_capacity(capacity)
            .max_load(max_load)
            .build();
        for k in keys {
            map.put(k, u32::from(k)).unwrap();
            prop_assert!(map.load_factor() <= map.max_load());
            prop_assert!(map.capacity() >= 1);
        }
    }

    // Test: membership against a reference map.
    // Verifies: after interleaved puts and removes, every surviving key is
    // retrievable with its latest value, every removal echoed the model,
    // and the cursor walk covers exactly the survivors.
    #[test]
    fn membership_matches_model(
        ops in prop_vec((any::<u8>(), any::<bool>()), 1..400),
    ) {
        let mut map = ElasticHashMap::new();
        let mut model: HashMap<u8, u32> = HashMap::new();
        let mut serial = 0u32;
        for (key, insert) in ops {
            if insert {
                serial += 1;
                map.put(key, serial).unwrap();
                model.insert(key, serial);
            } else {
                prop_assert_eq!(map.remove(&key), model.remove(&key));
            }
        }
        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
        let walked: HashSet<u8> = map.keys().copied().collect();
        let expected: HashSet<u8> = model.keys().copied().collect();
        prop_assert_eq!(walked, expected);
    }

    // Test: key_set against the cursor walk.
    // Verifies: both views hold exactly the inserted keys, for arbitrary
    // populations.
    #[test]
    fn key_set_equals_cursor_walk(
        keys in prop::collection::hash_set(any::<u32>(), 0..200),
    ) {
        let mut map = ElasticHashMap::new();
        for &k in &keys {
            map.put(k, ()).unwrap();
        }
        let set = map.key_set();
        let walked: HashSet<u32> = map.keys().copied().collect();
        prop_assert_eq!(set.len(), keys.len());
        prop_assert_eq!(walked.len(), keys.len());
        prop_assert!(walked.iter().all(|k| set.contains(k)));
    }

    // Test: clear under arbitrary growth.
    // Verifies: clear always restores the construction capacity, whatever
    // growth the puts forced.
    #[test]
    fn clear_restores_construction_capacity(
        capacity in 1..24usize,
        keys in prop_vec(any::<u16>(), 0..200),
    ) {
        let mut map = ElasticHashMapBuilder::new()
            .initial_capacity(capacity)
            .build();
        for k in keys {
            map.put(k, ()).unwrap();
        }
        map.clear();
        prop_assert_eq!(map.capacity(), capacity);
        prop_assert_eq!(map.len(), 0);
    }

    // Test: shrinking never loses entries.
    // Verifies: after removing an arbitrary subset, the survivors are all
    // retrievable and the length matches.
    #[test]
    fn shrink_keeps_survivors(
        keys in prop::collection::hash_set(any::<u16>(), 1..200),
        drop_mask in prop_vec(any::<bool>(), 200),
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let mut map = ElasticHashMap::new();
        for &k in &keys {
            map.put(k, u64::from(k) * 3).unwrap();
        }
        let mut survivors = Vec::new();
        for (i, &k) in keys.iter().enumerate() {
            if drop_mask[i % drop_mask.len()] {
                prop_assert_eq!(map.remove(&k), Some(u64::from(k) * 3));
            } else {
                survivors.push(k);
            }
        }
        prop_assert_eq!(map.len(), survivors.len());
        for &k in &survivors {
            prop_assert_eq!(map.get(&k), Some(&(u64::from(k) * 3)));
        }
    }
}
