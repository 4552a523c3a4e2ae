//! Model-based tests: random operation sequences against `hashbrown::HashMap`.

use hashbrown::HashMap;
use long_map::{LongHashMap, LongMap};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(i64, u16),
    Get(i64),
    Remove(i64),
    Clear,
}

/// Keys drawn from a narrow range so that puts, removes and collisions overlap,
/// plus the extremes of `i64`.
fn key() -> impl Strategy<Value = i64> {
    prop_oneof![
        8 => -40i64..40,
        1 => Just(i64::MIN),
        1 => Just(i64::MAX),
        1 => (0i64..8).prop_map(|k| k << 32),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (key(), any::<u16>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => key().prop_map(Op::Get),
        3 => key().prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn assert_matches_model(map: &LongHashMap<u16>, model: &HashMap<i64, u16>) {
    assert_eq!(map.len(), model.len());
    assert_eq!(map.is_empty(), model.is_empty());

    let keys = map.keys();
    let values = map.values();
    assert_eq!(keys.len(), map.len());
    assert_eq!(values.len(), map.len());
    for (key, value) in keys.iter().zip(values) {
        assert_eq!(model.get(key), Some(value));
    }

    let mut sorted = keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), keys.len(), "duplicate keys: {keys:?}");

    assert_eq!(map.iter().count(), map.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn behaves_like_hashbrown(
        buckets in 0usize..8,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut map = LongHashMap::with_bucket_count(buckets);
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    prop_assert_eq!(map.put(k, v), model.insert(k, v));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(k), model.get(&k));
                    prop_assert_eq!(map.contains_key(k), model.contains_key(&k));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(k), model.remove(&k));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            assert_matches_model(&map, &model);
        }

        for value in model.values() {
            prop_assert!(map.contains_value(value));
        }
    }

    #[test]
    fn distinct_puts_are_all_retrievable(keys in prop::collection::hash_set(any::<i64>(), 0..300)) {
        let mut map = LongHashMap::new();
        for &k in &keys {
            prop_assert_eq!(map.put(k, k.wrapping_mul(3)), None);
        }
        prop_assert_eq!(map.len(), keys.len());
        for &k in &keys {
            let expected = k.wrapping_mul(3);
            prop_assert_eq!(map.get(k), Some(&expected));
        }
    }

    #[test]
    fn clear_forgets_everything(entries in prop::collection::vec((key(), any::<u16>()), 1..100)) {
        let mut map: LongHashMap<u16> = entries.iter().copied().collect();
        let buckets = map.bucket_count();
        map.clear();

        prop_assert!(LongMap::is_empty(&map));
        prop_assert_eq!(map.bucket_count(), buckets);
        for (k, v) in entries {
            prop_assert_eq!(map.get(k), None);
            prop_assert!(!map.contains_key(k));
            prop_assert!(!map.contains_value(&v));
        }
    }
}
