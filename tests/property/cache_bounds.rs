//! The search cache never grows past its capacity and evicts oldest first.

use marginalia::cache::SearchCache;
use proptest::prelude::*;

#[test]
fn test_150_inserts_into_100_slots() {
    let mut cache: SearchCache<String, usize> = SearchCache::new(100);
    for i in 0..150 {
        cache.set(format!("query {}", i), i);
    }
    assert_eq!(cache.len(), 100);
    for i in 0..50 {
        assert!(cache.get(&format!("query {}", i)).is_none(), "query {} survived", i);
    }
    for i in 50..150 {
        assert_eq!(cache.get(&format!("query {}", i)), Some(&i));
    }
}

proptest! {
    #[test]
    fn prop_len_never_exceeds_capacity(
        capacity in 1usize..64,
        keys in prop::collection::vec(0u16..200, 0..300),
    ) {
        let mut cache = SearchCache::new(capacity);
        for key in keys {
            cache.set(key, ());
            prop_assert!(cache.len() <= capacity);
        }
    }

    #[test]
    fn prop_distinct_inserts_keep_the_newest(capacity in 1usize..64, extra in 0usize..64) {
        let total = capacity + extra;
        let mut cache = SearchCache::new(capacity);
        for key in 0..total {
            cache.set(key, key * 2);
        }
        prop_assert_eq!(cache.len(), capacity);
        for key in 0..extra {
            prop_assert!(cache.get(&key).is_none());
        }
        for key in extra..total {
            prop_assert_eq!(cache.get(&key), Some(&(key * 2)));
        }
    }
}
