//! Property-based tests for the TTL cache

use std::time::{Duration, Instant};

use proptest::prelude::*;
use panbridge_core::cache::TtlCache;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A value is readable exactly while `now < set_time + ttl`
    #[test]
    fn value_visible_only_before_expiry(ttl_ms in 0_u64..10_000, elapsed_ms in 0_u64..20_000) {
        let cache = TtlCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.set_at("key", 42_u32, Some(Duration::from_millis(ttl_ms)), start);

        let got = cache.get_at("key", start + Duration::from_millis(elapsed_ms));
        if elapsed_ms < ttl_ms {
            prop_assert_eq!(got, Some(42));
        } else {
            prop_assert_eq!(got, None);
            prop_assert!(cache.is_empty());
        }
    }

    /// The last write wins and restarts the lifetime
    #[test]
    fn overwrite_replaces_value_and_expiry(first in any::<u32>(), second in any::<u32>()) {
        let cache = TtlCache::new(Duration::from_millis(100));
        let start = Instant::now();
        cache.set_at("key", first, None, start);
        cache.set_at("key", second, None, start + Duration::from_millis(90));

        prop_assert_eq!(cache.get_at("key", start + Duration::from_millis(150)), Some(second));
        prop_assert_eq!(cache.get_at("key", start + Duration::from_millis(190)), None);
    }

    /// Keys do not affect each other
    #[test]
    fn invalidate_is_per_key(keys in prop::collection::hash_set("[a-z]{1,6}", 2..10)) {
        let cache = TtlCache::new(Duration::from_secs(60));
        for k in &keys {
            cache.set(k.clone(), k.len(), None);
        }
        let victim = keys.iter().next().cloned().unwrap_or_default();
        cache.invalidate(&victim);

        for k in &keys {
            if *k == victim {
                prop_assert_eq!(cache.get(k), None);
            } else {
                prop_assert_eq!(cache.get(k), Some(k.len()));
            }
        }
    }
}
