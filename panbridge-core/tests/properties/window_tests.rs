//! Property-based tests for the rolling history window

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use panbridge_core::models::MetadataDataPoint;
use panbridge_core::performance::{MAX_HISTORY, RollingWindow};

fn point(minute: i64) -> MetadataDataPoint {
    MetadataDataPoint {
        timestamp: DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minute),
        creates: minute as f64,
        removes: 0.0,
        lookups: 0.0,
        set_mix: 0.0,
    }
}

fn is_sorted(window: &RollingWindow<MetadataDataPoint>) -> bool {
    let samples = window.to_vec();
    samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Length is min(pushes, capacity) and order holds for in-order samples
    #[test]
    fn in_order_ticks_keep_newest(ticks in 0_usize..700) {
        let mut window = RollingWindow::new(MAX_HISTORY);
        for i in 0..ticks {
            window.push(point(i as i64 * 5));
        }
        prop_assert_eq!(window.len(), ticks.min(MAX_HISTORY));
        prop_assert!(is_sorted(&window));
        if ticks > 0 {
            prop_assert_eq!(window.latest().map(|p| p.timestamp), Some(point((ticks as i64 - 1) * 5).timestamp));
        }
    }

    /// Arbitrary arrival order still yields a bounded, sorted window
    #[test]
    fn any_order_stays_sorted_and_bounded(
        minutes in prop::collection::vec(0_i64..10_000, 0..400),
        capacity in 1_usize..300,
    ) {
        let mut window = RollingWindow::new(capacity);
        for m in &minutes {
            window.push(point(*m));
            prop_assert!(window.len() <= capacity);
        }
        prop_assert_eq!(window.len(), minutes.len().min(capacity));
        prop_assert!(is_sorted(&window));
    }
}
