//! Property-based tests for capacity parsing and formatting

use proptest::prelude::*;
use panbridge_core::parser::values::{
    CapacityUnit, GIB, TIB, format_bytes, format_capacity, parse_capacity,
};

// ========== Strategies ==========

/// Units with fractional values allowed
fn arb_scaled_unit() -> impl Strategy<Value = CapacityUnit> {
    prop_oneof![
        Just(CapacityUnit::KB),
        Just(CapacityUnit::MB),
        Just(CapacityUnit::GB),
        Just(CapacityUnit::TB),
        Just(CapacityUnit::PB),
    ]
}

/// Values with at most two decimals, as the appliance prints them
fn arb_value() -> impl Strategy<Value = f64> {
    (0_u32..1_000_000).prop_map(|cents| f64::from(cents) / 100.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Parsing then expressing in the same unit gives the printed number back
    #[test]
    fn capacity_roundtrips_in_its_unit(value in arb_value(), unit in arb_scaled_unit()) {
        let text = format!("{value} {unit}");
        let bytes = parse_capacity(&text);
        prop_assert!((unit.value_of(bytes) - value).abs() < 1e-3, "{} -> {}", text, bytes);
    }

    /// Whole byte counts parse exactly
    #[test]
    fn byte_counts_parse_exactly(n in 0_u32..u32::MAX) {
        prop_assert_eq!(parse_capacity(&format!("{n} B")), u64::from(n));
        prop_assert_eq!(parse_capacity(&n.to_string()), u64::from(n));
    }

    /// Formatting then parsing stays within the formatter's rounding
    #[test]
    fn formatted_capacity_parses_back(value in arb_value(), unit in arb_scaled_unit()) {
        let bytes = parse_capacity(&format!("{value} {unit}"));
        let reparsed = parse_capacity(&format_capacity(bytes, unit));
        let tolerance = unit.multiplier() as f64 * 0.005 + 1.0;
        prop_assert!((reparsed as f64 - bytes as f64).abs() <= tolerance);
    }

    /// Unit labels are case-insensitive and accept the binary spelling
    #[test]
    fn unit_labels_are_case_insensitive(value in 1_u32..100_000) {
        let expected = u64::from(value) * GIB;
        prop_assert_eq!(parse_capacity(&format!("{value} gb")), expected);
        prop_assert_eq!(parse_capacity(&format!("{value} GiB")), expected);
        prop_assert_eq!(parse_capacity(&format!("{value}GB")), expected);
    }

    /// Garbage never panics and parses as zero
    #[test]
    fn garbage_parses_as_zero(text in "[a-zA-Z -]{0,12}") {
        prop_assert_eq!(parse_capacity(&text), 0);
    }
}

#[test]
fn known_capacities() {
    assert_eq!(parse_capacity("120 TB"), 120 * TIB);
    assert_eq!(parse_capacity("72 TB"), 72 * TIB);
    assert_eq!(parse_capacity("--"), 0);
    assert_eq!(format_bytes(48 * TIB), "48 TB");
    assert_eq!(format_bytes(1536), "1.5 KB");
}
