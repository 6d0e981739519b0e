//! Property-based tests for id derivation

use proptest::prelude::*;
use panbridge_core::parser::values::{name_to_id, slugify};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Slugifying twice changes nothing
    #[test]
    fn slugify_is_idempotent(name in "\\PC{0,40}") {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Slugs use only lowercase ASCII, digits and single inner dashes
    #[test]
    fn slugs_are_well_formed(name in "\\PC{0,40}") {
        let slug = slugify(&name);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    /// Ids ignore case and punctuation differences
    #[test]
    fn ids_ignore_case_and_punctuation(words in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
        let spaced = words.join(" ");
        let dashed = words.join("--");
        prop_assert_eq!(name_to_id("pool", &spaced), name_to_id("pool", &dashed.to_uppercase()));
    }
}

#[test]
fn known_ids() {
    assert_eq!(name_to_id("pool", "Set 1"), "pool-set-1");
    assert_eq!(name_to_id("node", "VCH-4,2"), "node-vch-4-2");
    assert_eq!(name_to_id("vol", "/home"), "vol-home");
}
