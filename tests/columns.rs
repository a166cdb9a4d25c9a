use std::collections::HashSet;

use csv_sqlite::columns::{has_case_insensitive_duplicates, resolve_duplicate_names};
use proptest::prelude::*;

#[test]
fn first_collision_is_numbered_one() {
    let headers = vec!["ID".to_string(), "id".to_string(), "Value".to_string()];
    assert_eq!(
        resolve_duplicate_names(&headers),
        vec!["ID", "id_duplicate1", "Value"]
    );
}

#[test]
fn exact_repeats_are_treated_like_case_variants() {
    let headers = vec!["code".to_string(), "code".to_string(), "code".to_string()];
    assert_eq!(
        resolve_duplicate_names(&headers),
        vec!["code", "code_duplicate1", "code_duplicate2"]
    );
}

proptest! {
    #[test]
    fn resolved_names_are_unique_ignoring_case(
        headers in proptest::collection::vec("[A-Ca-c]{1,2}", 1..12)
    ) {
        let resolved = resolve_duplicate_names(&headers);
        prop_assert_eq!(resolved.len(), headers.len());
        prop_assert!(!has_case_insensitive_duplicates(&resolved));
    }

    #[test]
    fn resolved_names_keep_original_spelling_as_prefix(
        headers in proptest::collection::vec("[A-Za-z_]{1,6}", 1..10)
    ) {
        let resolved = resolve_duplicate_names(&headers);
        let mut first_seen = HashSet::new();
        for (original, renamed) in headers.iter().zip(resolved.iter()) {
            prop_assert!(renamed.starts_with(original.as_str()));
            if first_seen.insert(original.to_lowercase()) {
                prop_assert_eq!(renamed, original);
            } else {
                prop_assert!(renamed.contains("_duplicate"));
            }
        }
    }
}
