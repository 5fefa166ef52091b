//! Property tests for the match modes.

use mrio_match::{MatchMode, Predicate, contains, fullmatch, matches};
use mrio_model::Axis;
use proptest::prelude::*;

fn labels() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z0-9]{1,8}", 1..12).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn literal_matches_only_itself(label in "\\PC{0,16}", other in "\\PC{0,16}") {
        let pred = Predicate::literal("region", &label).unwrap();
        prop_assert!(pred.is_match(&label));
        prop_assert_eq!(pred.is_match(&other), other == label);
    }

    #[test]
    fn modes_are_nested(entries in labels(), pattern in "[a-z0-9]{1,3}") {
        let axis = Axis::single("sector", entries.iter().map(String::as_str));
        let pairs = [("sector", pattern.as_str())];

        let loose = contains(&axis, &pairs).unwrap();
        let start = matches(&axis, &pairs).unwrap();
        let full = fullmatch(&axis, &pairs).unwrap();

        prop_assert!(full.entries().iter().all(|e| start.entries().contains(e)));
        prop_assert!(start.entries().iter().all(|e| loose.entries().contains(e)));
        for entry in loose.entries() {
            prop_assert!(entry[0].contains(pattern.as_str()));
        }
    }

    #[test]
    fn fullmatch_on_a_label_selects_exactly_it(entries in labels(), pick in any::<prop::sample::Index>()) {
        let axis = Axis::single("sector", entries.iter().map(String::as_str));
        let label = pick.get(&entries);
        let selected = fullmatch(&axis, &[("sector", label.as_str())]).unwrap();
        prop_assert_eq!(selected.level_values("sector").unwrap(), vec![label.as_str()]);
    }

    #[test]
    fn case_insensitive_flag(label in "[a-z]{1,8}") {
        let pred = Predicate::new("stressor", format!("(?i){label}"), MatchMode::FullMatch).unwrap();
        prop_assert!(pred.is_match(&label.to_uppercase()));
    }
}
