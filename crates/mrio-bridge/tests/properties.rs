//! Property tests for the conversion engine.

use mrio_bridge::{BridgeConfig, ConvertOptions, convert};
use mrio_model::{Axis, LabeledTable};
use polars::prelude::*;
use proptest::prelude::*;

/// Strategy for a single-level stressor table with 1-6 rows and 1-4 columns.
fn table_strategy() -> impl Strategy<Value = LabeledTable> {
    (1usize..=6, 1usize..=4)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                proptest::collection::vec(-1.0e3f64..1.0e3, rows * cols),
            )
        })
        .prop_map(|(rows, cols, values)| {
            let stressors = Axis::single("stressor", (0..rows).map(|i| format!("s{i}")));
            let regions = Axis::single("region", (0..cols).map(|j| format!("r{j}")));
            LabeledTable::new(stressors, regions, values).unwrap()
        })
}

fn bridge(stressors: &[String], targets: &[String]) -> DataFrame {
    df! {
        "stressor" => stressors,
        "gas__stressor" => targets,
    }
    .unwrap()
}

fn run(source: &LabeledTable, df: &DataFrame) -> LabeledTable {
    convert(source, df, &BridgeConfig::default(), &ConvertOptions::default()).unwrap()
}

proptest! {
    #[test]
    fn one_to_one_renaming_is_identity(source in table_strategy()) {
        let labels: Vec<String> = source.rows().level_values("stressor").unwrap()
            .into_iter().map(String::from).collect();
        let targets: Vec<String> = labels.iter().map(|l| format!("new_{l}")).collect();
        let out = run(&source, &bridge(&labels, &targets));

        prop_assert_eq!(out.shape(), source.shape());
        prop_assert_eq!(out.columns(), source.columns());
        for (label, target) in labels.iter().zip(&targets) {
            for region in source.columns().entries() {
                let col = [region[0].as_str()];
                prop_assert_eq!(
                    out.value_at(&[target.as_str()], &col),
                    source.value_at(&[label.as_str()], &col)
                );
            }
        }
    }

    #[test]
    fn partitioning_rules_conserve_the_total(
        source in table_strategy(),
        groups in proptest::collection::vec(0usize..3, 6),
    ) {
        let labels: Vec<String> = source.rows().level_values("stressor").unwrap()
            .into_iter().map(String::from).collect();
        let targets: Vec<String> = labels.iter().enumerate()
            .map(|(i, _)| format!("g{}", groups[i]))
            .collect();
        let out = run(&source, &bridge(&labels, &targets));

        prop_assert!((out.total() - source.total()).abs() < 1e-6);
    }

    #[test]
    fn rules_matching_nothing_change_nothing(
        source in table_strategy(),
        extra in 1usize..5,
    ) {
        let labels: Vec<String> = source.rows().level_values("stressor").unwrap()
            .into_iter().map(String::from).collect();
        let targets: Vec<String> = labels.iter().map(|l| format!("new_{l}")).collect();
        let base = run(&source, &bridge(&labels, &targets));

        let mut more_labels = labels.clone();
        let mut more_targets = targets.clone();
        for i in 0..extra {
            more_labels.push(format!("absent{i}"));
            more_targets.push(format!("new_{i}"));
        }
        let padded = run(&source, &bridge(&more_labels, &more_targets));

        prop_assert_eq!(padded, base);
    }
}
