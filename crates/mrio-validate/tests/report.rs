//! Validation of a small characterization table.

use mrio_bridge::{BridgeConfig, BridgeSpec};
use mrio_model::{Axis, UnitTable};
use mrio_validate::{Finding, ValidationOptions, render_report, validate};
use polars::prelude::*;

fn units() -> UnitTable {
    UnitTable::new(
        Axis::single("stressor", ["co2_air", "ch4_air", "land"]),
        vec!["kg".into(), "kg".into(), "km2".into()],
    )
    .unwrap()
}

fn bridge() -> DataFrame {
    df! {
        "stressor" => &["co2_air", "ch4_air", "land", "n2o_air", "ch4_air"],
        "region" => &["", "reg1", "", "", "reg2"],
        "impact__stressor" => &["GWP100", "GWP100", "land_use", "GWP100", "CH4_only"],
        "factor" => &[1.0, 28.0, 1.0, 265.0, 1.0],
        "unit_orig" => &["kg", "kg", "m2", "kg", "kg"],
        "unit_new" => &["kg CO2eq", "kg CO2eq", "km2", "t CO2eq", "kg"],
    }
    .unwrap()
}

fn report() -> mrio_validate::ValidationReport {
    let spec = BridgeSpec::parse(
        &bridge(),
        &["stressor", "region", "sector"],
        &BridgeConfig::default(),
    )
    .unwrap();
    validate(
        &spec,
        &units(),
        &["reg1", "reg2"],
        &["food", "steel"],
        &ValidationOptions::default(),
    )
}

#[test]
fn summary_counts_each_finding() {
    insta::assert_json_snapshot!(report().summary(), @r#"
    {
      "rules": 5,
      "unit_impact_inconsistent": 3,
      "unit_stressor_mismatch": 1,
      "missing_source_stressor": 1,
      "missing_region_coverage": 1,
      "missing_sector_coverage": 0
    }
    "#);
}

#[test]
fn findings_point_at_the_offending_rules() {
    let report = report();
    let rows = |finding| {
        report
            .rules_with(finding)
            .iter()
            .map(|r| r.row)
            .collect::<Vec<_>>()
    };
    assert_eq!(rows(Finding::UnitImpactInconsistent), vec![0, 1, 3]);
    assert_eq!(rows(Finding::UnitStressorMismatch), vec![2]);
    assert_eq!(rows(Finding::MissingSourceStressor), vec![3]);
    assert_eq!(rows(Finding::MissingRegionCoverage), vec![4]);
    assert!(report.has_unit_errors());
}

#[test]
fn report_serializes_per_rule() {
    let json = serde_json::to_value(report()).unwrap();
    assert_eq!(json["target_levels"][0], "impact");
    assert_eq!(json["rules"][2]["target"][0], "land_use");
    assert_eq!(json["rules"][2]["unit_stressor_mismatch"], true);
}

#[test]
fn dataframe_and_text_views_agree() {
    let report = report();
    let df = report.to_dataframe().unwrap();
    assert_eq!(df.height(), 5);
    let flags = df.column("missing_source_stressor").unwrap().bool().unwrap();
    assert_eq!(flags.get(3), Some(true));
    assert_eq!(flags.get(0), Some(false));

    let text = render_report(&report);
    assert!(text.contains("CH4_only"));
    assert!(text.contains("t CO2eq"));
}
