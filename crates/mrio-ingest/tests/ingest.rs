//! Loading accounts from disk and converting them.

use std::io::Write;

use mrio_bridge::{BridgeConfig, ConvertOptions, convert};
use mrio_ingest::{IngestError, read_bridge_table, read_long_table, read_unit_table};
use tempfile::{Builder, NamedTempFile};

fn create_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

const LONG: &str = "\
stressor,compartment,region,value
em1,air,reg1,1.5
em1,air,reg2,2
em2,water,reg1,4
";

#[test]
fn long_table_loads_dense() {
    let file = create_temp(LONG, ".csv");
    let table = read_long_table(file.path(), &["stressor", "compartment"], &["region"], "value").unwrap();
    assert_eq!(table.shape(), (2, 2));
    assert_eq!(table.value_at(&["em1", "air"], &["reg2"]), Some(2.0));
    assert_eq!(table.value_at(&["em2", "water"], &["reg2"]), Some(0.0));
}

#[test]
fn long_table_missing_value_column() {
    let file = create_temp(LONG, ".csv");
    let err = read_long_table(file.path(), &["stressor"], &["region"], "amount").unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "amount"));
}

#[test]
fn unit_table_from_tab_separated_file() {
    let file = create_temp("stressor\tcompartment\tunit\nem1\tair\tkg\nem2\twater\t t \n", ".txt");
    let units = read_unit_table(file.path(), &["stressor", "compartment"]).unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units.unit_for(&["em2", "water"]), Some("t"));

    let err = read_unit_table(file.path(), &["stressor", "region"]).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "region"));
}

#[test]
fn bridge_file_drives_a_conversion() {
    let source = create_temp(LONG, ".csv");
    let bridge = create_temp(
        "stressor\tcompartment\timpact__stressor\tfactor\nem.*\t\ttotal\t2\nem1\tair\tair_only\t1\n",
        ".tsv",
    );

    let table = read_long_table(source.path(), &["stressor", "compartment"], &["region"], "value").unwrap();
    let df = read_bridge_table(bridge.path()).unwrap();
    let out = convert(&table, &df, &BridgeConfig::default(), &ConvertOptions::default()).unwrap();

    assert_eq!(out.rows().level_values("impact").unwrap(), vec!["air_only", "total"]);
    assert_eq!(out.value_at(&["total"], &["reg1"]), Some(11.0));
    assert_eq!(out.value_at(&["air_only"], &["reg2"]), Some(2.0));
}
