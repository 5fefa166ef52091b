//! Unit and coverage diagnostics for bridge tables.
//!
//! [`validate`] inspects a parsed [`mrio_bridge::BridgeSpec`] against the
//! units and the region/sector sets of a source and records, per rule:
//!
//! - `unit_impact_inconsistent`: rules sharing a target key declare
//!   different target units
//! - `unit_stressor_mismatch`: a declared original unit differs from the
//!   unit of a matched source row
//! - `missing_source_stressor`: the rule matches no source row
//! - `missing_region_coverage` / `missing_sector_coverage`: the rules of a
//!   target key do not reach every region or sector
//!
//! Validation is advisory. Unit findings are what the extension layer uses
//! to refuse a conversion.

pub mod render;
pub mod report;
pub mod validate;

pub use render::{render_report, render_summary};
pub use report::{Finding, ReportSummary, RuleFindings, ValidationReport};
pub use validate::{ValidationOptions, validate};
