//! Unit and coverage checks for a parsed bridge table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mrio_bridge::{BridgeRule, BridgeSpec};
use mrio_model::UnitTable;

use crate::report::{RuleFindings, ValidationReport};

/// Level names used for the coverage checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub region_level: String,
    pub sector_level: String,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            region_level: "region".to_string(),
            sector_level: "sector".to_string(),
        }
    }
}

impl ValidationOptions {
    #[must_use]
    pub fn with_region_level(mut self, level: impl Into<String>) -> Self {
        self.region_level = level.into();
        self
    }

    #[must_use]
    pub fn with_sector_level(mut self, level: impl Into<String>) -> Self {
        self.sector_level = level.into();
        self
    }
}

/// Check every rule of `spec` against the source units and the full
/// region and sector sets of the source.
///
/// The check never fails: problems are recorded as flags on the rules.
/// An empty `regions` (or `sectors`) slice disables that coverage check.
pub fn validate(
    spec: &BridgeSpec,
    units: &UnitTable,
    regions: &[&str],
    sectors: &[&str],
    options: &ValidationOptions,
) -> ValidationReport {
    let mut rules: Vec<RuleFindings> = spec
        .rules()
        .iter()
        .map(|rule| source_findings(rule, units))
        .collect();

    for (key, members) in spec.groups() {
        let declared: BTreeSet<&str> = members
            .iter()
            .filter_map(|&idx| spec.rules()[idx].unit_new.as_deref())
            .filter(|unit| !unit.is_empty())
            .collect();
        let inconsistent = declared.len() > 1;

        let group: Vec<&BridgeRule> = members.iter().map(|&idx| &spec.rules()[idx]).collect();
        let region_gap = !covers(&group, &options.region_level, regions);
        let sector_gap = !covers(&group, &options.sector_level, sectors);

        if inconsistent || region_gap || sector_gap {
            debug!(
                key = %key.join("/"),
                units = declared.len(),
                region_gap,
                sector_gap,
                "target key has findings"
            );
        }
        for idx in members {
            let findings = &mut rules[idx];
            findings.unit_impact_inconsistent = inconsistent;
            findings.missing_region_coverage = region_gap;
            findings.missing_sector_coverage = sector_gap;
        }
    }

    let report = ValidationReport {
        target_levels: spec.bridges().iter().map(|b| b.new_level.clone()).collect(),
        rules,
    };
    if report.has_unit_errors() {
        let summary = report.summary();
        warn!(
            inconsistent = summary.unit_impact_inconsistent,
            mismatched = summary.unit_stressor_mismatch,
            "bridge table declares incompatible units"
        );
    }
    report
}

fn source_findings(rule: &BridgeRule, units: &UnitTable) -> RuleFindings {
    let matched = rule.filter.select(units.rows());
    let missing_source = matched.is_empty();

    let mismatch = match rule.unit_orig.as_deref() {
        Some(declared) if !declared.is_empty() => matched
            .iter()
            .any(|&pos| units.unit_at(pos).is_some_and(|unit| unit != declared)),
        _ => false,
    };
    if missing_source {
        debug!(rule = rule.row, constraints = %rule.describe(), "rule matches no source row");
    }
    if mismatch {
        debug!(rule = rule.row, declared = ?rule.unit_orig, "declared unit differs from source");
    }

    RuleFindings {
        row: rule.row,
        target: rule.targets.clone(),
        unit_orig: rule.unit_orig.clone(),
        unit_new: rule.unit_new.clone(),
        unit_impact_inconsistent: false,
        unit_stressor_mismatch: mismatch,
        missing_source_stressor: missing_source,
        missing_region_coverage: false,
        missing_sector_coverage: false,
    }
}

/// Returns true if none of the patterns on `level` in one target key is
/// left without a match and the rules together reach every label in
/// `labels`. A rule without a constraint on `level` reaches every label.
fn covers(group: &[&BridgeRule], level: &str, labels: &[&str]) -> bool {
    if labels.is_empty() {
        return true;
    }
    let mut reached: BTreeSet<&str> = BTreeSet::new();
    let mut unconstrained = false;
    for rule in group {
        match rule.constraint(level) {
            None => unconstrained = true,
            Some(pred) => {
                let hits: Vec<&str> = labels
                    .iter()
                    .copied()
                    .filter(|label| pred.is_match(label))
                    .collect();
                if hits.is_empty() {
                    return false;
                }
                reached.extend(hits);
            }
        }
    }
    unconstrained || labels.iter().all(|label| reached.contains(label))
}
