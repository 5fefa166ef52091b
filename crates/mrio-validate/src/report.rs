//! Validation report types.

use std::fmt;

use polars::prelude::{Column, DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};

/// One diagnostic a bridge rule can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    /// Rules sharing a target key declare different target units.
    UnitImpactInconsistent,
    /// The declared original unit differs from the source unit.
    UnitStressorMismatch,
    /// The rule's row constraints match no source row.
    MissingSourceStressor,
    /// The rule's target key does not cover every source region.
    MissingRegionCoverage,
    /// The rule's target key does not cover every source sector.
    MissingSectorCoverage,
}

impl Finding {
    pub const ALL: [Finding; 5] = [
        Finding::UnitImpactInconsistent,
        Finding::UnitStressorMismatch,
        Finding::MissingSourceStressor,
        Finding::MissingRegionCoverage,
        Finding::MissingSectorCoverage,
    ];

    /// Column name used in tabular output.
    pub fn as_str(self) -> &'static str {
        match self {
            Finding::UnitImpactInconsistent => "unit_impact_inconsistent",
            Finding::UnitStressorMismatch => "unit_stressor_mismatch",
            Finding::MissingSourceStressor => "missing_source_stressor",
            Finding::MissingRegionCoverage => "missing_region_coverage",
            Finding::MissingSectorCoverage => "missing_sector_coverage",
        }
    }

    /// Unit findings block a conversion; coverage findings do not.
    pub fn is_unit_error(self) -> bool {
        matches!(
            self,
            Finding::UnitImpactInconsistent | Finding::UnitStressorMismatch
        )
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics for one bridge rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFindings {
    /// Zero-based row in the bridge table.
    pub row: usize,
    /// Bridge values of the rule, in bridge column order.
    pub target: Vec<String>,
    pub unit_orig: Option<String>,
    pub unit_new: Option<String>,
    pub unit_impact_inconsistent: bool,
    pub unit_stressor_mismatch: bool,
    pub missing_source_stressor: bool,
    pub missing_region_coverage: bool,
    pub missing_sector_coverage: bool,
}

impl RuleFindings {
    pub fn has(&self, finding: Finding) -> bool {
        match finding {
            Finding::UnitImpactInconsistent => self.unit_impact_inconsistent,
            Finding::UnitStressorMismatch => self.unit_stressor_mismatch,
            Finding::MissingSourceStressor => self.missing_source_stressor,
            Finding::MissingRegionCoverage => self.missing_region_coverage,
            Finding::MissingSectorCoverage => self.missing_sector_coverage,
        }
    }

    pub fn has_unit_error(&self) -> bool {
        self.unit_impact_inconsistent || self.unit_stressor_mismatch
    }
}

/// Per-finding counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rules: usize,
    pub unit_impact_inconsistent: usize,
    pub unit_stressor_mismatch: usize,
    pub missing_source_stressor: usize,
    pub missing_region_coverage: usize,
    pub missing_sector_coverage: usize,
}

/// One row of diagnostics per bridge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// New level name per bridge column.
    pub target_levels: Vec<String>,
    pub rules: Vec<RuleFindings>,
}

impl ValidationReport {
    pub fn rows(&self) -> &[RuleFindings] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true if any rule carries a unit finding.
    pub fn has_unit_errors(&self) -> bool {
        self.rules.iter().any(RuleFindings::has_unit_error)
    }

    /// Returns true if any rule carries a coverage or missing-source finding.
    pub fn has_coverage_gaps(&self) -> bool {
        self.rules.iter().any(|r| {
            r.missing_source_stressor || r.missing_region_coverage || r.missing_sector_coverage
        })
    }

    /// Rules carrying `finding`.
    pub fn rules_with(&self, finding: Finding) -> Vec<&RuleFindings> {
        self.rules.iter().filter(|r| r.has(finding)).collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |finding| self.rules.iter().filter(|r| r.has(finding)).count();
        ReportSummary {
            rules: self.rules.len(),
            unit_impact_inconsistent: count(Finding::UnitImpactInconsistent),
            unit_stressor_mismatch: count(Finding::UnitStressorMismatch),
            missing_source_stressor: count(Finding::MissingSourceStressor),
            missing_region_coverage: count(Finding::MissingRegionCoverage),
            missing_sector_coverage: count(Finding::MissingSectorCoverage),
        }
    }

    /// Tabular view: `row`, one column per target level, the declared
    /// units and one boolean column per finding.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::new();
        columns.push(Column::new(
            "row".into(),
            self.rules.iter().map(|r| r.row as u64).collect::<Vec<_>>(),
        ));
        for (idx, level) in self.target_levels.iter().enumerate() {
            let values: Vec<String> = self
                .rules
                .iter()
                .map(|r| r.target.get(idx).cloned().unwrap_or_default())
                .collect();
            columns.push(Column::new(level.as_str().into(), values));
        }
        columns.push(Column::new(
            "unit_orig".into(),
            self.rules.iter().map(|r| r.unit_orig.clone()).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "unit_new".into(),
            self.rules.iter().map(|r| r.unit_new.clone()).collect::<Vec<_>>(),
        ));
        for finding in Finding::ALL {
            columns.push(Column::new(
                finding.as_str().into(),
                self.rules.iter().map(|r| r.has(finding)).collect::<Vec<_>>(),
            ));
        }
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(row: usize, unit_error: bool, region_gap: bool) -> RuleFindings {
        RuleFindings {
            row,
            target: vec![format!("impact{row}")],
            unit_orig: Some("kg".into()),
            unit_new: None,
            unit_impact_inconsistent: false,
            unit_stressor_mismatch: unit_error,
            missing_source_stressor: false,
            missing_region_coverage: region_gap,
            missing_sector_coverage: false,
        }
    }

    #[test]
    fn test_summary_and_queries() {
        let report = ValidationReport {
            target_levels: vec!["impact".into()],
            rules: vec![findings(0, false, true), findings(1, true, true)],
        };
        assert!(report.has_unit_errors());
        assert!(report.has_coverage_gaps());
        let summary = report.summary();
        assert_eq!(summary.rules, 2);
        assert_eq!(summary.unit_stressor_mismatch, 1);
        assert_eq!(summary.missing_region_coverage, 2);
        assert_eq!(report.rules_with(Finding::UnitStressorMismatch)[0].row, 1);
    }

    #[test]
    fn test_to_dataframe_layout() {
        let report = ValidationReport {
            target_levels: vec!["impact".into()],
            rules: vec![findings(0, false, true)],
        };
        let df = report.to_dataframe().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 9);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(&names[..4], &["row", "impact", "unit_orig", "unit_new"]);
        assert!(names.contains(&"missing_region_coverage"));
    }

    #[test]
    fn test_finding_names() {
        assert_eq!(Finding::MissingSectorCoverage.to_string(), "missing_sector_coverage");
        assert!(Finding::UnitImpactInconsistent.is_unit_error());
        assert!(!Finding::MissingSourceStressor.is_unit_error());
    }
}
