//! Text rendering of a validation report.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::report::{Finding, RuleFindings, ValidationReport};

/// Render one row per rule with a marker per finding.
///
/// Unit findings are red, coverage findings yellow.
pub fn render_report(report: &ValidationReport) -> String {
    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(report.target_levels.iter().map(|level| header_cell(level)));
    header.push(header_cell("Unit orig"));
    header.push(header_cell("Unit new"));
    header.extend(Finding::ALL.iter().map(|f| header_cell(short_label(*f))));
    table.set_header(header);
    apply_report_table_style(&mut table);

    align_column(&mut table, 0, CellAlignment::Right);
    let first_flag = report.target_levels.len() + 3;
    for offset in 0..Finding::ALL.len() {
        align_column(&mut table, first_flag + offset, CellAlignment::Center);
    }

    for rule in report.rows() {
        table.add_row(rule_cells(rule));
    }
    table.to_string()
}

/// One line with the per-finding counts.
pub fn render_summary(report: &ValidationReport) -> String {
    let summary = report.summary();
    format!(
        "{} rules: {} inconsistent target units, {} source unit mismatches, \
         {} missing sources, {} region gaps, {} sector gaps",
        summary.rules,
        summary.unit_impact_inconsistent,
        summary.unit_stressor_mismatch,
        summary.missing_source_stressor,
        summary.missing_region_coverage,
        summary.missing_sector_coverage,
    )
}

fn rule_cells(rule: &RuleFindings) -> Vec<Cell> {
    let mut cells = vec![dim_cell(rule.row)];
    cells.extend(rule.target.iter().map(|value| {
        if value.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(value)
        }
    }));
    cells.push(unit_cell(rule.unit_orig.as_deref(), rule.unit_stressor_mismatch));
    cells.push(unit_cell(rule.unit_new.as_deref(), rule.unit_impact_inconsistent));
    cells.extend(Finding::ALL.iter().map(|f| flag_cell(rule.has(*f), *f)));
    cells
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn short_label(finding: Finding) -> &'static str {
    match finding {
        Finding::UnitImpactInconsistent => "Inconsistent",
        Finding::UnitStressorMismatch => "Mismatch",
        Finding::MissingSourceStressor => "Source",
        Finding::MissingRegionCoverage => "Regions",
        Finding::MissingSectorCoverage => "Sectors",
    }
}

fn flag_cell(flagged: bool, finding: Finding) -> Cell {
    if !flagged {
        return dim_cell("·");
    }
    let color = if finding.is_unit_error() {
        Color::Red
    } else {
        Color::Yellow
    };
    Cell::new("✗").fg(color).add_attribute(Attribute::Bold)
}

fn unit_cell(unit: Option<&str>, flagged: bool) -> Cell {
    match unit {
        Some(value) if !value.is_empty() && flagged => {
            Cell::new(value).fg(Color::Red).add_attribute(Attribute::Bold)
        }
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ValidationReport {
        ValidationReport {
            target_levels: vec!["impact".into()],
            rules: vec![RuleFindings {
                row: 0,
                target: vec!["GWP100".into()],
                unit_orig: Some("kg".into()),
                unit_new: Some("kg CO2eq".into()),
                unit_impact_inconsistent: false,
                unit_stressor_mismatch: true,
                missing_source_stressor: false,
                missing_region_coverage: false,
                missing_sector_coverage: false,
            }],
        }
    }

    #[test]
    fn test_render_contains_labels() {
        let text = render_report(&report());
        assert!(text.contains("GWP100"));
        assert!(text.contains("kg CO2eq"));
        assert!(text.contains("Regions"));
        assert!(text.contains('✗'));
    }

    #[test]
    fn test_render_summary_counts() {
        let line = render_summary(&report());
        assert!(line.starts_with("1 rules"));
        assert!(line.contains("1 source unit mismatches"));
    }
}
