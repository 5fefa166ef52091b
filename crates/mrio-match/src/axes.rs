//! Matching over single axes and over both axes of a table.
//!
//! [`QueryableAxes`] addresses the row and column levels of a table as one
//! index, so a filter on `region` (usually a column level) and a filter on
//! `stressor` (a row level) can be applied in one call without reshaping.

use mrio_model::{Axis, LabeledTable};

use crate::error::{MatchError, Result};
use crate::predicate::{Filter, MatchMode, Predicate};

/// Rows and columns selected from a table, as positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
}

impl Selection {
    /// Returns true if the selection covers no cell.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Which axis a level lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Rows,
    Columns,
}

/// Row and column axes addressed as one set of levels.
///
/// A level name present on both axes resolves to the row axis.
#[derive(Debug, Clone, Copy)]
pub struct QueryableAxes<'a> {
    rows: &'a Axis,
    columns: &'a Axis,
}

impl<'a> QueryableAxes<'a> {
    pub fn new(rows: &'a Axis, columns: &'a Axis) -> Self {
        Self { rows, columns }
    }

    pub fn of(table: &'a LabeledTable) -> Self {
        Self::new(table.rows(), table.columns())
    }

    pub fn rows(&self) -> &'a Axis {
        self.rows
    }

    pub fn columns(&self) -> &'a Axis {
        self.columns
    }

    /// Axis that carries `level`.
    pub fn side(&self, level: &str) -> Option<AxisSide> {
        if self.rows.has_level(level) {
            Some(AxisSide::Rows)
        } else if self.columns.has_level(level) {
            Some(AxisSide::Columns)
        } else {
            None
        }
    }

    pub fn has_level(&self, level: &str) -> bool {
        self.side(level).is_some()
    }

    /// All level names, row levels first, without duplicates.
    pub fn level_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = self.rows.names().iter().map(String::as_str).collect();
        for name in self.columns.names() {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        names
    }

    /// Apply `filter` to both axes.
    ///
    /// Each predicate restricts the axis its level resolves to; an axis
    /// without applicable predicates is left unrestricted.
    pub fn select(&self, filter: &Filter) -> Selection {
        let (row_preds, col_preds): (Vec<Predicate>, Vec<Predicate>) = filter
            .predicates()
            .iter()
            .filter(|p| self.has_level(p.level()))
            .cloned()
            .partition(|p| self.side(p.level()) == Some(AxisSide::Rows));

        Selection {
            rows: restrict(self.rows, filter, row_preds),
            columns: restrict(self.columns, filter, col_preds),
        }
    }

    /// Entries of each axis where any level matches `pattern`.
    ///
    /// The axes are searched independently.
    pub fn find_all(&self, mode: MatchMode, pattern: &str) -> Result<Selection> {
        Ok(Selection {
            rows: find_all_positions(self.rows, mode, pattern)?,
            columns: find_all_positions(self.columns, mode, pattern)?,
        })
    }

    fn require_any(&self, patterns: &[(&str, &str)]) -> Result<()> {
        if patterns.iter().any(|(level, _)| self.has_level(level)) {
            return Ok(());
        }
        Err(MatchError::NoMatchingLevel {
            requested: requested(patterns),
            available: self.level_names().into_iter().map(String::from).collect(),
        })
    }
}

fn restrict(axis: &Axis, filter: &Filter, preds: Vec<Predicate>) -> Vec<usize> {
    if preds.is_empty() {
        return (0..axis.len()).collect();
    }
    match filter {
        Filter::All(_) => Filter::All(preds).select(axis),
        Filter::Any(_) => Filter::Any(preds).select(axis),
    }
}

/// Compile `(level, pattern)` pairs into an AND filter.
pub fn build_filter(mode: MatchMode, patterns: &[(&str, &str)]) -> Result<Filter> {
    let preds = patterns
        .iter()
        .map(|(level, pattern)| Predicate::new(*level, *pattern, mode))
        .collect::<Result<Vec<_>>>()?;
    Ok(Filter::All(preds))
}

/// Positions of the entries of `axis` satisfying every applicable pattern.
///
/// Patterns on absent levels are ignored; if no requested level exists on
/// the axis the call fails.
pub fn filter_positions(axis: &Axis, mode: MatchMode, patterns: &[(&str, &str)]) -> Result<Vec<usize>> {
    if !patterns.iter().any(|(level, _)| axis.has_level(level)) {
        return Err(MatchError::NoMatchingLevel {
            requested: requested(patterns),
            available: axis.names().to_vec(),
        });
    }
    let filter = build_filter(mode, patterns)?;
    let positions = filter.select(axis);
    tracing::trace!(
        mode = %mode,
        matched = positions.len(),
        total = axis.len(),
        "filtered axis"
    );
    Ok(positions)
}

/// Entries whose labels contain the patterns.
pub fn contains(axis: &Axis, patterns: &[(&str, &str)]) -> Result<Axis> {
    Ok(axis.select(&filter_positions(axis, MatchMode::Contains, patterns)?))
}

/// Entries whose labels start with a match of the patterns.
pub fn matches(axis: &Axis, patterns: &[(&str, &str)]) -> Result<Axis> {
    Ok(axis.select(&filter_positions(axis, MatchMode::Match, patterns)?))
}

/// Entries whose labels match the patterns entirely.
pub fn fullmatch(axis: &Axis, patterns: &[(&str, &str)]) -> Result<Axis> {
    Ok(axis.select(&filter_positions(axis, MatchMode::FullMatch, patterns)?))
}

/// Entries where any level matches `pattern`.
pub fn find_all(axis: &Axis, mode: MatchMode, pattern: &str) -> Result<Axis> {
    Ok(axis.select(&find_all_positions(axis, mode, pattern)?))
}

fn find_all_positions(axis: &Axis, mode: MatchMode, pattern: &str) -> Result<Vec<usize>> {
    let preds = axis
        .names()
        .iter()
        .map(|level| Predicate::new(level.as_str(), pattern, mode))
        .collect::<Result<Vec<_>>>()?;
    Ok(Filter::Any(preds).select(axis))
}

/// Sub-table selected on both axes by `(level, pattern)` pairs.
pub fn filter_table(
    table: &LabeledTable,
    mode: MatchMode,
    patterns: &[(&str, &str)],
) -> Result<LabeledTable> {
    let axes = QueryableAxes::of(table);
    axes.require_any(patterns)?;
    let selection = axes.select(&build_filter(mode, patterns)?);
    Ok(table
        .select_rows(&selection.rows)
        .select_columns(&selection.columns))
}

fn requested(patterns: &[(&str, &str)]) -> Vec<String> {
    patterns.iter().map(|(level, _)| (*level).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_sector() -> Axis {
        Axis::from_product(
            &["region", "sector"],
            &[&["a1", "b1", "c2", "b2"], &["aa", "bb", "cc"]],
        )
        .unwrap()
    }

    fn uniques<'a>(axis: &'a Axis, level: &str) -> Vec<&'a str> {
        axis.unique_level_values(level).unwrap()
    }

    #[test]
    fn test_fullmatch_and_combines_levels() {
        let axis = region_sector();
        let hit = fullmatch(&axis, &[("region", ".*b.*"), ("sector", ".*b.*")]).unwrap();
        assert_eq!(uniques(&hit, "region"), vec!["b1", "b2"]);
        assert_eq!(uniques(&hit, "sector"), vec!["bb"]);

        let second = fullmatch(&axis, &[("region", ".*2")]).unwrap();
        assert_eq!(uniques(&second, "region"), vec!["c2", "b2"]);
    }

    #[test]
    fn test_contains_and_match() {
        let axis = region_sector();
        let hit = contains(&axis, &[("region", "1"), ("sector", "c")]).unwrap();
        assert_eq!(uniques(&hit, "region"), vec!["a1", "b1"]);
        assert_eq!(uniques(&hit, "sector"), vec!["cc"]);

        let started = matches(&axis, &[("region", "b")]).unwrap();
        assert_eq!(uniques(&started, "region"), vec!["b1", "b2"]);
    }

    #[test]
    fn test_absent_levels_are_ignored() {
        let axis = region_sector();
        let hit = matches(&axis, &[("region", "a.*"), ("sector", ".*b.*"), ("flow", "abc")]).unwrap();
        assert_eq!(uniques(&hit, "region"), vec!["a1"]);
        assert_eq!(uniques(&hit, "sector"), vec!["bb"]);
    }

    #[test]
    fn test_no_requested_level_fails() {
        let axis = region_sector();
        let err = matches(&axis, &[("flow", "abc")]).unwrap_err();
        assert!(matches!(err, MatchError::NoMatchingLevel { .. }));
        assert!(filter_positions(&axis, MatchMode::Contains, &[]).is_err());
    }

    #[test]
    fn test_empty_axis_matches_nothing() {
        let empty = Axis::new(vec!["region".into(), "sector".into()], vec![]).unwrap();
        let hit = fullmatch(&empty, &[("region", ".*"), ("sector", "cc")]).unwrap();
        assert!(hit.is_empty());
    }

    #[test]
    fn test_find_all_unions_levels() {
        let axis = region_sector();
        let hit = find_all(&axis, MatchMode::Contains, "c").unwrap();
        for entry in hit.entries() {
            assert!(entry[0].contains('c') || entry[1].contains('c'));
        }
        // c2 x {aa, bb, cc} plus {a1, b1, b2} x cc
        assert_eq!(hit.len(), 6);
    }

    #[test]
    fn test_queryable_axes_prefers_rows() {
        let rows = Axis::single("region", ["x"]);
        let cols = Axis::from_product(&["region", "sector"], &[&["r1"], &["s1"]]).unwrap();
        let axes = QueryableAxes::new(&rows, &cols);
        assert_eq!(axes.side("region"), Some(AxisSide::Rows));
        assert_eq!(axes.side("sector"), Some(AxisSide::Columns));
        assert_eq!(axes.level_names(), vec!["region", "sector"]);
    }

    #[test]
    fn test_filter_table_uses_both_axes() {
        let rows = Axis::from_product(&["stressor", "compartment"], &[&["em1", "em2"], &["air", "water"]])
            .unwrap();
        let cols = Axis::from_product(&["region", "sector"], &[&["Region1", "Region2", "Region3"], &["food"]])
            .unwrap();
        let values = (0..12).map(f64::from).collect();
        let table = LabeledTable::new(rows, cols, values).unwrap();

        let sub = filter_table(
            &table,
            MatchMode::FullMatch,
            &[("stressor", "em1"), ("region", "Region[2,3]")],
        )
        .unwrap();
        assert_eq!(sub.shape(), (2, 2));
        assert_eq!(sub.value_at(&["em1", "water"], &["Region3", "food"]), Some(5.0));

        let err = filter_table(&table, MatchMode::FullMatch, &[("flow", "x")]).unwrap_err();
        assert!(matches!(err, MatchError::NoMatchingLevel { .. }));
    }

    #[test]
    fn test_queryable_find_all() {
        let rows = Axis::single("stressor", ["em1", "air_em"]);
        let cols = Axis::single("region", ["air", "r2"]);
        let axes = QueryableAxes::new(&rows, &cols);
        let sel = axes.find_all(MatchMode::Contains, "air").unwrap();
        assert_eq!(sel, Selection { rows: vec![1], columns: vec![0] });
    }
}
