//! Conversion engine.
//!
//! Applies the rules of a [`BridgeSpec`] to a [`LabeledTable`]:
//!
//! 1. Rules are grouped by their target key (the tuple of bridge values).
//! 2. Each rule selects the matching rows and columns with full-match
//!    constraints, scales them by its factor and relabels the old levels.
//! 3. Duplicate output entries are folded with the chosen [`Aggregation`],
//!    keyed on the full index including levels no bridge touches.
//! 4. Unbound row levels are then summed away (or moved to the end).
//! 5. Rows are ordered alphabetically, by first appearance in a bridge
//!    column, or by an explicit list.
//!
//! A rule that matches nothing contributes nothing unless the strict
//! missing policy is requested.
//!
//! [`Aggregation`]: crate::config::Aggregation

use std::collections::HashMap;

use polars::prelude::DataFrame;

use mrio_match::{AxisSide, QueryableAxes};
use mrio_model::{Axis, LabeledTable, UnitTable};

use crate::config::{Accumulator, BridgeConfig, ConvertOptions, MissingPolicy, RowOrder};
use crate::error::{BridgeError, Result};
use crate::parse::{BridgeRule, BridgeSpec};

/// Result of applying a bridge table.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The converted table.
    pub table: LabeledTable,
    /// Target unit per output row, `""` where no rule declares one.
    pub units: UnitTable,
    /// Bridge rows that matched no source entry.
    pub unmatched_rules: Vec<usize>,
}

/// Parse `bridge_table` against `source` and convert.
///
/// Declared units are not checked here: a result is returned even when the
/// bridge table mixes units. `mrio_extension::Extension::convert` validates
/// first and refuses to convert on unit errors.
pub fn convert(
    source: &LabeledTable,
    bridge_table: &DataFrame,
    config: &BridgeConfig,
    options: &ConvertOptions,
) -> Result<LabeledTable> {
    let spec = BridgeSpec::for_source(bridge_table, source, config)?;
    Ok(apply(source, &spec, options)?.table)
}

/// Apply an already parsed bridge table to `source`.
///
/// Like [`convert`], this performs no unit checks.
pub fn apply(source: &LabeledTable, spec: &BridgeSpec, options: &ConvertOptions) -> Result<Conversion> {
    let axes = QueryableAxes::of(source);
    for bridge in spec.bridges() {
        if !axes.has_level(&bridge.old_level) {
            return Err(BridgeError::UnknownBridgeLevel {
                column: bridge.name.clone(),
                level: bridge.old_level.clone(),
                available: axes.level_names().into_iter().map(String::from).collect(),
            });
        }
    }

    let layout = Layout::new(&axes, spec, options.drop_unbound_levels);
    let mut acc = Accumulation::new(&layout, source);
    let mut unmatched = Vec::new();

    for (target, rule_ids) in spec.groups() {
        tracing::trace!(key = ?target, rules = rule_ids.len(), "converting group");
        for &idx in &rule_ids {
            let rule = &spec.rules()[idx];
            let selection = axes.select(&rule.filter);
            if selection.is_empty() {
                tracing::debug!(row = rule.row, constraints = %rule.describe(), "bridge rule matched nothing");
                if options.missing_policy == MissingPolicy::Strict {
                    return Err(BridgeError::UnmatchedRule {
                        row: rule.row,
                        constraints: rule.describe(),
                    });
                }
                unmatched.push(rule.row);
                continue;
            }
            acc.add(&layout, source, rule, &selection.rows, &selection.columns);
        }
    }
    for rule in spec.rules() {
        acc.note_declared_unit(&layout, rule);
    }

    let folded = acc.finish(&layout, source, options)?;
    let Folded {
        keys,
        values,
        columns,
        units,
        first_seen,
    } = folded;
    let (keys, values) = order_rows(&layout, spec, &options.row_order, &first_seen, keys, values, columns.len())?;

    let bound = layout.row_bridges.len();
    let row_units = keys
        .iter()
        .map(|key| {
            units
                .get(&key[..bound.min(key.len())])
                .cloned()
                .unwrap_or_default()
        })
        .collect();

    let rows = Axis::new(layout.row_level_names.clone(), keys)?;
    let table = LabeledTable::new(rows.clone(), columns, values)?;
    let units = UnitTable::new(rows, row_units)?;

    tracing::info!(
        rules = spec.rules().len(),
        unmatched = unmatched.len(),
        rows = table.rows().len(),
        columns = table.columns().len(),
        "converted table"
    );

    Ok(Conversion {
        table,
        units,
        unmatched_rules: unmatched,
    })
}

/// Output part of a column key.
#[derive(Debug, Clone, Copy)]
enum ColumnPart {
    /// Keep the source label at this level position.
    Keep(usize),
    /// Rename the source label at `source` with bridge column `bridge`.
    Bridge { bridge: usize, source: usize },
}

/// How source labels map onto output keys.
#[derive(Debug)]
struct Layout {
    /// `(bridge index, old level, source position)` per bound output row level.
    row_bridges: Vec<(usize, String, usize)>,
    /// Source positions of row levels no bridge renames.
    unbound: Vec<usize>,
    /// Fold unbound levels away after aggregation.
    collapse: bool,
    /// Output row level names.
    row_level_names: Vec<String>,
    /// Output column parts; empty when no bridge renames a column level.
    column_parts: Vec<ColumnPart>,
    column_level_names: Vec<String>,
}

impl Layout {
    fn new(axes: &QueryableAxes<'_>, spec: &BridgeSpec, drop_unbound: bool) -> Self {
        let rows = axes.rows();
        let columns = axes.columns();

        // Bound row levels: per old level in first-occurrence order, every
        // new level chained from it in bridge column order.
        let mut row_bridges = Vec::new();
        for old in spec.old_levels() {
            if axes.side(old) != Some(AxisSide::Rows) {
                continue;
            }
            let Some(position) = rows.level_position(old) else {
                continue;
            };
            for (idx, bridge) in spec.bridges().iter().enumerate() {
                if bridge.old_level == old {
                    row_bridges.push((idx, old.to_string(), position));
                }
            }
        }

        let bound_positions: Vec<usize> = row_bridges.iter().map(|(_, _, p)| *p).collect();
        let unbound: Vec<usize> = (0..rows.level_count())
            .filter(|p| !bound_positions.contains(p))
            .collect();

        // Without any row bridge the row index passes through unchanged.
        let collapse = drop_unbound && !row_bridges.is_empty();

        let mut row_level_names: Vec<String> = row_bridges
            .iter()
            .map(|(idx, _, _)| spec.bridges()[*idx].new_level.clone())
            .collect();
        if !collapse {
            row_level_names.extend(unbound.iter().map(|&p| rows.names()[p].clone()));
        }

        let mut column_parts = Vec::new();
        let mut column_level_names = Vec::new();
        let column_bridged = spec
            .bridges()
            .iter()
            .any(|b| axes.side(&b.old_level) == Some(AxisSide::Columns));
        if column_bridged {
            for (position, name) in columns.names().iter().enumerate() {
                let chained: Vec<usize> = spec
                    .bridges()
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| &b.old_level == name && axes.side(name) == Some(AxisSide::Columns))
                    .map(|(idx, _)| idx)
                    .collect();
                if chained.is_empty() {
                    column_parts.push(ColumnPart::Keep(position));
                    column_level_names.push(name.clone());
                } else {
                    for idx in chained {
                        column_parts.push(ColumnPart::Bridge {
                            bridge: idx,
                            source: position,
                        });
                        column_level_names.push(spec.bridges()[idx].new_level.clone());
                    }
                }
            }
        }

        Self {
            row_bridges,
            unbound,
            collapse,
            row_level_names,
            column_parts,
            column_level_names,
        }
    }

    /// Stage-one row key: bound levels renamed, then every unbound label.
    fn row_key(&self, rule: &BridgeRule, entry: &[String]) -> Vec<String> {
        let mut key: Vec<String> = self
            .row_bridges
            .iter()
            .map(|(bridge, old, pos)| rule.rename(*bridge, old, &entry[*pos]))
            .collect();
        key.extend(self.unbound.iter().map(|&p| entry[p].clone()));
        key
    }

    fn column_key(&self, rule: &BridgeRule, entry: &[String], names: &[String]) -> Vec<String> {
        self.column_parts
            .iter()
            .map(|part| match *part {
                ColumnPart::Keep(pos) => entry[pos].clone(),
                ColumnPart::Bridge { bridge, source } => rule.rename(bridge, &names[source], &entry[source]),
            })
            .collect()
    }

    fn renames_columns(&self) -> bool {
        !self.column_parts.is_empty()
    }
}

#[derive(Default)]
struct KeyIndex {
    index: HashMap<Vec<String>, usize>,
    keys: Vec<Vec<String>>,
}

impl KeyIndex {
    fn slot(&mut self, key: Vec<String>) -> usize {
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.keys.len();
        self.keys.push(key.clone());
        self.index.insert(key, slot);
        slot
    }
}

/// Aggregation state across all rules.
struct Accumulation {
    rows: KeyIndex,
    columns: KeyIndex,
    /// Smallest source column position feeding each output column.
    column_origin: Vec<usize>,
    cells: HashMap<(usize, usize), Accumulator>,
    units: HashMap<Vec<String>, String>,
    first_seen: Vec<Vec<String>>,
}

/// Folded output before row ordering.
struct Folded {
    keys: Vec<Vec<String>>,
    values: Vec<f64>,
    columns: Axis,
    units: HashMap<Vec<String>, String>,
    first_seen: Vec<Vec<String>>,
}

impl Accumulation {
    fn new(layout: &Layout, source: &LabeledTable) -> Self {
        let mut columns = KeyIndex::default();
        let mut column_origin = Vec::new();
        if !layout.renames_columns() {
            for (pos, entry) in source.columns().entries().iter().enumerate() {
                columns.slot(entry.clone());
                column_origin.push(pos);
            }
        }
        Self {
            rows: KeyIndex::default(),
            columns,
            column_origin,
            cells: HashMap::new(),
            units: HashMap::new(),
            first_seen: vec![Vec::new(); layout.row_bridges.len()],
        }
    }

    fn add(&mut self, layout: &Layout, source: &LabeledTable, rule: &BridgeRule, rows: &[usize], columns: &[usize]) {
        let column_slots: Vec<usize> = if layout.renames_columns() {
            let names = source.columns().names();
            columns
                .iter()
                .map(|&c| {
                    let entry = &source.columns().entries()[c];
                    let slot = self.columns.slot(layout.column_key(rule, entry, names));
                    if slot == self.column_origin.len() {
                        self.column_origin.push(c);
                    } else {
                        self.column_origin[slot] = self.column_origin[slot].min(c);
                    }
                    slot
                })
                .collect()
        } else {
            columns.to_vec()
        };

        let bound = layout.row_bridges.len();
        for &r in rows {
            let key = layout.row_key(rule, &source.rows().entries()[r]);
            for (level, seen) in self.first_seen.iter_mut().enumerate() {
                if !seen.contains(&key[level]) {
                    seen.push(key[level].clone());
                }
            }
            if let Some(unit) = rule.unit_new.as_deref().filter(|u| !u.is_empty()) {
                self.units
                    .entry(key[..bound].to_vec())
                    .or_insert_with(|| unit.to_string());
            }

            let slot = self.rows.slot(key);
            let Some(values) = source.row(r) else {
                continue;
            };
            for (&c, &col_slot) in columns.iter().zip(&column_slots) {
                let value = values[c] * rule.factor;
                self.cells
                    .entry((slot, col_slot))
                    .and_modify(|acc| acc.push(value))
                    .or_insert_with(|| Accumulator::new(value));
            }
        }
    }

    /// Record the declared unit under the literal target key, for rows
    /// that end up without contributions.
    fn note_declared_unit(&mut self, layout: &Layout, rule: &BridgeRule) {
        let Some(unit) = rule.unit_new.as_deref().filter(|u| !u.is_empty()) else {
            return;
        };
        let key: Vec<String> = layout
            .row_bridges
            .iter()
            .map(|(bridge, _, _)| rule.targets.get(*bridge).cloned().unwrap_or_default())
            .collect();
        self.units.entry(key).or_insert_with(|| unit.to_string());
    }

    fn finish(self, layout: &Layout, source: &LabeledTable, options: &ConvertOptions) -> Result<Folded> {
        // Output columns in source order of their first feeding column.
        let mut column_order: Vec<usize> = (0..self.columns.keys.len()).collect();
        column_order.sort_by_key(|&slot| self.column_origin[slot]);
        let mut column_position = vec![0; column_order.len()];
        for (pos, &slot) in column_order.iter().enumerate() {
            column_position[slot] = pos;
        }
        let width = column_order.len();

        let columns = if layout.renames_columns() {
            let keys = column_order
                .iter()
                .map(|&slot| self.columns.keys[slot].clone())
                .collect();
            Axis::new(layout.column_level_names.clone(), keys)?
        } else {
            source.columns().clone()
        };

        let bound = layout.row_bridges.len();
        let mut out = KeyIndex::default();
        let mut row_map = Vec::with_capacity(self.rows.keys.len());
        for key in &self.rows.keys {
            let out_key = if layout.collapse {
                key[..bound].to_vec()
            } else {
                key.clone()
            };
            row_map.push(out.slot(out_key));
        }

        let mut cells: Vec<((usize, usize), Accumulator)> = self.cells.into_iter().collect();
        cells.sort_by_key(|(cell, _)| *cell);
        let mut values = vec![0.0; out.keys.len() * width];
        for ((row, col), acc) in cells {
            values[row_map[row] * width + column_position[col]] += acc.finish(options.aggregation);
        }

        Ok(Folded {
            keys: out.keys,
            values,
            columns,
            units: self.units,
            first_seen: self.first_seen,
        })
    }
}

fn order_rows(
    layout: &Layout,
    spec: &BridgeSpec,
    order: &RowOrder,
    first_seen: &[Vec<String>],
    keys: Vec<Vec<String>>,
    values: Vec<f64>,
    width: usize,
) -> Result<(Vec<Vec<String>>, Vec<f64>)> {
    let mut positions: Vec<usize> = (0..keys.len()).collect();
    match order {
        RowOrder::Alphabetical => positions.sort_by(|&a, &b| keys[a].cmp(&keys[b])),
        RowOrder::FirstAppearance(column) => {
            let bridge = spec
                .bridge_position(column)
                .ok_or_else(|| BridgeError::UnknownOrderColumn {
                    column: column.clone(),
                })?;
            let level = layout
                .row_bridges
                .iter()
                .position(|(idx, _, _)| *idx == bridge)
                .ok_or_else(|| BridgeError::InvalidRowOrder {
                    message: format!("bridge column '{column}' does not produce a row level"),
                })?;
            let rank: HashMap<&str, usize> = first_seen[level]
                .iter()
                .enumerate()
                .map(|(i, v)| (v.as_str(), i))
                .collect();
            let rank_of = |pos: usize| rank.get(keys[pos][level].as_str()).copied().unwrap_or(usize::MAX);
            positions.sort_by(|&a, &b| rank_of(a).cmp(&rank_of(b)).then_with(|| keys[a].cmp(&keys[b])));
        }
        RowOrder::Explicit(wanted) => {
            let levels = layout.row_level_names.len();
            if let Some(bad) = wanted.iter().find(|k| k.len() != levels) {
                return Err(BridgeError::InvalidRowOrder {
                    message: format!("key {bad:?} has {} labels, rows have {levels} levels", bad.len()),
                });
            }
            let index: HashMap<&[String], usize> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_slice(), i))
                .collect();
            let mut out_values = Vec::with_capacity(wanted.len() * width);
            for key in wanted {
                match index.get(key.as_slice()) {
                    Some(&pos) => out_values.extend_from_slice(&values[pos * width..(pos + 1) * width]),
                    None => out_values.extend(std::iter::repeat_n(0.0, width)),
                }
            }
            return Ok((wanted.clone(), out_values));
        }
    }

    let mut out_values = Vec::with_capacity(values.len());
    let out_keys = positions
        .iter()
        .map(|&pos| {
            out_values.extend_from_slice(&values[pos * width..(pos + 1) * width]);
            keys[pos].clone()
        })
        .collect();
    Ok((out_keys, out_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Aggregation, BridgeAlias};
    use polars::prelude::*;

    fn stressors() -> LabeledTable {
        let rows = Axis::from_product(&["stressor", "compartment"], &[&["em1", "em2"], &["air", "water"]])
            .unwrap();
        let cols = Axis::from_product(&["region", "sector"], &[&["r1", "r2"], &["food", "mining"]])
            .unwrap();
        // em1/air = 1, em1/water = 2, em2/air = 3, em2/water = 4 in every column
        let values = (1..=4)
            .flat_map(|v| std::iter::repeat_n(f64::from(v), 4))
            .collect();
        LabeledTable::new(rows, cols, values).unwrap()
    }

    fn run(df: &DataFrame, options: &ConvertOptions) -> Conversion {
        let spec = BridgeSpec::for_source(df, &stressors(), &BridgeConfig::default()).unwrap();
        apply(&stressors(), &spec, options).unwrap()
    }

    #[test]
    fn test_many_to_one_sum() {
        let df = df! {
            "stressor" => &["em.*"],
            "compartment" => &["air|water"],
            "total__stressor" => &["all"],
            "factor" => &[2.0],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.rows().names(), &["total".to_string()]);
        assert_eq!(out.shape(), (1, 4));
        assert_eq!(out.value_at(&["all"], &["r1", "food"]), Some(20.0));
    }

    #[test]
    fn test_keep_unbound_levels_moves_them_last() {
        let df = df! {
            "stressor" => &["em1", "em2"],
            "gas__stressor" => &["CO2", "CO2"],
        }
        .unwrap();
        let options = ConvertOptions::default().with_drop_unbound_levels(false);
        let out = run(&df, &options).table;
        assert_eq!(out.rows().names(), &["gas".to_string(), "compartment".to_string()]);
        assert_eq!(out.value_at(&["CO2", "air"], &["r2", "mining"]), Some(4.0));
        assert_eq!(out.value_at(&["CO2", "water"], &["r2", "mining"]), Some(6.0));
    }

    #[test]
    fn test_aggregation_applies_before_collapse() {
        let df = df! {
            "stressor" => &["em1", "em2"],
            "gas__stressor" => &["CO2", "CO2"],
        }
        .unwrap();
        let options = ConvertOptions::default().with_aggregation(Aggregation::Max);
        let out = run(&df, &options).table;
        // max per compartment (3 for air, 4 for water), then summed
        assert_eq!(out.value_at(&["CO2"], &["r1", "food"]), Some(7.0));

        let options = ConvertOptions::default().with_aggregation(Aggregation::Mean);
        let out = run(&df, &options).table;
        assert_eq!(out.value_at(&["CO2"], &["r1", "food"]), Some(5.0));
    }

    #[test]
    fn test_column_constraint_limits_columns() {
        let df = df! {
            "stressor" => &["em1", "em1"],
            "region" => &["r1", "r2"],
            "impact__stressor" => &["GWP", "GWP"],
            "factor" => &[10.0, 100.0],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.columns().len(), 4);
        assert_eq!(out.value_at(&["GWP"], &["r1", "food"]), Some(30.0));
        assert_eq!(out.value_at(&["GWP"], &["r2", "mining"]), Some(300.0));
    }

    #[test]
    fn test_chained_levels_nest_under_old_level() {
        let df = df! {
            "stressor" => &["em1", "em2"],
            "gas__stressor" => &["CO2", "CH4"],
            "source__stressor" => &["fossil", "bio"],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.rows().names(), &["gas".to_string(), "source".to_string()]);
        assert_eq!(out.rows().entry(0).unwrap(), &["CH4".to_string(), "bio".to_string()]);
        assert_eq!(out.value_at(&["CO2", "fossil"], &["r1", "food"]), Some(3.0));
    }

    #[test]
    fn test_column_bridge_renames_in_place() {
        let df = df! {
            "stressor" => &["em1", "em1"],
            "sector" => &["food", "mining"],
            "impact__stressor" => &["GWP", "GWP"],
            "group__sector" => &["all", "all"],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.columns().names(), &["region".to_string(), "group".to_string()]);
        assert_eq!(out.columns().len(), 2);
        assert_eq!(out.value_at(&["GWP"], &["r1", "all"]), Some(6.0));
    }

    #[test]
    fn test_first_appearance_and_explicit_order() {
        let df = df! {
            "stressor" => &["em2", "em1"],
            "gas__stressor" => &["zeta", "alpha"],
        }
        .unwrap();
        let alpha = run(&df, &ConvertOptions::default()).table;
        assert_eq!(alpha.rows().level_values("gas").unwrap(), vec!["alpha", "zeta"]);

        let by_column = ConvertOptions::default()
            .with_row_order(RowOrder::FirstAppearance("gas__stressor".into()));
        let out = run(&df, &by_column).table;
        assert_eq!(out.rows().level_values("gas").unwrap(), vec!["zeta", "alpha"]);

        let explicit = ConvertOptions::default().with_row_order(RowOrder::Explicit(vec![
            vec!["alpha".into()],
            vec!["missing".into()],
        ]));
        let out = run(&df, &explicit).table;
        assert_eq!(out.shape(), (2, 4));
        assert_eq!(out.value_at(&["missing"], &["r1", "food"]), Some(0.0));
        assert_eq!(out.value_at(&["alpha"], &["r1", "food"]), Some(3.0));
    }

    #[test]
    fn test_unknown_order_column() {
        let df = df! { "stressor" => &["em1"], "gas__stressor" => &["CO2"] }.unwrap();
        let spec = BridgeSpec::for_source(&df, &stressors(), &BridgeConfig::default()).unwrap();
        let options = ConvertOptions::default().with_row_order(RowOrder::FirstAppearance("nope".into()));
        let err = apply(&stressors(), &spec, &options).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownOrderColumn { .. }));
    }

    #[test]
    fn test_unmatched_rule_policies() {
        let df = df! {
            "stressor" => &["em1", "em9"],
            "gas__stressor" => &["CO2", "XX"],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default());
        assert_eq!(out.unmatched_rules, vec![1]);
        assert_eq!(out.table.rows().len(), 1);

        let spec = BridgeSpec::for_source(&df, &stressors(), &BridgeConfig::default()).unwrap();
        let strict = ConvertOptions::default().with_missing_policy(MissingPolicy::Strict);
        let err = apply(&stressors(), &spec, &strict).unwrap_err();
        assert!(matches!(err, BridgeError::UnmatchedRule { row: 1, .. }));
    }

    #[test]
    fn test_regex_capture_rename() {
        let df = df! {
            "stressor" => &["em(.)"],
            "gas__stressor" => &["gas_$1"],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.rows().level_values("gas").unwrap(), vec!["gas_1", "gas_2"]);
    }

    #[test]
    fn test_units_follow_target_keys() {
        let df = df! {
            "stressor" => &["em1", "em2", "em3"],
            "gas__stressor" => &["CO2", "CH4", "N2O"],
            "unit_new" => &["t", "kt", "kg"],
        }
        .unwrap();
        let options = ConvertOptions::default().with_row_order(RowOrder::Explicit(vec![
            vec!["CO2".into()],
            vec!["N2O".into()],
        ]));
        let out = run(&df, &options);
        assert_eq!(out.units.units(), &["t".to_string(), "kg".to_string()]);
    }

    #[test]
    fn test_alias_bridge() {
        let df = df! {
            "stressor" => &["em1"],
            "impact" => &["GWP"],
            "factor" => &[3.0],
        }
        .unwrap();
        let config = BridgeConfig::default().with_bridge_alias(BridgeAlias::new("impact", "impact", "stressor"));
        let out = convert(&stressors(), &df, &config, &ConvertOptions::default()).unwrap();
        assert_eq!(out.value_at(&["GWP"], &["r1", "food"]), Some(9.0));
    }

    #[test]
    fn test_empty_bridge_values_group_together() {
        let df = df! {
            "stressor" => &[Some("em1"), Some("em2")],
            "gas__stressor" => &[None::<&str>, None],
        }
        .unwrap();
        let out = run(&df, &ConvertOptions::default()).table;
        assert_eq!(out.shape(), (1, 4));
        assert_eq!(out.value_at(&[""], &["r1", "food"]), Some(10.0));
    }
}
