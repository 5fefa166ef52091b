//! Bridge table parsing.
//!
//! A bridge table is a DataFrame whose headers decide what each column does:
//!
//! | Header                          | Role                                       |
//! |---------------------------------|--------------------------------------------|
//! | factor column (`factor`)        | numeric multiplier, 1 when the column is absent |
//! | unit / source / ignore columns  | metadata, never matched                    |
//! | `<new>__<old>` or a bridge alias| bridge column: renames level `old` to `new` |
//! | name of a source level          | constraint: full-match regex on that level |
//! | anything else                   | ignored                                    |
//!
//! Parsing never mutates the input frame; empty cells are read as `""`.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use mrio_common::{cell_f64, cell_string};
use mrio_match::{Filter, Predicate};
use mrio_model::LabeledTable;

use crate::config::{BridgeConfig, MissingPolicy};
use crate::error::{BridgeError, Result};

/// A column renaming one source level into a new level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeColumn {
    /// Header in the bridge table.
    pub name: String,
    pub new_level: String,
    pub old_level: String,
}

/// One row of a bridge table.
#[derive(Debug, Clone)]
pub struct BridgeRule {
    /// Zero-based row in the bridge table.
    pub row: usize,
    /// Full-match constraints on source levels, combined with AND.
    pub filter: Filter,
    /// New value per bridge column, in bridge column order.
    pub targets: Vec<String>,
    pub factor: f64,
    /// Declared original unit, when the table has that column.
    pub unit_orig: Option<String>,
    /// Declared target unit, when the table has that column.
    pub unit_new: Option<String>,
    /// Extension the rule applies to, when the table has a source column.
    pub source: Option<String>,
    /// Constraints and targets are plain text, not patterns.
    pub literal: bool,
}

impl BridgeRule {
    /// Constraint pattern on `level`, if the rule has one.
    pub fn constraint(&self, level: &str) -> Option<&Predicate> {
        self.filter.predicate_for(level)
    }

    /// New label for `label` at the level of bridge column `bridge`.
    ///
    /// With a regex constraint on the old level, the constraint is used as a
    /// substitution pattern so capture groups (`$1`) expand. Otherwise, and
    /// always for literal rules, the target is taken as written.
    pub fn rename(&self, bridge: usize, old_level: &str, label: &str) -> String {
        let target = self.targets.get(bridge).map_or("", String::as_str);
        if self.literal {
            return target.to_string();
        }
        match self.constraint(old_level) {
            Some(pred) if pred.is_match(label) => {
                pred.regex().replace(label, target).into_owned()
            }
            _ => target.to_string(),
        }
    }

    /// Human-readable summary of the constraints, for messages.
    pub fn describe(&self) -> String {
        if self.filter.is_empty() {
            return "no constraints".to_string();
        }
        self.filter
            .predicates()
            .iter()
            .map(|p| format!("{}={}", p.level(), p.pattern()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A parsed bridge table.
#[derive(Debug, Clone)]
pub struct BridgeSpec {
    bridges: Vec<BridgeColumn>,
    constraint_levels: Vec<String>,
    ignored_columns: Vec<String>,
    rules: Vec<BridgeRule>,
    has_unit_orig: bool,
    has_unit_new: bool,
}

enum ColumnRole {
    Factor,
    Metadata,
    Bridge(BridgeColumn),
    Constraint,
    Ignored,
}

impl BridgeSpec {
    /// Parse `table` against the level names of the source.
    ///
    /// # Errors
    ///
    /// Structural errors: no bridge column, a header with more than one
    /// separator, or a bridge column whose old level is not a source level.
    /// Invalid patterns and factors are reported with their row.
    pub fn parse(table: &DataFrame, source_levels: &[&str], config: &BridgeConfig) -> Result<Self> {
        let headers: Vec<String> = table
            .get_column_names()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut bridges = Vec::new();
        let mut constraint_levels = Vec::new();
        let mut ignored_columns = Vec::new();
        let mut has_factor = false;

        for header in &headers {
            match classify(header, source_levels, config)? {
                ColumnRole::Factor => has_factor = true,
                ColumnRole::Metadata => {}
                ColumnRole::Bridge(bridge) => bridges.push(bridge),
                ColumnRole::Constraint => constraint_levels.push(header.clone()),
                ColumnRole::Ignored => {
                    tracing::debug!(column = %header, "bridge column matches no source level, ignored");
                    ignored_columns.push(header.clone());
                }
            }
        }

        if bridges.is_empty() {
            return Err(BridgeError::NoBridgeColumns { columns: headers });
        }

        let has_unit_orig = has_column(&headers, config.unit_orig_column.as_deref());
        let has_unit_new = has_column(&headers, config.unit_new_column.as_deref());
        let has_source = has_column(&headers, config.source_column.as_deref());

        let mut rules = Vec::with_capacity(table.height());
        for row in 0..table.height() {
            let mut preds = Vec::new();
            for level in &constraint_levels {
                let pattern = cell_string(table, level, row);
                if pattern.is_empty() {
                    continue;
                }
                let pred = if config.literal_constraints {
                    Predicate::literal(level.as_str(), &pattern)?
                } else {
                    Predicate::fullmatch(level.as_str(), pattern)?
                };
                preds.push(pred);
            }

            let targets = bridges
                .iter()
                .map(|b| cell_string(table, &b.name, row))
                .collect();

            let factor = if has_factor {
                parse_factor(table, &config.factor_column, row, config.missing_policy)?
            } else {
                1.0
            };

            let optional = |present: bool, column: Option<&str>| {
                column
                    .filter(|_| present)
                    .map(|c| cell_string(table, c, row))
            };

            rules.push(BridgeRule {
                row,
                filter: Filter::All(preds),
                targets,
                factor,
                unit_orig: optional(has_unit_orig, config.unit_orig_column.as_deref()),
                unit_new: optional(has_unit_new, config.unit_new_column.as_deref()),
                source: optional(has_source, config.source_column.as_deref()),
                literal: config.literal_constraints,
            });
        }

        tracing::debug!(
            rules = rules.len(),
            bridges = bridges.len(),
            constraints = constraint_levels.len(),
            "parsed bridge table"
        );

        Ok(Self {
            bridges,
            constraint_levels,
            ignored_columns,
            rules,
            has_unit_orig,
            has_unit_new,
        })
    }

    /// Parse `table` against the row and column levels of `source`.
    pub fn for_source(table: &DataFrame, source: &LabeledTable, config: &BridgeConfig) -> Result<Self> {
        Self::parse(table, &source.level_names(), config)
    }

    /// Bridge columns in header order.
    pub fn bridges(&self) -> &[BridgeColumn] {
        &self.bridges
    }

    /// Constraining levels in header order.
    pub fn constraint_levels(&self) -> &[String] {
        &self.constraint_levels
    }

    /// Headers that matched no source level and are not used.
    pub fn ignored_columns(&self) -> &[String] {
        &self.ignored_columns
    }

    pub fn rules(&self) -> &[BridgeRule] {
        &self.rules
    }

    pub fn has_unit_orig(&self) -> bool {
        self.has_unit_orig
    }

    pub fn has_unit_new(&self) -> bool {
        self.has_unit_new
    }

    /// Index of a bridge column by header or by new level name.
    pub fn bridge_position(&self, name: &str) -> Option<usize> {
        self.bridges
            .iter()
            .position(|b| b.name == name)
            .or_else(|| self.bridges.iter().position(|b| b.new_level == name))
    }

    /// Distinct old levels in first-occurrence order.
    pub fn old_levels(&self) -> Vec<&str> {
        let mut levels: Vec<&str> = Vec::new();
        for bridge in &self.bridges {
            if !levels.contains(&bridge.old_level.as_str()) {
                levels.push(&bridge.old_level);
            }
        }
        levels
    }

    /// Rules grouped by target key, in first-appearance order.
    pub fn groups(&self) -> Vec<(Vec<String>, Vec<usize>)> {
        let mut index: HashMap<&[String], usize> = HashMap::new();
        let mut groups: Vec<(Vec<String>, Vec<usize>)> = Vec::new();
        for (pos, rule) in self.rules.iter().enumerate() {
            match index.get(rule.targets.as_slice()) {
                Some(&slot) => groups[slot].1.push(pos),
                None => {
                    index.insert(rule.targets.as_slice(), groups.len());
                    groups.push((rule.targets.clone(), vec![pos]));
                }
            }
        }
        groups
    }

    /// Copy in which every rule also requires the row label at `level` to
    /// equal the rule's source. Rules naming no source are dropped.
    pub fn scoped_to_sources(&self, level: &str) -> Result<Self> {
        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let Some(source) = rule.source.as_deref().filter(|s| !s.is_empty()) else {
                tracing::debug!(row = rule.row, "bridge rule names no source, dropped");
                continue;
            };
            let mut preds = rule.filter.predicates().to_vec();
            preds.push(Predicate::literal(level, source)?);
            rules.push(BridgeRule {
                filter: Filter::All(preds),
                ..rule.clone()
            });
        }
        Ok(Self {
            rules,
            ..self.clone()
        })
    }

    /// Copy keeping only the rules for which `keep` is true.
    pub fn retain_rules(&self, keep: impl Fn(&BridgeRule) -> bool) -> Self {
        Self {
            rules: self.rules.iter().filter(|r| keep(*r)).cloned().collect(),
            ..self.clone()
        }
    }
}

fn classify(header: &str, source_levels: &[&str], config: &BridgeConfig) -> Result<ColumnRole> {
    if header == config.factor_column {
        return Ok(ColumnRole::Factor);
    }
    if config.is_metadata(header) {
        return Ok(ColumnRole::Metadata);
    }

    let bridge = if let Some(alias) = config.bridge_aliases.iter().find(|a| a.column == header) {
        Some(BridgeColumn {
            name: header.to_string(),
            new_level: alias.new_level.clone(),
            old_level: alias.old_level.clone(),
        })
    } else if header.contains(config.separator.as_str()) {
        let parts: Vec<&str> = header.split(config.separator.as_str()).collect();
        match parts.as_slice() {
            [new, old] if !new.is_empty() && !old.is_empty() => Some(BridgeColumn {
                name: header.to_string(),
                new_level: (*new).to_string(),
                old_level: (*old).to_string(),
            }),
            _ => {
                return Err(BridgeError::MalformedBridgeColumn {
                    column: header.to_string(),
                    separator: config.separator.clone(),
                });
            }
        }
    } else {
        None
    };

    match bridge {
        Some(bridge) if source_levels.contains(&bridge.old_level.as_str()) => {
            Ok(ColumnRole::Bridge(bridge))
        }
        Some(bridge) => Err(BridgeError::UnknownBridgeLevel {
            column: bridge.name,
            level: bridge.old_level,
            available: source_levels.iter().map(|l| (*l).to_string()).collect(),
        }),
        None if source_levels.contains(&header) => Ok(ColumnRole::Constraint),
        None => Ok(ColumnRole::Ignored),
    }
}

fn parse_factor(table: &DataFrame, column: &str, row: usize, policy: MissingPolicy) -> Result<f64> {
    if let Some(factor) = cell_f64(table, column, row) {
        return Ok(factor);
    }
    let raw = cell_string(table, column, row);
    if !raw.is_empty() {
        return Err(BridgeError::InvalidFactor { row, value: raw });
    }
    match policy {
        MissingPolicy::Silent => {
            tracing::debug!(row, "empty factor treated as 0");
            Ok(0.0)
        }
        MissingPolicy::Strict => Err(BridgeError::MissingFactor { row }),
    }
}

fn has_column(headers: &[String], column: Option<&str>) -> bool {
    column.is_some_and(|c| headers.iter().any(|h| h == c))
}
