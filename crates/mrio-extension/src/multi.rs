//! Conversion across several extensions with one bridge table.
//!
//! Every bridge rule names the extension it applies to in a source column.
//! The rows each extension contributes are cut out, stacked into one working
//! extension and converted as a single source. The working extension keeps
//! the owning extension of each row in a hidden row level, so a rule only
//! ever matches rows of the extension it names.

use std::collections::{HashMap, HashSet};

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use mrio_bridge::BridgeSpec;
use mrio_model::{Axis, LabeledTable, UnitTable};

use crate::error::{ExtensionError, Result};
use crate::extension::{Account, ConversionOutcome, Extension};
use crate::options::{CharacterizeOptions, ExtensionConvertOptions};

/// Convert rows drawn from several extensions into one extension.
///
/// # Errors
///
/// Structural errors when the bridge table lacks the source column, names an
/// unknown extension, or when the referenced extensions differ in row level
/// names or column axes, or share a row.
pub fn convert_extensions(
    extensions: &[Extension],
    bridge: &DataFrame,
    name: &str,
    options: &ExtensionConvertOptions,
) -> Result<ConversionOutcome> {
    let column = options.source_column();
    require_column(bridge, column)?;
    let config = options.bridge.clone().with_source_column(Some(column));
    let levels = shared_levels(extensions)?;
    let spec = BridgeSpec::parse(bridge, &levels, &config)?;

    let merged = merge_sources(extensions, &spec)?;
    let scoped = spec.scoped_to_sources(OWNER_LEVEL)?;
    without_owner(merged.convert(&scoped, name, options)?)
}

/// Characterize rows drawn from several extensions.
pub fn characterize_extensions(
    extensions: &[Extension],
    factors: &DataFrame,
    options: &CharacterizeOptions,
) -> Result<ConversionOutcome> {
    require_column(factors, &options.source_column)?;
    let first = extensions.first().ok_or(ExtensionError::NoExtensions)?;
    let config = options
        .bridge_config(first.first_row_level()?)
        .with_source_column(Some(options.source_column.as_str()));
    let levels = shared_levels(extensions)?;
    let spec = BridgeSpec::parse(factors, &levels, &config)?;

    let merged = merge_sources(extensions, &spec)?;
    let scoped = spec.scoped_to_sources(OWNER_LEVEL)?;
    without_owner(merged.characterize_with(&scoped, options)?)
}

/// Row level holding the name of the extension each merged row came from.
pub(crate) const OWNER_LEVEL: &str = "_extension";

fn require_column(table: &DataFrame, column: &str) -> Result<()> {
    if table.get_column_names().iter().any(|c| c.as_str() == column) {
        Ok(())
    } else {
        Err(ExtensionError::MissingSourceColumn {
            column: column.to_string(),
        })
    }
}

/// Level names of all extensions, in first-appearance order.
fn shared_levels(extensions: &[Extension]) -> Result<Vec<&str>> {
    if extensions.is_empty() {
        return Err(ExtensionError::NoExtensions);
    }
    let mut levels: Vec<&str> = Vec::new();
    for ext in extensions {
        for level in ext.level_names() {
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
    }
    Ok(levels)
}

/// Stack the rows each extension contributes to `spec` into one extension,
/// with the owning extension name in [`OWNER_LEVEL`].
pub(crate) fn merge_sources(extensions: &[Extension], spec: &BridgeSpec) -> Result<Extension> {
    let mut referenced: Vec<&str> = Vec::new();
    for rule in spec.rules() {
        match rule.source.as_deref() {
            Some(source) if !source.is_empty() => {
                if !referenced.contains(&source) {
                    referenced.push(source);
                }
            }
            _ => debug!(row = rule.row, "bridge rule names no extension"),
        }
    }

    let available: Vec<String> = extensions.iter().map(|e| e.name().to_string()).collect();
    if let Some(unknown) = referenced.iter().find(|r| !available.iter().any(|a| a == *r)) {
        return Err(ExtensionError::UnknownExtension {
            name: (*unknown).to_string(),
            available,
        });
    }

    let used: Vec<&Extension> = extensions
        .iter()
        .filter(|ext| {
            let keep = referenced.contains(&ext.name());
            if !keep {
                warn!(extension = ext.name(), "extension not referenced in bridge table, skipped");
            }
            keep
        })
        .collect();
    let Some(first) = used.first() else {
        return Err(ExtensionError::NothingReferenced);
    };

    let expected = first.row_level_names();
    for ext in &used {
        if ext.row_level_names() != expected {
            return Err(ExtensionError::IncompatibleRowLevels {
                extension: ext.name().to_string(),
                expected: expected.to_vec(),
                found: ext.row_level_names().to_vec(),
            });
        }
    }

    let (primary, final_demand) = merge_accounts(&used)?;
    let mut levels = expected.to_vec();
    levels.push(OWNER_LEVEL.to_string());

    let mut owner: HashMap<Vec<String>, &str> = HashMap::new();
    let mut unit: Option<UnitTable> = None;
    let mut tables: Vec<(Account, Option<LabeledTable>)> =
        [Some(primary), final_demand].into_iter().flatten().map(|a| (a, None)).collect();

    for ext in &used {
        let positions = contributed_rows(ext, spec);
        for &pos in &positions {
            let key = ext.rows().entries()[pos].clone();
            if let Some(first) = owner.insert(key.clone(), ext.name()) {
                return Err(ExtensionError::DuplicateRow {
                    row: key.join("/"),
                    first: first.to_string(),
                    second: ext.name().to_string(),
                });
            }
        }
        debug!(extension = ext.name(), rows = positions.len(), "rows drawn from extension");

        let part = ext
            .unit()
            .select(&positions)
            .with_row_levels_padded(&levels, ext.name())?;
        unit = Some(match unit {
            Some(acc) => acc.concat(&part)?,
            None => part,
        });

        for (account, merged) in &mut tables {
            let Some(table) = ext.account(*account) else {
                continue;
            };
            let part = table
                .select_rows(&positions)
                .with_row_levels_padded(&levels, ext.name())?;
            *merged = Some(match merged.take() {
                Some(acc) => {
                    if acc.columns() != part.columns() {
                        return Err(ExtensionError::ColumnMismatch {
                            extension: ext.name().to_string(),
                            account: account.as_str(),
                        });
                    }
                    acc.concat_rows(&part)?
                }
                None => part,
            });
        }
    }

    let name = used.iter().map(|e| e.name()).collect::<Vec<_>>().join("_");
    let unit = unit.ok_or(ExtensionError::NothingReferenced)?;
    let mut merged = Extension::new(name, unit);
    for (account, table) in tables {
        if let Some(table) = table {
            merged = merged.with_account(account, table)?;
        }
    }
    Ok(merged)
}

/// Sum away [`OWNER_LEVEL`] where the conversion kept it.
fn without_owner(outcome: ConversionOutcome) -> Result<ConversionOutcome> {
    let ConversionOutcome { report, extension } = outcome;
    let extension = extension.map(drop_owner_level).transpose()?;
    Ok(ConversionOutcome { report, extension })
}

fn drop_owner_level(ext: Extension) -> Result<Extension> {
    let Some(owner) = ext.rows().level_position(OWNER_LEVEL) else {
        return Ok(ext);
    };
    let keep: Vec<&str> = ext
        .row_level_names()
        .iter()
        .map(String::as_str)
        .filter(|level| *level != OWNER_LEVEL)
        .collect();

    // First unit per remaining key, in the order the tables sum into.
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut keys = Vec::new();
    let mut units = Vec::new();
    for (entry, unit) in ext.rows().entries().iter().zip(ext.unit().units()) {
        let key: Vec<String> = entry
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != owner)
            .map(|(_, label)| label.clone())
            .collect();
        if seen.insert(key.clone()) {
            keys.push(key);
            units.push(unit.clone());
        }
    }
    let names = keep.iter().map(|level| (*level).to_string()).collect();
    let unit = UnitTable::new(Axis::new(names, keys)?, units)?;

    let mut out = Extension::new(ext.name(), unit);
    for (account, table) in ext.accounts() {
        out = out.with_account(account, table.sum_over_row_levels(&keep)?)?;
    }
    Ok(out)
}

/// `F` when every extension has flows, else `S`; the matching final demand
/// table when every extension has it.
fn merge_accounts(used: &[&Extension]) -> Result<(Account, Option<Account>)> {
    let all = |account| used.iter().all(|ext| ext.has_account(account));
    let (primary, final_demand) = if all(Account::F) {
        (Account::F, Account::FY)
    } else if all(Account::S) {
        (Account::S, Account::SY)
    } else {
        let missing = used
            .iter()
            .find(|ext| !ext.has_account(Account::F) && !ext.has_account(Account::S))
            .or_else(|| used.first())
            .map(|ext| ext.name().to_string())
            .unwrap_or_default();
        return Err(ExtensionError::MissingAccount { extension: missing });
    };
    Ok((primary, all(final_demand).then_some(final_demand)))
}

/// Row positions of `ext` matched by the rules tagged with its name.
fn contributed_rows(ext: &Extension, spec: &BridgeSpec) -> Vec<usize> {
    let mut positions: Vec<usize> = spec
        .rules()
        .iter()
        .filter(|rule| rule.source.as_deref() == Some(ext.name()))
        .flat_map(|rule| rule.filter.select(ext.rows()))
        .collect();
    positions.sort_unstable();
    positions.dedup();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrio_model::Axis;
    use polars::prelude::*;

    fn ext(name: &str, stressors: &[&str], value: f64) -> Extension {
        let rows = Axis::single("stressor", stressors.iter().copied());
        let columns = Axis::single("region", ["reg1", "reg2"]);
        Extension::new(name, UnitTable::uniform(rows.clone(), "kg"))
            .with_account(Account::F, LabeledTable::filled(rows, columns, value))
            .unwrap()
    }

    #[test]
    fn test_merge_draws_tagged_rows() {
        let bridge = df! {
            "stressor" => &["co2", "water"],
            "extension" => &["air", "water_use"],
            "flow__stressor" => &["a", "b"],
        }
        .unwrap();
        let exts = vec![ext("air", &["co2", "ch4"], 1.0), ext("water_use", &["water"], 2.0)];
        let config = mrio_bridge::BridgeConfig::default().with_source_column(Some("extension"));
        let spec = BridgeSpec::parse(&bridge, &["stressor", "region"], &config).unwrap();
        let merged = merge_sources(&exts, &spec).unwrap();
        assert_eq!(merged.name(), "air_water_use");
        assert_eq!(merged.rows().level_values("stressor").unwrap(), vec!["co2", "water"]);
        assert_eq!(
            merged.rows().level_values(OWNER_LEVEL).unwrap(),
            vec!["air", "water_use"]
        );
        assert_eq!(merged.f().unwrap().total(), 2.0 + 4.0);
    }

    #[test]
    fn test_same_row_in_two_sources() {
        let bridge = df! {
            "stressor" => &["co2", "co2"],
            "extension" => &["a", "b"],
            "flow__stressor" => &["x", "x"],
        }
        .unwrap();
        let exts = vec![ext("a", &["co2"], 1.0), ext("b", &["co2"], 1.0)];
        let config = mrio_bridge::BridgeConfig::default().with_source_column(Some("extension"));
        let spec = BridgeSpec::parse(&bridge, &["stressor", "region"], &config).unwrap();
        let err = merge_sources(&exts, &spec).unwrap_err();
        assert!(matches!(err, ExtensionError::DuplicateRow { .. }));
    }
}
