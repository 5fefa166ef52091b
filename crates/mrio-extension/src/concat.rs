//! Concatenation of extensions with differing row schemas.

use tracing::debug;

use mrio_model::{LabeledTable, UNBOUND_LABEL, UnitTable};

use crate::error::{ExtensionError, Result};
use crate::extension::{Account, Extension};

/// Row level that replaces the first level when the extensions disagree on
/// its name.
pub const INDICATOR_LEVEL: &str = "indicator";

/// Stack the rows of `extensions` into one extension named `name`.
///
/// When the row level names differ, the first level of every extension is
/// renamed to `indicator` and the remaining levels are unified; labels
/// missing in an extension are filled with [`UNBOUND_LABEL`]. `F` and `S`
/// are kept when every extension has them. A final demand table present in
/// any extension is kept and zero-filled for the others.
pub fn concat_extensions(extensions: &[Extension], name: &str) -> Result<Extension> {
    let first = extensions.first().ok_or(ExtensionError::NoExtensions)?;
    let uniform = extensions
        .iter()
        .all(|ext| ext.row_level_names() == first.row_level_names());
    let target = if uniform {
        first.row_level_names().to_vec()
    } else {
        unified_levels(extensions)
    };

    let mut accounts = Vec::new();
    for account in [Account::F, Account::S] {
        if extensions.iter().all(|ext| ext.has_account(account)) {
            accounts.push(account);
        } else {
            debug!(account = account.as_str(), "account missing in some extensions, dropped");
        }
    }
    for account in [Account::FY, Account::SY] {
        if extensions.iter().any(|ext| ext.has_account(account)) {
            accounts.push(account);
        }
    }

    let mut unit: Option<UnitTable> = None;
    let mut tables: Vec<Option<LabeledTable>> = vec![None; accounts.len()];
    for ext in extensions {
        let rename = (!uniform).then(|| ext.row_level_names()[0].as_str());
        let part = relabel_units(ext.unit(), rename, &target)?;

        for (slot, &account) in tables.iter_mut().zip(&accounts) {
            let table = match ext.account(account) {
                Some(table) => relabel_table(table, rename, &target)?,
                None => {
                    let columns = extensions
                        .iter()
                        .find_map(|other| other.account(account))
                        .map(|t| t.columns().clone())
                        .ok_or(ExtensionError::NoExtensions)?;
                    LabeledTable::zeros(part.rows().clone(), columns)
                }
            };
            *slot = Some(match slot.take() {
                Some(acc) => {
                    if acc.columns() != table.columns() {
                        return Err(ExtensionError::ColumnMismatch {
                            extension: ext.name().to_string(),
                            account: account.as_str(),
                        });
                    }
                    acc.concat_rows(&table)?
                }
                None => table,
            });
        }

        unit = Some(match unit {
            Some(acc) => acc.concat(&part)?,
            None => part,
        });
    }

    let unit = unit.ok_or(ExtensionError::NoExtensions)?;
    let mut out = Extension::new(name, unit);
    for (account, table) in accounts.into_iter().zip(tables) {
        if let Some(table) = table {
            out = out.with_account(account, table)?;
        }
    }
    debug!(
        extensions = extensions.len(),
        rows = out.rows().len(),
        levels = ?out.row_level_names(),
        "concatenated extensions"
    );
    Ok(out)
}

fn unified_levels(extensions: &[Extension]) -> Vec<String> {
    let mut names = vec![INDICATOR_LEVEL.to_string()];
    for ext in extensions {
        for level in ext.row_level_names().iter().skip(1) {
            if !names.contains(level) {
                names.push(level.clone());
            }
        }
    }
    names
}

fn relabel_units(unit: &UnitTable, rename: Option<&str>, target: &[String]) -> Result<UnitTable> {
    let unit = match rename {
        Some(old) => unit.with_level_renamed(old, INDICATOR_LEVEL)?,
        None => unit.clone(),
    };
    Ok(unit.with_row_levels_padded(target, UNBOUND_LABEL)?)
}

fn relabel_table(table: &LabeledTable, rename: Option<&str>, target: &[String]) -> Result<LabeledTable> {
    let table = match rename {
        Some(old) => table.with_rows(table.rows().with_level_renamed(old, INDICATOR_LEVEL)?)?,
        None => table.clone(),
    };
    Ok(table.with_row_levels_padded(target, UNBOUND_LABEL)?)
}
