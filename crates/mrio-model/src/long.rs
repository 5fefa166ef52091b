//! Long-format (tidy) DataFrame interop.
//!
//! A long table has one row per non-empty cell: one string column per row
//! level, one per column level, and a numeric value column.

use std::collections::HashMap;

use polars::prelude::{Column, DataFrame};

use mrio_common::{any_to_f64, column_strings};

use crate::axis::Axis;
use crate::error::{ModelError, Result};
use crate::table::LabeledTable;

/// Default name of the value column in long-format data.
pub const VALUE_COLUMN: &str = "value";

/// Pivot a long-format DataFrame into a [`LabeledTable`].
///
/// Row and column keys appear in first-appearance order. Cells without a
/// long-format record are 0; repeated records for one cell are summed.
pub fn from_long(
    df: &DataFrame,
    row_levels: &[&str],
    column_levels: &[&str],
    value_column: &str,
) -> Result<LabeledTable> {
    let row_labels = level_columns(df, row_levels)?;
    let col_labels = level_columns(df, column_levels)?;
    let values = df
        .column(value_column)
        .map_err(|_| ModelError::MissingColumn {
            column: value_column.to_string(),
        })?;

    let mut row_keys = KeyIndex::default();
    let mut col_keys = KeyIndex::default();
    let mut cells: Vec<(usize, usize, f64)> = Vec::with_capacity(df.height());

    for idx in 0..df.height() {
        let raw = values.get(idx)?;
        let value = match any_to_f64(raw.clone()) {
            Some(v) => v,
            None if raw.is_null() => continue,
            None => {
                return Err(ModelError::NonNumeric {
                    column: value_column.to_string(),
                    row: idx,
                    value: mrio_common::any_to_string(raw),
                });
            }
        };
        let r = row_keys.slot(row_labels.iter().map(|col| col[idx].clone()).collect());
        let c = col_keys.slot(col_labels.iter().map(|col| col[idx].clone()).collect());
        cells.push((r, c, value));
    }

    let width = col_keys.entries.len();
    let mut buffer = vec![0.0; row_keys.entries.len() * width];
    for (r, c, v) in cells {
        buffer[r * width + c] += v;
    }

    let rows = Axis::new(owned(row_levels), row_keys.entries)?;
    let columns = Axis::new(owned(column_levels), col_keys.entries)?;
    LabeledTable::new(rows, columns, buffer)
}

/// Melt a [`LabeledTable`] into long format, skipping zero cells.
pub fn to_long(table: &LabeledTable, value_column: &str) -> Result<DataFrame> {
    let rows = table.rows();
    let cols = table.columns();
    let mut labels: Vec<Vec<String>> = vec![Vec::new(); rows.level_count() + cols.level_count()];
    let mut values = Vec::new();

    for (r, row_entry) in rows.entries().iter().enumerate() {
        for (c, col_entry) in cols.entries().iter().enumerate() {
            let value = table.get(r, c).unwrap_or(0.0);
            if value == 0.0 {
                continue;
            }
            for (slot, label) in labels.iter_mut().zip(row_entry.iter().chain(col_entry)) {
                slot.push(label.clone());
            }
            values.push(value);
        }
    }

    let mut columns: Vec<Column> = rows
        .names()
        .iter()
        .chain(cols.names())
        .zip(labels)
        .map(|(name, labels)| Column::new(name.as_str().into(), labels))
        .collect();
    columns.push(Column::new(value_column.into(), values));
    Ok(DataFrame::new(columns)?)
}

impl LabeledTable {
    /// See [`from_long`].
    pub fn from_long(
        df: &DataFrame,
        row_levels: &[&str],
        column_levels: &[&str],
        value_column: &str,
    ) -> Result<Self> {
        from_long(df, row_levels, column_levels, value_column)
    }

    /// See [`to_long`].
    pub fn to_long(&self, value_column: &str) -> Result<DataFrame> {
        to_long(self, value_column)
    }
}

#[derive(Default)]
struct KeyIndex {
    index: HashMap<Vec<String>, usize>,
    entries: Vec<Vec<String>>,
}

impl KeyIndex {
    fn slot(&mut self, key: Vec<String>) -> usize {
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        self.entries.push(key.clone());
        let slot = self.entries.len() - 1;
        self.index.insert(key, slot);
        slot
    }
}

fn level_columns(df: &DataFrame, levels: &[&str]) -> Result<Vec<Vec<String>>> {
    levels
        .iter()
        .map(|name| {
            column_strings(df, name).ok_or_else(|| ModelError::MissingColumn {
                column: (*name).to_string(),
            })
        })
        .collect()
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}
