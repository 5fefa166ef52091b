//! Dense labeled numeric tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{ModelError, Result};

/// Two-dimensional numeric table with labeled, possibly multi-level axes.
///
/// Values are stored row-major. Extension accounts (`F`, `F_Y`, `S`,
/// `S_Y`) and conversion results are all `LabeledTable`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledTable {
    rows: Axis,
    columns: Axis,
    values: Vec<f64>,
}

impl LabeledTable {
    /// Build a table from axes and a row-major value buffer.
    pub fn new(rows: Axis, columns: Axis, values: Vec<f64>) -> Result<Self> {
        let expected = rows.len() * columns.len();
        if values.len() != expected {
            return Err(ModelError::ShapeMismatch {
                rows: rows.len(),
                columns: columns.len(),
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Build a table with every cell set to `value`.
    pub fn filled(rows: Axis, columns: Axis, value: f64) -> Self {
        let values = vec![value; rows.len() * columns.len()];
        Self {
            rows,
            columns,
            values,
        }
    }

    /// Build a zero-filled table.
    pub fn zeros(rows: Axis, columns: Axis) -> Self {
        Self::filled(rows, columns, 0.0)
    }

    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Level names of both axes, rows first.
    pub fn level_names(&self) -> Vec<&str> {
        self.rows
            .names()
            .iter()
            .chain(self.columns.names())
            .map(String::as_str)
            .collect()
    }

    /// Value at row `row`, column `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows.len() || col >= self.columns.len() {
            return None;
        }
        self.values.get(row * self.columns.len() + col).copied()
    }

    /// Mutable access to one cell.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row >= self.rows.len() || col >= self.columns.len() {
            return None;
        }
        let width = self.columns.len();
        self.values.get_mut(row * width + col)
    }

    /// Values of one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows.len() {
            return None;
        }
        let width = self.columns.len();
        Some(&self.values[row * width..(row + 1) * width])
    }

    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Position of the row labeled `key`.
    pub fn row_position(&self, key: &[&str]) -> Option<usize> {
        self.rows.position_of(key)
    }

    /// Position of the column labeled `key`.
    pub fn column_position(&self, key: &[&str]) -> Option<usize> {
        self.columns.position_of(key)
    }

    /// Value at the given row and column labels.
    pub fn value_at(&self, row_key: &[&str], col_key: &[&str]) -> Option<f64> {
        let row = self.row_position(row_key)?;
        let col = self.column_position(col_key)?;
        self.get(row, col)
    }

    /// Sub-table with the rows at `positions`, in that order.
    pub fn select_rows(&self, positions: &[usize]) -> Self {
        let width = self.columns.len();
        let positions: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.rows.len())
            .collect();
        let mut values = Vec::with_capacity(positions.len() * width);
        for &p in &positions {
            values.extend_from_slice(&self.values[p * width..(p + 1) * width]);
        }
        Self {
            rows: self.rows.select(&positions),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Sub-table with the columns at `positions`, in that order.
    pub fn select_columns(&self, positions: &[usize]) -> Self {
        let width = self.columns.len();
        let positions: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < width)
            .collect();
        let mut values = Vec::with_capacity(self.rows.len() * positions.len());
        for r in 0..self.rows.len() {
            for &c in &positions {
                values.push(self.values[r * width + c]);
            }
        }
        Self {
            rows: self.rows.clone(),
            columns: self.columns.select(&positions),
            values,
        }
    }

    /// Copy with every cell multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    /// Copy with the row axis replaced; the entry count must not change.
    pub fn with_rows(&self, rows: Axis) -> Result<Self> {
        if rows.len() != self.rows.len() {
            return Err(ModelError::AxisMismatch {
                message: format!(
                    "replacement row axis has {} entries, table has {}",
                    rows.len(),
                    self.rows.len()
                ),
            });
        }
        Ok(Self {
            rows,
            columns: self.columns.clone(),
            values: self.values.clone(),
        })
    }

    /// Stack the rows of `other` below the rows of `self`.
    ///
    /// Row level names and the full column axis must agree.
    pub fn concat_rows(&self, other: &LabeledTable) -> Result<Self> {
        if self.columns != other.columns {
            return Err(ModelError::AxisMismatch {
                message: "tables have different column axes".to_string(),
            });
        }
        let rows = self.rows.concat(&other.rows)?;
        let mut values = self.values.clone();
        values.extend_from_slice(&other.values);
        Ok(Self {
            rows,
            columns: self.columns.clone(),
            values,
        })
    }

    /// Re-express the row axis over `names`, filling absent levels with `fill`.
    pub fn with_row_levels_padded(&self, names: &[String], fill: &str) -> Result<Self> {
        let rows = self.rows.padded_to(names, fill)?;
        Ok(Self {
            rows,
            columns: self.columns.clone(),
            values: self.values.clone(),
        })
    }

    /// Group rows by the `keep` levels and sum each group.
    ///
    /// Groups appear in first-appearance order.
    pub fn sum_over_row_levels(&self, keep: &[&str]) -> Result<Self> {
        let positions = keep
            .iter()
            .map(|name| self.rows.require_level(name))
            .collect::<Result<Vec<_>>>()?;
        let width = self.columns.len();
        let mut index: HashMap<Vec<String>, usize> = HashMap::new();
        let mut entries: Vec<Vec<String>> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (r, entry) in self.rows.entries().iter().enumerate() {
            let key: Vec<String> = positions.iter().map(|&p| entry[p].clone()).collect();
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                entries.push(key);
                values.extend(std::iter::repeat_n(0.0, width));
                entries.len() - 1
            });
            for c in 0..width {
                values[slot * width + c] += self.values[r * width + c];
            }
        }

        let rows = Axis::new(keep.iter().map(|n| (*n).to_string()).collect(), entries)?;
        Self::new(rows, self.columns.clone(), values)
    }
}
