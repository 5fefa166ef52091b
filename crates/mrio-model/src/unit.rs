//! Unit reference tables.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{ModelError, Result};

/// Name of the single column a unit table carries.
pub const UNIT_COLUMN: &str = "unit";

/// Physical unit per row of an extension account.
///
/// The row axis matches the row axis of the account it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTable {
    rows: Axis,
    units: Vec<String>,
}

impl UnitTable {
    pub fn new(rows: Axis, units: Vec<String>) -> Result<Self> {
        if rows.len() != units.len() {
            return Err(ModelError::ShapeMismatch {
                rows: rows.len(),
                columns: 1,
                expected: rows.len(),
                found: units.len(),
            });
        }
        Ok(Self { rows, units })
    }

    /// Give every row the same unit.
    pub fn uniform(rows: Axis, unit: &str) -> Self {
        let units = vec![unit.to_string(); rows.len()];
        Self { rows, units }
    }

    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit of the row at `idx`.
    pub fn unit_at(&self, idx: usize) -> Option<&str> {
        self.units.get(idx).map(String::as_str)
    }

    /// Unit of the row labeled `key`.
    pub fn unit_for(&self, key: &[&str]) -> Option<&str> {
        self.rows.position_of(key).and_then(|idx| self.unit_at(idx))
    }

    /// Sub-table with the rows at `positions`, in that order.
    pub fn select(&self, positions: &[usize]) -> Self {
        let positions: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.units.len())
            .collect();
        Self {
            rows: self.rows.select(&positions),
            units: positions.iter().map(|&p| self.units[p].clone()).collect(),
        }
    }

    /// Rows of `self` followed by rows of `other`.
    pub fn concat(&self, other: &UnitTable) -> Result<Self> {
        let rows = self.rows.concat(&other.rows)?;
        let mut units = self.units.clone();
        units.extend(other.units.iter().cloned());
        Ok(Self { rows, units })
    }

    /// Re-express the row axis over `names`, filling absent levels with `fill`.
    pub fn with_row_levels_padded(&self, names: &[String], fill: &str) -> Result<Self> {
        Ok(Self {
            rows: self.rows.padded_to(names, fill)?,
            units: self.units.clone(),
        })
    }

    /// Copy with one row level renamed.
    pub fn with_level_renamed(&self, old: &str, new: &str) -> Result<Self> {
        Ok(Self {
            rows: self.rows.with_level_renamed(old, new)?,
            units: self.units.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> UnitTable {
        let rows = Axis::from_product(&["stressor", "compartment"], &[&["em1", "em2"], &["air", "water"]])
            .unwrap();
        UnitTable::new(
            rows,
            vec!["kg".into(), "kg".into(), "t".into(), "t".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_unit_lookup() {
        let table = units();
        assert_eq!(table.unit_for(&["em2", "water"]), Some("t"));
        assert_eq!(table.unit_for(&["em9", "water"]), None);
        assert_eq!(table.unit_at(0), Some("kg"));
    }

    #[test]
    fn test_new_checks_length() {
        let rows = Axis::single("stressor", ["em1", "em2"]);
        assert!(UnitTable::new(rows, vec!["kg".into()]).is_err());
    }

    #[test]
    fn test_select_and_concat() {
        let table = units();
        let picked = table.select(&[2, 9]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.units(), &["t".to_string()]);
        let both = picked.concat(&table.select(&[0])).unwrap();
        assert_eq!(both.units(), &["t".to_string(), "kg".to_string()]);
    }

    #[test]
    fn test_uniform_serializes() {
        let table = UnitTable::uniform(Axis::single("impact", ["GWP"]), "kg CO2eq");
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["units"][0], "kg CO2eq");
        assert_eq!(json["rows"]["names"][0], "impact");
    }
}
