//! Named, possibly multi-level table axes.
//!
//! An [`Axis`] is the row or column index of a [`LabeledTable`](crate::LabeledTable):
//! an ordered list of level names (e.g. `region`, `sector`) and one label
//! tuple per row/column. A single-level axis is simply a one-level composite.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Placeholder label used for levels an entry does not carry.
///
/// Written when axes with different level sets are unified, and when a
/// bridge cell is empty.
pub const UNBOUND_LABEL: &str = "";

/// Row or column index of a labeled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    names: Vec<String>,
    entries: Vec<Vec<String>>,
}

impl Axis {
    /// Build an axis from level names and label tuples.
    ///
    /// Every entry must carry exactly one label per level and level names
    /// must be unique.
    pub fn new(names: Vec<String>, entries: Vec<Vec<String>>) -> Result<Self> {
        if names.is_empty() {
            return Err(ModelError::NoLevels);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateLevel {
                    level: name.clone(),
                });
            }
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.len() != names.len() {
                return Err(ModelError::RaggedEntry {
                    index,
                    found: entry.len(),
                    expected: names.len(),
                });
            }
        }
        Ok(Self { names, entries })
    }

    /// Build a single-level axis.
    pub fn single<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: vec![name.into()],
            entries: labels.into_iter().map(|label| vec![label.into()]).collect(),
        }
    }

    /// Build the cartesian product of the given level labels, first level outermost.
    ///
    /// # Examples
    ///
    /// ```
    /// use mrio_model::Axis;
    ///
    /// let axis = Axis::from_product(&["region", "sector"], &[&["r1", "r2"], &["a", "b"]]).unwrap();
    /// assert_eq!(axis.len(), 4);
    /// assert_eq!(axis.entry(1), Some(&["r1".to_string(), "b".to_string()][..]));
    /// ```
    pub fn from_product(names: &[&str], levels: &[&[&str]]) -> Result<Self> {
        if names.len() != levels.len() {
            return Err(ModelError::AxisMismatch {
                message: format!(
                    "{} level names but {} label lists",
                    names.len(),
                    levels.len()
                ),
            });
        }
        let mut entries: Vec<Vec<String>> = vec![Vec::new()];
        for labels in levels {
            let mut next = Vec::with_capacity(entries.len() * labels.len());
            for prefix in &entries {
                for label in labels.iter() {
                    let mut entry = prefix.clone();
                    entry.push((*label).to_string());
                    next.push(entry);
                }
            }
            entries = next;
        }
        Self::new(names.iter().map(|n| (*n).to_string()).collect(), entries)
    }

    /// Level names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.names.len()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the axis has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries.
    pub fn entries(&self) -> &[Vec<String>] {
        &self.entries
    }

    /// Entry at `idx`.
    pub fn entry(&self, idx: usize) -> Option<&[String]> {
        self.entries.get(idx).map(Vec::as_slice)
    }

    /// Position of a level name.
    pub fn level_position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns true if the axis carries the named level.
    pub fn has_level(&self, name: &str) -> bool {
        self.level_position(name).is_some()
    }

    /// Labels of one level, one per entry.
    pub fn level_values(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.level_position(name)?;
        Some(self.entries.iter().map(|e| e[pos].as_str()).collect())
    }

    /// Distinct labels of one level in first-appearance order.
    pub fn unique_level_values(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.level_position(name)?;
        let mut seen = HashSet::new();
        Some(
            self.entries
                .iter()
                .map(|e| e[pos].as_str())
                .filter(|label| seen.insert(*label))
                .collect(),
        )
    }

    /// Position of the entry equal to `key`.
    pub fn position_of(&self, key: &[&str]) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.len() == key.len() && entry.iter().zip(key).all(|(a, b)| a == b)
        })
    }

    /// Sub-axis with the entries at `positions`, in that order.
    pub fn select(&self, positions: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            entries: positions
                .iter()
                .filter_map(|&p| self.entries.get(p).cloned())
                .collect(),
        }
    }

    /// Copy of the axis with one level renamed.
    pub fn with_level_renamed(&self, old: &str, new: &str) -> Result<Self> {
        let pos = self.require_level(old)?;
        let mut names = self.names.clone();
        names[pos] = new.to_string();
        Self::new(names, self.entries.clone())
    }

    /// Entries of `self` followed by entries of `other`.
    ///
    /// Both axes must carry the same level names in the same order.
    pub fn concat(&self, other: &Axis) -> Result<Self> {
        if self.names != other.names {
            return Err(ModelError::AxisMismatch {
                message: format!(
                    "cannot concatenate levels {:?} with {:?}",
                    self.names, other.names
                ),
            });
        }
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        Ok(Self {
            names: self.names.clone(),
            entries,
        })
    }

    /// Re-express the axis over the level set `names`.
    ///
    /// Levels the axis lacks are filled with `fill`; every level the axis
    /// carries must be listed in `names`.
    pub fn padded_to(&self, names: &[String], fill: &str) -> Result<Self> {
        for own in &self.names {
            if !names.contains(own) {
                return Err(ModelError::AxisMismatch {
                    message: format!("level '{own}' is not part of the target levels {names:?}"),
                });
            }
        }
        let sources: Vec<Option<usize>> =
            names.iter().map(|n| self.level_position(n)).collect();
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                sources
                    .iter()
                    .map(|src| match src {
                        Some(pos) => entry[*pos].clone(),
                        None => fill.to_string(),
                    })
                    .collect()
            })
            .collect();
        Self::new(names.to_vec(), entries)
    }

    pub(crate) fn require_level(&self, name: &str) -> Result<usize> {
        self.level_position(name)
            .ok_or_else(|| ModelError::UnknownLevel {
                level: name.to_string(),
                available: self.names.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stressor_axis() -> Axis {
        Axis::from_product(&["stressor", "compartment"], &[&["em1", "em2"], &["air", "water"]])
            .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_entries() {
        let result = Axis::new(
            vec!["a".into(), "b".into()],
            vec![vec!["x".into(), "y".into()], vec!["x".into()]],
        );
        assert!(matches!(
            result,
            Err(ModelError::RaggedEntry { index: 1, found: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_levels() {
        let result = Axis::new(vec!["a".into(), "a".into()], vec![]);
        assert!(matches!(result, Err(ModelError::DuplicateLevel { .. })));
    }

    #[test]
    fn test_new_rejects_no_levels() {
        assert!(matches!(Axis::new(vec![], vec![]), Err(ModelError::NoLevels)));
    }

    #[test]
    fn test_level_values_and_unique() {
        let axis = stressor_axis();
        assert_eq!(
            axis.level_values("compartment").unwrap(),
            vec!["air", "water", "air", "water"]
        );
        assert_eq!(axis.unique_level_values("stressor").unwrap(), vec!["em1", "em2"]);
        assert!(axis.level_values("region").is_none());
    }

    #[test]
    fn test_position_and_select() {
        let axis = stressor_axis();
        assert_eq!(axis.position_of(&["em2", "air"]), Some(2));
        assert_eq!(axis.position_of(&["em3", "air"]), None);
        let sub = axis.select(&[3, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.entry(0).unwrap(), &["em2".to_string(), "water".to_string()]);
    }

    #[test]
    fn test_padded_to_fills_missing_levels() {
        let axis = Axis::single("stressor", ["em1"]);
        let padded = axis
            .padded_to(&["stressor".into(), "compartment".into()], UNBOUND_LABEL)
            .unwrap();
        assert_eq!(padded.names(), &["stressor".to_string(), "compartment".to_string()]);
        assert_eq!(padded.entry(0).unwrap(), &["em1".to_string(), String::new()]);

        let err = stressor_axis().padded_to(&["stressor".into()], UNBOUND_LABEL);
        assert!(matches!(err, Err(ModelError::AxisMismatch { .. })));
    }

    #[test]
    fn test_concat_requires_same_levels() {
        let a = Axis::single("stressor", ["em1"]);
        let b = Axis::single("stressor", ["em2"]);
        assert_eq!(a.concat(&b).unwrap().len(), 2);
        let c = Axis::single("impact", ["x"]);
        assert!(a.concat(&c).is_err());
    }

    #[test]
    fn test_rename_level() {
        let axis = stressor_axis().with_level_renamed("stressor", "indicator").unwrap();
        assert!(axis.has_level("indicator"));
        assert!(!axis.has_level("stressor"));
        assert!(stressor_axis().with_level_renamed("nope", "x").is_err());
    }
}
