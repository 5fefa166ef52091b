//! Compiled level predicates and their AND/OR combinators.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use mrio_model::Axis;

use crate::error::{MatchError, Result};

/// How a pattern is applied to a label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The label contains the pattern somewhere.
    Contains,
    /// The pattern matches at the start of the label.
    Match,
    /// The pattern matches the entire label.
    #[default]
    FullMatch,
}

impl MatchMode {
    /// Wrap `pattern` so that an unanchored search implements this mode.
    fn anchored(self, pattern: &str) -> String {
        match self {
            MatchMode::Contains => pattern.to_string(),
            MatchMode::Match => format!("^(?:{pattern})"),
            MatchMode::FullMatch => format!("^(?:{pattern})$"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::Match => "match",
            MatchMode::FullMatch => "fullmatch",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(MatchMode::Contains),
            "match" => Ok(MatchMode::Match),
            "fullmatch" | "full_match" => Ok(MatchMode::FullMatch),
            other => Err(format!("unknown match mode '{other}'")),
        }
    }
}

/// A regex bound to one level name.
///
/// Case-insensitive matching is requested inside the pattern with `(?i)`.
#[derive(Debug, Clone)]
pub struct Predicate {
    level: String,
    pattern: String,
    mode: MatchMode,
    regex: Regex,
}

impl Predicate {
    /// Compile `pattern` for `level` in the given mode.
    pub fn new(level: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) -> Result<Self> {
        let level = level.into();
        let pattern = pattern.into();
        let regex = Regex::new(&mode.anchored(&pattern)).map_err(|source| {
            MatchError::InvalidPattern {
                level: level.clone(),
                pattern: pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            level,
            pattern,
            mode,
            regex,
        })
    }

    /// Shorthand for a full-match predicate.
    pub fn fullmatch(level: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        Self::new(level, pattern, MatchMode::FullMatch)
    }

    /// Full match against `label` taken verbatim, metacharacters included.
    pub fn literal(level: impl Into<String>, label: &str) -> Result<Self> {
        Self::new(level, regex::escape(label), MatchMode::FullMatch)
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// The pattern as written, without anchors.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The compiled, anchored expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }
}

/// Predicates combined with AND (`All`) or OR (`Any`).
#[derive(Debug, Clone)]
pub enum Filter {
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All(Vec::new())
    }
}

impl Filter {
    pub fn predicates(&self) -> &[Predicate] {
        match self {
            Filter::All(preds) | Filter::Any(preds) => preds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Predicate on `level`, if any.
    pub fn predicate_for(&self, level: &str) -> Option<&Predicate> {
        self.predicates().iter().find(|p| p.level() == level)
    }

    /// Returns true if any predicate refers to a level of `axis`.
    pub fn applies_to(&self, axis: &Axis) -> bool {
        self.predicates().iter().any(|p| axis.has_level(p.level()))
    }

    /// Positions of the entries of `axis` that satisfy the filter.
    ///
    /// Predicates on levels the axis lacks are ignored. With no applicable
    /// predicate, `All` keeps every entry and `Any` keeps none.
    pub fn select(&self, axis: &Axis) -> Vec<usize> {
        let bound: Vec<(usize, &Predicate)> = self
            .predicates()
            .iter()
            .filter_map(|p| axis.level_position(p.level()).map(|pos| (pos, p)))
            .collect();

        let keep = |entry: &[String]| match self {
            Filter::All(_) => bound.iter().all(|(pos, p)| p.is_match(&entry[*pos])),
            Filter::Any(_) => bound.iter().any(|(pos, p)| p.is_match(&entry[*pos])),
        };

        axis.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| keep(entry.as_slice()))
            .map(|(idx, _)| idx)
            .collect()
    }
}
