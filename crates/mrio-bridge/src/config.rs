//! Options for parsing bridge tables and running conversions.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between the new and the old level in a bridge header.
pub const DEFAULT_SEPARATOR: &str = "__";

/// What happens when a rule has no factor or matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Empty factors count as 0 and unmatched rules contribute nothing.
    #[default]
    Silent,
    /// Empty factors and unmatched rules are errors.
    Strict,
}

/// Function applied to duplicate output entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Min,
    Max,
    First,
    Last,
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::First => "first",
            Aggregation::Last => "last",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(Aggregation::Sum),
            "mean" | "avg" => Ok(Aggregation::Mean),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "first" => Ok(Aggregation::First),
            "last" => Ok(Aggregation::Last),
            other => Err(format!("unknown aggregation '{other}'")),
        }
    }
}

/// Running state for one output cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Accumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
    first: f64,
    last: f64,
}

impl Accumulator {
    pub(crate) fn new(value: f64) -> Self {
        Self {
            sum: value,
            count: 1,
            min: value,
            max: value,
            first: value,
            last: value,
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.last = value;
    }

    pub(crate) fn finish(&self, aggregation: Aggregation) -> f64 {
        match aggregation {
            Aggregation::Sum => self.sum,
            Aggregation::Mean => self.sum / self.count as f64,
            Aggregation::Min => self.min,
            Aggregation::Max => self.max,
            Aggregation::First => self.first,
            Aggregation::Last => self.last,
        }
    }
}

/// Ordering of the output rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowOrder {
    /// Sort row labels alphabetically.
    #[default]
    Alphabetical,
    /// Order by first appearance of values in the named bridge column.
    FirstAppearance(String),
    /// Exactly these rows: unlisted rows are dropped, absent ones are zero.
    Explicit(Vec<Vec<String>>),
}

impl FromStr for RowOrder {
    type Err = Infallible;

    /// `""` and `"alphabetical"` sort alphabetically; anything else names a
    /// bridge column.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("alphabetical") {
            Ok(RowOrder::Alphabetical)
        } else {
            Ok(RowOrder::FirstAppearance(trimmed.to_string()))
        }
    }
}

/// A plain column that acts as a bridge column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeAlias {
    /// Header of the column in the bridge table.
    pub column: String,
    /// Level the column's values become.
    pub new_level: String,
    /// Source level being replaced.
    pub old_level: String,
}

impl BridgeAlias {
    pub fn new(
        column: impl Into<String>,
        new_level: impl Into<String>,
        old_level: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            new_level: new_level.into(),
            old_level: old_level.into(),
        }
    }
}

/// How the columns of a bridge table are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Separator in `<new>__<old>` headers.
    pub separator: String,
    /// Header of the numeric factor column; every factor is 1 if absent.
    pub factor_column: String,
    /// Header of the declared original unit.
    pub unit_orig_column: Option<String>,
    /// Header of the declared target unit.
    pub unit_new_column: Option<String>,
    /// Header tagging each rule with the extension it applies to.
    pub source_column: Option<String>,
    /// Further metadata headers to skip.
    pub ignore_columns: Vec<String>,
    /// Plain columns treated as bridge columns.
    pub bridge_aliases: Vec<BridgeAlias>,
    /// Handling of empty factor cells.
    pub missing_policy: MissingPolicy,
    /// Match constraint cells verbatim instead of as regular expressions.
    pub literal_constraints: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            factor_column: "factor".to_string(),
            unit_orig_column: Some("unit_orig".to_string()),
            unit_new_column: Some("unit_new".to_string()),
            source_column: None,
            ignore_columns: Vec::new(),
            bridge_aliases: Vec::new(),
            missing_policy: MissingPolicy::default(),
            literal_constraints: false,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_factor_column(mut self, column: impl Into<String>) -> Self {
        self.factor_column = column.into();
        self
    }

    #[must_use]
    pub fn with_unit_columns(mut self, orig: Option<&str>, new: Option<&str>) -> Self {
        self.unit_orig_column = orig.map(str::to_string);
        self.unit_new_column = new.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_source_column(mut self, column: Option<&str>) -> Self {
        self.source_column = column.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_ignore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_bridge_alias(mut self, alias: BridgeAlias) -> Self {
        self.bridge_aliases.push(alias);
        self
    }

    #[must_use]
    pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.missing_policy = policy;
        self
    }

    #[must_use]
    pub fn with_literal_constraints(mut self, literal: bool) -> Self {
        self.literal_constraints = literal;
        self
    }

    /// Returns true if `column` is metadata rather than a constraint.
    pub(crate) fn is_metadata(&self, column: &str) -> bool {
        self.unit_orig_column.as_deref() == Some(column)
            || self.unit_new_column.as_deref() == Some(column)
            || self.source_column.as_deref() == Some(column)
            || self.ignore_columns.iter().any(|c| c == column)
    }
}

/// Options for one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Function applied to duplicate output entries.
    pub aggregation: Aggregation,
    /// Sum away source row levels no bridge column renames.
    pub drop_unbound_levels: bool,
    /// Ordering of the output rows.
    pub row_order: RowOrder,
    /// Handling of rules that match nothing.
    pub missing_policy: MissingPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::Sum,
            drop_unbound_levels: true,
            row_order: RowOrder::Alphabetical,
            missing_policy: MissingPolicy::Silent,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    #[must_use]
    pub fn with_drop_unbound_levels(mut self, drop: bool) -> Self {
        self.drop_unbound_levels = drop;
        self
    }

    #[must_use]
    pub fn with_row_order(mut self, order: RowOrder) -> Self {
        self.row_order = order;
        self
    }

    #[must_use]
    pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.missing_policy = policy;
        self
    }
}
