//! Error types for bridge parsing and conversion.

use thiserror::Error;

/// Errors raised while parsing a bridge table or converting with it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    // =========================================================================
    // STRUCTURAL ERRORS
    // =========================================================================
    /// The bridge table has no `<new>__<old>` column.
    #[error("bridge table has no bridge column (columns: {columns:?})")]
    NoBridgeColumns {
        /// Headers found in the bridge table.
        columns: Vec<String>,
    },

    /// A bridge header does not contain exactly one separator.
    #[error("malformed bridge column '{column}': expected exactly one '{separator}'")]
    MalformedBridgeColumn { column: String, separator: String },

    /// The old level of a bridge column is not a level of the source.
    #[error("bridge column '{column}' refers to level '{level}', not found in source levels {available:?}")]
    UnknownBridgeLevel {
        column: String,
        level: String,
        available: Vec<String>,
    },

    // =========================================================================
    // RULE ERRORS
    // =========================================================================
    /// A factor cell holds something that is not a number.
    #[error("bridge row {row}: factor '{value}' is not a number")]
    InvalidFactor { row: usize, value: String },

    /// A factor cell is empty under the strict missing policy.
    #[error("bridge row {row}: factor is missing")]
    MissingFactor { row: usize },

    /// A rule matched nothing in the source under the strict missing policy.
    #[error("bridge row {row} matched no source entry ({constraints})")]
    UnmatchedRule { row: usize, constraints: String },

    // =========================================================================
    // ORDERING ERRORS
    // =========================================================================
    /// The requested ordering column is not a bridge column.
    #[error("cannot order by '{column}': not a bridge column")]
    UnknownOrderColumn { column: String },

    /// An explicit row order does not fit the output row levels.
    #[error("invalid explicit row order: {message}")]
    InvalidRowOrder { message: String },

    // =========================================================================
    // WRAPPED ERRORS
    // =========================================================================
    /// A constraint pattern failed to compile.
    #[error(transparent)]
    Match(#[from] mrio_match::MatchError),

    /// Building the output table failed.
    #[error(transparent)]
    Model(#[from] mrio_model::ModelError),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Check if this is a structural error in the bridge table itself.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NoBridgeColumns { .. }
                | Self::MalformedBridgeColumn { .. }
                | Self::UnknownBridgeLevel { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoBridgeColumns { .. } => {
                Some("Name at least one column '<new level>__<old level>', e.g. 'impact__stressor'.")
            }
            Self::MalformedBridgeColumn { .. } => {
                Some("Bridge column headers must contain the separator exactly once.")
            }
            Self::UnknownBridgeLevel { .. } => {
                Some("The part after the separator must name a row or column level of the source.")
            }
            Self::InvalidFactor { .. } | Self::MissingFactor { .. } => {
                Some("Fill the factor column with numbers, or drop it to use a factor of 1.")
            }
            Self::UnmatchedRule { .. } => {
                Some("Remove the rule or use the silent missing policy for partial bridge tables.")
            }
            Self::UnknownOrderColumn { .. } => {
                Some("Order by the full header of a bridge column or by its new level name.")
            }
            _ => None,
        }
    }
}
