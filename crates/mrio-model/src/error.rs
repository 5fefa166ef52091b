//! Error types for the table model.

use thiserror::Error;

/// Errors raised while building or reshaping labeled tables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// An axis entry does not carry one label per level.
    #[error("axis entry {index} has {found} labels, expected {expected}")]
    RaggedEntry {
        index: usize,
        found: usize,
        expected: usize,
    },

    /// The same level name appears twice on one axis.
    #[error("duplicate level name '{level}'")]
    DuplicateLevel { level: String },

    /// An axis needs at least one named level.
    #[error("axis has no levels")]
    NoLevels,

    /// A level name is not present on the axis.
    #[error("level '{level}' not found (available: {available:?})")]
    UnknownLevel {
        level: String,
        available: Vec<String>,
    },

    /// The value buffer does not match the axis lengths.
    #[error("table shape mismatch: {rows} rows x {columns} columns needs {expected} values, got {found}")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        expected: usize,
        found: usize,
    },

    /// Two axes that must agree do not.
    #[error("axis mismatch: {message}")]
    AxisMismatch { message: String },

    /// A long-format column is missing.
    #[error("column '{column}' not found in long-format data")]
    MissingColumn { column: String },

    /// A long-format value cell is not numeric.
    #[error("non-numeric value '{value}' in row {row} of column '{column}'")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
