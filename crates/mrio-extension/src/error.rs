//! Error types for extension-level operations.

use mrio_bridge::BridgeError;
use mrio_model::ModelError;
use thiserror::Error;

/// Errors raised while converting, characterizing or concatenating extensions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtensionError {
    // =========================================================================
    // STRUCTURAL ERRORS
    // =========================================================================
    /// Extensions combined in one conversion have different row level names.
    #[error("extension '{extension}' has row levels {found:?}, expected {expected:?}")]
    IncompatibleRowLevels {
        extension: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// An account's columns differ from the same account of another extension.
    #[error("account {account} of extension '{extension}' has different columns than the other extensions")]
    ColumnMismatch {
        extension: String,
        account: &'static str,
    },

    /// An account's rows differ from the rows of the unit table.
    #[error("account {account} of extension '{extension}' does not have the rows of its unit table")]
    RowMismatch {
        extension: String,
        account: &'static str,
    },

    /// The extension has neither flows nor coefficients.
    #[error("extension '{extension}' has neither F nor S")]
    MissingAccount { extension: String },

    // =========================================================================
    // MULTI-SOURCE ERRORS
    // =========================================================================
    /// No extension was passed.
    #[error("no extensions given")]
    NoExtensions,

    /// The bridge table lacks the column naming the source extension.
    #[error("bridge table has no '{column}' column naming the source extensions")]
    MissingSourceColumn { column: String },

    /// The bridge table names an extension that was not passed.
    #[error("bridge table references unknown extension '{name}' (available: {available:?})")]
    UnknownExtension { name: String, available: Vec<String> },

    /// The bridge table references none of the passed extensions.
    #[error("bridge table references none of the given extensions")]
    NothingReferenced,

    /// The same row label tuple is selected from two extensions.
    #[error("row '{row}' is present in both '{first}' and '{second}'")]
    DuplicateRow {
        row: String,
        first: String,
        second: String,
    },

    // =========================================================================
    // WRAPPED ERRORS
    // =========================================================================
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ExtensionError {
    /// Returns true if the inputs cannot be combined as given.
    pub fn is_structural(&self) -> bool {
        match self {
            Self::Bridge(err) => err.is_structural(),
            Self::Model(_) => false,
            _ => true,
        }
    }
}

/// Result type for extension operations.
pub type Result<T> = std::result::Result<T, ExtensionError>;
