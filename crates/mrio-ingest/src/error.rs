//! Error types for loading delimited files.

use std::path::PathBuf;

use mrio_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading tables from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The file could not be parsed as delimited text.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The file has no header line.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// A required column is absent.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Model Errors ===
    /// The loaded data does not form a valid table.
    #[error("invalid table in {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
