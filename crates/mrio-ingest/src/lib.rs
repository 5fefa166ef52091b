//! Loading bridge tables, unit tables and long-format accounts from
//! delimited text files.
//!
//! Separators are detected per file: tab for `.tsv`/`.txt` or a header
//! line containing a tab, comma otherwise.

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{detect_separator, read_bridge_table, read_long_table, read_unit_table};
