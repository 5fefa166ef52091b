//! Shared utilities for the MRIO bridge crates.
//!
//! - **polars**: reading string and numeric cells out of Polars columns
//! - **logging**: optional `tracing-subscriber` bootstrap for host applications

pub mod logging;
pub mod polars;

pub use polars::{any_to_f64, any_to_string, cell_f64, cell_string, column_strings, format_numeric, parse_f64};
