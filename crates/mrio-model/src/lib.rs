//! Labeled table model for MRIO extension accounts.
//!
//! Extension accounts are two-dimensional numeric tables whose rows and
//! columns carry named, possibly multi-level labels:
//!
//! - [`Axis`]: level names plus one label tuple per entry
//! - [`LabeledTable`]: dense row-major values over a row and a column axis
//! - [`UnitTable`]: the physical unit of each row of an account
//! - [`from_long`] / [`to_long`]: tidy DataFrame interop via Polars

pub mod axis;
pub mod error;
pub mod long;
pub mod table;
pub mod unit;

pub use axis::{Axis, UNBOUND_LABEL};
pub use error::{ModelError, Result};
pub use long::{VALUE_COLUMN, from_long, to_long};
pub use table::LabeledTable;
pub use unit::{UNIT_COLUMN, UnitTable};
