//! Extension-level orchestration.
//!
//! An [`Extension`] bundles the row-linked tables of one satellite account
//! (`F`, `F_Y`, `S`, `S_Y`) with their units. A bridge table is applied to
//! all of them at once, the target units are derived from the declared unit
//! column, and unit findings stop the conversion.
//!
//! - [`Extension::convert`]: one source, one bridge table
//! - [`Extension::characterize`]: characterization factors as a bridge
//! - [`convert_extensions`] / [`characterize_extensions`]: rows drawn from
//!   several extensions, tagged per rule in a source column
//! - [`concat_extensions`]: stack extensions with differing row levels

pub mod concat;
pub mod error;
pub mod extension;
pub mod multi;
pub mod options;

pub use concat::{INDICATOR_LEVEL, concat_extensions};
pub use error::{ExtensionError, Result};
pub use extension::{Account, ConversionOutcome, Extension};
pub use multi::{characterize_extensions, convert_extensions};
pub use options::{CharacterizeOptions, DEFAULT_SOURCE_COLUMN, ExtensionConvertOptions};
