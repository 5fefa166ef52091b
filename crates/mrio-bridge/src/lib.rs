//! Bridge tables and the conversion engine.
//!
//! A bridge table declares how the labels of a source table map onto a new
//! classification. Its headers are either constraints (a source level
//! name), bridge columns (`<new level>__<old level>`), a numeric `factor`, or
//! metadata such as declared units.
//!
//! # Example
//!
//! ```ignore
//! use mrio_bridge::{BridgeConfig, ConvertOptions, convert};
//!
//! let converted = convert(&source, &bridge_df, &BridgeConfig::default(), &ConvertOptions::default())?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod parse;

pub use config::{
    Aggregation, BridgeAlias, BridgeConfig, ConvertOptions, DEFAULT_SEPARATOR, MissingPolicy,
    RowOrder,
};
pub use engine::{Conversion, apply, convert};
pub use error::{BridgeError, Result};
pub use parse::{BridgeColumn, BridgeRule, BridgeSpec};
