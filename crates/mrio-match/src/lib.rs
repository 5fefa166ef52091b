//! Pattern matching over the named levels of labeled table axes.
//!
//! Patterns are regular expressions applied in one of three modes:
//!
//! - `contains`: the label contains the pattern
//! - `match`: the pattern matches at the start of the label
//! - `fullmatch`: the pattern matches the entire label
//!
//! Several `(level, pattern)` pairs combine with AND semantics; `find_all`
//! searches every level with OR semantics. Matching is case-sensitive
//! unless the pattern carries the inline `(?i)` flag.

pub mod axes;
pub mod error;
pub mod predicate;

pub use axes::{
    AxisSide, QueryableAxes, Selection, build_filter, contains, filter_positions, filter_table,
    find_all, fullmatch, matches,
};
pub use error::{MatchError, Result};
pub use predicate::{Filter, MatchMode, Predicate};
