//! Error types for pattern matching.

use thiserror::Error;

/// Errors raised while compiling or applying level predicates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// A pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}' for level '{level}': {source}")]
    InvalidPattern {
        level: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// None of the requested levels exists on the index.
    #[error("none of the levels {requested:?} exist (available: {available:?})")]
    NoMatchingLevel {
        requested: Vec<String>,
        available: Vec<String>,
    },
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_level_display() {
        let err = MatchError::NoMatchingLevel {
            requested: vec!["flow".into()],
            available: vec!["region".into(), "sector".into()],
        };
        assert_eq!(
            err.to_string(),
            r#"none of the levels ["flow"] exist (available: ["region", "sector"])"#
        );
    }
}
