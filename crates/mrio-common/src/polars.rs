//! Polars cell helpers.
//!
//! Bridge tables arrive as Polars DataFrames whose cells may be strings,
//! numbers or nulls depending on how they were loaded. These helpers turn a
//! cell into the string label or the numeric factor the bridge parser needs.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a label string.
///
/// Returns an empty string for `Null`; numbers are formatted without
/// trailing zeros so `1.0` reads as `"1"`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use mrio_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("CO2")), "CO2");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Formats a floating-point number without trailing zeros after the decimal point.
///
/// # Examples
///
/// ```
/// use mrio_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(0.25), "0.25");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for null or non-numeric cells.
///
/// String cells are parsed, so factor columns loaded as text still work.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid or blank strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Reads the cell at `idx` of column `name` as a trimmed label.
///
/// Missing columns, out-of-range rows and nulls all read as `""`.
pub fn cell_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null))
            .trim()
            .to_string(),
        Err(_) => String::new(),
    }
}

/// Reads the cell at `idx` of column `name` as a number.
pub fn cell_f64(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    let column = df.column(name).ok()?;
    any_to_f64(column.get(idx).unwrap_or(AnyValue::Null))
}

/// Extracts all trimmed labels of a column, `None` when the column is absent.
pub fn column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null_is_empty() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_numbers() {
        assert_eq!(any_to_string(AnyValue::Int64(-3)), "-3");
        assert_eq!(any_to_string(AnyValue::Float64(2.50)), "2.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(7)), Some(7.0));
        assert_eq!(any_to_f64(AnyValue::String(" 0.5 ")), Some(0.5));
        assert_eq!(any_to_f64(AnyValue::String("kg")), None);
    }

    #[test]
    fn test_parse_f64_blank() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("   "), None);
        assert_eq!(parse_f64("1e3"), Some(1000.0));
    }

    #[test]
    fn test_cell_helpers() {
        let df = df! {
            "stressor" => &[Some("em1"), None, Some(" em3 ")],
            "factor" => &[Some(1.5), Some(2.0), None],
        }
        .unwrap();

        assert_eq!(cell_string(&df, "stressor", 0), "em1");
        assert_eq!(cell_string(&df, "stressor", 1), "");
        assert_eq!(cell_string(&df, "stressor", 2), "em3");
        assert_eq!(cell_string(&df, "missing", 0), "");
        assert_eq!(cell_f64(&df, "factor", 0), Some(1.5));
        assert_eq!(cell_f64(&df, "factor", 2), None);
        assert_eq!(
            column_strings(&df, "stressor"),
            Some(vec!["em1".to_string(), String::new(), "em3".to_string()])
        );
        assert_eq!(column_strings(&df, "missing"), None);
    }
}
