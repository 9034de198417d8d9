//! Shared value helpers: missing-value detection, numeric coercion, and
//! polars dtype categorisation for the ingestion adapter.

use polars::prelude::*;
use serde_json::Value;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a polars data type, used when converting a DataFrame into
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean type
    Boolean,
    /// Anything else; converted through its string representation
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Value Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
///
/// ```rust,ignore
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !NUMERIC_FORMAT_CHARS.contains(c))
        .collect()
}

/// Try to parse a string as a finite number.
///
/// Handles currency symbols, percentages and thousands separators.
/// `"NaN"` and `"inf"` are rejected.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a cell counts as missing: absent, null, or a blank string.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Coerce a cell to a finite number.
///
/// Numbers and numeric strings coerce; booleans, nulls, nested values and
/// unparsable strings do not.
pub fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_string(s),
        _ => None,
    }
}

/// Stringify a non-missing cell for categorical counting.
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_get_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::UInt8), DtypeCategory::Numeric);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::Other);
    }

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
        assert_eq!(clean_numeric_string("  42%  "), "42");
        assert_eq!(clean_numeric_string("€ 10"), "10");
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("3.5"), Some(3.5));
        assert_eq!(parse_numeric_string("-12"), Some(-12.0));
        assert_eq!(parse_numeric_string("1e3"), Some(1000.0));
        assert_eq!(parse_numeric_string("abc"), None);
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("NaN"), None);
        assert_eq!(parse_numeric_string("inf"), None);
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&Value::Null)));
        assert!(is_missing(Some(&json!("   "))));
        assert!(!is_missing(Some(&json!(0))));
        assert!(!is_missing(Some(&json!(false))));
        assert!(!is_missing(Some(&json!("n/a"))));
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(Some(&json!(4))), Some(4.0));
        assert_eq!(coerce_numeric(Some(&json!(2.5))), Some(2.5));
        assert_eq!(coerce_numeric(Some(&json!(" 7 "))), Some(7.0));
        assert_eq!(coerce_numeric(Some(&json!(true))), None);
        assert_eq!(coerce_numeric(Some(&json!("seven"))), None);
        assert_eq!(coerce_numeric(Some(&Value::Null)), None);
        assert_eq!(coerce_numeric(None), None);
    }

    #[test]
    fn test_value_label() {
        assert_eq!(value_label(&json!("red")), "red");
        assert_eq!(value_label(&json!(3)), "3");
        assert_eq!(value_label(&json!(true)), "true");
    }
}
