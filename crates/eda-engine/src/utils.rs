//! Shared utilities for the analysis engine.
//!
//! Storage-type checks, boolean vocabularies and helpers that turn a polars
//! `Series` into plain vectors the statistics code can work on.

use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a declared storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
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

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if is_boolean_dtype(dtype) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Series Extraction Utilities
// =============================================================================

/// Values of a series as `f64`, with nulls, NaN and infinities mapped to
/// `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Values of a series rendered as strings, nulls kept as `None`.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Distinct non-null values, compared by value rather than by their text.
pub fn distinct_count(series: &Series) -> PolarsResult<usize> {
    series.drop_nulls().n_unique()
}

/// Non-null values of a series rendered as strings.
pub fn non_null_strings(series: &Series) -> PolarsResult<Vec<String>> {
    Ok(string_values(series)?.into_iter().flatten().collect())
}

// =============================================================================
// Boolean Detection Utilities
// =============================================================================

/// Recognized two-element boolean vocabularies as (true, false) pairs.
pub const BOOLEAN_PAIRS: [(&str, &str); 8] = [
    ("true", "false"),
    ("yes", "no"),
    ("1", "0"),
    ("t", "f"),
    ("y", "n"),
    ("on", "off"),
    ("enabled", "disabled"),
    ("active", "inactive"),
];

/// Check if a set of distinct values is exactly one boolean vocabulary,
/// with both polarities present.
///
/// # Example
///
/// ```rust,ignore
/// use eda_engine::utils::is_boolean_vocabulary;
///
/// assert!(is_boolean_vocabulary(["Yes", "no"]));
/// assert!(!is_boolean_vocabulary(["yes", "false"]));
/// assert!(!is_boolean_vocabulary(["A", "B"]));
/// ```
pub fn is_boolean_vocabulary<'a>(distinct: impl IntoIterator<Item = &'a str>) -> bool {
    let lowered: HashSet<String> = distinct
        .into_iter()
        .map(|s| s.trim().to_ascii_lowercase())
        .collect();

    if lowered.len() != 2 {
        return false;
    }

    BOOLEAN_PAIRS
        .iter()
        .any(|&(t, f)| lowered.contains(t) && lowered.contains(f))
}

// =============================================================================
// Tests
// =============================================================================
