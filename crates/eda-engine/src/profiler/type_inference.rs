//! Semantic type classification for single columns.

use crate::config::AnalysisConfig;
use crate::error::{EngineError, Result};
use crate::types::SemanticType;
use crate::utils::{
    DtypeCategory, distinct_count, get_dtype_category, is_boolean_vocabulary, non_null_strings,
    numeric_values,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;

// Cheap shape check before handing a value to chrono - compiled once
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}([ T]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?)?(Z|[+-]\d{2}:?\d{2})?$")
        .expect("Invalid regex: date shape")
});

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Assigns exactly one [`SemanticType`] to a column.
///
/// Rules are evaluated in priority order and the first match wins:
///
/// 1. at most one distinct non-null value: `Constant`
/// 2. boolean storage, or values forming one boolean vocabulary: `Boolean`
/// 3. date storage, or text parsing as dates often enough: `Datetime`
/// 4. numeric storage: `Numeric`
/// 5. distinct/non-null ratio above the text threshold: `HighCardinalityText`
/// 6. anything else: `Categorical`
pub struct ColumnClassifier<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Classify one column.
    ///
    /// Fails with a `Classification` error when the column has no rows.
    pub fn classify(&self, series: &Series) -> Result<SemanticType> {
        let name = series.name().as_str();
        if series.is_empty() {
            return Err(EngineError::classification(name, "column has no rows"));
        }

        let category = get_dtype_category(series.dtype());
        let distinct = distinct_count(series)?;

        if distinct <= 1 {
            return Ok(SemanticType::Constant);
        }

        // Text forms only feed the vocabulary and date checks
        let values = non_null_strings(series)?;
        let rendered: HashSet<&str> = values.iter().map(String::as_str).collect();

        if category == DtypeCategory::Boolean
            || is_boolean_vocabulary(rendered.iter().copied())
            || (category == DtypeCategory::Numeric && is_zero_one_column(series)?)
        {
            return Ok(SemanticType::Boolean);
        }

        match category {
            DtypeCategory::Datetime => return Ok(SemanticType::Datetime),
            DtypeCategory::String
                if datetime_parse_rate(&values) >= self.config.datetime_threshold =>
            {
                return Ok(SemanticType::Datetime);
            }
            DtypeCategory::Numeric => return Ok(SemanticType::Numeric),
            _ => {}
        }

        let unique_ratio = distinct as f64 / values.len() as f64;
        if unique_ratio > self.config.text_uniqueness_threshold {
            return Ok(SemanticType::HighCardinalityText);
        }

        Ok(SemanticType::Categorical)
    }
}

/// Numeric column whose non-null values are exactly {0, 1}.
fn is_zero_one_column(series: &Series) -> Result<bool> {
    let values = numeric_values(series)?;
    let mut seen_zero = false;
    let mut seen_one = false;
    for v in values.into_iter().flatten() {
        if v == 0.0 {
            seen_zero = true;
        } else if v == 1.0 {
            seen_one = true;
        } else {
            return Ok(false);
        }
    }
    Ok(seen_zero && seen_one)
}

/// Parse a text value as a date or datetime.
///
/// Pure numbers (epoch-like values) never parse.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() || !DATE_SHAPE.is_match(trimmed) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Share of values that parse as dates. Zero for no values.
pub(crate) fn datetime_parse_rate(values: &[String]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let parsed = values
        .iter()
        .filter(|v| parse_datetime(v).is_some())
        .count();
    parsed as f64 / values.len() as f64
}
