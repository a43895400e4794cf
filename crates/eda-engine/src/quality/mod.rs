//! Data quality analysis module.
//!
//! This module provides the health rules that flag missing values, flat
//! columns, high cardinality, outliers and duplicate rows.

mod analyzer;

pub use analyzer::HealthAnalyzer;
