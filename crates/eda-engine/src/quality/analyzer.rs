use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::profiler::DatasetStatistics;
use crate::types::{
    ColumnProfile, DatasetOverview, FlagKind, HealthFlag, SemanticType, Severity,
};
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::{debug, warn};

/// Applies the health rules to profiled columns and the dataset overview.
pub struct HealthAnalyzer;

impl HealthAnalyzer {
    /// Run every rule. Column flags come first, in column order, followed by
    /// dataset-level flags.
    pub fn analyze(
        stats: &DatasetStatistics,
        df: &DataFrame,
        config: &AnalysisConfig,
    ) -> Result<Vec<HealthFlag>> {
        let mut flags = Vec::new();

        for profile in &stats.profiles {
            flags.extend(Self::high_nullity(profile, config));
            flags.extend(Self::zero_variance(profile));
            flags.extend(Self::high_cardinality(profile, config));

            if profile.semantic_type == SemanticType::Numeric {
                let values = numeric_values(df.column(&profile.name)?.as_materialized_series())?;
                flags.extend(Self::outliers(profile, &values, config));
            }
        }

        flags.extend(Self::duplicate_rows(&stats.overview));

        for flag in &flags {
            if flag.severity == Severity::High {
                warn!(column = ?flag.column, kind = ?flag.kind, "{}", flag.detail);
            } else {
                debug!(column = ?flag.column, kind = ?flag.kind, "{}", flag.detail);
            }
        }

        Ok(flags)
    }

    /// Missing share above `nullity_threshold`.
    pub fn high_nullity(profile: &ColumnProfile, config: &AnalysisConfig) -> Option<HealthFlag> {
        let ratio = profile.null_ratio();
        if ratio <= config.nullity_threshold {
            return None;
        }

        let severity = if ratio >= 0.8 {
            Severity::High
        } else if ratio >= 0.5 {
            Severity::Medium
        } else {
            Severity::Low
        };

        Some(HealthFlag::for_column(
            &profile.name,
            FlagKind::HighNullity,
            severity,
            format!(
                "Column '{}' has {:.1}% missing values ({} of {} rows)",
                profile.name, profile.null_percentage, profile.null_count, profile.row_count
            ),
            ratio,
        ))
    }

    /// Constant columns, and numeric columns whose standard deviation is 0.
    pub fn zero_variance(profile: &ColumnProfile) -> Option<HealthFlag> {
        let flat = match profile.semantic_type {
            SemanticType::Constant => true,
            SemanticType::Numeric => profile.numeric().is_some_and(|s| s.std_dev == 0.0),
            _ => false,
        };
        if !flat {
            return None;
        }

        Some(HealthFlag::for_column(
            &profile.name,
            FlagKind::ZeroVariance,
            Severity::Medium,
            format!(
                "Column '{}' has no spread and carries no information",
                profile.name
            ),
            0.0,
        ))
    }

    /// Distinct values per row above `cardinality_threshold`, for text-like
    /// columns.
    pub fn high_cardinality(
        profile: &ColumnProfile,
        config: &AnalysisConfig,
    ) -> Option<HealthFlag> {
        if !matches!(
            profile.semantic_type,
            SemanticType::Categorical | SemanticType::HighCardinalityText
        ) {
            return None;
        }

        let ratio = profile.cardinality_ratio();
        if ratio <= config.cardinality_threshold {
            return None;
        }

        Some(HealthFlag::for_column(
            &profile.name,
            FlagKind::HighCardinality,
            Severity::Low,
            format!(
                "Column '{}' has {} distinct values across {} rows",
                profile.name, profile.unique_count, profile.row_count
            ),
            ratio,
        ))
    }

    /// Values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// `values` are the column's cells in row order; nulls are skipped.
    pub fn outliers(
        profile: &ColumnProfile,
        values: &[Option<f64>],
        config: &AnalysisConfig,
    ) -> Option<HealthFlag> {
        let summary = profile.numeric()?;
        let lower = summary.q1 - config.iqr_multiplier * summary.iqr;
        let upper = summary.q3 + config.iqr_multiplier * summary.iqr;

        let count = count_outliers(values, lower, upper);
        if count == 0 {
            return None;
        }

        let fraction = count as f64 / summary.count as f64;
        let severity = if fraction > 0.10 {
            Severity::High
        } else if fraction > 0.05 {
            Severity::Medium
        } else {
            Severity::Low
        };

        Some(HealthFlag::for_column(
            &profile.name,
            FlagKind::OutlierPresence,
            severity,
            format!(
                "Column '{}' has {} outlier(s) outside [{:.2}, {:.2}]",
                profile.name, count, lower, upper
            ),
            count as f64,
        ))
    }

    /// Dataset-level flag when any row repeats another exactly.
    pub fn duplicate_rows(overview: &DatasetOverview) -> Option<HealthFlag> {
        if overview.duplicate_rows == 0 {
            return None;
        }

        let severity = if overview.duplicate_percentage > 10.0 {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(HealthFlag::for_dataset(
            FlagKind::DuplicateRows,
            severity,
            format!(
                "{} duplicate row(s) ({:.1}% of {} rows)",
                overview.duplicate_rows, overview.duplicate_percentage, overview.rows
            ),
            overview.duplicate_rows as f64,
        ))
    }
}

/// Number of present values strictly outside `[lower, upper]`.
pub(crate) fn count_outliers(values: &[Option<f64>], lower: f64, upper: f64) -> usize {
    values
        .iter()
        .flatten()
        .filter(|&&v| v < lower || v > upper)
        .count()
}
