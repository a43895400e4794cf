//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Semantic type classification for columns
//! - Per-column statistics and frequency tables
//! - Dataset overview (missing cells, duplicate rows)
//! - Pairwise correlation between numeric columns

mod correlation;
mod statistics;
mod type_inference;

use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::types::{
    ColumnProfile, ColumnSummary, CorrelationMatrix, DatasetOverview, SemanticType,
};
use crate::utils::{distinct_count, non_null_strings, numeric_values};
use polars::prelude::*;
use tracing::debug;

pub use type_inference::ColumnClassifier;

/// Everything the profiling stage produces for one dataset.
#[derive(Debug, Clone)]
pub struct DatasetStatistics {
    pub overview: DatasetOverview,
    pub profiles: Vec<ColumnProfile>,
    pub correlation: CorrelationMatrix,
}

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Classify every column, in dataset order.
    ///
    /// Fails on the first column that cannot be classified, before any
    /// statistics are computed.
    pub fn classify_columns(
        df: &DataFrame,
        config: &AnalysisConfig,
    ) -> Result<Vec<(String, SemanticType)>> {
        let classifier = ColumnClassifier::new(config);
        let mut classified = Vec::with_capacity(df.width());

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?.as_materialized_series();
            let semantic_type = classifier.classify(series)?;
            debug!(column = %col_name, semantic_type = ?semantic_type, "Classified column");
            classified.push((col_name.to_string(), semantic_type));
        }

        Ok(classified)
    }

    /// Compute profiles, overview and correlation for already classified
    /// columns.
    pub fn collect_statistics(
        df: &DataFrame,
        classified: &[(String, SemanticType)],
        config: &AnalysisConfig,
    ) -> Result<DatasetStatistics> {
        Self::collect_statistics_with_progress(df, classified, config, |_, _, _| {})
    }

    /// Like [`collect_statistics`](Self::collect_statistics), calling
    /// `on_column(done, total, name)` after each column is profiled.
    pub fn collect_statistics_with_progress<F>(
        df: &DataFrame,
        classified: &[(String, SemanticType)],
        config: &AnalysisConfig,
        mut on_column: F,
    ) -> Result<DatasetStatistics>
    where
        F: FnMut(usize, usize, &str),
    {
        let total = classified.len();
        let mut profiles = Vec::with_capacity(total);
        let mut numeric_columns = Vec::new();

        for (idx, (col_name, semantic_type)) in classified.iter().enumerate() {
            let series = df.column(col_name)?.as_materialized_series();
            let profile = Self::profile_column(series, *semantic_type, config)
                .context(format!("Profiling column '{col_name}'"))?;
            on_column(idx + 1, total, col_name);

            if profile.semantic_type == SemanticType::Numeric {
                numeric_columns.push((col_name.clone(), numeric_values(series)?));
            }
            profiles.push(profile);
        }

        let overview = Self::build_overview(df, &profiles)?;
        let correlation = correlation::correlation_matrix(&numeric_columns);

        Ok(DatasetStatistics {
            overview,
            profiles,
            correlation,
        })
    }

    /// Classify then collect in one call.
    pub fn profile_dataset(df: &DataFrame, config: &AnalysisConfig) -> Result<DatasetStatistics> {
        let classified = Self::classify_columns(df, config)?;
        Self::collect_statistics(df, &classified, config)
    }

    fn profile_column(
        series: &Series,
        semantic_type: SemanticType,
        config: &AnalysisConfig,
    ) -> Result<ColumnProfile> {
        let row_count = series.len();
        let null_count = series.null_count();
        let null_percentage = if row_count > 0 {
            (null_count as f64 / row_count as f64) * 100.0
        } else {
            0.0
        };

        let unique_count = distinct_count(series)?;

        let summary = match semantic_type {
            SemanticType::Numeric => {
                let numbers: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
                statistics::numeric_summary(&numbers, config.histogram_bins)
                    .map(ColumnSummary::Numeric)
                    .unwrap_or(ColumnSummary::Empty)
            }
            SemanticType::Categorical
            | SemanticType::Boolean
            | SemanticType::HighCardinalityText => ColumnSummary::Categorical(
                statistics::frequency_table(series, config.top_categories)?,
            ),
            SemanticType::Datetime => {
                ColumnSummary::Datetime(statistics::datetime_summary(&non_null_strings(series)?))
            }
            SemanticType::Constant => ColumnSummary::Constant {
                value: non_null_strings(series)?.into_iter().next(),
            },
        };

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: format!("{:?}", series.dtype()),
            semantic_type,
            row_count,
            null_count,
            null_percentage,
            unique_count,
            summary,
        })
    }

    fn build_overview(df: &DataFrame, profiles: &[ColumnProfile]) -> Result<DatasetOverview> {
        let rows = df.height();
        let columns = df.width();
        let total_cells = rows * columns;
        let missing_cells: usize = profiles.iter().map(|p| p.null_count).sum();
        let duplicate_rows = Self::count_duplicate_rows(df)?;

        let percent_of = |part: usize, whole: usize| {
            if whole > 0 {
                (part as f64 / whole as f64) * 100.0
            } else {
                0.0
            }
        };

        Ok(DatasetOverview {
            rows,
            columns,
            total_cells,
            missing_cells,
            missing_percentage: percent_of(missing_cells, total_cells),
            duplicate_rows,
            duplicate_percentage: percent_of(duplicate_rows, rows),
        })
    }

    /// Rows minus distinct rows, nulls compared as equal.
    pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
        if df.width() == 0 || df.height() == 0 {
            return Ok(0);
        }
        let distinct = df
            .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
            .height();
        Ok(df.height() - distinct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> DataFrame {
        df! {
            "age" => [20i64, 21, 22, 23, 1000],
            "city" => ["A", "B", "A", "A", "A"],
        }
        .unwrap()
    }

    #[test]
    fn test_classify_columns_in_order() {
        let config = AnalysisConfig::default();
        let classified = DataProfiler::classify_columns(&people(), &config).unwrap();
        assert_eq!(
            classified,
            vec![
                ("age".to_string(), SemanticType::Numeric),
                ("city".to_string(), SemanticType::Categorical),
            ]
        );
    }

    #[test]
    fn test_profile_dataset_age_city() {
        let config = AnalysisConfig::default();
        let stats = DataProfiler::profile_dataset(&people(), &config).unwrap();

        assert_eq!(stats.profiles.len(), 2);
        let age = &stats.profiles[0];
        let numeric = age.numeric().unwrap();
        assert_eq!(numeric.q1, 21.0);
        assert_eq!(numeric.q3, 23.0);
        assert_eq!(age.unique_count, 5);

        let city = &stats.profiles[1];
        assert_eq!(city.unique_count, 2);
        let table = city.frequencies().unwrap();
        assert_eq!(table.most_frequent().unwrap().value, "A");
        assert_eq!(table.most_frequent().unwrap().count, 4);

        assert_eq!(stats.correlation.columns, vec!["age"]);
        assert_eq!(stats.overview.duplicate_rows, 0);
        assert_eq!(stats.overview.total_cells, 10);
    }

    #[test]
    fn test_overview_counts_missing_and_duplicates() {
        let df = df! {
            "a" => [Some(1i64), Some(1), None, Some(2)],
            "b" => [Some("x"), Some("x"), None, None],
        }
        .unwrap();
        let config = AnalysisConfig::default();
        let stats = DataProfiler::profile_dataset(&df, &config).unwrap();

        assert_eq!(stats.overview.missing_cells, 3);
        assert_eq!(stats.overview.total_cells, 8);
        assert!((stats.overview.missing_percentage - 37.5).abs() < 1e-9);
        assert_eq!(stats.overview.duplicate_rows, 1);
        assert!((stats.overview.duplicate_percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_rows_treat_nulls_as_equal() {
        let df = df! {
            "a" => [None::<i64>, None, Some(3)],
            "b" => [Some("x"), Some("x"), Some("y")],
        }
        .unwrap();
        assert_eq!(DataProfiler::count_duplicate_rows(&df).unwrap(), 1);
    }

    #[test]
    fn test_constant_column_summary() {
        let df = df! {
            "flag" => ["on", "on", "on"],
            "n" => [1.0f64, 2.0, 3.0],
        }
        .unwrap();
        let config = AnalysisConfig::default();
        let stats = DataProfiler::profile_dataset(&df, &config).unwrap();

        assert_eq!(stats.profiles[0].semantic_type, SemanticType::Constant);
        assert_eq!(
            stats.profiles[0].summary,
            ColumnSummary::Constant {
                value: Some("on".to_string())
            }
        );
    }

    #[test]
    fn test_collect_statistics_reports_each_column() {
        let df = people();
        let config = AnalysisConfig::default();
        let classified = DataProfiler::classify_columns(&df, &config).unwrap();

        let mut seen = Vec::new();
        DataProfiler::collect_statistics_with_progress(
            &df,
            &classified,
            &config,
            |done, total, name| seen.push((done, total, name.to_string())),
        )
        .unwrap();

        assert_eq!(seen, vec![(1, 2, "age".to_string()), (2, 2, "city".to_string())]);
    }

    #[test]
    fn test_unique_count_compares_values_not_text() {
        let df = df! { "offset" => [0.0f64, -0.0, 0.0, -0.0] }.unwrap();
        let stats = DataProfiler::profile_dataset(&df, &AnalysisConfig::default()).unwrap();

        assert_eq!(stats.profiles[0].unique_count, 1);
        assert_eq!(stats.profiles[0].semantic_type, SemanticType::Constant);
    }

    #[test]
    fn test_empty_dataframe_fails_classification() {
        let df = df! { "age" => Vec::<i64>::new() }.unwrap();
        let config = AnalysisConfig::default();
        let err = DataProfiler::profile_dataset(&df, &config).unwrap_err();
        assert_eq!(err.error_code(), "CLASSIFICATION_ERROR");
    }
}
