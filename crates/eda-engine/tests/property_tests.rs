//! Property-based tests for the analysis engine.
//!
//! Each property generates small random tables and checks a structural
//! guarantee of the engine that must hold regardless of the data:
//!
//! - correlation matrices are symmetric, with a unit diagonal wherever the
//!   column varies
//! - duplicate counts do not depend on row order
//! - classification succeeds on every non-empty column and is repeatable
//! - a column with no spread never reports outliers

use eda_engine::{
    AnalysisConfig, ColumnClassifier, DataProfiler, FlagKind, HealthAnalyzer, Pipeline,
    SemanticType,
};
use polars::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Test Data Generation Utilities
// ============================================================================

fn optional_floats(len: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.85, -1_000.0f64..1_000.0), len)
}

/// Three float columns of equal length.
fn float_table() -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    (2usize..40).prop_flat_map(|len| prop::collection::vec(optional_floats(len), 3))
}

/// Squared deviations from the mean, summed the way the correlation does.
fn sum_of_squares(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum()
}

fn small_rows() -> impl Strategy<Value = Vec<(i64, String)>> {
    prop::collection::vec((0i64..3, prop::sample::select(vec!["a", "b"])), 1..30)
        .prop_map(|rows| rows.into_iter().map(|(n, s)| (n, s.to_string())).collect())
}

fn rows_to_frame(rows: &[(i64, String)]) -> DataFrame {
    let numbers: Vec<i64> = rows.iter().map(|(n, _)| *n).collect();
    let labels: Vec<&str> = rows.iter().map(|(_, s)| s.as_str()).collect();
    df! {
        "n" => numbers,
        "label" => labels,
    }
    .unwrap()
}

fn text_cells() -> impl Strategy<Value = Vec<Option<String>>> {
    let cell = prop_oneof![
        Just("yes".to_string()),
        Just("no".to_string()),
        Just("2024-03-01".to_string()),
        "[a-z]{1,6}",
        "[0-9]{1,3}",
    ];
    prop::collection::vec(prop::option::weighted(0.9, cell), 1..25)
}

// ============================================================================
// Correlation
// ============================================================================

proptest! {
    #[test]
    fn test_correlation_matrix_symmetric_with_unit_diagonal(columns in float_table()) {
        let series: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| Series::new(format!("c{i}").into(), values).into())
            .collect();
        let df = DataFrame::new(series).unwrap();

        let stats = DataProfiler::profile_dataset(&df, &AnalysisConfig::default()).unwrap();
        let matrix = &stats.correlation;
        let n = matrix.columns.len();
        prop_assert_eq!(matrix.values.len(), n);

        for i in 0..n {
            prop_assert_eq!(matrix.values[i].len(), n);

            let index: usize = matrix.columns[i][1..].parse().unwrap();
            let present: Vec<f64> = columns[index].iter().flatten().copied().collect();
            if sum_of_squares(&present) > 0.0 {
                prop_assert_eq!(matrix.values[i][i], Some(1.0));
            } else {
                prop_assert_eq!(matrix.values[i][i], None);
            }

            for j in 0..n {
                prop_assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                if let Some(r) = matrix.values[i][j] {
                    prop_assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }
}

// ============================================================================
// Duplicates
// ============================================================================

proptest! {
    #[test]
    fn test_duplicate_count_matches_distinct_rows(rows in small_rows()) {
        let df = rows_to_frame(&rows);
        let distinct: HashSet<&(i64, String)> = rows.iter().collect();

        let duplicates = DataProfiler::count_duplicate_rows(&df).unwrap();
        prop_assert_eq!(duplicates, rows.len() - distinct.len());
    }

    #[test]
    fn test_duplicate_count_ignores_row_order(rows in small_rows()) {
        let mut reversed = rows.clone();
        reversed.reverse();
        let mut sorted = rows.clone();
        sorted.sort();

        let expected = DataProfiler::count_duplicate_rows(&rows_to_frame(&rows)).unwrap();
        prop_assert_eq!(
            DataProfiler::count_duplicate_rows(&rows_to_frame(&reversed)).unwrap(),
            expected
        );
        prop_assert_eq!(
            DataProfiler::count_duplicate_rows(&rows_to_frame(&sorted)).unwrap(),
            expected
        );
    }
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn test_classification_total_and_deterministic(cells in text_cells()) {
        let series = Series::new("col".into(), &cells);
        let config = AnalysisConfig::default();
        let classifier = ColumnClassifier::new(&config);

        let first = classifier.classify(&series);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first.unwrap(), classifier.classify(&series).unwrap());
    }

    #[test]
    fn test_profile_counts_are_consistent(cells in text_cells()) {
        let df = DataFrame::new(vec![Series::new("col".into(), &cells).into()]).unwrap();
        let stats = DataProfiler::profile_dataset(&df, &AnalysisConfig::default()).unwrap();
        let profile = &stats.profiles[0];

        let nulls = cells.iter().filter(|c| c.is_none()).count();
        let distinct: HashSet<&String> = cells.iter().flatten().collect();
        prop_assert_eq!(profile.row_count, cells.len());
        prop_assert_eq!(profile.null_count, nulls);
        prop_assert_eq!(profile.unique_count, distinct.len());
    }
}

// ============================================================================
// Health Rules
// ============================================================================

proptest! {
    #[test]
    fn test_no_spread_means_no_outliers(value in -1_000.0f64..1_000.0, len in 1usize..30) {
        let df = df! { "reading" => vec![value; len] }.unwrap();
        let config = AnalysisConfig::default();
        let stats = DataProfiler::profile_dataset(&df, &config).unwrap();
        let flags = HealthAnalyzer::analyze(&stats, &df, &config).unwrap();

        prop_assert!(flags.iter().any(|f| f.kind == FlagKind::ZeroVariance));
        prop_assert!(flags.iter().all(|f| f.kind != FlagKind::OutlierPresence));
    }

    #[test]
    fn test_numeric_without_spread_flags_zero_variance(
        value in -1_000.0f64..1_000.0,
        len in 1usize..30,
    ) {
        // The infinite cell keeps the column Numeric without adding spread
        let mut cells = vec![value; len];
        cells.push(f64::INFINITY);
        let df = df! { "reading" => cells }.unwrap();
        let config = AnalysisConfig::default();
        let stats = DataProfiler::profile_dataset(&df, &config).unwrap();
        let flags = HealthAnalyzer::analyze(&stats, &df, &config).unwrap();

        prop_assert_eq!(stats.profiles[0].semantic_type, SemanticType::Numeric);
        prop_assert!(flags.iter().any(|f| f.kind == FlagKind::ZeroVariance));
        prop_assert!(flags.iter().all(|f| f.kind != FlagKind::OutlierPresence));
    }

    #[test]
    fn test_pipeline_references_always_resolve(columns in float_table()) {
        let series: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(i, values)| Series::new(format!("c{i}").into(), values).into())
            .collect();
        let df = DataFrame::new(series).unwrap();

        let result = Pipeline::builder().build().unwrap().analyze(&df).unwrap();
        for rec in result.recommendations() {
            prop_assert!(result.profile(&rec.column).is_some());
        }
        for flag in result.flags() {
            if let Some(column) = &flag.column {
                prop_assert!(result.profile(column).is_some());
            }
        }
    }
}
