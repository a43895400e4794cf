//! Exploratory Data Analysis Engine
//!
//! Profiles a tabular dataset, flags data-quality problems and suggests
//! preprocessing steps, built with Rust and Polars.
//!
//! # Overview
//!
//! An analysis runs five stages over a polars [`DataFrame`](polars::prelude::DataFrame):
//!
//! - **Column Classification**: every column gets one [`SemanticType`]
//! - **Statistics**: numeric summaries, frequency tables, missing and
//!   duplicate counts, pairwise correlation
//! - **Health Analysis**: nullity, zero variance, cardinality, outlier and
//!   duplicate-row flags
//! - **Preprocessing Advice**: ranked, rule-based [`Recommendation`]s with
//!   illustrative pandas/scikit-learn snippets
//! - **Aggregation**: one immutable [`AnalysisResult`] with validated
//!   cross references
//!
//! The engine does no I/O and never modifies the input.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eda_engine::{AnalysisConfig, Pipeline};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! let result = Pipeline::builder()
//!     .config(AnalysisConfig::builder().nullity_threshold(0.3).build()?)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//!
//! for rec in result.recommendations() {
//!     println!("{}: {}", rec.column, rec.technique.display_name());
//! }
//! ```
//!
//! # Configuration
//!
//! All thresholds live in [`AnalysisConfig`]; nothing is read from global
//! state. See the field docs for defaults.
//!
//! # Memoization
//!
//! Attach an [`AnalysisCache`] to reuse results for an identical dataset and
//! configuration:
//!
//! ```rust,ignore
//! use eda_engine::{AnalysisCache, Pipeline};
//! use std::sync::Arc;
//!
//! let cache = Arc::new(AnalysisCache::new());
//! let pipeline = Pipeline::builder().cache(cache.clone()).build()?;
//!
//! let first = pipeline.analyze(&df)?;
//! let again = pipeline.analyze(&df)?; // served from the cache
//! cache.invalidate();
//! ```

pub mod config;
pub mod decisions;
pub mod error;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use decisions::{RecommendationEngine, RuleBasedAdvisor};
pub use error::{EngineError, Result as EngineResult, ResultExt};
pub use pipeline::{
    AnalysisCache, AnalysisStage, CacheKey, ClosureProgressReporter, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::{ColumnClassifier, DataProfiler, DatasetStatistics};
pub use quality::HealthAnalyzer;
pub use reporting::{InsightAggregator, render_summary};
pub use types::{
    AnalysisResult, CategoryCount, ColumnProfile, ColumnSummary, CorrelationMatrix,
    DatasetOverview, DatetimeSummary, FlagKind, FrequencyTable, HealthFlag, Histogram,
    NumericSummary, Recommendation, SemanticType, Severity, Technique,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
