//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the analysis workflow.

use crate::config::AnalysisConfig;
use crate::decisions::{RecommendationEngine, RuleBasedAdvisor};
use crate::error::{Result, ResultExt};
use crate::pipeline::cache::{AnalysisCache, CacheKey};
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::quality::HealthAnalyzer;
use crate::reporting::InsightAggregator;
use crate::types::AnalysisResult;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use eda_engine::{AnalysisCache, AnalysisConfig, Pipeline};
/// use std::sync::Arc;
///
/// let cache = Arc::new(AnalysisCache::new());
///
/// let result = Pipeline::builder()
///     .config(AnalysisConfig::builder().nullity_threshold(0.3).build()?)
///     .cache(cache.clone())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .analyze(&dataframe)?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    engine: Arc<dyn RecommendationEngine>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cache: Option<Arc<AnalysisCache>>,
}

// A host may build the pipeline once and run analyses from worker threads
static_assertions::assert_impl_all!(Pipeline: Send, Sync);
static_assertions::assert_impl_all!(AnalysisResult: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a DataFrame.
    ///
    /// Every column is classified before any statistics are computed, so a
    /// column that cannot be classified aborts the run early. With a cache
    /// attached, a repeated (dataset, config) pair returns the stored result.
    pub fn analyze(&self, df: &DataFrame) -> Result<Arc<AnalysisResult>> {
        match self.analyze_cached(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Analysis error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn analyze_cached(&self, df: &DataFrame) -> Result<Arc<AnalysisResult>> {
        let Some(cache) = &self.cache else {
            return self.analyze_internal(df).map(Arc::new);
        };

        let key = CacheKey::new(df, &self.config).context("Fingerprinting dataset")?;
        if let Some(hit) = cache.get(&key) {
            info!("Returning cached analysis");
            return Ok(hit);
        }

        let result = Arc::new(self.analyze_internal(df)?);
        cache.insert(key, result.clone());
        Ok(result)
    }

    fn analyze_internal(&self, df: &DataFrame) -> Result<AnalysisResult> {
        let start_time = Instant::now();
        info!("Starting analysis of {} rows x {} columns", df.height(), df.width());

        // Step 1: Classify every column
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Classifying,
            0.0,
            "Classifying columns...",
        ));
        let classified = DataProfiler::classify_columns(df, &self.config)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Classifying,
            1.0,
            format!("Classified {} columns", classified.len()),
        ));

        // Step 2: Statistics
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::CollectingStatistics,
            0.0,
            "Collecting statistics...",
        ));
        info!("Step 2: Collecting statistics...");
        let stats = DataProfiler::collect_statistics_with_progress(
            df,
            &classified,
            &self.config,
            |done, total, name| {
                self.report_progress(ProgressUpdate::with_items(
                    AnalysisStage::CollectingStatistics,
                    format!("Column: {name}"),
                    done,
                    total,
                    format!("Profiled column {name}"),
                ));
            },
        )?;
        debug!(
            missing_cells = stats.overview.missing_cells,
            duplicate_rows = stats.overview.duplicate_rows,
            "Overview"
        );
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::CollectingStatistics,
            1.0,
            "Statistics complete",
        ));

        // Step 3: Health rules
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::AnalyzingHealth,
            0.0,
            "Analyzing data health...",
        ));
        info!("Step 3: Analyzing data health...");
        let flags = HealthAnalyzer::analyze(&stats, df, &self.config)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::AnalyzingHealth,
            1.0,
            format!("Found {} health issues", flags.len()),
        ));

        // Step 4: Recommendations
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Advising,
            0.0,
            "Building recommendations...",
        ));
        info!("Step 4: Building recommendations...");
        let recommendations = self.engine.recommend(&stats.profiles, &flags)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Advising,
            1.0,
            format!("{} recommendations", recommendations.len()),
        ));

        // Step 5: Merge
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Aggregating,
            0.0,
            "Aggregating results...",
        ));
        let result = InsightAggregator::aggregate(
            stats.overview,
            stats.profiles,
            flags,
            stats.correlation,
            recommendations,
        )?;

        info!(
            "Analysis finished in {}ms",
            start_time.elapsed().as_millis()
        );

        Ok(result)
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    engine: Option<Arc<dyn RecommendationEngine>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cache: Option<Arc<AnalysisCache>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default [`RuleBasedAdvisor`].
    ///
    /// A cache keys on dataset and configuration only, so pipelines sharing
    /// a cache should share the engine too.
    pub fn recommendation_engine(mut self, engine: Arc<dyn RecommendationEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set a progress reporter for receiving updates during analysis.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use eda_engine::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Attach a result cache.
    ///
    /// Keys cover the dataset and the configuration but not the
    /// recommendation engine, so pipelines with different engines should
    /// use separate caches.
    pub fn cache(mut self, cache: Arc<AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns a `Configuration` error if the configuration is invalid.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let engine = match self.engine {
            Some(engine) => engine,
            None => Arc::new(RuleBasedAdvisor::new(config.clone())),
        };

        Ok(Pipeline {
            config,
            engine,
            progress_reporter: self.progress_reporter,
            cache: self.cache,
        })
    }
}
