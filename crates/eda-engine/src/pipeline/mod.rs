//! Pipeline module.
//!
//! This module provides the analysis pipeline, its progress reporting and
//! the optional result cache.

mod builder;
pub mod cache;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use cache::{AnalysisCache, CacheKey, dataset_fingerprint};
pub use progress::{AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
