//! Memoization of finished analyses.
//!
//! A cache is an explicit value handed to [`PipelineBuilder::cache`]
//! (usually behind an `Arc` so several pipelines can share it). Nothing is
//! cached process-wide.
//!
//! [`PipelineBuilder::cache`]: super::PipelineBuilder::cache

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::AnalysisResult;
use crate::utils::string_values;
use parking_lot::Mutex;
use polars::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// Identifies one (dataset, configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    dataset: u64,
    config: String,
}

impl CacheKey {
    pub fn new(df: &DataFrame, config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            dataset: dataset_fingerprint(df)?,
            config: config.fingerprint()?,
        })
    }
}

/// Thread-safe map from [`CacheKey`] to a shared result.
///
/// [`AnalysisCache::new`] never evicts: entries stay until
/// [`invalidate`](Self::invalidate). [`AnalysisCache::with_capacity`] keeps
/// at most that many results and drops the oldest insertion first.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: Mutex<Entries>,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct Entries {
    results: HashMap<CacheKey, Arc<AnalysisResult>>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
}

static_assertions::assert_impl_all!(AnalysisCache: Send, Sync);

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` results (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::default(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<AnalysisResult>> {
        self.entries.lock().results.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, result: Arc<AnalysisResult>) {
        let mut entries = self.entries.lock();
        if entries.results.insert(key.clone(), result).is_none() {
            entries.order.push_back(key);
        }

        if let Some(capacity) = self.capacity {
            while entries.results.len() > capacity {
                let Some(oldest) = entries.order.pop_front() else {
                    break;
                };
                entries.results.remove(&oldest);
                debug!("Evicted cached analysis");
            }
        }
    }

    /// Drop every cached result.
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock();
        entries.results.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().results.is_empty()
    }
}

/// Hash of shape, column names, dtypes and every cell.
pub fn dataset_fingerprint(df: &DataFrame) -> Result<u64> {
    let mut hasher = DefaultHasher::new();
    df.height().hash(&mut hasher);
    df.width().hash(&mut hasher);

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        series.name().as_str().hash(&mut hasher);
        format!("{:?}", series.dtype()).hash(&mut hasher);
        for value in string_values(series)? {
            value.hash(&mut hasher);
        }
    }

    Ok(hasher.finish())
}
