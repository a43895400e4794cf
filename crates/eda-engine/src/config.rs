//! Configuration for an analysis run.
//!
//! All thresholds the engine uses live here and are passed explicitly into
//! each analysis call. Use [`AnalysisConfig::builder()`] for a fluent,
//! validated setup or deserialize one from JSON sent by a host.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds and sizes used by the classifier, the health analyzer and the
/// advisor.
///
/// # Example
///
/// ```rust,ignore
/// use eda_engine::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .nullity_threshold(0.1)
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Null ratio above which a column gets a HighNullity flag (0.0 - 1.0).
    /// Default: 0.5
    pub nullity_threshold: f64,

    /// Unique/row ratio above which a categorical column gets a
    /// HighCardinality flag (0.0 - 1.0).
    /// Default: 0.9
    pub cardinality_threshold: f64,

    /// Multiplier `k` for the outlier fences `Q1 - k*IQR` and `Q3 + k*IQR`.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Share of non-null values that must parse as dates for a text column
    /// to be classified Datetime (0.0 - 1.0).
    /// Default: 0.9
    pub datetime_threshold: f64,

    /// Unique/non-null ratio above which a text column is classified
    /// HighCardinalityText (0.0 - 1.0).
    /// Default: 0.9
    pub text_uniqueness_threshold: f64,

    /// Absolute skewness above which a transform is suggested.
    /// Default: 1.0
    pub skewness_threshold: f64,

    /// Largest category count still suggested for one-hot encoding.
    /// Default: 10
    pub one_hot_max_categories: usize,

    /// Number of categories kept in a frequency table before the rest is
    /// folded into the "other" bucket.
    /// Default: 10
    pub top_categories: usize,

    /// Number of equal-width bins in numeric histograms.
    /// Default: 10
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            nullity_threshold: 0.5,
            cardinality_threshold: 0.9,
            iqr_multiplier: 1.5,
            datetime_threshold: 0.9,
            text_uniqueness_threshold: 0.9,
            skewness_threshold: 1.0,
            one_hot_max_categories: 10,
            top_categories: 10,
            histogram_bins: 10,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return a `Configuration` error for the
    /// first field out of range.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("nullity_threshold", self.nullity_threshold),
            ("cardinality_threshold", self.cardinality_threshold),
            ("datetime_threshold", self.datetime_threshold),
            ("text_uniqueness_threshold", self.text_uniqueness_threshold),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::configuration(
                    field,
                    value,
                    "must be between 0.0 and 1.0",
                ));
            }
        }

        let positives = [
            ("iqr_multiplier", self.iqr_multiplier),
            ("skewness_threshold", self.skewness_threshold),
        ];
        for (field, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::configuration(
                    field,
                    value,
                    "must be a finite number greater than 0",
                ));
            }
        }

        let counts = [
            ("one_hot_max_categories", self.one_hot_max_categories),
            ("top_categories", self.top_categories),
            ("histogram_bins", self.histogram_bins),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(EngineError::configuration(
                    field,
                    value as f64,
                    "must be at least 1",
                ));
            }
        }

        Ok(())
    }

    /// Stable textual form used as part of the analysis cache key.
    pub(crate) fn fingerprint(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    nullity_threshold: Option<f64>,
    cardinality_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    datetime_threshold: Option<f64>,
    text_uniqueness_threshold: Option<f64>,
    skewness_threshold: Option<f64>,
    one_hot_max_categories: Option<usize>,
    top_categories: Option<usize>,
    histogram_bins: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the null ratio above which HighNullity fires.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.5 = 50%)
    pub fn nullity_threshold(mut self, threshold: f64) -> Self {
        self.nullity_threshold = Some(threshold);
        self
    }

    /// Set the unique/row ratio above which HighCardinality fires.
    pub fn cardinality_threshold(mut self, threshold: f64) -> Self {
        self.cardinality_threshold = Some(threshold);
        self
    }

    /// Set the IQR fence multiplier used for outlier detection.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    pub fn datetime_threshold(mut self, threshold: f64) -> Self {
        self.datetime_threshold = Some(threshold);
        self
    }

    pub fn text_uniqueness_threshold(mut self, threshold: f64) -> Self {
        self.text_uniqueness_threshold = Some(threshold);
        self
    }

    pub fn skewness_threshold(mut self, threshold: f64) -> Self {
        self.skewness_threshold = Some(threshold);
        self
    }

    pub fn one_hot_max_categories(mut self, max: usize) -> Self {
        self.one_hot_max_categories = Some(max);
        self
    }

    pub fn top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or a `Configuration` error.
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            nullity_threshold: self.nullity_threshold.unwrap_or(defaults.nullity_threshold),
            cardinality_threshold: self
                .cardinality_threshold
                .unwrap_or(defaults.cardinality_threshold),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            datetime_threshold: self.datetime_threshold.unwrap_or(defaults.datetime_threshold),
            text_uniqueness_threshold: self
                .text_uniqueness_threshold
                .unwrap_or(defaults.text_uniqueness_threshold),
            skewness_threshold: self.skewness_threshold.unwrap_or(defaults.skewness_threshold),
            one_hot_max_categories: self
                .one_hot_max_categories
                .unwrap_or(defaults.one_hot_max_categories),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
        };

        config.validate()?;
        Ok(config)
    }
}
