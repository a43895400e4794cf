use crate::error::EngineError;
use crate::reporting::check_references;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Classification
// ============================================================================

/// Inferred meaning of a column's values, independent of its storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Numeric,
    Categorical,
    Datetime,
    Boolean,
    HighCardinalityText,
    Constant,
}

impl SemanticType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
            Self::Datetime => "Datetime",
            Self::Boolean => "Boolean",
            Self::HighCardinalityText => "High-Cardinality Text",
            Self::Constant => "Constant",
        }
    }
}

// ============================================================================
// Column Profiles
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Declared storage type as reported by the table reader.
    pub dtype: String,
    pub semantic_type: SemanticType,
    pub row_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    /// Distinct non-null values.
    pub unique_count: usize,
    pub summary: ColumnSummary,
}

impl ColumnProfile {
    /// Share of missing cells (0.0 - 1.0). Zero for an empty column.
    pub fn null_ratio(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.row_count as f64
        }
    }

    /// Distinct values relative to the row count.
    pub fn cardinality_ratio(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.unique_count as f64 / self.row_count as f64
        }
    }

    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.summary {
            ColumnSummary::Numeric(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        match &self.summary {
            ColumnSummary::Categorical(table) => Some(table),
            _ => None,
        }
    }
}

/// Type-specific summary attached to each profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(FrequencyTable),
    Datetime(DatetimeSummary),
    Constant { value: Option<String> },
    /// No non-null values to summarize.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1).
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub skewness: f64,
    pub histogram: Histogram,
}

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Top-N value counts plus an "other" bucket for the remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub top: Vec<CategoryCount>,
    /// Number of rows whose value fell outside the top-N.
    pub other_count: usize,
    /// Number of distinct values folded into the "other" bucket.
    pub other_distinct: usize,
}

impl FrequencyTable {
    pub fn most_frequent(&self) -> Option<&CategoryCount> {
        self.top.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatetimeSummary {
    pub earliest: Option<String>,
    pub latest: Option<String>,
    /// Share of non-null values that parsed as a date or datetime.
    pub parse_rate: f64,
}

// ============================================================================
// Correlation
// ============================================================================

/// Pairwise Pearson correlation between numeric columns.
///
/// `None` marks an undefined coefficient (zero variance or too few paired
/// observations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

// ============================================================================
// Health Flags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    HighNullity,
    ZeroVariance,
    HighCardinality,
    OutlierPresence,
    DuplicateRows,
}

impl FlagKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HighNullity => "High Nullity",
            Self::ZeroVariance => "Zero Variance",
            Self::HighCardinality => "High Cardinality",
            Self::OutlierPresence => "Outliers Present",
            Self::DuplicateRows => "Duplicate Rows",
        }
    }
}

/// A data-quality warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFlag {
    /// Affected column, `None` for dataset-level flags.
    pub column: Option<String>,
    pub kind: FlagKind,
    pub severity: Severity,
    pub detail: String,
    /// The ratio or count that triggered the flag.
    pub metric: f64,
}

impl HealthFlag {
    pub fn for_column(
        column: impl Into<String>,
        kind: FlagKind,
        severity: Severity,
        detail: impl Into<String>,
        metric: f64,
    ) -> Self {
        Self {
            column: Some(column.into()),
            kind,
            severity,
            detail: detail.into(),
            metric,
        }
    }

    pub fn for_dataset(
        kind: FlagKind,
        severity: Severity,
        detail: impl Into<String>,
        metric: f64,
    ) -> Self {
        Self {
            column: None,
            kind,
            severity,
            detail: detail.into(),
            metric,
        }
    }

    pub fn applies_to(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    StandardScale,
    RobustScale,
    LogTransform,
    PowerTransform,
    OneHotEncode,
    FrequencyEncode,
    BinaryEncode,
    DatetimeFeatures,
    Impute,
    DropColumn,
}

impl Technique {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StandardScale => "Standard Scaling",
            Self::RobustScale => "Robust Scaling",
            Self::LogTransform => "Log Transform",
            Self::PowerTransform => "Power Transform",
            Self::OneHotEncode => "One-Hot Encoding",
            Self::FrequencyEncode => "Target/Frequency Encoding",
            Self::BinaryEncode => "Binary Encoding",
            Self::DatetimeFeatures => "Datetime Feature Extraction",
            Self::Impute => "Imputation",
            Self::DropColumn => "Drop Column",
        }
    }
}

/// A heuristic preprocessing suggestion for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub column: String,
    pub technique: Technique,
    pub severity: Severity,
    pub rationale: String,
    /// Illustrative snippet, never executed.
    pub example_code: String,
}

// ============================================================================
// Analysis Result
// ============================================================================

/// Dataset-wide counts shown in the report overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub total_cells: usize,
    pub missing_cells: usize,
    pub missing_percentage: f64,
    pub duplicate_rows: usize,
    pub duplicate_percentage: f64,
}

/// The single immutable output of an analysis run.
///
/// Built only by [`crate::reporting::InsightAggregator`], which checks that
/// every flag and recommendation points at a profiled column. Deserializing
/// runs the same check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "UncheckedAnalysisResult")]
pub struct AnalysisResult {
    generated_at: DateTime<Utc>,
    overview: DatasetOverview,
    profiles: Vec<ColumnProfile>,
    flags: Vec<HealthFlag>,
    correlation: CorrelationMatrix,
    recommendations: Vec<Recommendation>,
}

/// Serialized form of [`AnalysisResult`] before its references are checked.
#[derive(Deserialize)]
struct UncheckedAnalysisResult {
    generated_at: DateTime<Utc>,
    overview: DatasetOverview,
    profiles: Vec<ColumnProfile>,
    flags: Vec<HealthFlag>,
    correlation: CorrelationMatrix,
    recommendations: Vec<Recommendation>,
}

impl TryFrom<UncheckedAnalysisResult> for AnalysisResult {
    type Error = EngineError;

    fn try_from(raw: UncheckedAnalysisResult) -> Result<Self, Self::Error> {
        check_references(
            &raw.profiles,
            &raw.flags,
            &raw.correlation,
            &raw.recommendations,
        )?;
        Ok(Self {
            generated_at: raw.generated_at,
            overview: raw.overview,
            profiles: raw.profiles,
            flags: raw.flags,
            correlation: raw.correlation,
            recommendations: raw.recommendations,
        })
    }
}

impl AnalysisResult {
    pub(crate) fn new(
        overview: DatasetOverview,
        profiles: Vec<ColumnProfile>,
        flags: Vec<HealthFlag>,
        correlation: CorrelationMatrix,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            overview,
            profiles,
            flags,
            correlation,
            recommendations,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn overview(&self) -> &DatasetOverview {
        &self.overview
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn flags(&self) -> &[HealthFlag] {
        &self.flags
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn profile(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == column)
    }

    pub fn flags_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a HealthFlag> + 'a {
        self.flags.iter().filter(move |f| f.applies_to(column))
    }

    pub fn recommendations_for<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a Recommendation> + 'a {
        self.recommendations.iter().filter(move |r| r.column == column)
    }
}

// ============================================================================
// Tests
// ============================================================================
