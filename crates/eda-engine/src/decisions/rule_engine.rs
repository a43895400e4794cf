//! Rule-based preprocessing advisor using a fixed heuristic table.

use super::RecommendationEngine;
use super::snippets::{FillStrategy, example_code};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::{
    ColumnProfile, FlagKind, HealthFlag, Recommendation, SemanticType, Severity, Technique,
};
use tracing::debug;

/// Rule-based advisor.
///
/// Applies the heuristic table to each profile in column order, then ranks
/// the suggestions by severity. The sort is stable, so equal severities
/// keep dataset column order.
pub struct RuleBasedAdvisor {
    config: AnalysisConfig,
}

impl RuleBasedAdvisor {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Suggestions for one column, unranked.
    fn advise_column(&self, profile: &ColumnProfile, flags: &[&HealthFlag]) -> Vec<Recommendation> {
        let flag = |kind: FlagKind| flags.iter().copied().find(|f| f.kind == kind);

        // A flat column gets dropped and nothing else
        if profile.semantic_type == SemanticType::Constant || flag(FlagKind::ZeroVariance).is_some()
        {
            return vec![self.recommendation(
                profile,
                Technique::DropColumn,
                Severity::High,
                format!(
                    "'{}' has no variance and adds nothing to a model",
                    profile.name
                ),
            )];
        }

        let mut out = Vec::new();

        if let Some(nullity) = flag(FlagKind::HighNullity) {
            let strategy = if profile.semantic_type == SemanticType::Numeric {
                "median"
            } else {
                "most frequent value"
            };
            out.push(self.recommendation(
                profile,
                Technique::Impute,
                nullity.severity,
                format!(
                    "{:.1}% of values are missing; fill with the {}",
                    profile.null_percentage, strategy
                ),
            ));
        }

        match profile.semantic_type {
            SemanticType::Numeric => {
                self.advise_numeric(profile, flag(FlagKind::OutlierPresence), &mut out)
            }
            SemanticType::Categorical => {
                if profile.unique_count <= self.config.one_hot_max_categories {
                    out.push(self.recommendation(
                        profile,
                        Technique::OneHotEncode,
                        Severity::Low,
                        format!(
                            "{} categories, few enough for one indicator column each",
                            profile.unique_count
                        ),
                    ));
                } else {
                    out.push(self.recommendation(
                        profile,
                        Technique::FrequencyEncode,
                        Severity::Medium,
                        format!(
                            "{} categories would explode into too many one-hot columns",
                            profile.unique_count
                        ),
                    ));
                }
            }
            SemanticType::HighCardinalityText => out.push(self.recommendation(
                profile,
                Technique::FrequencyEncode,
                Severity::Medium,
                format!(
                    "Nearly every value is distinct ({} unique); encode by frequency or drop",
                    profile.unique_count
                ),
            )),
            SemanticType::Boolean => out.push(self.recommendation(
                profile,
                Technique::BinaryEncode,
                Severity::Low,
                "Two-valued column maps directly to 0/1".to_string(),
            )),
            SemanticType::Datetime => out.push(self.recommendation(
                profile,
                Technique::DatetimeFeatures,
                Severity::Low,
                "Models cannot use raw timestamps; extract year, month, day and weekday"
                    .to_string(),
            )),
            SemanticType::Constant => {}
        }

        out
    }

    fn advise_numeric(
        &self,
        profile: &ColumnProfile,
        outliers: Option<&HealthFlag>,
        out: &mut Vec<Recommendation>,
    ) {
        match outliers {
            Some(flag) => out.push(self.recommendation(
                profile,
                Technique::RobustScale,
                flag.severity,
                format!(
                    "{} outlier(s) would distort mean/std scaling; scale by median and IQR",
                    flag.metric
                ),
            )),
            None => out.push(self.recommendation(
                profile,
                Technique::StandardScale,
                Severity::Low,
                "No outliers detected; standardize to zero mean and unit variance".to_string(),
            )),
        }

        let Some(summary) = profile.numeric() else {
            return;
        };
        if !summary.skewness.is_finite()
            || summary.skewness.abs() <= self.config.skewness_threshold
        {
            return;
        }

        if summary.min >= 0.0 {
            out.push(self.recommendation(
                profile,
                Technique::LogTransform,
                Severity::Medium,
                format!(
                    "Skewness {:.2} with non-negative values; log1p compresses the tail",
                    summary.skewness
                ),
            ));
        } else {
            out.push(self.recommendation(
                profile,
                Technique::PowerTransform,
                Severity::Medium,
                format!(
                    "Skewness {:.2} with negative values; Yeo-Johnson handles both signs",
                    summary.skewness
                ),
            ));
        }
    }

    fn recommendation(
        &self,
        profile: &ColumnProfile,
        technique: Technique,
        severity: Severity,
        rationale: String,
    ) -> Recommendation {
        let fill = if profile.semantic_type == SemanticType::Numeric {
            FillStrategy::Median
        } else {
            FillStrategy::Mode
        };

        debug!(
            column = %profile.name,
            technique = technique.display_name(),
            severity = ?severity,
            "Recommendation"
        );

        Recommendation {
            column: profile.name.clone(),
            technique,
            severity,
            rationale,
            example_code: example_code(technique, &profile.name, fill),
        }
    }
}

impl RecommendationEngine for RuleBasedAdvisor {
    fn recommend(
        &self,
        profiles: &[ColumnProfile],
        flags: &[HealthFlag],
    ) -> Result<Vec<Recommendation>> {
        let mut recommendations = Vec::new();

        for profile in profiles {
            let column_flags: Vec<&HealthFlag> =
                flags.iter().filter(|f| f.applies_to(&profile.name)).collect();
            recommendations.extend(self.advise_column(profile, &column_flags));
        }

        // Stable: equal severities stay in column order
        recommendations.sort_by(|a, b| b.severity.cmp(&a.severity));

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use crate::quality::HealthAnalyzer;
    use crate::types::{ColumnSummary, Histogram, NumericSummary};
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn advise_with(df: &DataFrame, config: AnalysisConfig) -> Vec<Recommendation> {
        let stats = DataProfiler::profile_dataset(df, &config).unwrap();
        let flags = HealthAnalyzer::analyze(&stats, df, &config).unwrap();
        RuleBasedAdvisor::new(config)
            .recommend(&stats.profiles, &flags)
            .unwrap()
    }

    fn advise(df: &DataFrame) -> Vec<Recommendation> {
        advise_with(df, AnalysisConfig::default())
    }

    fn techniques_for(recs: &[Recommendation], column: &str) -> Vec<Technique> {
        recs.iter()
            .filter(|r| r.column == column)
            .map(|r| r.technique)
            .collect()
    }

    // ==================== numeric rules ====================

    #[test]
    fn test_outliers_suggest_robust_scaling() {
        let df = df! { "age" => [20i64, 21, 22, 23, 1000] }.unwrap();
        let recs = advise(&df);

        let techniques = techniques_for(&recs, "age");
        assert!(techniques.contains(&Technique::RobustScale));
        assert!(!techniques.contains(&Technique::StandardScale));

        let robust = recs
            .iter()
            .find(|r| r.technique == Technique::RobustScale)
            .unwrap();
        assert_eq!(robust.severity, Severity::High);
        assert!(robust.example_code.contains("RobustScaler"));
    }

    #[test]
    fn test_clean_numeric_suggests_standard_scaling() {
        let df = df! { "n" => [1.0f64, 2.0, 3.0, 4.0, 5.0] }.unwrap();
        assert_eq!(techniques_for(&advise(&df), "n"), vec![Technique::StandardScale]);
    }

    #[test]
    fn test_skewed_non_negative_suggests_log() {
        let df = df! { "income" => [1.0f64, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 50.0] }.unwrap();
        let config = AnalysisConfig::builder().iqr_multiplier(100.0).build().unwrap();
        let techniques = techniques_for(&advise_with(&df, config), "income");
        assert!(techniques.contains(&Technique::LogTransform));
        assert!(!techniques.contains(&Technique::PowerTransform));
    }

    #[test]
    fn test_skewed_with_negatives_suggests_power() {
        let df = df! { "delta" => [-5.0f64, -4.0, -4.0, -3.0, -3.0, -2.0, 40.0] }.unwrap();
        let techniques = techniques_for(&advise(&df), "delta");
        assert!(techniques.contains(&Technique::PowerTransform));
        assert!(!techniques.contains(&Technique::LogTransform));
    }

    #[test]
    fn test_infinite_values_do_not_trigger_transforms() {
        let df = df! {
            "x" => [f64::NEG_INFINITY, 1.0, 2.0, 3.0, 4.0, f64::INFINITY],
        }
        .unwrap();
        assert_eq!(techniques_for(&advise(&df), "x"), vec![Technique::StandardScale]);
    }

    #[test]
    fn test_undefined_skewness_skips_transforms() {
        let profile = ColumnProfile {
            name: "x".to_string(),
            dtype: "Float64".to_string(),
            semantic_type: SemanticType::Numeric,
            row_count: 4,
            null_count: 0,
            null_percentage: 0.0,
            unique_count: 4,
            summary: ColumnSummary::Numeric(NumericSummary {
                count: 4,
                mean: 2.5,
                median: 2.5,
                std_dev: f64::NAN,
                variance: f64::NAN,
                min: -1.0,
                max: 6.0,
                q1: 1.0,
                q3: 4.0,
                iqr: 3.0,
                skewness: f64::NAN,
                histogram: Histogram {
                    edges: vec![],
                    counts: vec![],
                },
            }),
        };

        let recs = RuleBasedAdvisor::new(AnalysisConfig::default())
            .recommend(&[profile], &[])
            .unwrap();
        assert_eq!(techniques_for(&recs, "x"), vec![Technique::StandardScale]);
    }

    // ==================== categorical rules ====================

    #[test]
    fn test_few_categories_one_hot() {
        let df = df! { "city" => ["A", "B", "A", "A", "A"] }.unwrap();
        let recs = advise(&df);
        assert_eq!(techniques_for(&recs, "city"), vec![Technique::OneHotEncode]);
        assert_eq!(recs[0].severity, Severity::Low);
    }

    #[test]
    fn test_many_categories_frequency_encode() {
        // 12 categories, each repeated, so not high-cardinality text
        let values: Vec<String> = (0..24).map(|i| format!("cat{}", i % 12)).collect();
        let df = df! { "code" => values }.unwrap();
        let recs = advise(&df);
        assert_eq!(techniques_for(&recs, "code"), vec![Technique::FrequencyEncode]);
        assert_eq!(recs[0].severity, Severity::Medium);
    }

    #[test]
    fn test_boolean_and_datetime() {
        let df = df! {
            "active" => [true, false, true],
            "joined" => ["2024-01-01", "2024-02-01", "2024-03-01"],
        }
        .unwrap();
        let recs = advise(&df);
        assert_eq!(techniques_for(&recs, "active"), vec![Technique::BinaryEncode]);
        assert_eq!(techniques_for(&recs, "joined"), vec![Technique::DatetimeFeatures]);
    }

    // ==================== drop and impute ====================

    #[test]
    fn test_constant_column_only_dropped() {
        let df = df! {
            "flag" => [1i64, 1, 1, 1],
            "n" => [1.0f64, 2.0, 3.0, 4.0],
        }
        .unwrap();
        let recs = advise(&df);
        assert_eq!(techniques_for(&recs, "flag"), vec![Technique::DropColumn]);
        assert_eq!(recs[0].column, "flag");
        assert_eq!(recs[0].severity, Severity::High);
    }

    #[test]
    fn test_high_nullity_suggests_impute() {
        let df = df! {
            "score" => [Some(1.0f64), Some(2.0), None, None, None, None],
            "label" => [Some("a"), Some("b"), Some("a"), None, None, None],
        }
        .unwrap();
        let recs = advise(&df);

        let score = recs
            .iter()
            .find(|r| r.column == "score" && r.technique == Technique::Impute)
            .unwrap();
        assert!(score.example_code.contains("median()"));

        let label = recs
            .iter()
            .find(|r| r.column == "label" && r.technique == Technique::Impute);
        // 50% missing is not above the default 0.5 threshold
        assert!(label.is_none());
    }

    // ==================== ranking ====================

    #[test]
    fn test_ranked_by_severity_then_column_order() {
        let df = df! {
            "city" => ["A", "B", "A", "A", "A"],
            "n" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
            "flat" => ["x", "x", "x", "x", "x"],
        }
        .unwrap();
        let recs = advise(&df);

        let order: Vec<(&str, Technique)> =
            recs.iter().map(|r| (r.column.as_str(), r.technique)).collect();
        assert_eq!(
            order,
            vec![
                ("flat", Technique::DropColumn),
                ("city", Technique::OneHotEncode),
                ("n", Technique::StandardScale),
            ]
        );
    }
}
