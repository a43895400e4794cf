use crate::error::{EngineError, Result};
use crate::types::{
    AnalysisResult, ColumnProfile, CorrelationMatrix, DatasetOverview, HealthFlag,
    Recommendation,
};
use std::collections::HashSet;
use tracing::debug;

/// Merges stage outputs into the final [`AnalysisResult`].
pub struct InsightAggregator;

impl InsightAggregator {
    /// Validate cross references and build the result.
    ///
    /// Every column-level flag, every recommendation and every correlation
    /// column must name a profiled column. Dataset-level flags (no column)
    /// are always accepted.
    pub fn aggregate(
        overview: DatasetOverview,
        profiles: Vec<ColumnProfile>,
        flags: Vec<HealthFlag>,
        correlation: CorrelationMatrix,
        recommendations: Vec<Recommendation>,
    ) -> Result<AnalysisResult> {
        check_references(&profiles, &flags, &correlation, &recommendations)?;

        debug!(
            profiles = profiles.len(),
            flags = flags.len(),
            recommendations = recommendations.len(),
            "Aggregated analysis result"
        );

        Ok(AnalysisResult::new(
            overview,
            profiles,
            flags,
            correlation,
            recommendations,
        ))
    }
}

/// Every column named by a flag, recommendation or correlation entry must
/// have a profile.
pub(crate) fn check_references(
    profiles: &[ColumnProfile],
    flags: &[HealthFlag],
    correlation: &CorrelationMatrix,
    recommendations: &[Recommendation],
) -> Result<()> {
    let known: HashSet<&str> = profiles.iter().map(|p| p.name.as_str()).collect();

    for flag in flags {
        if let Some(column) = flag.column.as_deref()
            && !known.contains(column)
        {
            return Err(EngineError::aggregation(column, "health flag"));
        }
    }

    for rec in recommendations {
        if !known.contains(rec.column.as_str()) {
            return Err(EngineError::aggregation(&rec.column, "recommendation"));
        }
    }

    for column in &correlation.columns {
        if !known.contains(column.as_str()) {
            return Err(EngineError::aggregation(column, "correlation matrix"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnSummary, FlagKind, SemanticType, Severity, Technique};

    fn profile(name: &str) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            dtype: "String".to_string(),
            semantic_type: SemanticType::Categorical,
            row_count: 5,
            null_count: 0,
            null_percentage: 0.0,
            unique_count: 2,
            summary: ColumnSummary::Empty,
        }
    }

    fn recommendation(column: &str) -> Recommendation {
        Recommendation {
            column: column.to_string(),
            technique: Technique::OneHotEncode,
            severity: Severity::Low,
            rationale: "few categories".to_string(),
            example_code: String::new(),
        }
    }

    #[test]
    fn test_aggregate_valid_result() {
        let flags = vec![
            HealthFlag::for_column("city", FlagKind::HighCardinality, Severity::Low, "", 0.95),
            HealthFlag::for_dataset(FlagKind::DuplicateRows, Severity::Medium, "", 1.0),
        ];
        let result = InsightAggregator::aggregate(
            DatasetOverview::default(),
            vec![profile("city")],
            flags,
            CorrelationMatrix::default(),
            vec![recommendation("city")],
        )
        .unwrap();

        assert_eq!(result.profiles().len(), 1);
        assert_eq!(result.flags().len(), 2);
        assert_eq!(result.flags_for("city").count(), 1);
        assert_eq!(result.recommendations_for("city").count(), 1);
    }

    #[test]
    fn test_aggregate_rejects_dangling_recommendation() {
        let err = InsightAggregator::aggregate(
            DatasetOverview::default(),
            vec![profile("city")],
            vec![],
            CorrelationMatrix::default(),
            vec![recommendation("City")],
        )
        .unwrap_err();

        assert_eq!(err.error_code(), "AGGREGATION_ERROR");
        assert_eq!(err.column(), Some("City"));
    }

    #[test]
    fn test_aggregate_rejects_dangling_flag() {
        let flags = vec![HealthFlag::for_column(
            "ghost",
            FlagKind::HighNullity,
            Severity::High,
            "",
            0.9,
        )];
        let err = InsightAggregator::aggregate(
            DatasetOverview::default(),
            vec![profile("city")],
            flags,
            CorrelationMatrix::default(),
            vec![],
        )
        .unwrap_err();

        assert_eq!(err.column(), Some("ghost"));
        assert!(err.to_string().contains("health flag"));
    }

    #[test]
    fn test_aggregate_rejects_unknown_correlation_column() {
        let correlation = CorrelationMatrix {
            columns: vec!["age".to_string()],
            values: vec![vec![Some(1.0)]],
        };
        let err = InsightAggregator::aggregate(
            DatasetOverview::default(),
            vec![profile("city")],
            vec![],
            correlation,
            vec![],
        )
        .unwrap_err();

        assert_eq!(err.column(), Some("age"));
    }

    // ==================== deserialization ====================

    #[test]
    fn test_deserialize_runs_reference_check() {
        let result = InsightAggregator::aggregate(
            DatasetOverview::default(),
            vec![profile("city")],
            vec![],
            CorrelationMatrix::default(),
            vec![recommendation("city")],
        )
        .unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.recommendations(), result.recommendations());
        assert_eq!(back.generated_at(), result.generated_at());

        let forged = json.replace(r#""column":"city""#, r#""column":"ghost""#);
        let err = serde_json::from_str::<AnalysisResult>(&forged).unwrap_err();
        assert!(err.to_string().contains("unknown column 'ghost'"));
    }
}
