//! Decision-making module for preprocessing suggestions.
//!
//! This module provides the rule-based advisor that turns column profiles
//! and health flags into ranked preprocessing recommendations.

mod rule_engine;
mod snippets;

pub use rule_engine::RuleBasedAdvisor;

use crate::error::Result;
use crate::types::{ColumnProfile, HealthFlag, Recommendation};

/// Trait for recommendation engines.
///
/// Implementations can use fixed heuristics or other strategies. The result
/// must be ranked by severity, highest first, keeping dataset column order
/// among equal severities.
pub trait RecommendationEngine: Send + Sync {
    fn recommend(
        &self,
        profiles: &[ColumnProfile],
        flags: &[HealthFlag],
    ) -> Result<Vec<Recommendation>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    #[test]
    fn test_rule_based_advisor_as_trait_object() {
        let engine: Box<dyn RecommendationEngine> =
            Box::new(RuleBasedAdvisor::new(AnalysisConfig::default()));
        let recommendations = engine.recommend(&[], &[]).unwrap();
        assert!(recommendations.is_empty());
    }
}
