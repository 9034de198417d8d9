//! Rule-based insight generation.
//!
//! Turns an [`AnalysisResult`] into natural-language findings. Rules run in
//! a fixed order (missing data, outliers, correlations, skew) and each one
//! contributes zero or more insights; the result is their concatenation.

mod rules;

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::types::{AnalysisResult, Insight};

/// Rule engine producing [`Insight`]s from analysis output.
pub struct InsightGenerator {
    config: AnalysisConfig,
}

impl InsightGenerator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Evaluate every rule against `result`.
    ///
    /// `dataset` must be the dataset `result` was computed from; it is read
    /// to build row-aligned scatter data for correlation insights.
    pub fn generate(&self, dataset: &Dataset, result: &AnalysisResult) -> Vec<Insight> {
        let insights: Vec<Insight> = rules::missing_data(&result.summary)
            .into_iter()
            .chain(rules::outliers(&result.summary))
            .chain(rules::correlations(
                dataset,
                &result.correlations,
                self.config.strong_correlation_threshold,
            ))
            .chain(rules::skew(result, self.config.skew_threshold))
            .collect();

        debug!("Generated {} insights", insights.len());
        insights
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
