//! The analysis engine: one entry point per operation, sharing a config.

use tracing::info;

use crate::config::AnalysisConfig;
use crate::correlation::correlate_fields;
use crate::dataset::Dataset;
use crate::detection::{self, OutlierDetector};
use crate::distribution::field_distribution;
use crate::error::Result;
use crate::forecast::{self, TrendForecaster};
use crate::insights::InsightGenerator;
use crate::profiler::DataProfiler;
use crate::types::{
    AnalysisResult, AnomalyPoint, FieldType, ForecastModel, Insight, ModelScore, PredictionPoint,
    Summary, ZScoreBin,
};

/// Runs every analysis operation with one [`AnalysisConfig`].
///
/// Holds no state besides the configuration, so one analyzer can be shared
/// across threads and reused for any number of datasets.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::{Analyzer, AnalysisConfig, Dataset};
///
/// let config = AnalysisConfig::builder().histogram_bins(10).build()?;
/// let analyzer = Analyzer::new(config);
/// let result = analyzer.analyze_with_insights(&dataset)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer after validating `config`.
    ///
    /// Use this for configurations that did not come from
    /// [`AnalysisConfig::builder`], such as a deserialized JSON file.
    pub fn try_new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Profile the dataset: summary counts, per-field statistics,
    /// correlations between numeric fields and per-field distributions.
    ///
    /// The result carries no insights; see [`Analyzer::generate_insights`].
    pub fn analyze(&self, dataset: &Dataset) -> Result<AnalysisResult> {
        let schema = dataset.schema()?;
        let classified = DataProfiler::classify_fields(dataset, &self.config)?;

        let field_stats = classified
            .iter()
            .map(|(field, field_type)| {
                DataProfiler::profile_field(dataset, field, *field_type, &self.config)
            })
            .collect();

        let numeric_fields: Vec<&str> = classified
            .iter()
            .filter(|(_, field_type)| *field_type == FieldType::Numeric)
            .map(|(field, _)| field.as_str())
            .collect();

        let correlations = correlate_fields(dataset, &numeric_fields);

        let distributions = classified
            .iter()
            .map(|(field, field_type)| {
                field_distribution(
                    dataset,
                    field,
                    *field_type,
                    self.config.histogram_bins,
                    self.config.top_categories,
                )
            })
            .collect();

        let summary = Summary {
            row_count: dataset.len(),
            column_count: schema.len(),
            missing_values: schema
                .fields()
                .iter()
                .map(|field| dataset.missing_count(field))
                .sum(),
            outliers: OutlierDetector::count_dataset_outliers(
                dataset,
                numeric_fields.iter().copied(),
                self.config.iqr_multiplier,
            ),
        };

        info!(
            "Analyzed {} rows x {} columns ({} numeric): {} missing, {} outliers, {} correlations",
            summary.row_count,
            summary.column_count,
            numeric_fields.len(),
            summary.missing_values,
            summary.outliers,
            correlations.len()
        );

        Ok(AnalysisResult {
            summary,
            field_stats,
            correlations,
            distributions,
            insights: Vec::new(),
        })
    }

    /// Evaluate the insight rules against a result of [`Analyzer::analyze`]
    /// for the same dataset.
    pub fn generate_insights(&self, dataset: &Dataset, result: &AnalysisResult) -> Vec<Insight> {
        InsightGenerator::new(self.config.clone()).generate(dataset, result)
    }

    /// [`Analyzer::analyze`] followed by insight generation.
    pub fn analyze_with_insights(&self, dataset: &Dataset) -> Result<AnalysisResult> {
        let result = self.analyze(dataset)?;
        let insights = self.generate_insights(dataset, &result);
        Ok(result.with_insights(insights))
    }

    /// Z-score anomaly detection on one field.
    ///
    /// `sensitivity` defaults to the configured value when `None`.
    pub fn detect_anomalies(
        &self,
        dataset: &Dataset,
        field: &str,
        sensitivity: Option<f64>,
    ) -> Result<Vec<AnomalyPoint>> {
        let sensitivity = sensitivity.unwrap_or(self.config.default_sensitivity);
        detection::detect_anomalies(dataset, field, sensitivity, self.config.min_std_dev)
    }

    /// Unit-width Z-score histogram of previously detected points.
    pub fn zscore_distribution(&self, points: &[AnomalyPoint], sensitivity: f64) -> Vec<ZScoreBin> {
        detection::zscore_distribution(points, sensitivity)
    }

    pub fn generate_prediction_data(
        &self,
        dataset: &Dataset,
        field: &str,
        horizon: usize,
        model: ForecastModel,
    ) -> Vec<PredictionPoint> {
        self.forecaster().generate_prediction_data(dataset, field, horizon, model)
    }

    /// Back-test every forecasting model on the last `holdout` values.
    pub fn compare_models(
        &self,
        dataset: &Dataset,
        field: &str,
        holdout: usize,
    ) -> Vec<ModelScore> {
        forecast::compare_models(&self.forecaster(), dataset, field, holdout)
    }

    fn forecaster(&self) -> TrendForecaster {
        TrendForecaster::new(&self.config)
    }
}
