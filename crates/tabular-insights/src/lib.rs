//! Tabular Insights
//!
//! An exploratory-analysis engine for flat tabular datasets, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! Given a dataset of untyped records, the engine:
//!
//! - **Profiles fields**: classifies each field as numeric or categorical and
//!   computes summary statistics plus a display trend sample
//! - **Finds outliers**: IQR fences per numeric field, counted dataset-wide
//! - **Correlates**: Pearson's r between every pair of numeric fields
//! - **Bins**: equal-width histograms and top-category counts
//! - **Explains**: rule-based, human-readable insights with chart hints
//! - **Detects anomalies**: Z-score flagging for a single field
//! - **Forecasts**: linear, exponential and seasonal-additive models with
//!   uncertainty bounds, plus hold-out model comparison
//!
//! Dirty data degrades gracefully: values that do not coerce to a number are
//! excluded, empty inputs produce empty results, and constant series produce
//! no anomalies. Errors are reserved for malformed input shapes and invalid
//! parameters.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_insights::{Dataset, ForecastModel};
//!
//! let dataset = Dataset::from_json_str(r#"[
//!     {"month": "Jan", "units": 12, "revenue": 240.0},
//!     {"month": "Feb", "units": 15, "revenue": 300.0},
//!     {"month": "Mar", "units": 11, "revenue": 225.5}
//! ]"#)?;
//!
//! let result = tabular_insights::analyze(&dataset)?;
//! let result = result.with_insights(tabular_insights::generate_insights(&dataset, &result));
//!
//! for insight in &result.insights {
//!     println!("{}: {}", insight.title, insight.description);
//! }
//!
//! let anomalies = tabular_insights::detect_anomalies(&dataset, "revenue", 2.0)?;
//! let forecast =
//!     tabular_insights::generate_prediction_data(&dataset, "revenue", 3, ForecastModel::Linear);
//! ```
//!
//! # Configuration
//!
//! The free functions use [`AnalysisConfig::default`]. Use an [`Analyzer`]
//! to tune thresholds:
//!
//! ```rust,ignore
//! use tabular_insights::{AnalysisConfig, Analyzer};
//!
//! let config = AnalysisConfig::builder()
//!     .numeric_ratio_threshold(0.9)   // Stricter numeric classification
//!     .histogram_bins(10)
//!     .forecast_window(24)
//!     .build()?;
//!
//! let result = Analyzer::new(config).analyze_with_insights(&dataset)?;
//! ```
//!
//! # Ingestion
//!
//! [`Dataset`] can be built from JSON ([`Dataset::from_json_str`]), from
//! records ([`Dataset::from_records`]) or from a Polars `DataFrame`
//! ([`Dataset::from_dataframe`]), which is how the CLI reads CSV files.

pub mod config;
pub mod correlation;
pub mod dataset;
pub mod detection;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod insights;
pub mod profiler;
pub mod samples;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use dataset::{Dataset, Record, Schema};
pub use detection::OutlierDetector;
pub use engine::Analyzer;
pub use error::{AnalysisError, ResultExt};
pub use forecast::{TrendForecaster, best_model};
pub use insights::InsightGenerator;
pub use profiler::DataProfiler;
pub use types::{
    AnalysisResult, AnomalyPoint, CategoricalStats, CategoryCount, ChartHint, ChartSlice,
    Correlation, Distribution, FieldStat, FieldType, FieldValues, ForecastModel, Insight,
    InsightKind, ModelScore, NumericStats, PredictionPoint, ScatterPoint, Summary, ZScoreBin,
};

static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(AnalysisResult: Send, Sync);
static_assertions::assert_impl_all!(AnomalyPoint: Send, Sync);
static_assertions::assert_impl_all!(PredictionPoint: Send, Sync);
static_assertions::assert_impl_all!(Analyzer: Send, Sync);

/// Profile a dataset with the default configuration.
///
/// See [`Analyzer::analyze`].
pub fn analyze(dataset: &Dataset) -> error::Result<AnalysisResult> {
    Analyzer::default().analyze(dataset)
}

/// Evaluate the insight rules with the default configuration.
pub fn generate_insights(dataset: &Dataset, result: &AnalysisResult) -> Vec<Insight> {
    Analyzer::default().generate_insights(dataset, result)
}

/// Z-score anomalies of `field` at `sensitivity` (2.0 is a common choice).
pub fn detect_anomalies(
    dataset: &Dataset,
    field: &str,
    sensitivity: f64,
) -> error::Result<Vec<AnomalyPoint>> {
    Analyzer::default().detect_anomalies(dataset, field, Some(sensitivity))
}

/// Unit-width Z-score histogram from -4 to +4.
pub fn generate_zscore_distribution(points: &[AnomalyPoint], sensitivity: f64) -> Vec<ZScoreBin> {
    detection::zscore_distribution(points, sensitivity)
}

/// History and forecast for `field` with the default configuration.
pub fn generate_prediction_data(
    dataset: &Dataset,
    field: &str,
    horizon: usize,
    model: ForecastModel,
) -> Vec<PredictionPoint> {
    Analyzer::default().generate_prediction_data(dataset, field, horizon, model)
}

/// Hold-out comparison of every forecasting model.
pub fn compare_models(dataset: &Dataset, field: &str, holdout: usize) -> Vec<ModelScore> {
    Analyzer::default().compare_models(dataset, field, holdout)
}
