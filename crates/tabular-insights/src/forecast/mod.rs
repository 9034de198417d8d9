//! Trend forecasting for a single numeric field.
//!
//! The forecaster takes the trailing window of a field's numeric values as
//! history and extends it with one of three models (see [`ForecastModel`]).
//! Every forecast period carries symmetric uncertainty bounds.

mod comparison;
pub mod models;

pub use comparison::{best_model, compare_models};
pub use models::ForecastStep;

use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::types::{ForecastModel, PredictionPoint};

/// Extends a numeric series with one of the forecasting models.
#[derive(Debug, Clone)]
pub struct TrendForecaster {
    window: usize,
    season_length: usize,
    uncertainty_factor: f64,
    default_growth_ratio: f64,
}

impl TrendForecaster {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            window: config.forecast_window,
            season_length: config.season_length,
            uncertainty_factor: config.uncertainty_factor,
            default_growth_ratio: config.default_growth_ratio,
        }
    }

    /// The trailing `window` values of `values`.
    pub fn history<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        &values[values.len().saturating_sub(self.window)..]
    }

    /// Forecast `horizon` periods after `history` with `model`.
    pub fn forecast(
        &self,
        history: &[f64],
        horizon: usize,
        model: ForecastModel,
    ) -> Vec<ForecastStep> {
        match model {
            ForecastModel::Linear => models::linear(history, horizon, self.uncertainty_factor),
            ForecastModel::Exponential => models::exponential(
                history,
                horizon,
                self.uncertainty_factor,
                self.default_growth_ratio,
            ),
            ForecastModel::Seasonal => models::seasonal(
                history,
                horizon,
                self.season_length,
                self.uncertainty_factor,
            ),
        }
    }

    /// Historical points followed by `horizon` forecast points for `field`.
    ///
    /// Periods are labelled `Period 1`, `Period 2`, ... across history and
    /// forecast. A field without numeric values produces no points.
    pub fn generate_prediction_data(
        &self,
        dataset: &Dataset,
        field: &str,
        horizon: usize,
        model: ForecastModel,
    ) -> Vec<PredictionPoint> {
        let values = dataset.numeric_values(field);
        if values.is_empty() {
            warn!(
                "Field '{}' has no numeric values; nothing to forecast",
                field
            );
            return Vec::new();
        }

        let history = self.history(&values);
        let steps = self.forecast(history, horizon, model);
        debug!(
            "Forecast '{}' with {} model: {} historical, {} forecast points",
            field,
            model,
            history.len(),
            steps.len()
        );

        let historical = history.iter().map(|&actual| PredictionPoint {
            period: String::new(),
            actual: Some(actual),
            predicted: None,
            upper_bound: None,
            lower_bound: None,
            is_historical: true,
        });
        let forecast = steps.iter().map(|step| PredictionPoint {
            period: String::new(),
            actual: None,
            predicted: Some(step.predicted),
            upper_bound: Some(step.upper_bound()),
            lower_bound: Some(step.lower_bound()),
            is_historical: false,
        });

        historical
            .chain(forecast)
            .enumerate()
            .map(|(i, point)| PredictionPoint {
                period: format!("Period {}", i + 1),
                ..point
            })
            .collect()
    }
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(values: &[f64]) -> Dataset {
        Dataset::from_values(values.iter().map(|v| json!({ "v": v })).collect()).unwrap()
    }

    #[test]
    fn test_history_is_trailing_window() {
        let forecaster = TrendForecaster::default();
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        let history = forecaster.history(&values);
        assert_eq!(history.len(), 12);
        assert_eq!(history[0], 8.0);

        assert_eq!(forecaster.history(&values[..3]).len(), 3);
    }

    #[test]
    fn test_prediction_data_layout() {
        let ds = series(&[1.0, 2.0, 3.0]);
        let forecaster = TrendForecaster::default();
        let points = forecaster.generate_prediction_data(&ds, "v", 2, ForecastModel::Linear);

        assert_eq!(points.len(), 5);
        let (history, forecast) = points.split_at(3);
        for p in history {
            assert!(p.is_historical && p.actual.is_some());
            assert!(p.predicted.is_none() && p.upper_bound.is_none());
        }
        for p in forecast {
            assert!(!p.is_historical && p.actual.is_none());
        }
        assert_eq!(points[0].period, "Period 1");
        assert_eq!(points[4].period, "Period 5");
        assert_eq!(points[3].predicted, Some(4.0));
    }

    #[test]
    fn test_bounds_bracket_prediction() {
        let ds = series(&[5.0, 3.0, 8.0, 6.0, 9.0, 7.0]);
        for model in ForecastModel::ALL {
            let points = TrendForecaster::default().generate_prediction_data(&ds, "v", 4, model);
            for p in points.iter().filter(|p| !p.is_historical) {
                let (lo, mid, hi) = (
                    p.lower_bound.unwrap(),
                    p.predicted.unwrap(),
                    p.upper_bound.unwrap(),
                );
                assert!(lo <= mid && mid <= hi, "{model}: {lo} <= {mid} <= {hi}");
            }
        }
    }

    #[test]
    fn test_no_numeric_values_no_points() {
        let ds = Dataset::from_values(vec![json!({"v": "a"}), json!({"v": null})]).unwrap();
        let forecaster = TrendForecaster::default();
        let points = forecaster.generate_prediction_data(&ds, "v", 3, ForecastModel::Seasonal);
        assert!(points.is_empty());
    }

    #[test]
    fn test_single_value_history() {
        let ds = series(&[7.0]);
        let forecaster = TrendForecaster::default();

        let linear = forecaster.generate_prediction_data(&ds, "v", 2, ForecastModel::Linear);
        assert_eq!(linear[1].predicted, Some(7.0));
        assert_eq!(linear[1].upper_bound, Some(7.0));

        let exponential =
            forecaster.generate_prediction_data(&ds, "v", 1, ForecastModel::Exponential);
        let predicted = exponential[1].predicted.unwrap();
        assert!((predicted - 7.35).abs() < 1e-9);
    }
}
