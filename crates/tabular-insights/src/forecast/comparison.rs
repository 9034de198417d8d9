//! Hold-out back-testing of the forecasting models.

use tracing::{debug, warn};

use super::TrendForecaster;
use crate::dataset::Dataset;
use crate::profiler::mean;
use crate::types::{ForecastModel, ModelScore};

/// Score every model by forecasting the last `holdout` values of `field`
/// from the values before them.
///
/// Needs at least `holdout + 2` numeric values; returns no scores otherwise.
/// Scores are returned in [`ForecastModel::ALL`] order.
pub fn compare_models(
    forecaster: &TrendForecaster,
    dataset: &Dataset,
    field: &str,
    holdout: usize,
) -> Vec<ModelScore> {
    let values = dataset.numeric_values(field);
    let needed = holdout.checked_add(2);
    if holdout == 0 || needed.is_none_or(|needed| values.len() < needed) {
        warn!(
            "Field '{}' has {} numeric values; too few to hold out {}",
            field,
            values.len(),
            holdout
        );
        return Vec::new();
    }

    let (train, actuals) = values.split_at(values.len() - holdout);
    let history = forecaster.history(train);

    let scores: Vec<ModelScore> = ForecastModel::ALL
        .into_iter()
        .map(|model| {
            let predicted: Vec<f64> = forecaster
                .forecast(history, holdout, model)
                .iter()
                .map(|step| step.predicted)
                .collect();
            score(model, actuals, &predicted)
        })
        .collect();

    debug!(
        "Compared {} models on '{}' with {} held-out values",
        scores.len(),
        field,
        holdout
    );
    scores
}

/// The score with the lowest mean absolute error.
pub fn best_model(scores: &[ModelScore]) -> Option<&ModelScore> {
    scores.iter().min_by(|a, b| a.mae.total_cmp(&b.mae))
}

fn score(model: ForecastModel, actuals: &[f64], predicted: &[f64]) -> ModelScore {
    let errors: Vec<f64> = actuals.iter().zip(predicted).map(|(a, p)| a - p).collect();
    let absolute: Vec<f64> = errors.iter().map(|e| e.abs()).collect();
    let squared: Vec<f64> = errors.iter().map(|e| e * e).collect();

    let percentage: Vec<f64> = actuals
        .iter()
        .zip(&errors)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| (e / a).abs() * 100.0)
        .collect();

    ModelScore {
        model,
        mae: mean(&absolute),
        rmse: mean(&squared).sqrt(),
        mape: (!percentage.is_empty()).then(|| mean(&percentage)),
    }
}
