//! Forecasting models.
//!
//! Each model maps a history window to per-period `(predicted, uncertainty)`
//! steps. Short histories fall back to a zero slope or the default growth
//! ratio instead of failing.

use crate::profiler::mean;

/// One forecast period before it is labelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    pub predicted: f64,
    pub uncertainty: f64,
}

impl ForecastStep {
    pub fn upper_bound(&self) -> f64 {
        self.predicted + self.uncertainty
    }

    pub fn lower_bound(&self) -> f64 {
        self.predicted - self.uncertainty
    }
}

/// Ordinary least squares slope of value against index.
///
/// Zero for fewer than two points.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let numerator: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (i as f64 - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = (0..n).map(|i| (i as f64 - x_mean).powi(2)).sum();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Mean ratio between consecutive values, skipping zero denominators.
pub fn growth_ratio(values: &[f64], default_ratio: f64) -> f64 {
    let ratios: Vec<f64> = values
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| pair[1] / pair[0])
        .collect();

    if ratios.is_empty() {
        default_ratio
    } else {
        mean(&ratios)
    }
}

/// Three-point centered moving average; the window is clipped at both ends.
pub fn moving_average_trend(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(n - 1);
            mean(&values[lo..=hi])
        })
        .collect()
}

/// Average detrended residual for each position in the season.
pub fn seasonal_components(values: &[f64], trend: &[f64], season_length: usize) -> Vec<f64> {
    (0..season_length)
        .map(|season| {
            let residuals: Vec<f64> = values
                .iter()
                .zip(trend)
                .enumerate()
                .filter(|(i, _)| i % season_length == season)
                .map(|(_, (value, t))| value - t)
                .collect();
            if residuals.is_empty() {
                0.0
            } else {
                mean(&residuals)
            }
        })
        .collect()
}

pub fn linear(history: &[f64], horizon: usize, uncertainty_factor: f64) -> Vec<ForecastStep> {
    let Some(&last) = history.last() else {
        return Vec::new();
    };
    let slope = ols_slope(history);

    (0..horizon)
        .map(|i| {
            let steps = (i + 1) as f64;
            ForecastStep {
                predicted: last + slope * steps,
                uncertainty: slope.abs() * steps * uncertainty_factor,
            }
        })
        .collect()
}

pub fn exponential(
    history: &[f64],
    horizon: usize,
    uncertainty_factor: f64,
    default_ratio: f64,
) -> Vec<ForecastStep> {
    let Some(&last) = history.last() else {
        return Vec::new();
    };
    let ratio = growth_ratio(history, default_ratio);

    (0..horizon)
        .map(|i| {
            let predicted = last * ratio.powf((i + 1) as f64);
            ForecastStep {
                predicted,
                uncertainty: predicted.abs() * uncertainty_factor,
            }
        })
        .collect()
}

/// Additive decomposition: moving-average trend plus a repeating seasonal
/// component, extrapolated from the last observed value.
pub fn seasonal(
    history: &[f64],
    horizon: usize,
    season_length: usize,
    uncertainty_factor: f64,
) -> Vec<ForecastStep> {
    let Some(&last) = history.last() else {
        return Vec::new();
    };
    if season_length == 0 {
        return linear(history, horizon, uncertainty_factor);
    }

    let trend = moving_average_trend(history);
    let components = seasonal_components(history, &trend, season_length);
    let slope = ols_slope(&trend);
    let m = history.len();

    (0..horizon)
        .map(|i| {
            let component = components[(m + i) % season_length];
            ForecastStep {
                predicted: last + slope * (i + 1) as f64 + component,
                uncertainty: (slope + component).abs() * uncertainty_factor,
            }
        })
        .collect()
}
