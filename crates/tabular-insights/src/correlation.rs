//! Pairwise Pearson correlation across numeric fields.
//!
//! Each field drops its own non-numeric cells before the two series are
//! paired by position; the series are not aligned by row first. A pair is
//! only correlated when both series end up the same length, so fields
//! with identical missingness are exact, and fields with different
//! missingness are skipped unless their counts happen to match.

use tracing::debug;

use crate::dataset::Dataset;
use crate::types::{Correlation, ScatterPoint};

/// Pearson's r of two equally long series.
///
/// Returns 0 when either series has zero variance. The result is clamped to
/// `[-1, 1]`; it is NaN only if the inputs contain NaN or are empty.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return 0.0;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Correlate every unordered pair of `numeric_fields` (in the given order).
///
/// Pairs whose series differ in length or are empty are skipped, and NaN
/// results are dropped.
pub fn correlate_fields(dataset: &Dataset, numeric_fields: &[&str]) -> Vec<Correlation> {
    let series: Vec<Vec<f64>> = numeric_fields
        .iter()
        .map(|field| dataset.numeric_values(field))
        .collect();

    let mut correlations = Vec::new();
    for i in 0..numeric_fields.len() {
        for j in (i + 1)..numeric_fields.len() {
            let (x, y) = (&series[i], &series[j]);
            if x.is_empty() || x.len() != y.len() {
                debug!(
                    "Skipping correlation {} ~ {}: {} vs {} values",
                    numeric_fields[i],
                    numeric_fields[j],
                    x.len(),
                    y.len()
                );
                continue;
            }
            let r = pearson(x, y);
            if r.is_nan() {
                continue;
            }
            correlations.push(Correlation {
                source: numeric_fields[i].to_string(),
                target: numeric_fields[j].to_string(),
                value: r,
            });
        }
    }
    correlations
}

/// Row-aligned value pairs of two fields, dropping rows where either value
/// does not coerce.
pub fn scatter_points(dataset: &Dataset, x_field: &str, y_field: &str) -> Vec<ScatterPoint> {
    dataset
        .numeric_column(x_field)
        .into_iter()
        .zip(dataset.numeric_column(y_field))
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some(ScatterPoint { x, y }),
            _ => None,
        })
        .collect()
}
