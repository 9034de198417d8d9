//! Descriptive statistics for profiled fields.

use std::collections::HashMap;

use crate::types::{CategoricalStats, CategoryCount, NumericStats};

/// Arithmetic mean; 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`); 0 for an empty slice.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sort a copy of the values in ascending order.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of already sorted values; the mean of the two middle values for
/// an even count.
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Nearest-rank quantile of sorted values: the element at `floor(n * q)`.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Mean, median, population std, min and max of the coercible values.
pub(crate) fn numeric_stats(values: &[f64]) -> NumericStats {
    if values.is_empty() {
        return NumericStats::default();
    }
    let sorted = sorted(values);
    NumericStats {
        mean: mean(values),
        median: median_sorted(&sorted),
        std_dev: population_std(values),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

/// Frequency of every label, most frequent first. The sort is stable over
/// first-seen order, so ties keep the order in which values appeared.
pub(crate) fn category_counts<I>(labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for label in labels {
        match index.get(&label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(CategoryCount {
                    value: label,
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Distinct count and the `top` most frequent labels.
pub(crate) fn categorical_stats<I>(labels: I, top: usize) -> CategoricalStats
where
    I: IntoIterator<Item = String>,
{
    let counts = category_counts(labels);
    CategoricalStats {
        unique_count: counts.len(),
        most_common: counts.into_iter().take(top).collect(),
    }
}

/// Up to `size` values taken every `max(1, n / size)` positions.
pub(crate) fn trend_sample(values: &[f64], size: usize) -> Vec<f64> {
    let stride = (values.len() / size.max(1)).max(1);
    values.iter().step_by(stride).take(size).copied().collect()
}
