//! Per-field distributions: equal-width histograms for numeric fields and
//! top-category counts for categorical ones.

use crate::dataset::Dataset;
use crate::profiler::category_counts;
use crate::types::{Distribution, FieldType};
use crate::utils::{is_missing, value_label};

/// Equal-width histogram counts and edges over `[min, max]`.
///
/// A value's bin is `floor((v - min) / width)`, clamped to the last bin so
/// the maximum is counted. When all values are equal every value lands in
/// the first bin. An empty series gives `bins` zero counts and no edges.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<usize>, Vec<f64>) {
    let bins = bins.max(1);
    let mut counts = vec![0usize; bins];
    if values.is_empty() {
        return (counts, Vec::new());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    for value in values {
        let idx = if width > 0.0 {
            (((value - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    let edges = (0..=bins).map(|i| min + width * i as f64).collect();
    (counts, edges)
}

/// Distribution of one field according to its type.
pub fn field_distribution(
    dataset: &Dataset,
    field: &str,
    field_type: FieldType,
    bins: usize,
    top_categories: usize,
) -> Distribution {
    match field_type {
        FieldType::Numeric => {
            let (counts, edges) = histogram(&dataset.numeric_values(field), bins);
            Distribution {
                name: field.to_string(),
                distribution: counts,
                categories: None,
                edges: (!edges.is_empty()).then_some(edges),
            }
        }
        FieldType::Categorical => {
            let labels = dataset
                .column(field)
                .filter(|value| !is_missing(*value))
                .flatten()
                .map(value_label);
            let (categories, counts): (Vec<String>, Vec<usize>) = category_counts(labels)
                .into_iter()
                .take(top_categories)
                .map(|c| (c.value, c.count))
                .unzip();
            Distribution {
                name: field.to_string(),
                distribution: counts,
                categories: Some(categories),
                edges: None,
            }
        }
    }
}
