//! Field type inference.

use crate::dataset::Dataset;
use crate::types::FieldType;
use crate::utils::{coerce_numeric, is_missing};

/// Share of non-missing values of a field that coerce to a number.
///
/// Returns `None` when the field has no non-missing values.
pub(crate) fn numeric_ratio(dataset: &Dataset, field: &str) -> Option<f64> {
    let (present, numeric) = dataset
        .column(field)
        .filter(|value| !is_missing(*value))
        .fold((0usize, 0usize), |(present, numeric), value| {
            let is_numeric = coerce_numeric(value).is_some();
            (present + 1, numeric + usize::from(is_numeric))
        });

    (present > 0).then(|| numeric as f64 / present as f64)
}

/// Classify a field as numeric when at least `threshold` of its non-missing
/// values coerce; fields with no values at all are categorical.
pub(crate) fn classify_field(dataset: &Dataset, field: &str, threshold: f64) -> FieldType {
    match numeric_ratio(dataset, field) {
        Some(ratio) if ratio >= threshold => FieldType::Numeric,
        _ => FieldType::Categorical,
    }
}
