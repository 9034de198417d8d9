//! IQR-based outlier detection.
//!
//! Outliers are counted as occurrences: a row that is out of bounds in two
//! numeric fields contributes two.

use tracing::debug;

use crate::dataset::Dataset;
use crate::profiler::{quantile_sorted, sorted};

/// Tukey fences of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute the fences `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// Quartiles are nearest-rank: the sorted element at `floor(n * 0.25)`
    /// and `floor(n * 0.75)`. Returns `None` for an empty series.
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Number of values outside the IQR fences.
pub fn count_outliers(values: &[f64], multiplier: f64) -> usize {
    IqrBounds::from_values(values, multiplier)
        .map(|bounds| {
            values.iter().filter(|v| bounds.is_outlier(**v)).count()
        })
        .unwrap_or(0)
}

/// Dataset-level outlier counting over numeric fields.
pub struct OutlierDetector;

impl OutlierDetector {
    /// Outlier occurrences per field, in the given field order.
    pub fn field_outliers<'a, I>(
        dataset: &Dataset,
        numeric_fields: I,
        multiplier: f64,
    ) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        numeric_fields
            .into_iter()
            .map(|field| {
                let count = count_outliers(&dataset.numeric_values(field), multiplier);
                if count > 0 {
                    debug!("Field '{}' has {} IQR outliers", field, count);
                }
                (field.to_string(), count)
            })
            .collect()
    }

    /// Total outlier occurrences across the numeric fields.
    pub fn count_dataset_outliers<'a, I>(
        dataset: &Dataset,
        numeric_fields: I,
        multiplier: f64,
    ) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::field_outliers(dataset, numeric_fields, multiplier)
            .into_iter()
            .map(|(_, count)| count)
            .sum()
    }
}
