//! Field profiling: type classification and summary statistics.
//!
//! Every field of the schema is classified first (see
//! [`DataProfiler::classify_fields`]); the classification then decides
//! whether numeric or categorical statistics are computed for it.

mod statistics;
mod type_inference;

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{FieldStat, FieldType, FieldValues};
use crate::utils::{is_missing, value_label};

pub(crate) use statistics::{category_counts, mean, population_std, quantile_sorted, sorted};

/// Profiler for per-field classification and statistics.
pub struct DataProfiler;

impl DataProfiler {
    /// Classify every schema field as numeric or categorical.
    ///
    /// An empty dataset yields an empty list.
    pub fn classify_fields(
        dataset: &Dataset,
        config: &AnalysisConfig,
    ) -> Result<Vec<(String, FieldType)>> {
        let schema = dataset.schema()?;
        Ok(schema
            .fields()
            .iter()
            .map(|field| {
                let field_type =
                    type_inference::classify_field(dataset, field, config.numeric_ratio_threshold);
                (field.clone(), field_type)
            })
            .collect())
    }

    /// Compute statistics for every schema field.
    pub fn profile_dataset(dataset: &Dataset, config: &AnalysisConfig) -> Result<Vec<FieldStat>> {
        let stats: Vec<FieldStat> = Self::classify_fields(dataset, config)?
            .into_iter()
            .map(|(field, field_type)| {
                Self::profile_field(dataset, &field, field_type, config)
            })
            .collect();

        debug!(
            "Profiled {} fields ({} numeric)",
            stats.len(),
            stats
                .iter()
                .filter(|s| s.field_type == FieldType::Numeric)
                .count()
        );
        Ok(stats)
    }

    /// Compute statistics for one field of a known type.
    pub fn profile_field(
        dataset: &Dataset,
        field: &str,
        field_type: FieldType,
        config: &AnalysisConfig,
    ) -> FieldStat {
        match field_type {
            FieldType::Numeric => {
                let values = dataset.numeric_values(field);
                FieldStat {
                    field: field.to_string(),
                    field_type,
                    values: FieldValues::Numeric(statistics::numeric_stats(&values)),
                    trend: Some(statistics::trend_sample(&values, config.trend_sample_size)),
                }
            }
            FieldType::Categorical => {
                let labels = dataset
                    .column(field)
                    .filter(|value| !is_missing(*value))
                    .flatten()
                    .map(value_label);
                FieldStat {
                    field: field.to_string(),
                    field_type,
                    values: FieldValues::Categorical(statistics::categorical_stats(
                        labels,
                        config.top_categories,
                    )),
                    trend: None,
                }
            }
        }
    }
}
