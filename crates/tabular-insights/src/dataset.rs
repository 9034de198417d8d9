//! In-memory dataset representation and ingestion adapters.
//!
//! A [`Dataset`] is an ordered list of flat records. The field set is taken
//! from the first record ([`Dataset::schema`]); rows that lack one of those
//! keys simply have a missing value for it.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{AnalysisError, Result, ResultExt};
use crate::utils::{DtypeCategory, coerce_numeric, get_dtype_category, is_missing};

/// One row: an ordered map from field name to scalar value.
pub type Record = Map<String, Value>;

/// A complete, immutable-by-convention table of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

/// Ordered list of fields, taken from the first record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build a dataset from JSON values; every value must be an object.
    pub fn from_values(values: Vec<Value>) -> Result<Self> {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::Object(map) => Ok(map),
                other => Err(AnalysisError::InvalidDatasetShape(format!(
                    "row {} is not an object: {}",
                    i, other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Parse a JSON array of flat objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        Self::from_values(values)
    }

    /// Convert a polars DataFrame into records.
    ///
    /// Numeric columns become JSON numbers, boolean columns JSON booleans and
    /// every other column its string representation. Nulls stay null.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut records: Vec<Record> = (0..df.height()).map(|_| Map::new()).collect();

        for column in df.get_columns() {
            let name = column.name().to_string();
            let series = column.as_materialized_series();

            let values: Vec<Value> = match get_dtype_category(series.dtype()) {
                DtypeCategory::Numeric => {
                    let floats = series
                        .cast(&DataType::Float64)
                        .context(format!("Casting column '{}' to Float64", name))?;
                    floats
                        .f64()?
                        .into_iter()
                        .map(|v| {
                            v.and_then(Number::from_f64)
                                .map_or(Value::Null, Value::Number)
                        })
                        .collect()
                }
                DtypeCategory::Boolean => series
                    .bool()?
                    .into_iter()
                    .map(|v| v.map_or(Value::Null, Value::Bool))
                    .collect(),
                DtypeCategory::Other => {
                    let strings = series
                        .cast(&DataType::String)
                        .context(format!("Casting column '{}' to String", name))?;
                    strings
                        .str()?
                        .into_iter()
                        .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_string())))
                        .collect()
                }
            };

            for (record, value) in records.iter_mut().zip(values) {
                record.insert(name.clone(), value);
            }
        }

        debug!(
            "Converted DataFrame {:?} into {} records",
            df.shape(),
            records.len()
        );
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Infer the schema from the first record.
    ///
    /// An empty dataset has an empty schema. A non-empty dataset whose first
    /// record has no fields is not tabular and is rejected.
    pub fn schema(&self) -> Result<Schema> {
        match self.records.first() {
            None => Ok(Schema::default()),
            Some(first) if first.is_empty() => Err(AnalysisError::InvalidDatasetShape(
                "first record has no fields".to_string(),
            )),
            Some(first) => Ok(Schema {
                fields: first.keys().cloned().collect(),
            }),
        }
    }

    /// Raw cells of a field, one per row (`None` when the key is absent).
    pub fn column<'a>(&'a self, field: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.records.iter().map(move |record| record.get(field))
    }

    /// Coerced value of a field for every row, `None` where coercion fails.
    pub fn numeric_column(&self, field: &str) -> Vec<Option<f64>> {
        self.column(field).map(coerce_numeric).collect()
    }

    /// Coercible values of a field, in row order.
    pub fn numeric_values(&self, field: &str) -> Vec<f64> {
        self.column(field).filter_map(coerce_numeric).collect()
    }

    /// Number of missing cells of a field.
    pub fn missing_count(&self, field: &str) -> usize {
        self.column(field).filter(|v| is_missing(*v)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dataset {
        Dataset::from_values(vec![
            json!({"name": "a", "score": 1, "flag": true}),
            json!({"name": "b", "score": "2.5", "flag": false}),
            json!({"name": "c", "score": null}),
        ])
        .unwrap()
    }

    #[test]
    fn test_schema_from_first_record_keeps_order() {
        let ds = sample();
        let schema = ds.schema().unwrap();
        assert_eq!(schema.fields(), &["name", "score", "flag"]);
    }

    #[test]
    fn test_schema_empty_dataset() {
        let ds = Dataset::default();
        assert!(ds.schema().unwrap().is_empty());
    }

    #[test]
    fn test_schema_rejects_fieldless_first_record() {
        let ds = Dataset::from_values(vec![json!({}), json!({"a": 1})]).unwrap();
        let err = ds.schema().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATASET_SHAPE");
    }

    #[test]
    fn test_from_values_rejects_non_objects() {
        let err = Dataset::from_values(vec![json!([1, 2])]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDatasetShape(_)));
    }

    #[test]
    fn test_numeric_column_and_values() {
        let ds = sample();
        assert_eq!(ds.numeric_column("score"), vec![Some(1.0), Some(2.5), None]);
        assert_eq!(ds.numeric_values("score"), vec![1.0, 2.5]);
    }

    #[test]
    fn test_missing_count_includes_absent_keys() {
        let ds = sample();
        assert_eq!(ds.missing_count("score"), 1);
        assert_eq!(ds.missing_count("flag"), 1);
        assert_eq!(ds.missing_count("name"), 0);
    }

    #[test]
    fn test_from_json_str() {
        let ds = Dataset::from_json_str(r#"[{"x": 1, "y": "a"}, {"x": 2, "y": "b"}]"#).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.numeric_values("x"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_from_dataframe() {
        let df = df![
            "qty" => [Some(1i64), None, Some(3)],
            "label" => [Some("a"), Some("b"), None],
            "ok" => [true, false, true],
        ]
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.schema().unwrap().fields(), &["qty", "label", "ok"]);
        assert_eq!(ds.numeric_column("qty"), vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(ds.records()[1]["label"], json!("b"));
        assert_eq!(ds.records()[2]["label"], Value::Null);
        assert_eq!(ds.records()[0]["ok"], json!(true));
    }
}
