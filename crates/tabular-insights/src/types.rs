use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

// ============================================================================
// Field Statistics
// ============================================================================

/// Inferred kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Numeric,
    Categorical,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Descriptive statistics of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// A category label with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Frequency statistics of a categorical field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalStats {
    pub unique_count: usize,
    /// Most frequent values, descending; ties keep first-seen order.
    pub most_common: Vec<CategoryCount>,
}

/// Either numeric or categorical statistics, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValues {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// Per-field result of the profiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStat {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub values: FieldValues,
    /// Evenly strided display sample of a numeric series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<f64>>,
}

impl FieldStat {
    /// Numeric statistics, if this is a numeric field.
    pub fn numeric(&self) -> Option<&NumericStats> {
        match &self.values {
            FieldValues::Numeric(stats) => Some(stats),
            FieldValues::Categorical(_) => None,
        }
    }

    /// Categorical statistics, if this is a categorical field.
    pub fn categorical(&self) -> Option<&CategoricalStats> {
        match &self.values {
            FieldValues::Categorical(stats) => Some(stats),
            FieldValues::Numeric(_) => None,
        }
    }
}

// ============================================================================
// Dataset-level Results
// ============================================================================

/// Pearson correlation between two numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Histogram (numeric) or top-category counts (categorical) of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub distribution: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Bin edges of a numeric histogram (`bins + 1` values).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<f64>>,
}

/// Dataset-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub row_count: usize,
    pub column_count: usize,
    /// Missing cells across all fields and rows.
    pub missing_values: usize,
    /// IQR outlier occurrences across all numeric fields and rows.
    pub outliers: usize,
}

/// Complete output of [`crate::analyze`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Summary,
    pub field_stats: Vec<FieldStat>,
    pub correlations: Vec<Correlation>,
    pub distributions: Vec<Distribution>,
    pub insights: Vec<Insight>,
}

impl AnalysisResult {
    /// Return a copy of this result with `insights` appended after the
    /// existing ones.
    pub fn with_insights(&self, insights: impl IntoIterator<Item = Insight>) -> Self {
        let mut result = self.clone();
        result.insights.extend(insights);
        result
    }

    /// Look up the statistics of a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldStat> {
        self.field_stats.iter().find(|stat| stat.field == name)
    }

    /// Look up the distribution of a field by name.
    pub fn distribution(&self, name: &str) -> Option<&Distribution> {
        self.distributions.iter().find(|d| d.name == name)
    }
}

// ============================================================================
// Insights
// ============================================================================

/// Insight category, used by the UI for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Trend,
    Info,
}

/// A labelled value in a pie or bar chart hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
}

/// A row-aligned pair of values in a scatter chart hint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Display hint telling a UI how to chart an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartHint {
    Pie { slices: Vec<ChartSlice> },
    Scatter { points: Vec<ScatterPoint> },
    Bar {
        labels: Vec<String>,
        values: Vec<usize>,
    },
}

/// A human-readable finding produced by the insight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartHint>,
}

// ============================================================================
// Anomalies
// ============================================================================

/// Z-score of one row of the selected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyPoint {
    /// Sequential index among rows with a numeric value.
    pub id: usize,
    /// Index of the source row in the dataset.
    pub row: usize,
    pub time: String,
    pub value: f64,
    pub z_score: f64,
    pub is_anomaly: bool,
}

/// One unit-width bucket of the Z-score histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZScoreBin {
    /// Lower edge; the bucket covers `[bin, bin + 1)`.
    pub bin: i32,
    pub count: usize,
    pub is_anomaly: bool,
}

// ============================================================================
// Forecasting
// ============================================================================

/// Forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    Linear,
    Exponential,
    Seasonal,
}

impl ForecastModel {
    pub const ALL: [ForecastModel; 3] = [Self::Linear, Self::Exponential, Self::Seasonal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Exponential => "exponential",
            Self::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ForecastModel {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "exponential" => Ok(Self::Exponential),
            "seasonal" => Ok(Self::Seasonal),
            _ => Err(AnalysisError::UnknownModel(s.to_string())),
        }
    }
}

/// A historical or forecast period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPoint {
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    pub is_historical: bool,
}

/// Hold-out accuracy of one forecasting model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model: ForecastModel,
    pub mae: f64,
    pub rmse: f64,
    /// Mean absolute percentage error over non-zero actuals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_model_from_str() {
        assert_eq!(
            "linear".parse::<ForecastModel>().unwrap(),
            ForecastModel::Linear
        );
        assert_eq!(
            " Seasonal ".parse::<ForecastModel>().unwrap(),
            ForecastModel::Seasonal
        );
        let err = "arima".parse::<ForecastModel>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MODEL");
    }

    #[test]
    fn test_field_stat_serializes_camel_case() {
        let stat = FieldStat {
            field: "price".to_string(),
            field_type: FieldType::Numeric,
            values: FieldValues::Numeric(NumericStats {
                mean: 2.0,
                median: 2.0,
                std_dev: 1.0,
                min: 1.0,
                max: 3.0,
            }),
            trend: None,
        };
        let value = serde_json::to_value(&stat).unwrap();
        assert_eq!(value["type"], json!("numeric"));
        assert_eq!(value["values"]["stdDev"], json!(1.0));
        assert!(value.get("trend").is_none());
    }

    #[test]
    fn test_chart_hint_is_tagged() {
        let hint = ChartHint::Scatter {
            points: vec![ScatterPoint { x: 1.0, y: 2.0 }],
        };
        let value = serde_json::to_value(&hint).unwrap();
        assert_eq!(value["type"], json!("scatter"));
        assert_eq!(value["points"][0]["y"], json!(2.0));
    }

    #[test]
    fn test_with_insights_appends_without_mutating() {
        let original = AnalysisResult::default();
        let insight = Insight {
            id: "outliers".to_string(),
            kind: InsightKind::Warning,
            title: "Outliers".to_string(),
            description: "Some outliers".to_string(),
            field: None,
            related_field: None,
            percentage: Some(10.0),
            chart: None,
        };

        let updated = original.with_insights(vec![insight.clone()]);
        let twice = updated.with_insights(vec![insight]);

        assert!(original.insights.is_empty());
        assert_eq!(updated.insights.len(), 1);
        assert_eq!(twice.insights.len(), 2);
    }
}
