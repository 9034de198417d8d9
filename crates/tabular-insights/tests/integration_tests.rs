//! Integration tests for the analysis engine.
//!
//! These tests exercise the public entry points end to end, from ingestion
//! through analysis, insights, anomaly detection and forecasting.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;
use tabular_insights::{
    AnalysisConfig, AnalysisError, Analyzer, ChartHint, Dataset, FieldType, ForecastModel,
    InsightKind, best_model, samples,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> Dataset {
    let path = fixtures_path().join(filename);
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file");
    Dataset::from_dataframe(&df).expect("Failed to convert DataFrame")
}

fn dataset(rows: Value) -> Dataset {
    match rows {
        Value::Array(values) => Dataset::from_values(values).expect("rows must be objects"),
        other => panic!("expected an array of rows, got {other}"),
    }
}

fn single_field(values: &[f64]) -> Dataset {
    Dataset::from_values(values.iter().map(|v| json!({ "v": v })).collect()).unwrap()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_summary_shape() {
    let ds = dataset(json!([
        {"a": 1, "b": "x", "c": true},
        {"a": 2, "b": "y", "c": false},
        {"a": 3, "b": "z", "c": true},
    ]));
    let result = tabular_insights::analyze(&ds).unwrap();

    assert_eq!(result.summary.row_count, 3);
    assert_eq!(result.summary.column_count, 3);
    assert_eq!(result.field_stats.len(), 3);
    // Booleans never coerce to numbers
    assert_eq!(
        result.field("c").unwrap().field_type,
        FieldType::Categorical
    );
}

#[test]
fn test_empty_dataset_is_not_an_error() {
    let ds = Dataset::default();
    let result = tabular_insights::analyze(&ds).unwrap();
    assert_eq!(result.summary.row_count, 0);
    assert!(tabular_insights::generate_insights(&ds, &result).is_empty());
    let anomalies = tabular_insights::detect_anomalies(&ds, "v", 2.0).unwrap();
    assert!(anomalies.is_empty());
    assert!(
        tabular_insights::generate_prediction_data(&ds, "v", 3, ForecastModel::Linear).is_empty()
    );
}

#[test]
fn test_fieldless_first_record_is_rejected() {
    let ds = dataset(json!([{}, {"a": 1}]));
    let err = tabular_insights::analyze(&ds).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidDatasetShape(_)));
}

#[test]
fn test_numeric_classification_tolerates_dirty_values() {
    // 7 of 10 values coerce: exactly at the threshold
    let rows: Vec<Value> = ["1", "2", "3", "$4", "5", "6%", "7", "n/a", "unknown", "?"]
        .iter()
        .map(|v| json!({ "v": v }))
        .collect();
    let ds = Dataset::from_values(rows).unwrap();
    let result = tabular_insights::analyze(&ds).unwrap();

    let stat = result.field("v").unwrap();
    assert_eq!(stat.field_type, FieldType::Numeric);
    let numeric = stat.numeric().unwrap();
    assert!(approx_eq(numeric.mean, 4.0));
    assert_eq!(numeric.min, 1.0);
    assert_eq!(numeric.max, 7.0);
}

#[test]
fn test_categorical_top_values_keep_first_seen_order() {
    let ds = dataset(json!([
        {"c": "b"}, {"c": "a"}, {"c": "a"}, {"c": "b"}, {"c": "c"},
    ]));
    let result = tabular_insights::analyze(&ds).unwrap();
    let stats = result.field("c").unwrap().categorical().unwrap();

    assert_eq!(stats.unique_count, 3);
    let order: Vec<&str> = stats.most_common.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);
}

#[test]
fn test_identical_and_negated_series_correlation() {
    let rows: Vec<Value> = (1..=6)
        .map(|i| json!({"x": i, "same": i, "neg": -i}))
        .collect();
    let result = tabular_insights::analyze(&Dataset::from_values(rows).unwrap()).unwrap();

    let r = |source: &str, target: &str| {
        result
            .correlations
            .iter()
            .find(|c| c.source == source && c.target == target)
            .map(|c| c.value)
            .unwrap()
    };
    assert!(approx_eq(r("x", "same"), 1.0));
    assert!(approx_eq(r("x", "neg"), -1.0));
    assert!(approx_eq(r("same", "neg"), -1.0));
}

#[test]
fn test_histogram_counts_sum_to_numeric_count() {
    let dirty = [json!(1.5), json!("x"), json!(9), json!(null)];
    let rows: Vec<Value> = dirty
        .into_iter()
        .chain([json!(4), json!(7.25)])
        .chain((0..30).map(|i| json!(i as f64 * 0.37)))
        .map(|v| json!({ "v": v }))
        .collect();
    let ds = Dataset::from_values(rows).unwrap();
    let result = tabular_insights::analyze(&ds).unwrap();

    let distribution = result.distribution("v").unwrap();
    assert_eq!(distribution.distribution.len(), 5);
    assert_eq!(
        distribution.distribution.iter().sum::<usize>(),
        ds.numeric_values("v").len()
    );
}

#[test]
fn test_iqr_flags_only_extreme_value() {
    let ds = single_field(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
    let result = tabular_insights::analyze(&ds).unwrap();
    assert_eq!(result.summary.outliers, 1);
}

// ============================================================================
// Insights
// ============================================================================

#[test]
fn test_correlated_pair_scenario() {
    let ds = dataset(json!([
        {"x": 1, "y": 2},
        {"x": 2, "y": 4},
        {"x": 3, "y": 6},
    ]));
    let result = tabular_insights::analyze(&ds).unwrap();

    assert_eq!(result.field("x").unwrap().field_type, FieldType::Numeric);
    assert_eq!(result.field("y").unwrap().field_type, FieldType::Numeric);
    assert_eq!(result.correlations.len(), 1);
    assert!(approx_eq(result.correlations[0].value, 1.0));

    let insights = tabular_insights::generate_insights(&ds, &result);
    let insight = insights
        .iter()
        .find(|i| i.id == "correlation-0")
        .expect("strong correlation insight");
    assert_eq!(insight.kind, InsightKind::Trend);
    assert_eq!(insight.field.as_deref(), Some("x"));
    assert_eq!(insight.related_field.as_deref(), Some("y"));
}

#[test]
fn test_missing_values_scenario() {
    let ds = dataset(json!([{"v": 1}, {"v": 2}, {"v": 3}, {"v": null}, {"v": 5}]));
    let result = tabular_insights::analyze(&ds).unwrap();
    assert_eq!(result.summary.missing_values, 1);

    let insights = tabular_insights::generate_insights(&ds, &result);
    let missing = insights.iter().find(|i| i.id == "missing-values").unwrap();
    assert_eq!(missing.kind, InsightKind::Warning);
    assert!(approx_eq(missing.percentage.unwrap(), 20.0));
}

#[test]
fn test_generate_insights_does_not_mutate_result() {
    let ds = dataset(json!([{"v": 1}, {"v": null}]));
    let result = tabular_insights::analyze(&ds).unwrap();
    let first = tabular_insights::generate_insights(&ds, &result);
    let second = tabular_insights::generate_insights(&ds, &result);

    assert!(result.insights.is_empty());
    assert_eq!(first, second);

    let with = result.with_insights(first.clone());
    assert_eq!(with.insights, first);
}

#[test]
fn test_skew_insight_carries_histogram_chart() {
    let ds = single_field(&[1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 30.0, 40.0]);
    let result = Analyzer::default().analyze_with_insights(&ds).unwrap();
    let skew = result.insights.iter().find(|i| i.id == "skew-v").unwrap();

    assert_eq!(skew.kind, InsightKind::Info);
    assert!(skew.title.contains("right"));
    match &skew.chart {
        Some(ChartHint::Bar { labels, values }) => {
            assert_eq!(labels.len(), 5);
            assert_eq!(values.iter().sum::<usize>(), 8);
        }
        other => panic!("expected bar chart, got {other:?}"),
    }
}

// ============================================================================
// Anomalies
// ============================================================================

#[test]
fn test_spike_anomaly_scenario() {
    let ds = single_field(&[10.0, 10.0, 10.0, 10.0, 100.0]);
    let points = tabular_insights::detect_anomalies(&ds, "v", 2.0).unwrap();

    assert_eq!(points.len(), 5);
    assert!(points[4].is_anomaly);
    assert!(points[..4].iter().all(|p| !p.is_anomaly));

    let bins = tabular_insights::generate_zscore_distribution(&points, 2.0);
    assert_eq!(bins.len(), 8);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
    let flagged: Vec<i32> = bins
        .iter()
        .filter(|b| b.is_anomaly)
        .map(|b| b.bin)
        .collect();
    assert_eq!(flagged, vec![-4, -3, -2, 2, 3]);
}

#[test]
fn test_constant_field_has_no_anomalies() {
    let ds = single_field(&[3.0; 8]);
    let anomalies = tabular_insights::detect_anomalies(&ds, "v", 1.0).unwrap();
    assert!(anomalies.is_empty());
}

#[test]
fn test_invalid_sensitivity_is_rejected() {
    let ds = single_field(&[1.0, 2.0]);
    let err = tabular_insights::detect_anomalies(&ds, "v", 0.0).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_PARAMETER");
}

// ============================================================================
// Forecasting
// ============================================================================

#[test]
fn test_linear_forecast_is_exact_on_linear_series() {
    let (a, b) = (3.0, 2.5);
    let values: Vec<f64> = (0..10).map(|i| a + b * i as f64).collect();
    let ds = single_field(&values);

    let points = tabular_insights::generate_prediction_data(&ds, "v", 5, ForecastModel::Linear);
    let forecast: Vec<f64> = points
        .iter()
        .filter(|p| !p.is_historical)
        .map(|p| p.predicted.unwrap())
        .collect();

    assert_eq!(forecast.len(), 5);
    for (i, predicted) in forecast.iter().enumerate() {
        let expected = a + b * (values.len() + i) as f64;
        assert!(
            (predicted - expected).abs() < 1e-9,
            "step {i}: {predicted} != {expected}"
        );
    }
}

#[test]
fn test_forecast_history_is_last_twelve_values() {
    let values: Vec<f64> = (0..30).map(f64::from).collect();
    let ds = single_field(&values);
    let points =
        tabular_insights::generate_prediction_data(&ds, "v", 3, ForecastModel::Exponential);

    let history: Vec<f64> = points
        .iter()
        .filter(|p| p.is_historical)
        .map(|p| p.actual.unwrap())
        .collect();
    assert_eq!(history, (18..30).map(f64::from).collect::<Vec<_>>());
    assert_eq!(points.last().unwrap().period, "Period 15");
}

#[test]
fn test_model_names_parse() {
    for model in ForecastModel::ALL {
        assert_eq!(model.as_str().parse::<ForecastModel>().unwrap(), model);
    }
    assert!(matches!(
        "holt-winters".parse::<ForecastModel>(),
        Err(AnalysisError::UnknownModel(_))
    ));
}

#[test]
fn test_model_comparison_on_seasonal_sample() {
    let ds = samples::seasonal_series(32, 11);
    let scores = tabular_insights::compare_models(&ds, "sales", 4);

    assert_eq!(scores.len(), 3);
    let best = best_model(&scores).unwrap();
    assert!(scores.iter().all(|s| best.mae <= s.mae));
    assert!(scores.iter().all(|s| s.rmse >= s.mae - 1e-9));
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn test_csv_fixture_end_to_end() {
    let ds = load_csv("sales.csv");
    let result = Analyzer::default().analyze_with_insights(&ds).unwrap();

    assert_eq!(result.summary.row_count, 12);
    assert_eq!(result.summary.column_count, 5);
    assert_eq!(result.summary.missing_values, 3);
    // The December spike is outside the fences for units and revenue
    assert_eq!(result.summary.outliers, 2);

    let types: Vec<(&str, FieldType)> = result
        .field_stats
        .iter()
        .map(|s| (s.field.as_str(), s.field_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("month", FieldType::Categorical),
            ("region", FieldType::Categorical),
            ("units", FieldType::Numeric),
            ("revenue", FieldType::Numeric),
            ("discount", FieldType::Numeric),
        ]
    );

    // discount has fewer values, so only units ~ revenue is correlated
    assert_eq!(result.correlations.len(), 1);

    let ids: Vec<&str> = result.insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(&ids[..3], &["missing-values", "outliers", "correlation-0"]);

    let anomalies = tabular_insights::detect_anomalies(&ds, "units", 2.0).unwrap();
    let flagged: Vec<usize> = anomalies
        .iter()
        .filter(|p| p.is_anomaly)
        .map(|p| p.row)
        .collect();
    assert_eq!(flagged, vec![11]);
}

#[test]
fn test_json_ingestion_matches_records() {
    let ds = Dataset::from_json_str(r#"[{"x": 1, "y": "a"}, {"x": "2", "y": "b"}]"#).unwrap();
    let result = tabular_insights::analyze(&ds).unwrap();
    assert_eq!(result.field("x").unwrap().field_type, FieldType::Numeric);

    assert!(Dataset::from_json_str(r#"{"x": 1}"#).is_err());
    assert!(matches!(
        Dataset::from_json_str("[1, 2]"),
        Err(AnalysisError::InvalidDatasetShape(_))
    ));
}

#[test]
fn test_result_serializes_camel_case() {
    let ds = dataset(json!([
        {"x": 1, "y": 2},
        {"x": 2, "y": 4},
        {"x": 3, "y": null},
    ]));
    let result = Analyzer::default().analyze_with_insights(&ds).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["summary"]["rowCount"], json!(3));
    assert_eq!(value["summary"]["missingValues"], json!(1));
    assert_eq!(value["fieldStats"][0]["type"], json!("numeric"));
    assert_eq!(value["insights"][0]["type"], json!("warning"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_config_changes_analysis() {
    let ds = single_field(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    let config = AnalysisConfig::builder()
        .histogram_bins(2)
        .trend_sample_size(5)
        .build()
        .unwrap();
    let result = Analyzer::new(config).analyze(&ds).unwrap();

    assert_eq!(result.distribution("v").unwrap().distribution, vec![5, 5]);
    assert_eq!(result.field("v").unwrap().trend.as_ref().unwrap().len(), 5);
}

#[test]
fn test_demo_table_analyzes_cleanly() {
    let ds = samples::mixed_table(120, 3);
    let result = Analyzer::default().analyze_with_insights(&ds).unwrap();

    assert_eq!(result.summary.row_count, 120);
    assert_eq!(
        result.field("region").unwrap().field_type,
        FieldType::Categorical
    );
    assert_eq!(
        result.field("price").unwrap().field_type,
        FieldType::Numeric
    );
    assert!(result.summary.missing_values > 0);
    assert!(result.insights.iter().any(|i| i.id == "missing-values"));
}
