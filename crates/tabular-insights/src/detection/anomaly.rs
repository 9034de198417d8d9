//! Z-score anomaly detection for a single field.

use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::profiler::{mean, population_std};
use crate::types::{AnomalyPoint, ZScoreBin};

/// Lowest and highest bucket edges of the Z-score histogram.
const ZSCORE_MIN_BIN: i32 = -4;
const ZSCORE_MAX_BIN: i32 = 4;

fn validate_sensitivity(sensitivity: f64) -> Result<()> {
    if !sensitivity.is_finite() || sensitivity <= 0.0 {
        return Err(AnalysisError::invalid_parameter(
            "sensitivity",
            format!("{} (must be finite and positive)", sensitivity),
        ));
    }
    Ok(())
}

/// Score every numeric value of `field` and flag `|z| >= sensitivity`.
///
/// Rows whose value does not coerce are skipped. A field with no numeric
/// values, or whose standard deviation is below `min_std_dev`, yields no
/// points.
pub fn detect_anomalies(
    dataset: &Dataset,
    field: &str,
    sensitivity: f64,
    min_std_dev: f64,
) -> Result<Vec<AnomalyPoint>> {
    validate_sensitivity(sensitivity)?;

    let column = dataset.numeric_column(field);
    let values: Vec<f64> = column.iter().flatten().copied().collect();
    if values.is_empty() {
        warn!(
            "Field '{}' has no numeric values; no anomalies computed",
            field
        );
        return Ok(Vec::new());
    }

    let mean = mean(&values);
    let std_dev = population_std(&values);
    if std_dev < min_std_dev {
        warn!(
            "Field '{}' is constant (std {:.2e}); skipping anomaly detection",
            field, std_dev
        );
        return Ok(Vec::new());
    }

    let points: Vec<AnomalyPoint> = column
        .iter()
        .enumerate()
        .filter_map(|(row, value)| value.map(|v| (row, v)))
        .enumerate()
        .map(|(id, (row, value))| {
            let z_score = (value - mean) / std_dev;
            AnomalyPoint {
                id,
                row,
                time: format!("Point {}", id + 1),
                value,
                z_score,
                is_anomaly: z_score.abs() >= sensitivity,
            }
        })
        .collect();

    debug!(
        "Field '{}': {} of {} points anomalous at sensitivity {}",
        field,
        points.iter().filter(|p| p.is_anomaly).count(),
        points.len(),
        sensitivity
    );
    Ok(points)
}

/// Bucket Z-scores into unit bins `[bin, bin + 1)` for `bin` in `-4..4`.
///
/// Scores below -4 land in the first bucket and scores of 4 or more in the
/// last. A bucket is flagged when `|bin| >= sensitivity`, whether or not it
/// holds any points.
pub fn zscore_distribution(points: &[AnomalyPoint], sensitivity: f64) -> Vec<ZScoreBin> {
    let mut counts = vec![0usize; (ZSCORE_MAX_BIN - ZSCORE_MIN_BIN) as usize];
    for point in points.iter().filter(|p| p.z_score.is_finite()) {
        let bin = (point.z_score.floor() as i32).clamp(ZSCORE_MIN_BIN, ZSCORE_MAX_BIN - 1);
        counts[(bin - ZSCORE_MIN_BIN) as usize] += 1;
    }

    (ZSCORE_MIN_BIN..ZSCORE_MAX_BIN)
        .zip(counts)
        .map(|(bin, count)| ZScoreBin {
            bin,
            count,
            is_anomaly: f64::from(bin.abs()) >= sensitivity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(values: Vec<serde_json::Value>) -> Dataset {
        Dataset::from_values(values.into_iter().map(|v| json!({ "v": v })).collect()).unwrap()
    }

    #[test]
    fn test_spike_is_flagged() {
        let ds = series(vec![json!(10), json!(10), json!(10), json!(10), json!(100)]);
        let points = detect_anomalies(&ds, "v", 2.0, 1e-4).unwrap();

        assert_eq!(points.len(), 5);
        assert!(points[4].is_anomaly);
        assert!((points[4].z_score - 2.0).abs() < 1e-9);
        assert!(points[..4].iter().all(|p| !p.is_anomaly));
    }

    #[test]
    fn test_constant_field_has_no_anomalies() {
        let ds = series(vec![json!(7); 6]);
        for sensitivity in [0.5, 1.0, 2.0, 4.0] {
            let points = detect_anomalies(&ds, "v", sensitivity, 1e-4).unwrap();
            assert!(points.is_empty());
        }
    }

    #[test]
    fn test_non_numeric_rows_are_skipped() {
        let ds = series(vec![json!(1), json!("x"), json!(null), json!(3)]);
        let points = detect_anomalies(&ds, "v", 2.0, 1e-4).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[1].id, 1);
        assert_eq!(points[1].row, 3);
        assert_eq!(points[1].time, "Point 2");
    }

    #[test]
    fn test_unknown_field_is_empty() {
        let ds = series(vec![json!(1), json!(2)]);
        let points = detect_anomalies(&ds, "missing", 2.0, 1e-4).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_invalid_sensitivity_is_rejected() {
        let ds = series(vec![json!(1), json!(2)]);
        let err = detect_anomalies(&ds, "v", 0.0, 1e-4).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(detect_anomalies(&ds, "v", f64::NAN, 1e-4).is_err());
    }

    fn point(z_score: f64) -> AnomalyPoint {
        AnomalyPoint {
            id: 0,
            row: 0,
            time: String::new(),
            value: 0.0,
            z_score,
            is_anomaly: false,
        }
    }

    #[test]
    fn test_zscore_distribution_bins() {
        let points: Vec<_> = [-9.0, -3.5, -0.2, 0.0, 0.9, 2.0, 3.99, 4.0, 12.0]
            .into_iter()
            .map(point)
            .collect();
        let bins = zscore_distribution(&points, 2.0);

        let edges: Vec<i32> = bins.iter().map(|b| b.bin).collect();
        assert_eq!(edges, vec![-4, -3, -2, -1, 0, 1, 2, 3]);

        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 0, 0, 1, 2, 0, 1, 3]);
        assert_eq!(counts.iter().sum::<usize>(), points.len());
    }

    #[test]
    fn test_zscore_distribution_flags_ignore_occupancy() {
        let bins = zscore_distribution(&[], 2.0);
        let flagged: Vec<i32> = bins
            .iter()
            .filter(|b| b.is_anomaly)
            .map(|b| b.bin)
            .collect();
        assert_eq!(flagged, vec![-4, -3, -2, 2, 3]);
        assert!(bins.iter().all(|b| b.count == 0));
    }
}
