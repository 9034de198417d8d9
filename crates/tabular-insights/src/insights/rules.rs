//! Individual insight rules.

use crate::correlation::scatter_points;
use crate::dataset::Dataset;
use crate::types::{
    AnalysisResult, ChartHint, ChartSlice, Correlation, Insight, InsightKind, Summary,
};

fn pie(first: (&str, f64), second: (&str, f64)) -> ChartHint {
    ChartHint::Pie {
        slices: [first, second]
            .into_iter()
            .map(|(label, value)| ChartSlice {
                label: label.to_string(),
                value,
            })
            .collect(),
    }
}

/// Warns about missing cells, as a share of all cells.
pub(super) fn missing_data(summary: &Summary) -> Option<Insight> {
    if summary.missing_values == 0 {
        return None;
    }
    let total_cells = summary.row_count * summary.column_count;
    let percentage = if total_cells > 0 {
        summary.missing_values as f64 / total_cells as f64 * 100.0
    } else {
        0.0
    };
    let present = total_cells.saturating_sub(summary.missing_values);

    Some(Insight {
        id: "missing-values".to_string(),
        kind: InsightKind::Warning,
        title: "Missing data detected".to_string(),
        description: format!(
            "{} of {} values ({:.1}%) are missing. Consider imputing or removing \
             incomplete rows before drawing conclusions.",
            summary.missing_values, total_cells, percentage
        ),
        field: None,
        related_field: None,
        percentage: Some(percentage),
        chart: Some(pie(
            ("Missing", summary.missing_values as f64),
            ("Present", present as f64),
        )),
    })
}

/// Warns about IQR outliers, as a share of rows.
pub(super) fn outliers(summary: &Summary) -> Option<Insight> {
    if summary.outliers == 0 {
        return None;
    }
    let percentage = if summary.row_count > 0 {
        summary.outliers as f64 / summary.row_count as f64 * 100.0
    } else {
        0.0
    };
    let normal = summary.row_count.saturating_sub(summary.outliers);

    Some(Insight {
        id: "outliers".to_string(),
        kind: InsightKind::Warning,
        title: "Outliers detected".to_string(),
        description: format!(
            "Found {} outlier values outside the interquartile range fences ({:.1}% of rows). \
             They may be data entry errors or genuinely exceptional records.",
            summary.outliers, percentage
        ),
        field: None,
        related_field: None,
        percentage: Some(percentage),
        chart: Some(pie(
            ("Outliers", summary.outliers as f64),
            ("Normal", normal as f64),
        )),
    })
}

/// One insight per correlation stronger than `threshold` in magnitude.
///
/// Field names may contain any character, so the insight id is keyed on
/// the pair's position in `correlations` rather than on the names.
pub(super) fn correlations(
    dataset: &Dataset,
    correlations: &[Correlation],
    threshold: f64,
) -> Vec<Insight> {
    correlations
        .iter()
        .enumerate()
        .filter(|(_, c)| c.value.abs() > threshold)
        .map(|(index, c)| {
            let direction = if c.value > 0.0 { "positive" } else { "negative" };
            let movement = if c.value > 0.0 {
                "tends to increase"
            } else {
                "tends to decrease"
            };
            Insight {
                id: format!("correlation-{}", index),
                kind: InsightKind::Trend,
                title: format!("Strong {} correlation", direction),
                description: format!(
                    "{} and {} have a strong {} correlation (r = {:.2}): as {} increases, {} {}.",
                    c.source, c.target, direction, c.value, c.source, c.target, movement
                ),
                field: Some(c.source.clone()),
                related_field: Some(c.target.clone()),
                percentage: None,
                chart: Some(ChartHint::Scatter {
                    points: scatter_points(dataset, &c.source, &c.target),
                }),
            }
        })
        .collect()
}

/// One insight per numeric field whose mean and median are further apart
/// than `threshold` standard deviations.
pub(super) fn skew(result: &AnalysisResult, threshold: f64) -> Vec<Insight> {
    result
        .field_stats
        .iter()
        .filter_map(|stat| stat.numeric().map(|numeric| (stat, numeric)))
        .filter(|(_, n)| (n.mean - n.median).abs() > threshold * n.std_dev)
        .map(|(stat, n)| {
            let direction = if n.mean > n.median { "right" } else { "left" };
            let tail = if n.mean > n.median { "high" } else { "low" };
            let chart = result.distribution(&stat.field).map(|d| ChartHint::Bar {
                labels: bin_labels(d.edges.as_deref(), d.distribution.len()),
                values: d.distribution.clone(),
            });
            Insight {
                id: format!("skew-{}", stat.field),
                kind: InsightKind::Info,
                title: format!("{} is {}-skewed", stat.field, direction),
                description: format!(
                    "The mean of {} ({:.2}) differs from its median ({:.2}), indicating a \
                     {}-skewed distribution with a tail of unusually {} values. The median \
                     is the more representative center.",
                    stat.field, n.mean, n.median, direction, tail
                ),
                field: Some(stat.field.clone()),
                related_field: None,
                percentage: None,
                chart,
            }
        })
        .collect()
}

fn bin_labels(edges: Option<&[f64]>, bins: usize) -> Vec<String> {
    match edges {
        Some(edges) if edges.len() == bins + 1 => edges
            .windows(2)
            .map(|w| format!("{:.1}-{:.1}", w[0], w[1]))
            .collect(),
        _ => (1..=bins).map(|i| format!("Bin {}", i)).collect(),
    }
}
