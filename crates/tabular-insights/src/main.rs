//! CLI entry point for the tabular analysis engine.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabular_insights::{
    AnalysisConfig, AnalysisResult, Analyzer, AnomalyPoint, Dataset, FieldValues, ForecastModel,
    ModelScore, PredictionPoint, ZScoreBin, best_model, samples,
};
use tracing::{debug, info};

/// CLI-compatible forecast model enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliForecastModel {
    /// Least-squares trend line
    Linear,
    /// Constant growth ratio
    Exponential,
    /// Moving-average trend plus a repeating season
    Seasonal,
}

impl From<CliForecastModel> for ForecastModel {
    fn from(cli: CliForecastModel) -> Self {
        match cli {
            CliForecastModel::Linear => ForecastModel::Linear,
            CliForecastModel::Exponential => ForecastModel::Exponential,
            CliForecastModel::Seasonal => ForecastModel::Seasonal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis for tabular data",
    long_about = "Profiles a CSV or JSON dataset, reports insights, and optionally runs\n\
                  anomaly detection, forecasting and model comparison on one field.\n\n\
                  EXAMPLES:\n  \
                  # Profile a CSV file\n  \
                  tabular-insights -i sales.csv\n\n  \
                  # Flag anomalies in one column\n  \
                  tabular-insights -i sales.csv --anomalies revenue --sensitivity 2.5\n\n  \
                  # Forecast the seeded demo series\n  \
                  tabular-insights --demo --forecast sales --model seasonal --horizon 8\n\n  \
                  # Machine-readable output\n  \
                  tabular-insights -i data.json --json | jq .analysis.summary"
)]
struct Args {
    /// Path to a CSV or JSON (array of objects) file
    #[arg(short, long, required_unless_present = "demo")]
    input: Option<PathBuf>,

    /// Use a seeded demo dataset instead of an input file
    ///
    /// The demo data is a quarterly `sales` series with a seasonal pattern.
    #[arg(long, conflicts_with = "input")]
    demo: bool,

    /// Seed for the demo dataset
    #[arg(long, default_value = "42")]
    seed: u64,

    /// JSON file of analysis thresholds
    ///
    /// Keys that are left out keep their default values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field to run Z-score anomaly detection on
    #[arg(long)]
    anomalies: Option<String>,

    /// Z-score magnitude at which a point is anomalous
    #[arg(long, default_value = "2.0")]
    sensitivity: f64,

    /// Field to forecast
    #[arg(long)]
    forecast: Option<String>,

    /// Number of periods to forecast
    #[arg(long, default_value = "6")]
    horizon: usize,

    /// Forecasting model
    #[arg(long, value_enum, default_value = "linear")]
    model: CliForecastModel,

    /// Field to back-test every forecasting model on
    #[arg(long)]
    compare: Option<String>,

    /// Number of trailing values held out when comparing models
    #[arg(long, default_value = "4")]
    holdout: usize,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Everything the CLI computed, as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    anomalies: Option<AnomalyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<Vec<PredictionPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_comparison: Option<Vec<ModelScore>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnomalyReport {
    field: String,
    sensitivity: f64,
    points: Vec<AnomalyPoint>,
    zscore_distribution: Vec<ZScoreBin>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let dataset = match &args.input {
        Some(path) => {
            info!("Loading dataset from: {}", path.display());
            load_dataset(path)?
        }
        None => {
            info!("Using seeded demo dataset (seed {})", args.seed);
            samples::seasonal_series(24, args.seed)
        }
    };
    info!("Dataset loaded: {} rows", dataset.len());

    let analyzer = match &args.config {
        Some(path) => load_analyzer(path)?,
        None => Analyzer::default(),
    };
    let report = build_report(&analyzer, &dataset, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn build_report(analyzer: &Analyzer, dataset: &Dataset, args: &Args) -> Result<Report> {
    let analysis = analyzer
        .analyze_with_insights(dataset)
        .context("Failed to analyze dataset")?;

    let anomalies = args
        .anomalies
        .as_ref()
        .map(|field| -> Result<AnomalyReport> {
            let points = analyzer.detect_anomalies(dataset, field, Some(args.sensitivity))?;
            let zscore_distribution = analyzer.zscore_distribution(&points, args.sensitivity);
            Ok(AnomalyReport {
                field: field.clone(),
                sensitivity: args.sensitivity,
                points,
                zscore_distribution,
            })
        })
        .transpose()?;

    let forecast = args.forecast.as_ref().map(|field| {
        analyzer.generate_prediction_data(dataset, field, args.horizon, args.model.into())
    });

    let model_comparison = args.compare.as_ref().map(|field| {
        analyzer.compare_models(dataset, field, args.holdout)
    });

    Ok(Report {
        analysis,
        anomalies,
        forecast,
        model_comparison,
    })
}

/// Build an analyzer from a JSON config file.
fn load_analyzer(path: &Path) -> Result<Analyzer> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    info!("Loaded analysis config from: {}", path.display());
    Analyzer::try_new(config).context("Invalid analysis config")
}

/// Load a dataset, choosing the reader by file extension.
///
/// `.json` files are parsed as an array of objects; anything else is read
/// as CSV with a header row.
fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", path.display()));
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let dataset = Dataset::from_json_str(&contents)
            .with_context(|| format!("Invalid JSON dataset {}", path.display()))?;
        return Ok(dataset);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
    debug!("CSV shape: {:?}", df.shape());

    Ok(Dataset::from_dataframe(&df)?)
}

/// Print a human-readable report.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_summary(report: &Report) {
    let analysis = &report.analysis;
    let summary = &analysis.summary;

    println!("\n{}", "=".repeat(80));
    println!("DATASET ANALYSIS");
    println!("{}\n", "=".repeat(80));

    println!("SUMMARY");
    println!("{}", "-".repeat(40));
    println!("  Rows: {}", summary.row_count);
    println!("  Columns: {}", summary.column_count);
    println!("  Missing values: {}", summary.missing_values);
    println!("  Outliers: {}", summary.outliers);
    println!();

    println!("FIELDS");
    println!("{}", "-".repeat(40));
    println!("{:<20} {:<12} {}", "Field", "Type", "Statistics");
    println!("{}", "-".repeat(70));
    for stat in &analysis.field_stats {
        let details = match &stat.values {
            FieldValues::Numeric(n) => format!(
                "mean {:.2}, median {:.2}, std {:.2}, range [{:.2}, {:.2}]",
                n.mean, n.median, n.std_dev, n.min, n.max
            ),
            FieldValues::Categorical(c) => {
                let top: Vec<String> = c
                    .most_common
                    .iter()
                    .map(|cc| format!("{} ({})", cc.value, cc.count))
                    .collect();
                format!("{} unique; top: {}", c.unique_count, top.join(", "))
            }
        };
        println!(
            "{:<20} {:<12} {}",
            truncate_str(&stat.field, 19),
            stat.field_type,
            details
        );
    }
    println!();

    if !analysis.correlations.is_empty() {
        println!("CORRELATIONS");
        println!("{}", "-".repeat(40));
        for c in &analysis.correlations {
            println!("  {} ~ {}: {:+.3}", c.source, c.target, c.value);
        }
        println!();
    }

    println!("INSIGHTS");
    println!("{}", "-".repeat(40));
    if analysis.insights.is_empty() {
        println!("  No notable findings");
    }
    for insight in &analysis.insights {
        println!("  [{:?}] {}", insight.kind, insight.title);
        println!("      {}", insight.description);
    }
    println!();

    if let Some(anomalies) = &report.anomalies {
        let flagged: Vec<&AnomalyPoint> =
            anomalies.points.iter().filter(|p| p.is_anomaly).collect();
        println!(
            "ANOMALIES: {} (sensitivity {})",
            anomalies.field, anomalies.sensitivity
        );
        println!("{}", "-".repeat(40));
        if anomalies.points.is_empty() {
            println!("  No numeric variation to score");
        } else {
            println!(
                "  {} of {} points flagged",
                flagged.len(),
                anomalies.points.len()
            );
            for p in flagged {
                println!(
                    "  row {:<6} value {:<12.2} z {:+.2}",
                    p.row, p.value, p.z_score
                );
            }
        }
        println!();
    }

    if let Some(points) = &report.forecast {
        println!("FORECAST");
        println!("{}", "-".repeat(40));
        for p in points.iter().filter(|p| !p.is_historical) {
            if let (Some(predicted), Some(lo), Some(hi)) =
                (p.predicted, p.lower_bound, p.upper_bound)
            {
                println!(
                    "  {:<12} {:>12.2}  [{:.2}, {:.2}]",
                    p.period, predicted, lo, hi
                );
            }
        }
        if points.is_empty() {
            println!("  Field has no numeric values");
        }
        println!();
    }

    if let Some(scores) = &report.model_comparison {
        println!("MODEL COMPARISON");
        println!("{}", "-".repeat(40));
        if scores.is_empty() {
            println!("  Not enough values for the requested holdout");
        } else {
            println!(
                "{:<14} {:>10} {:>10} {:>10}",
                "Model", "MAE", "RMSE", "MAPE %"
            );
            for s in scores {
                let mape = s.mape.map(|m| format!("{:.2}", m));
                println!(
                    "{:<14} {:>10.3} {:>10.3} {:>10}",
                    s.model,
                    s.mae,
                    s.rmse,
                    mape.as_deref().unwrap_or("-")
                );
            }
            if let Some(best) = best_model(scores) {
                println!("  Best model: {}", best.model);
            }
        }
        println!();
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
