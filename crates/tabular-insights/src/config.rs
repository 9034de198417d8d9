//! Configuration types for the analysis engine.
//!
//! Every threshold the engine applies lives here so that a caller can tune
//! the heuristics without touching the algorithms. The defaults reproduce
//! the engine's documented behavior.

use serde::{Deserialize, Serialize};

/// Tunable thresholds for analysis, anomaly detection and forecasting.
///
/// Use [`AnalysisConfig::builder()`] to create a configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_insights::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .numeric_ratio_threshold(0.8)
///     .forecast_window(24)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum share of non-missing values that must coerce to a number
    /// for a field to be classified numeric (0.0 - 1.0).
    /// Default: 0.7
    pub numeric_ratio_threshold: f64,

    /// IQR multiplier for the outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Number of equal-width bins for numeric distributions.
    /// Default: 5
    pub histogram_bins: usize,

    /// Number of categories kept in categorical stats and distributions.
    /// Default: 5
    pub top_categories: usize,

    /// Maximum number of values in a field's trend sample.
    /// Default: 10
    pub trend_sample_size: usize,

    /// Absolute correlation above which a correlation insight is emitted.
    /// Default: 0.7
    pub strong_correlation_threshold: f64,

    /// Skew insight fires when |mean - median| exceeds this many standard
    /// deviations.
    /// Default: 0.5
    pub skew_threshold: f64,

    /// Z-score magnitude used when the caller does not pass a sensitivity.
    /// Default: 2.0
    pub default_sensitivity: f64,

    /// Standard deviations below this value are treated as constant data.
    /// Default: 1e-4
    pub min_std_dev: f64,

    /// Number of trailing values used as forecast history.
    /// Default: 12
    pub forecast_window: usize,

    /// Season length of the seasonal-additive model.
    /// Default: 4
    pub season_length: usize,

    /// Relative width of forecast uncertainty bands.
    /// Default: 0.2
    pub uncertainty_factor: f64,

    /// Growth ratio used by the exponential model when no valid ratio
    /// can be measured.
    /// Default: 1.05
    pub default_growth_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            numeric_ratio_threshold: 0.7,
            iqr_multiplier: 1.5,
            histogram_bins: 5,
            top_categories: 5,
            trend_sample_size: 10,
            strong_correlation_threshold: 0.7,
            skew_threshold: 0.5,
            default_sensitivity: 2.0,
            min_std_dev: 1e-4,
            forecast_window: 12,
            season_length: 4,
            uncertainty_factor: 0.2,
            default_growth_ratio: 1.05,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let ratios = [
            ("numeric_ratio_threshold", self.numeric_ratio_threshold),
            (
                "strong_correlation_threshold",
                self.strong_correlation_threshold,
            ),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let counts = [
            ("histogram_bins", self.histogram_bins),
            ("top_categories", self.top_categories),
            ("trend_sample_size", self.trend_sample_size),
            ("forecast_window", self.forecast_window),
            ("season_length", self.season_length),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigValidationError::InvalidCount(field.to_string()));
            }
        }

        let factors = [
            ("iqr_multiplier", self.iqr_multiplier),
            ("skew_threshold", self.skew_threshold),
            ("min_std_dev", self.min_std_dev),
            ("uncertainty_factor", self.uncertainty_factor),
            ("default_growth_ratio", self.default_growth_ratio),
        ];
        for (field, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidFactor {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !self.default_sensitivity.is_finite() || self.default_sensitivity <= 0.0 {
            return Err(ConfigValidationError::InvalidSensitivity(
                self.default_sensitivity,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{0}': must be at least 1")]
    InvalidCount(String),

    #[error("Invalid factor for '{field}': {value} (must be finite and non-negative)")]
    InvalidFactor { field: String, value: f64 },

    #[error("Invalid default sensitivity: {0} (must be finite and positive)")]
    InvalidSensitivity(f64),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    numeric_ratio_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    histogram_bins: Option<usize>,
    top_categories: Option<usize>,
    trend_sample_size: Option<usize>,
    strong_correlation_threshold: Option<f64>,
    skew_threshold: Option<f64>,
    default_sensitivity: Option<f64>,
    min_std_dev: Option<f64>,
    forecast_window: Option<usize>,
    season_length: Option<usize>,
    uncertainty_factor: Option<f64>,
    default_growth_ratio: Option<f64>,
}

impl AnalysisConfigBuilder {
    /// Set the share of coercible values required for a numeric field.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn numeric_ratio_threshold(mut self, threshold: f64) -> Self {
        self.numeric_ratio_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier for outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the number of numeric histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of top categories kept.
    pub fn top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    /// Set the maximum trend sample size.
    pub fn trend_sample_size(mut self, n: usize) -> Self {
        self.trend_sample_size = Some(n);
        self
    }

    /// Set the absolute correlation that counts as strong.
    pub fn strong_correlation_threshold(mut self, threshold: f64) -> Self {
        self.strong_correlation_threshold = Some(threshold);
        self
    }

    /// Set the skew threshold in standard deviations.
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Set the default anomaly sensitivity.
    pub fn default_sensitivity(mut self, sensitivity: f64) -> Self {
        self.default_sensitivity = Some(sensitivity);
        self
    }

    /// Set the standard deviation below which data counts as constant.
    pub fn min_std_dev(mut self, min: f64) -> Self {
        self.min_std_dev = Some(min);
        self
    }

    /// Set the number of trailing values used as forecast history.
    pub fn forecast_window(mut self, window: usize) -> Self {
        self.forecast_window = Some(window);
        self
    }

    /// Set the season length for the seasonal model.
    pub fn season_length(mut self, length: usize) -> Self {
        self.season_length = Some(length);
        self
    }

    /// Set the relative width of forecast uncertainty bands.
    pub fn uncertainty_factor(mut self, factor: f64) -> Self {
        self.uncertainty_factor = Some(factor);
        self
    }

    /// Set the fallback growth ratio for the exponential model.
    pub fn default_growth_ratio(mut self, ratio: f64) -> Self {
        self.default_growth_ratio = Some(ratio);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            numeric_ratio_threshold: self
                .numeric_ratio_threshold
                .unwrap_or(defaults.numeric_ratio_threshold),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            trend_sample_size: self.trend_sample_size.unwrap_or(defaults.trend_sample_size),
            strong_correlation_threshold: self
                .strong_correlation_threshold
                .unwrap_or(defaults.strong_correlation_threshold),
            skew_threshold: self.skew_threshold.unwrap_or(defaults.skew_threshold),
            default_sensitivity: self
                .default_sensitivity
                .unwrap_or(defaults.default_sensitivity),
            min_std_dev: self.min_std_dev.unwrap_or(defaults.min_std_dev),
            forecast_window: self.forecast_window.unwrap_or(defaults.forecast_window),
            season_length: self.season_length.unwrap_or(defaults.season_length),
            uncertainty_factor: self
                .uncertainty_factor
                .unwrap_or(defaults.uncertainty_factor),
            default_growth_ratio: self
                .default_growth_ratio
                .unwrap_or(defaults.default_growth_ratio),
        };

        config.validate()?;
        Ok(config)
    }
}
