//! Outlier and anomaly detection.
//!
//! - [`outliers`]: IQR fences, used for the dataset-level outlier count.
//! - [`anomaly`]: Z-score scoring of one field with adjustable sensitivity.

pub mod anomaly;
pub mod outliers;

pub use anomaly::{detect_anomalies, zscore_distribution};
pub use outliers::{IqrBounds, OutlierDetector, count_outliers};
