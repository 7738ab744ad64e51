//! Engine configuration with sane defaults.
//!
//! Every field defaults to the documented threshold; a partial JSON document
//! only overrides the fields it names.

use serde::{Deserialize, Serialize};

/// Tunable settings for one [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Thresholds used by the insight generator.
    pub insights: InsightThresholds,
}

/// Fixed thresholds that map analysis results to insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightThresholds {
    /// Cpk at or above this is "Excellent Capability".
    pub excellent_cpk: f64,
    /// Cpk at or above this (and below excellent) is "Process Capable".
    pub capable_cpk: f64,
    /// Cpk at or above this (and below capable) is "Marginally Capable".
    pub marginal_cpk: f64,
    /// `|offset|` above `ratio * stdDev` is "Process Off-Center".
    pub off_center_ratio: f64,
    /// Total PPM above this is "High Defect Rate".
    pub defect_ppm_limit: f64,
    /// Coefficient of variation (percent) above this is "High Process Variation".
    pub variation_cv_percent: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            excellent_cpk: 2.0,
            capable_cpk: 1.33,
            marginal_cpk: 1.0,
            off_center_ratio: 0.5,
            defect_ppm_limit: 1000.0,
            variation_cv_percent: 10.0,
        }
    }
}
