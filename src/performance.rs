//! Descriptive statistics over every raw measurement of a run.

use serde::Serialize;
use u_numflow::stats;

/// Location and dispersion of all raw measurements, ignoring subgrouping.
///
/// `std_dev` uses the n - 1 divisor, the same estimate the capability
/// indices use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// `100 * std_dev / |mean|`, absent when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
}

impl PerformanceSummary {
    /// Summarize `data`.
    ///
    /// Returns `None` if `data` has fewer than two values or contains
    /// NaN/Inf.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::performance::PerformanceSummary;
    ///
    /// let p = PerformanceSummary::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(p.count, 8);
    /// assert!((p.mean - 5.0).abs() < 1e-12);
    /// assert!((p.range - 7.0).abs() < 1e-12);
    /// ```
    pub fn compute(data: &[f64]) -> Option<Self> {
        let mean = stats::mean(data)?;
        let std_dev = stats::std_dev(data)?;
        let median = stats::median(data)?;
        let min = stats::min(data)?;
        let max = stats::max(data)?;

        let coefficient_of_variation = if mean == 0.0 {
            None
        } else {
            Some(100.0 * std_dev / mean.abs())
        };

        Some(Self {
            count: data.len(),
            mean,
            median,
            std_dev,
            min,
            max,
            range: max - min,
            coefficient_of_variation,
        })
    }
}
