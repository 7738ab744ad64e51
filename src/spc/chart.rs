//! Core control chart types and trait.
//!
//! Defines the building blocks shared by both subgroup chart families:
//! the computed [`ControlChart`] (center line, limits, sigma zones), the
//! per-subgroup [`ChartSeries`], run-rule [`Violation`] records, and the
//! [`VariablesChart`] trait implemented by X-bar-R and X-bar-S charts.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::{Deserialize, Serialize};

/// A symmetric band `[lower, upper]` around the center line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SigmaBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Center line, control limits and sigma zones for one chart.
///
/// `sigma` is the zone width `(UCL - CL) / 3`. The one- and two-sigma
/// bounds are always symmetric around the center line, even for a spread
/// chart whose LCL is not.
///
/// # Invariants
///
/// - `lcl <= center_line <= ucl`
/// - `sigma >= 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlChart {
    /// Center line (grand mean, R-bar or S-bar).
    pub center_line: f64,
    /// Upper control limit.
    pub ucl: f64,
    /// Lower control limit.
    pub lcl: f64,
    /// Zone width used by the run rules.
    pub sigma: f64,
    /// `CL ± sigma`.
    pub one_sigma_bounds: SigmaBounds,
    /// `CL ± 2 sigma`.
    pub two_sigma_bounds: SigmaBounds,
}

impl ControlChart {
    /// Build a chart from its center line and limits, deriving the zones.
    pub fn from_limits(center_line: f64, ucl: f64, lcl: f64) -> Self {
        let sigma = (ucl - center_line) / 3.0;
        Self {
            center_line,
            ucl,
            lcl,
            sigma,
            one_sigma_bounds: SigmaBounds {
                lower: center_line - sigma,
                upper: center_line + sigma,
            },
            two_sigma_bounds: SigmaBounds {
                lower: center_line - 2.0 * sigma,
                upper: center_line + 2.0 * sigma,
            },
        }
    }

    /// Whether `value` lies strictly outside `[lcl, ucl]`.
    pub fn is_beyond_limits(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

/// Per-subgroup statistics in time order.
///
/// All vectors have one entry per subgroup; `subgroup_indices` are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Subgroup means (primary chart values).
    pub means: Vec<f64>,
    /// Subgroup ranges or standard deviations (secondary chart values).
    pub spreads: Vec<f64>,
    pub subgroup_indices: Vec<usize>,
    pub subgroup_ids: Vec<String>,
}

/// How urgently a violation needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// The canonical out-of-control patterns.
///
/// These are the first five of Nelson's tests for special causes.
///
/// # Reference
///
/// Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
/// *Journal of Quality Technology* 16(4), pp. 237-239.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationType {
    /// A point strictly outside the control limits.
    BeyondLimits,
    /// 9 or more consecutive points strictly on one side of the center line.
    ///
    /// Indicates a sustained shift in the process level.
    NineOneSide,
    /// 6 or more consecutive points strictly increasing or decreasing.
    SixTrend,
    /// 14 or more consecutive points alternating up and down.
    ///
    /// Typical of two alternating streams (e.g. two machines or shifts).
    FourteenAlternating,
    /// 2 of 3 consecutive points beyond the 2-sigma bound on the same side.
    TwoOfThreeBeyond2Sigma,
}

impl ViolationType {
    /// Rule number (1..=5) in the canonical rule set.
    pub fn rule_number(self) -> u8 {
        match self {
            Self::BeyondLimits => 1,
            Self::NineOneSide => 2,
            Self::SixTrend => 3,
            Self::FourteenAlternating => 4,
            Self::TwoOfThreeBeyond2Sigma => 5,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::BeyondLimits => Severity::Critical,
            Self::NineOneSide | Self::SixTrend | Self::TwoOfThreeBeyond2Sigma => {
                Severity::Warning
            }
            Self::FourteenAlternating => Severity::Info,
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::BeyondLimits => "point beyond control limits",
            Self::NineOneSide => "9 points in a row on one side of the center line",
            Self::SixTrend => "6 points in a row steadily increasing or decreasing",
            Self::FourteenAlternating => "14 points in a row alternating up and down",
            Self::TwoOfThreeBeyond2Sigma => "2 of 3 points beyond 2 sigma on the same side",
        }
    }
}

/// A rule violation detected on one chart.
///
/// Window-based rules attribute the violation to the last point of the
/// qualifying window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// 1-based subgroup index.
    pub subgroup_index: usize,
    /// Chart value at that subgroup.
    pub value: f64,
    pub rule: ViolationType,
    pub rule_id: u8,
    pub severity: Severity,
    pub description: &'static str,
}

impl Violation {
    pub fn new(subgroup_index: usize, value: f64, rule: ViolationType) -> Self {
        Self {
            subgroup_index,
            value,
            rule,
            rule_id: rule.rule_number(),
            severity: rule.severity(),
            description: rule.description(),
        }
    }
}

/// Shared interface of the subgroup chart families.
///
/// Implementors are computed once from a complete set of subgroups and are
/// read-only afterwards.
pub trait VariablesChart {
    /// The location (X-bar) chart.
    fn primary(&self) -> &ControlChart;

    /// The spread (R or S) chart.
    fn secondary(&self) -> &ControlChart;

    /// Per-subgroup means and spreads in time order.
    fn series(&self) -> &ChartSeries;

    /// Within-subgroup sigma estimate (R-bar/d2 or S-bar/c4).
    fn within_sigma(&self) -> f64;
}
