//! Variables control charts: X-bar-R and X-bar-S.
//!
//! Both charts track the subgroup mean on the primary chart and the
//! within-subgroup spread on the secondary chart. They are computed once
//! from a complete, validated set of subgroups and are read-only afterwards.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 6: Control Charts for Variables.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::chart::{ChartSeries, ControlChart, VariablesChart};
use super::constants::{ChartConstants, ConstantTable};
use super::subgroup::Subgroup;
use crate::error::{Result, SpcError};

/// Which pair of charts to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartFamily {
    /// X-bar chart with a Range chart.
    #[default]
    MeanRange,
    /// X-bar chart with a Standard Deviation chart.
    MeanStdDev,
}

// ---------------------------------------------------------------------------
// X-bar-R Chart
// ---------------------------------------------------------------------------

/// X-bar and Range (X-bar-R) control chart.
///
/// # Algorithm
///
/// 1. For each subgroup, compute the mean (X-bar) and range (R = max - min).
/// 2. Compute the grand mean (X-double-bar) and average range (R-bar).
/// 3. X-bar chart: CL = X-double-bar, UCL/LCL = CL +/- A2 * R-bar.
/// 4. R chart: CL = R-bar, UCL = D4 * R-bar, LCL = D3 * R-bar.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{group_measurements, ConstantTable, Measurement, VariablesChart, XBarRChart};
///
/// let data: Vec<Measurement> = [
///     ("a", 25.0), ("a", 26.0), ("a", 24.5),
///     ("b", 25.2), ("b", 24.8), ("b", 25.1),
/// ]
/// .iter()
/// .map(|&(id, value)| Measurement { value, subgroup_id: id.into() })
/// .collect();
///
/// let subgroups = group_measurements(&data).unwrap();
/// let chart = XBarRChart::compute(&subgroups, ConstantTable::standard()).unwrap();
/// assert!(chart.primary().ucl > chart.primary().center_line);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct XBarRChart {
    constants: ChartConstants,
    xbar: ControlChart,
    range: ControlChart,
    series: ChartSeries,
}

impl XBarRChart {
    /// Compute the chart pair from validated subgroups.
    ///
    /// # Errors
    ///
    /// - [`SpcError::NoMeasurements`] if `subgroups` is empty
    /// - [`SpcError::ConstantsNotFound`] if the subgroup size is not tabulated
    pub fn compute(subgroups: &[Subgroup], table: &ConstantTable) -> Result<Self> {
        let constants = constants_for(subgroups, table)?;

        let means = subgroup_means(subgroups)?;
        let ranges = subgroups
            .iter()
            .map(|s| subgroup_range(s.values()))
            .collect::<Result<Vec<_>>>()?;

        let grand_mean = stats::mean(&means).ok_or(SpcError::NoMeasurements)?;
        let r_bar = stats::mean(&ranges).ok_or(SpcError::NoMeasurements)?;

        let xbar = ControlChart::from_limits(
            grand_mean,
            grand_mean + constants.a2 * r_bar,
            grand_mean - constants.a2 * r_bar,
        );
        let range = ControlChart::from_limits(r_bar, constants.d4 * r_bar, constants.d3 * r_bar);

        Ok(Self {
            constants,
            xbar,
            range,
            series: build_series(subgroups, means, ranges),
        })
    }

    pub fn constants(&self) -> &ChartConstants {
        &self.constants
    }
}

impl VariablesChart for XBarRChart {
    fn primary(&self) -> &ControlChart {
        &self.xbar
    }

    fn secondary(&self) -> &ControlChart {
        &self.range
    }

    fn series(&self) -> &ChartSeries {
        &self.series
    }

    /// sigma-hat = R-bar / d2.
    fn within_sigma(&self) -> f64 {
        self.range.center_line / self.constants.d2
    }
}

// ---------------------------------------------------------------------------
// X-bar-S Chart
// ---------------------------------------------------------------------------

/// X-bar and Standard Deviation (X-bar-S) control chart.
///
/// Preferred over X-bar-R for larger subgroups, where the range wastes
/// information.
///
/// # Algorithm
///
/// 1. For each subgroup, compute the mean and sample standard deviation
///    (divisor n - 1).
/// 2. Compute the grand mean and average standard deviation (S-bar).
/// 3. X-bar chart: CL = X-double-bar, UCL/LCL = CL +/- A3 * S-bar.
/// 4. S chart: CL = S-bar, UCL = B4 * S-bar, LCL = B3 * S-bar.
#[derive(Debug, Clone, PartialEq)]
pub struct XBarSChart {
    constants: ChartConstants,
    xbar: ControlChart,
    stddev: ControlChart,
    series: ChartSeries,
}

impl XBarSChart {
    /// Compute the chart pair from validated subgroups.
    ///
    /// # Errors
    ///
    /// Same as [`XBarRChart::compute`].
    pub fn compute(subgroups: &[Subgroup], table: &ConstantTable) -> Result<Self> {
        let constants = constants_for(subgroups, table)?;

        let means = subgroup_means(subgroups)?;
        let std_devs = subgroups
            .iter()
            .map(|s| stats::std_dev(s.values()).ok_or(SpcError::UnsupportedSubgroupSize(s.len())))
            .collect::<Result<Vec<_>>>()?;

        let grand_mean = stats::mean(&means).ok_or(SpcError::NoMeasurements)?;
        let s_bar = stats::mean(&std_devs).ok_or(SpcError::NoMeasurements)?;

        let xbar = ControlChart::from_limits(
            grand_mean,
            grand_mean + constants.a3 * s_bar,
            grand_mean - constants.a3 * s_bar,
        );
        let stddev = ControlChart::from_limits(s_bar, constants.b4 * s_bar, constants.b3 * s_bar);

        Ok(Self {
            constants,
            xbar,
            stddev,
            series: build_series(subgroups, means, std_devs),
        })
    }

    pub fn constants(&self) -> &ChartConstants {
        &self.constants
    }
}

impl VariablesChart for XBarSChart {
    fn primary(&self) -> &ControlChart {
        &self.xbar
    }

    fn secondary(&self) -> &ControlChart {
        &self.stddev
    }

    fn series(&self) -> &ChartSeries {
        &self.series
    }

    /// sigma-hat = S-bar / c4.
    fn within_sigma(&self) -> f64 {
        self.stddev.center_line / self.constants.c4
    }
}

// ---------------------------------------------------------------------------
// Family dispatch
// ---------------------------------------------------------------------------

/// A computed chart pair of either family.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSet {
    MeanRange(XBarRChart),
    MeanStdDev(XBarSChart),
}

impl ChartSet {
    /// Compute the chart pair selected by `family`.
    pub fn compute(
        family: ChartFamily,
        subgroups: &[Subgroup],
        table: &ConstantTable,
    ) -> Result<Self> {
        match family {
            ChartFamily::MeanRange => XBarRChart::compute(subgroups, table).map(Self::MeanRange),
            ChartFamily::MeanStdDev => XBarSChart::compute(subgroups, table).map(Self::MeanStdDev),
        }
    }

    pub fn family(&self) -> ChartFamily {
        match self {
            Self::MeanRange(_) => ChartFamily::MeanRange,
            Self::MeanStdDev(_) => ChartFamily::MeanStdDev,
        }
    }

    /// Control chart factors used for the subgroup size.
    pub fn constants(&self) -> &ChartConstants {
        match self {
            Self::MeanRange(c) => c.constants(),
            Self::MeanStdDev(c) => c.constants(),
        }
    }

    fn inner(&self) -> &dyn VariablesChart {
        match self {
            Self::MeanRange(c) => c,
            Self::MeanStdDev(c) => c,
        }
    }
}

impl VariablesChart for ChartSet {
    fn primary(&self) -> &ControlChart {
        self.inner().primary()
    }

    fn secondary(&self) -> &ControlChart {
        self.inner().secondary()
    }

    fn series(&self) -> &ChartSeries {
        self.inner().series()
    }

    fn within_sigma(&self) -> f64 {
        self.inner().within_sigma()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn constants_for(subgroups: &[Subgroup], table: &ConstantTable) -> Result<ChartConstants> {
    let first = subgroups.first().ok_or(SpcError::NoMeasurements)?;
    table.lookup(first.len())
}

fn subgroup_means(subgroups: &[Subgroup]) -> Result<Vec<f64>> {
    subgroups
        .iter()
        .map(|s| stats::mean(s.values()).ok_or(SpcError::NoMeasurements))
        .collect()
}

/// Range (max - min) of a subgroup.
fn subgroup_range(values: &[f64]) -> Result<f64> {
    let max_val = stats::max(values).ok_or(SpcError::NoMeasurements)?;
    let min_val = stats::min(values).ok_or(SpcError::NoMeasurements)?;
    Ok(max_val - min_val)
}

fn build_series(subgroups: &[Subgroup], means: Vec<f64>, spreads: Vec<f64>) -> ChartSeries {
    ChartSeries {
        means,
        spreads,
        subgroup_indices: subgroups.iter().map(Subgroup::index).collect(),
        subgroup_ids: subgroups.iter().map(|s| s.id().to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
