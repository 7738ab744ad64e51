//! Statistical Process Control (SPC) charts.
//!
//! Subgroup control charts for variables data, with the factor table they
//! depend on, the aggregator that builds their subgroups, and the run rules
//! that scan them.
//!
//! # Charts
//!
//! - [`XBarRChart`]: X-bar and Range chart (n = 2..=25)
//! - [`XBarSChart`]: X-bar and Standard Deviation chart (n = 2..=25)
//! - [`ChartSet`]: either of the above, selected by [`ChartFamily`]
//!
//! # Run Rules
//!
//! - [`WesternElectricRules`]: the canonical five-rule set
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.

mod chart;
mod constants;
mod rules;
mod subgroup;
mod variables;

pub use chart::{
    ChartSeries, ControlChart, Severity, SigmaBounds, VariablesChart, Violation, ViolationType,
};
pub use constants::{ChartConstants, ConstantTable, MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE};
pub use rules::{RunRule, WesternElectricRules};
pub use subgroup::{aggregate, group_measurements, measurements_from_rows, Measurement, Subgroup};
pub use variables::{ChartFamily, ChartSet, XBarRChart, XBarSChart};
