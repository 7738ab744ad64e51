//! Run rules for detecting non-random patterns in control charts.
//!
//! Implements the canonical five-rule set (Nelson tests 1-5, which include
//! the classic Western Electric zone and run tests) over one chart's ordered
//! series.
//!
//! Every rule reports every qualifying window, attributed to the last point
//! of the window. A sustained pattern therefore produces one violation per
//! additional point that extends it. Sequences shorter than a rule's window
//! yield no violations for that rule; scanning never fails.
//!
//! # References
//!
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use super::chart::{ControlChart, Violation, ViolationType};

/// Points needed on one side of the center line.
const RUN_ONE_SIDE: usize = 9;
/// Points needed in a strictly monotonic run.
const RUN_TREND: usize = 6;
/// Points needed in an alternating run.
const RUN_ALTERNATING: usize = 14;

/// Trait for applying run rules to chart data.
///
/// Run rules detect non-random patterns that indicate special causes of
/// variation even when individual points remain within control limits.
pub trait RunRule {
    /// Check `values` (index 0 is subgroup 1) against `chart`.
    ///
    /// A single subgroup may appear several times if it triggers several
    /// rules or several windows.
    fn check(&self, values: &[f64], chart: &ControlChart) -> Vec<Violation>;
}

/// The canonical five-rule set.
///
/// 1. Any point beyond the control limits (critical)
/// 2. 9 consecutive points on the same side of the center line (warning)
/// 3. 6 consecutive points steadily increasing or decreasing (warning)
/// 4. 14 consecutive points alternating up and down (info)
/// 5. 2 of 3 consecutive points beyond 2 sigma, same side (warning)
///
/// Output is grouped by rule, then by subgroup index.
#[derive(Debug, Clone, Copy, Default)]
pub struct WesternElectricRules;

impl RunRule for WesternElectricRules {
    fn check(&self, values: &[f64], chart: &ControlChart) -> Vec<Violation> {
        let mut results = Vec::new();
        results.extend(check_beyond_limits(values, chart));
        results.extend(check_one_side(values, chart));
        results.extend(check_trend(values));
        results.extend(check_alternating(values));
        results.extend(check_two_of_three(values, chart));
        results
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sign of `x`: +1, -1, or 0 for exact ties.
fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Direction of each consecutive step: +1 up, -1 down, 0 flat.
fn directions(values: &[f64]) -> Vec<i8> {
    values.windows(2).map(|w| sign(w[1] - w[0])).collect()
}

fn violation_at(values: &[f64], pos: usize, rule: ViolationType) -> Violation {
    Violation::new(pos + 1, values[pos], rule)
}

/// Rule 1: point strictly outside `[LCL, UCL]`.
fn check_beyond_limits(values: &[f64], chart: &ControlChart) -> Vec<Violation> {
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| chart.is_beyond_limits(v))
        .map(|(i, _)| violation_at(values, i, ViolationType::BeyondLimits))
        .collect()
}

/// Rule 2: 9 consecutive points strictly on one side of the center line.
///
/// A point exactly on the center line breaks the run.
fn check_one_side(values: &[f64], chart: &ControlChart) -> Vec<Violation> {
    let mut violations = Vec::new();
    if values.len() < RUN_ONE_SIDE {
        return violations;
    }

    let mut run_length = 0_usize;
    let mut prev_side = 0_i8;
    for (i, &v) in values.iter().enumerate() {
        let side = sign(v - chart.center_line);
        if side != 0 && side == prev_side {
            run_length += 1;
        } else if side != 0 {
            run_length = 1;
        } else {
            run_length = 0;
        }
        prev_side = side;
        if run_length >= RUN_ONE_SIDE {
            violations.push(violation_at(values, i, ViolationType::NineOneSide));
        }
    }
    violations
}

/// Rule 3: 6 consecutive points strictly increasing or decreasing.
fn check_trend(values: &[f64]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if values.len() < RUN_TREND {
        return violations;
    }

    let dirs = directions(values);
    let mut steps = 0_usize;
    for i in 0..dirs.len() {
        steps = match dirs[i] {
            0 => 0,
            d if i > 0 && d == dirs[i - 1] => steps + 1,
            _ => 1,
        };
        // dirs[i] is the step into values[i + 1]; 5 steps span 6 points.
        if steps >= RUN_TREND - 1 {
            violations.push(violation_at(values, i + 1, ViolationType::SixTrend));
        }
    }
    violations
}

/// Rule 4: 14 consecutive points alternating up and down.
fn check_alternating(values: &[f64]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if values.len() < RUN_ALTERNATING {
        return violations;
    }

    let dirs = directions(values);
    let mut steps = 0_usize;
    for i in 0..dirs.len() {
        steps = match dirs[i] {
            0 => 0,
            d if i > 0 && dirs[i - 1] != 0 && d == -dirs[i - 1] => steps + 1,
            _ => 1,
        };
        // 13 alternating steps span 14 points.
        if steps >= RUN_ALTERNATING - 1 {
            violations.push(violation_at(
                values,
                i + 1,
                ViolationType::FourteenAlternating,
            ));
        }
    }
    violations
}

/// Rule 5: 2 of 3 consecutive points beyond the 2-sigma bound, same side.
fn check_two_of_three(values: &[f64], chart: &ControlChart) -> Vec<Violation> {
    let mut violations = Vec::new();
    if values.len() < 3 {
        return violations;
    }

    let upper_2s = chart.two_sigma_bounds.upper;
    let lower_2s = chart.two_sigma_bounds.lower;

    for i in 2..values.len() {
        let window = &values[i - 2..=i];
        let above = window.iter().filter(|&&v| v > upper_2s).count();
        let below = window.iter().filter(|&&v| v < lower_2s).count();
        if above >= 2 || below >= 2 {
            violations.push(violation_at(
                values,
                i,
                ViolationType::TwoOfThreeBeyond2Sigma,
            ));
        }
    }
    violations
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rule1_fires_iff_outside_limits(
            values in proptest::collection::vec(10.0_f64..40.0, 0..=60)
        ) {
            let chart = ControlChart::from_limits(25.0, 31.0, 19.0);
            let flagged: Vec<usize> = check_beyond_limits(&values, &chart)
                .iter()
                .map(|v| v.subgroup_index)
                .collect();
            let expected: Vec<usize> = values
                .iter()
                .enumerate()
                .filter(|(_, &v)| v > 31.0 || v < 19.0)
                .map(|(i, _)| i + 1)
                .collect();
            prop_assert_eq!(flagged, expected);
        }

        #[test]
        fn indices_within_sequence(
            values in proptest::collection::vec(10.0_f64..40.0, 0..=60)
        ) {
            let chart = ControlChart::from_limits(25.0, 31.0, 19.0);
            for v in WesternElectricRules.check(&values, &chart) {
                prop_assert!(v.subgroup_index >= 1 && v.subgroup_index <= values.len());
                prop_assert!((v.value - values[v.subgroup_index - 1]).abs() < f64::EPSILON);
            }
        }

        #[test]
        fn short_sequences_skip_window_rules(
            values in proptest::collection::vec(10.0_f64..40.0, 0..=5)
        ) {
            let chart = ControlChart::from_limits(25.0, 31.0, 19.0);
            prop_assert!(check_one_side(&values, &chart).is_empty());
            prop_assert!(check_trend(&values).is_empty());
            prop_assert!(check_alternating(&values).is_empty());
        }
    }
}
