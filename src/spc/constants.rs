//! Control chart factor table for subgroup sizes n = 2..=25.
//!
//! The factors are unbiasing constants derived from the distribution of the
//! range and of the sample standard deviation of `n` normal observations.
//! They are tabulated once and never recomputed at runtime.
//!
//! # References
//!
//! - ASTM E2587 — Standard Practice for Use of Control Charts in Statistical
//!   Process Control, Table 1.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//!   8th ed., Appendix Table VI.

use serde::Serialize;

use crate::error::{Result, SpcError};

/// Smallest subgroup size with tabulated constants.
pub const MIN_SUBGROUP_SIZE: usize = 2;
/// Largest subgroup size with tabulated constants.
pub const MAX_SUBGROUP_SIZE: usize = 25;

/// Control chart constants for one subgroup size.
///
/// | Factor | Used for |
/// |--------|----------|
/// | A2 | X-bar limits from R-bar |
/// | A3 | X-bar limits from S-bar |
/// | d2 | sigma-hat = R-bar / d2 |
/// | D3, D4 | R chart LCL / UCL |
/// | c4 | sigma-hat = S-bar / c4 |
/// | B3, B4 | S chart LCL / UCL |
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartConstants {
    pub n: usize,
    pub a2: f64,
    pub a3: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub c4: f64,
    pub b3: f64,
    pub b4: f64,
}

const fn row(
    n: usize,
    a2: f64,
    a3: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    c4: f64,
    b3: f64,
    b4: f64,
) -> ChartConstants {
    ChartConstants {
        n,
        a2,
        a3,
        d2,
        d3,
        d4,
        c4,
        b3,
        b4,
    }
}

/// Immutable lookup table from subgroup size to [`ChartConstants`].
///
/// Use [`ConstantTable::standard`] for the process-wide ASTM table and pass
/// it by reference to whatever needs it.
#[derive(Debug)]
pub struct ConstantTable {
    rows: &'static [ChartConstants],
}

//                     n   A2     A3     d2     D3     D4     c4      B3     B4
static STANDARD_ROWS: [ChartConstants; 24] = [
    row(2, 1.880, 2.659, 1.128, 0.000, 3.267, 0.7979, 0.000, 3.267),
    row(3, 1.023, 1.954, 1.693, 0.000, 2.574, 0.8862, 0.000, 2.568),
    row(4, 0.729, 1.628, 2.059, 0.000, 2.282, 0.9213, 0.000, 2.266),
    row(5, 0.577, 1.427, 2.326, 0.000, 2.114, 0.9400, 0.000, 2.089),
    row(6, 0.483, 1.287, 2.534, 0.000, 2.004, 0.9515, 0.030, 1.970),
    row(7, 0.419, 1.182, 2.704, 0.076, 1.924, 0.9594, 0.118, 1.882),
    row(8, 0.373, 1.099, 2.847, 0.136, 1.864, 0.9650, 0.185, 1.815),
    row(9, 0.337, 1.032, 2.970, 0.184, 1.816, 0.9693, 0.239, 1.761),
    row(10, 0.308, 0.975, 3.078, 0.223, 1.777, 0.9727, 0.284, 1.716),
    row(11, 0.285, 0.927, 3.173, 0.256, 1.744, 0.9754, 0.321, 1.679),
    row(12, 0.266, 0.886, 3.258, 0.283, 1.717, 0.9776, 0.354, 1.646),
    row(13, 0.249, 0.850, 3.336, 0.307, 1.693, 0.9794, 0.382, 1.618),
    row(14, 0.235, 0.817, 3.407, 0.328, 1.672, 0.9810, 0.406, 1.594),
    row(15, 0.223, 0.789, 3.472, 0.347, 1.653, 0.9823, 0.428, 1.572),
    row(16, 0.212, 0.763, 3.532, 0.363, 1.637, 0.9835, 0.448, 1.552),
    row(17, 0.203, 0.739, 3.588, 0.378, 1.622, 0.9845, 0.466, 1.534),
    row(18, 0.194, 0.718, 3.640, 0.391, 1.608, 0.9854, 0.482, 1.518),
    row(19, 0.187, 0.698, 3.689, 0.403, 1.597, 0.9862, 0.497, 1.503),
    row(20, 0.180, 0.680, 3.735, 0.415, 1.585, 0.9869, 0.510, 1.490),
    row(21, 0.173, 0.663, 3.778, 0.425, 1.575, 0.9876, 0.523, 1.477),
    row(22, 0.167, 0.647, 3.819, 0.434, 1.566, 0.9882, 0.534, 1.466),
    row(23, 0.162, 0.633, 3.858, 0.443, 1.557, 0.9887, 0.545, 1.455),
    row(24, 0.157, 0.619, 3.895, 0.451, 1.548, 0.9892, 0.555, 1.445),
    row(25, 0.153, 0.606, 3.931, 0.459, 1.541, 0.9896, 0.565, 1.435),
];

static STANDARD: ConstantTable = ConstantTable {
    rows: &STANDARD_ROWS,
};

impl ConstantTable {
    /// The standard ASTM E2587 table (n = 2..=25).
    pub fn standard() -> &'static ConstantTable {
        &STANDARD
    }

    /// Look up the constants for subgroup size `n`.
    ///
    /// # Errors
    ///
    /// [`SpcError::ConstantsNotFound`] if `n` is not tabulated.
    pub fn lookup(&self, n: usize) -> Result<ChartConstants> {
        self.rows
            .iter()
            .find(|c| c.n == n)
            .copied()
            .ok_or(SpcError::ConstantsNotFound(n))
    }

    /// All tabulated rows, ordered by `n`.
    pub fn rows(&self) -> &[ChartConstants] {
        self.rows
    }
}
