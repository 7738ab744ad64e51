//! Process capability indices (Cp, Cpk, Pp, Ppk, Cpm) with defect-rate estimates.
//!
//! All indices use the overall sample standard deviation of the raw
//! measurements (divisor n - 1). There is no short-term/long-term sigma
//! split here, so Pp == Cp and Ppk == Cpk by construction.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.
//! - Chan, Cheng & Spiring (1988), "A New Measure of Process Capability: Cpm",
//!   *Journal of Quality Technology* 20(3), pp. 162--175.

use serde::Serialize;
use u_numflow::stats;

use super::defect_rate::{lower_tail_ppm, sigma_quality_level, upper_tail_ppm, yield_percent};
use crate::error::{Result, SpcError};

/// Upper and lower specification limits.
///
/// Either limit may be absent; capability is only assessed when both are set.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{Capability, SpecLimits};
///
/// let spec = SpecLimits::new(Some(11.0), Some(9.0)).unwrap();
/// let data = [9.5, 10.0, 10.2, 9.8, 10.1, 10.3, 9.9, 10.0];
/// match spec.compute(&data) {
///     Capability::Available(c) => assert!(c.cp > 1.0),
///     Capability::Unavailable { reason } => panic!("unexpected: {reason:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpecLimits {
    usl: Option<f64>,
    lsl: Option<f64>,
}

/// Computed capability indices and defect-rate estimates.
///
/// # Index interpretation
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp | >= 1.33 | Spread fits the tolerance |
/// | Cpk | >= 1.33 | Capable and adequately centered |
/// | Cpm | >= 1.33 | Meets the Taguchi loss criterion |
///
/// Reference: Montgomery (2019), Chapter 8, Table 8.5.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResult {
    /// Cp = (USL - LSL) / 6s.
    pub cp: f64,
    /// Cpk = min(Cpu, Cpl).
    pub cpk: f64,
    /// Pp, equal to Cp here.
    pub pp: f64,
    /// Ppk, equal to Cpk here.
    pub ppk: f64,
    /// Cpu = (USL - mean) / 3s.
    pub cpu: f64,
    /// Cpl = (mean - LSL) / 3s.
    pub cpl: f64,
    /// Cpm = Cp / sqrt(1 + ((mean - target) / s)^2).
    pub cpm: f64,
    /// (USL - mean) / s.
    pub z_upper: f64,
    /// (mean - LSL) / s.
    pub z_lower: f64,
    /// min(z_upper, z_lower).
    pub sigma_level: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Midpoint of the specification, (USL + LSL) / 2.
    pub target: f64,
    /// mean - target.
    pub offset: f64,
    /// 1 - |offset| / half-tolerance. 1 is perfectly centered, 0 is on a limit.
    pub centering_index: f64,
    pub ppm_upper: f64,
    pub ppm_lower: f64,
    pub ppm_total: f64,
    pub yield_percent: f64,
    /// Sigma quality level implied by `ppm_total` (1.5-sigma shift convention).
    pub sigma_quality_level: Option<f64>,
}

/// Why capability could not be assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnavailableReason {
    /// USL or LSL was not supplied.
    MissingSpecLimits,
    /// Fewer than two finite measurements.
    InsufficientData,
    /// Every measurement is identical (s == 0).
    DegenerateVariance,
}

/// Outcome of a capability analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Capability {
    Available(CapabilityResult),
    Unavailable { reason: UnavailableReason },
}

impl Capability {
    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self::Unavailable { reason }
    }

    /// The result, if capability could be assessed.
    pub fn result(&self) -> Option<&CapabilityResult> {
        match self {
            Self::Available(r) => Some(r),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl SpecLimits {
    /// Creates a specification from optional limits.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidSpecLimits`] if:
    /// - either limit is non-finite (NaN or infinity)
    /// - both are provided and `usl <= lsl`
    pub fn new(usl: Option<f64>, lsl: Option<f64>) -> Result<Self> {
        if let Some(u) = usl {
            if !u.is_finite() {
                return Err(SpcError::InvalidSpecLimits(format!("USL must be finite, got {u}")));
            }
        }
        if let Some(l) = lsl {
            if !l.is_finite() {
                return Err(SpcError::InvalidSpecLimits(format!("LSL must be finite, got {l}")));
            }
        }
        if let (Some(u), Some(l)) = (usl, lsl) {
            if u <= l {
                return Err(SpcError::InvalidSpecLimits(format!(
                    "USL ({u}) must be greater than LSL ({l})"
                )));
            }
        }
        Ok(Self { usl, lsl })
    }

    pub fn usl(&self) -> Option<f64> {
        self.usl
    }

    pub fn lsl(&self) -> Option<f64> {
        self.lsl
    }

    /// Computes capability from all raw measurements.
    ///
    /// Returns [`Capability::Unavailable`] rather than failing when limits
    /// are missing, data is too short, or there is no variation.
    pub fn compute(&self, data: &[f64]) -> Capability {
        let (usl, lsl) = match (self.usl, self.lsl) {
            (Some(u), Some(l)) => (u, l),
            _ => return Capability::unavailable(UnavailableReason::MissingSpecLimits),
        };
        let (Some(mean), Some(std_dev)) = (stats::mean(data), stats::std_dev(data)) else {
            return Capability::unavailable(UnavailableReason::InsufficientData);
        };
        if std_dev <= 0.0 {
            return Capability::unavailable(UnavailableReason::DegenerateVariance);
        }

        Capability::Available(compute_indices(usl, lsl, mean, std_dev))
    }
}

/// Internal computation of all indices given mean and sigma.
fn compute_indices(usl: f64, lsl: f64, mean: f64, std_dev: f64) -> CapabilityResult {
    let tolerance = usl - lsl;
    let cp = tolerance / (6.0 * std_dev);
    let cpu = (usl - mean) / (3.0 * std_dev);
    let cpl = (mean - lsl) / (3.0 * std_dev);
    let cpk = cpu.min(cpl);

    let z_upper = (usl - mean) / std_dev;
    let z_lower = (mean - lsl) / std_dev;

    let target = (usl + lsl) / 2.0;
    let offset = mean - target;
    let centering_index = 1.0 - offset.abs() / (tolerance / 2.0);

    // Taguchi index against the specification midpoint
    let deviation_ratio = offset / std_dev;
    let cpm = cp / (1.0 + deviation_ratio * deviation_ratio).sqrt();

    let ppm_upper = upper_tail_ppm(z_upper);
    let ppm_lower = lower_tail_ppm(z_lower);
    let ppm_total = ppm_upper + ppm_lower;

    CapabilityResult {
        cp,
        cpk,
        pp: cp,
        ppk: cpk,
        cpu,
        cpl,
        cpm,
        z_upper,
        z_lower,
        sigma_level: z_upper.min(z_lower),
        mean,
        std_dev,
        target,
        offset,
        centering_index,
        ppm_upper,
        ppm_lower,
        ppm_total,
        yield_percent: yield_percent(ppm_total),
        sigma_quality_level: sigma_quality_level(ppm_total),
    }
}
