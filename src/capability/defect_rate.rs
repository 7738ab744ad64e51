//! Defect-rate estimates under a normality assumption.
//!
//! Converts distances to the specification limits (in standard deviations)
//! into parts-per-million (PPM) nonconforming, and PPM into the Motorola
//! sigma quality level.
//!
//! # Convention
//!
//! The sigma quality level assumes a 1.5-sigma long-term drift of the
//! process mean:
//!
//! | Sigma | PPM (defects per million) |
//! |-------|--------------------------|
//! | 6.0   | 3.4                      |
//! | 5.0   | 233                      |
//! | 4.0   | 6,210                    |
//! | 3.0   | 66,807                   |
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Section 8.3.
//! - Harry & Schroeder (2000), *Six Sigma: The Breakthrough Management
//!   Strategy Revolutionizing the World's Top Corporations*.

use u_numflow::special::{inverse_normal_cdf, standard_normal_cdf};

const PPM: f64 = 1_000_000.0;
const LONG_TERM_SHIFT: f64 = 1.5;

/// PPM above the upper specification limit, `(1 - Phi(z_upper)) * 1e6`.
///
/// Returns 0 when `z_upper <= 0`, i.e. when the mean sits at or beyond the USL.
pub fn upper_tail_ppm(z_upper: f64) -> f64 {
    if z_upper > 0.0 {
        (1.0 - standard_normal_cdf(z_upper)) * PPM
    } else {
        0.0
    }
}

/// PPM below the lower specification limit, `Phi(-z_lower) * 1e6`.
///
/// Returns 0 when `z_lower <= 0`.
pub fn lower_tail_ppm(z_lower: f64) -> f64 {
    if z_lower > 0.0 {
        standard_normal_cdf(-z_lower) * PPM
    } else {
        0.0
    }
}

/// Expected conforming percentage for a total PPM.
pub fn yield_percent(ppm_total: f64) -> f64 {
    100.0 - ppm_total / 10_000.0
}

/// Sigma quality level implied by a PPM defect rate.
///
/// ```text
/// sigma = Phi_inv(1 - PPM / 1,000,000) + 1.5
/// ```
///
/// # Returns
///
/// `None` if `ppm` is outside `(0, 1_000_000)` or NaN.
///
/// # Examples
///
/// ```
/// use u_spc::capability::sigma_quality_level;
///
/// let sigma = sigma_quality_level(3.4).unwrap();
/// assert!((sigma - 6.0).abs() < 0.1);
/// assert!(sigma_quality_level(0.0).is_none());
/// ```
pub fn sigma_quality_level(ppm: f64) -> Option<f64> {
    if ppm.is_nan() || ppm <= 0.0 || ppm >= PPM {
        return None;
    }
    let z = inverse_normal_cdf(1.0 - ppm / PPM);
    z.is_finite().then_some(z + LONG_TERM_SHIFT)
}
