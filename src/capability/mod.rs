//! Process capability analysis.
//!
//! Computes standard capability indices for assessing how well a process
//! meets specification limits, plus the defect rate implied by a normal
//! model of the measurements.
//!
//! # Indices
//!
//! - **Cp**: potential capability (spread vs tolerance)
//! - **Cpk**: actual capability (centering considered)
//! - **Pp**, **Ppk**: reported equal to Cp and Cpk
//! - **Cpm**: Taguchi capability (deviation from the specification midpoint)
//!
//! # Defect Rate
//!
//! - [`upper_tail_ppm`], [`lower_tail_ppm`]: PPM beyond each limit
//! - [`sigma_quality_level`]: PPM to sigma level with the 1.5-sigma shift
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod defect_rate;
mod indices;

pub use defect_rate::{lower_tail_ppm, sigma_quality_level, upper_tail_ppm, yield_percent};
pub use indices::{Capability, CapabilityResult, SpecLimits, UnavailableReason};
