//! # u-spc
//!
//! Statistical process control (SPC) engine: subgroup control charts,
//! run-rule pattern detection, and process capability analysis.
//!
//! Given time-ordered measurements grouped into fixed-size subgroups, the
//! [`Engine`] computes X̄-R or X̄-S control limits, scans both charts with
//! the Western Electric rules, classifies stability, evaluates capability
//! against specification limits, and derives prioritized insights.
//!
//! ## Modules
//!
//! - [`spc`]: constant table, subgroup aggregation, X̄-R / X̄-S charts, run rules
//! - [`capability`]: capability indices (Cp, Cpk, Pp, Ppk, Cpm) and defect rate
//! - [`performance`]: descriptive statistics over all raw measurements
//! - [`stability`]: overall stability classification
//! - [`insight`]: prioritized human-readable findings
//! - [`engine`]: the pipeline tying everything together
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: identical input yields byte-identical output
//! - **Numerical stability**: leverages `u-numflow` for stable statistics
//! - **Research-backed**: all algorithms reference academic literature

pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod insight;
pub mod performance;
pub mod spc;
pub mod stability;

pub use config::{EngineConfig, InsightThresholds};
pub use engine::{AnalysisReport, AnalysisRequest, Engine};
pub use error::{Result, SpcError};
