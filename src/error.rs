//! Structured error types for the SPC engine.
//!
//! Every variant is a structural input error: it is detected before any
//! chart arithmetic runs and aborts the whole analysis. Numeric degeneracies
//! (zero variance, missing specification limits) are not errors; they surface
//! as [`Capability::Unavailable`](crate::capability::Capability::Unavailable).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SpcError>;

/// Errors surfaced to the caller of an analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpcError {
    /// The input contained no rows at all.
    #[error("no measurements supplied")]
    NoMeasurements,

    /// A row lacks the measurement or subgroup field (or holds `null`).
    #[error("row {row}: missing field `{field}`")]
    MissingField { row: usize, field: String },

    /// The measurement field is present but not a finite number.
    #[error("row {row}: field `{field}` is not a finite number: {reason}")]
    InvalidMeasurement {
        row: usize,
        field: String,
        reason: String,
    },

    /// The subgroup field holds a value that cannot identify a subgroup.
    #[error("row {row}: field `{field}` must be a string, number or boolean")]
    InvalidSubgroupId { row: usize, field: String },

    /// Subgroups do not all share the same cardinality.
    #[error("subgroup `{subgroup}` has {actual} measurements, expected {expected}")]
    SizeMismatch {
        subgroup: String,
        expected: usize,
        actual: usize,
    },

    /// Subgroup size outside the supported range `2..=25`.
    #[error("subgroup size {0} is not supported (must be 2..=25)")]
    UnsupportedSubgroupSize(usize),

    /// No control-chart constants exist for this subgroup size.
    #[error("no control chart constants for subgroup size {0}")]
    ConstantsNotFound(usize),

    /// Specification limits are non-finite or not ordered `usl > lsl`.
    #[error("invalid specification limits: {0}")]
    InvalidSpecLimits(String),
}

impl SpcError {
    pub fn missing_field(row: usize, field: &str) -> Self {
        Self::MissingField {
            row,
            field: field.to_string(),
        }
    }

    pub fn invalid_measurement(row: usize, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidMeasurement {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoMeasurements => "NoMeasurements",
            Self::MissingField { .. } => "MissingField",
            Self::InvalidMeasurement { .. } => "InvalidMeasurement",
            Self::InvalidSubgroupId { .. } => "InvalidSubgroupId",
            Self::SizeMismatch { .. } => "SizeMismatch",
            Self::UnsupportedSubgroupSize(_) => "UnsupportedSubgroupSize",
            Self::ConstantsNotFound(_) => "ConstantsNotFound",
            Self::InvalidSpecLimits(_) => "InvalidSpecLimits",
        }
    }
}
