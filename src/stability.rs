//! Overall stability classification from run-rule violations.

use serde::Serialize;

use crate::spc::{Severity, Violation};

/// Process stability, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stability {
    /// No violations.
    Stable,
    /// Only informational violations.
    Monitor,
    /// At least one warning, no critical violation.
    Warning,
    /// At least one point beyond the control limits.
    Unstable,
}

impl Stability {
    pub fn message(self) -> &'static str {
        match self {
            Self::Stable => "Process is in statistical control",
            Self::Monitor => "Process shows minor patterns worth monitoring",
            Self::Warning => "Process shows signs of special-cause variation",
            Self::Unstable => "Process is out of statistical control",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Stable => "green",
            Self::Monitor => "blue",
            Self::Warning => "orange",
            Self::Unstable => "red",
        }
    }
}

/// Violation counts by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViolationCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

impl ViolationCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
        self.total += 1;
    }
}

/// Stability classification with its display message and color tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityStatus {
    pub status: Stability,
    pub message: &'static str,
    pub color: &'static str,
    pub counts: ViolationCounts,
}

impl StabilityStatus {
    /// Classify from every violation of both charts.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::spc::Violation;
    /// use u_spc::stability::{Stability, StabilityStatus};
    ///
    /// let none: Vec<Violation> = Vec::new();
    /// let status = StabilityStatus::assess(&none);
    /// assert_eq!(status.status, Stability::Stable);
    /// assert_eq!(status.color, "green");
    /// ```
    pub fn assess<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut counts = ViolationCounts::default();
        for v in violations {
            counts.add(v.severity);
        }

        let status = if counts.critical > 0 {
            Stability::Unstable
        } else if counts.warning > 0 {
            Stability::Warning
        } else if counts.info > 0 {
            Stability::Monitor
        } else {
            Stability::Stable
        };

        Self {
            status,
            message: status.message(),
            color: status.color(),
            counts,
        }
    }
}
