//! Human-readable findings derived from a completed analysis.
//!
//! The mapping is deterministic: the same results and thresholds always
//! produce the same insights in the same order.

use serde::Serialize;

use crate::capability::Capability;
use crate::config::InsightThresholds;
use crate::performance::PerformanceSummary;
use crate::stability::{Stability, StabilityStatus};

/// Topic of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightKind {
    Stability,
    Capability,
    Centering,
    DefectRate,
    Variation,
}

/// Urgency, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, message: String, priority: Priority) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
            priority,
        }
    }
}

/// Generate insights ordered by priority, most urgent first.
///
/// Insights of equal priority keep their generation order: stability,
/// capability, centering, defect rate, variation.
pub fn generate(
    stability: &StabilityStatus,
    capability: &Capability,
    performance: Option<&PerformanceSummary>,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let mut insights = vec![stability_insight(stability)];

    match capability {
        Capability::Available(c) => {
            insights.push(capability_insight(c.cpk, thresholds));

            if c.offset.abs() > thresholds.off_center_ratio * c.std_dev {
                insights.push(Insight::new(
                    InsightKind::Centering,
                    "Process Off-Center",
                    format!(
                        "Mean {:.4} is {:.4} from the specification midpoint {:.4}",
                        c.mean, c.offset, c.target
                    ),
                    Priority::Medium,
                ));
            }

            if c.ppm_total > thresholds.defect_ppm_limit {
                insights.push(Insight::new(
                    InsightKind::DefectRate,
                    "High Defect Rate",
                    format!(
                        "Estimated {:.1} PPM out of specification ({:.3}% yield)",
                        c.ppm_total, c.yield_percent
                    ),
                    Priority::High,
                ));
            }
        }
        Capability::Unavailable { reason } => {
            insights.push(Insight::new(
                InsightKind::Capability,
                "Capability Not Assessed",
                format!("Capability indices unavailable: {reason:?}"),
                Priority::Info,
            ));
        }
    }

    if let Some(cv) = performance.and_then(|p| p.coefficient_of_variation) {
        if cv > thresholds.variation_cv_percent {
            insights.push(Insight::new(
                InsightKind::Variation,
                "High Process Variation",
                format!(
                    "Coefficient of variation is {cv:.2}% (threshold {:.2}%)",
                    thresholds.variation_cv_percent
                ),
                Priority::Medium,
            ));
        }
    }

    // stable sort keeps generation order within a priority
    insights.sort_by(|a, b| b.priority.cmp(&a.priority));
    insights
}

fn stability_insight(stability: &StabilityStatus) -> Insight {
    let counts = &stability.counts;
    let (title, priority) = match stability.status {
        Stability::Stable => ("Process Stable", Priority::Info),
        Stability::Monitor => ("Minor Patterns Detected", Priority::Low),
        Stability::Warning => ("Special-Cause Signals", Priority::High),
        Stability::Unstable => ("Process Out of Control", Priority::Critical),
    };
    let message = if counts.total == 0 {
        stability.message.to_string()
    } else {
        format!(
            "{} ({} critical, {} warning, {} info)",
            stability.message, counts.critical, counts.warning, counts.info
        )
    };
    Insight::new(InsightKind::Stability, title, message, priority)
}

fn capability_insight(cpk: f64, t: &InsightThresholds) -> Insight {
    let (title, priority) = if cpk >= t.excellent_cpk {
        ("Excellent Capability", Priority::Info)
    } else if cpk >= t.capable_cpk {
        ("Process Capable", Priority::Info)
    } else if cpk >= t.marginal_cpk {
        ("Marginally Capable", Priority::Medium)
    } else {
        ("Not Capable", Priority::Critical)
    };
    Insight::new(
        InsightKind::Capability,
        title,
        format!("Cpk = {cpk:.3}"),
        priority,
    )
}
