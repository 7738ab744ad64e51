//! Core engine: runs one analysis request through the full pipeline.
//!
//! rows -> subgroups -> chart limits -> run rules -> stability, and in
//! parallel raw values -> capability and performance. Everything feeds the
//! insight generator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::capability::{Capability, SpecLimits};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::insight::{self, Insight};
use crate::performance::PerformanceSummary;
use crate::spc::{
    aggregate, ChartConstants, ChartFamily, ChartSeries, ChartSet, ConstantTable, ControlChart,
    RunRule, VariablesChart, Violation, WesternElectricRules,
};
use crate::stability::StabilityStatus;

fn default_measurement_field() -> String {
    "value".to_string()
}

fn default_subgroup_field() -> String {
    "subgroupId".to_string()
}

/// One analysis request.
///
/// Rows are arbitrary JSON objects; `measurement_field` and `subgroup_field`
/// name the keys holding the value and the subgroup id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub measurements: Vec<Map<String, Value>>,
    #[serde(default)]
    pub chart_family: ChartFamily,
    #[serde(default)]
    pub usl: Option<f64>,
    #[serde(default)]
    pub lsl: Option<f64>,
    #[serde(default = "default_measurement_field")]
    pub measurement_field: String,
    #[serde(default = "default_subgroup_field")]
    pub subgroup_field: String,
}

impl AnalysisRequest {
    /// A request over `rows` with default field names and no spec limits.
    pub fn new(measurements: Vec<Map<String, Value>>, chart_family: ChartFamily) -> Self {
        Self {
            measurements,
            chart_family,
            usl: None,
            lsl: None,
            measurement_field: default_measurement_field(),
            subgroup_field: default_subgroup_field(),
        }
    }

    pub fn with_spec_limits(mut self, usl: Option<f64>, lsl: Option<f64>) -> Self {
        self.usl = usl;
        self.lsl = lsl;
        self
    }
}

/// Limits and series of the computed chart pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResults {
    pub family: ChartFamily,
    pub primary_chart: ControlChart,
    pub secondary_chart: ControlChart,
    /// Within-subgroup sigma estimate, R-bar / d2 or S-bar / c4.
    pub within_sigma: f64,
    /// Factors looked up for the subgroup size.
    pub constants: ChartConstants,
    pub series: ChartSeries,
}

/// Run-rule violations per chart, in detection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartViolations {
    pub primary_chart: Vec<Violation>,
    pub secondary_chart: Vec<Violation>,
}

impl ChartViolations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.primary_chart.iter().chain(self.secondary_chart.iter())
    }
}

/// Complete result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub chart_results: ChartResults,
    pub capability: Capability,
    pub performance: Option<PerformanceSummary>,
    pub violations: ChartViolations,
    pub stability: StabilityStatus,
    pub insights: Vec<Insight>,
}

/// The SPC engine. Stateless between requests; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    table: &'static ConstantTable,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            table: ConstantTable::standard(),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one request.
    ///
    /// Structural problems (malformed rows, unequal or unsupported subgroup
    /// sizes, invalid spec limits) abort with an error and no partial result.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use u_spc::{AnalysisRequest, Engine};
    ///
    /// let request: AnalysisRequest = serde_json::from_value(json!({
    ///     "measurements": [
    ///         {"value": 10.1, "subgroupId": "a"}, {"value": 9.9, "subgroupId": "a"},
    ///         {"value": 10.0, "subgroupId": "b"}, {"value": 10.2, "subgroupId": "b"},
    ///         {"value": 9.8, "subgroupId": "c"}, {"value": 10.0, "subgroupId": "c"}
    ///     ],
    ///     "chartFamily": "meanRange",
    ///     "usl": 11.0,
    ///     "lsl": 9.0
    /// }))
    /// .unwrap();
    ///
    /// let report = Engine::with_defaults().analyze(&request).unwrap();
    /// assert_eq!(report.chart_results.series.means.len(), 3);
    /// assert!(report.capability.is_available());
    /// ```
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let spec = SpecLimits::new(request.usl, request.lsl)?;

        let subgroups = aggregate(
            &request.measurements,
            &request.measurement_field,
            &request.subgroup_field,
        )?;
        debug!(
            subgroups = subgroups.len(),
            n = subgroups.first().map_or(0, |s| s.len()),
            "aggregated measurements"
        );

        let charts = ChartSet::compute(request.chart_family, &subgroups, self.table)?;
        let primary = charts.primary();
        let secondary = charts.secondary();
        debug!(
            family = ?charts.family(),
            center_line = primary.center_line,
            ucl = primary.ucl,
            lcl = primary.lcl,
            "computed control limits"
        );

        let rules = WesternElectricRules;
        let series = charts.series();
        let violations = ChartViolations {
            primary_chart: rules.check(&series.means, primary),
            secondary_chart: rules.check(&series.spreads, secondary),
        };
        let stability = StabilityStatus::assess(violations.iter());

        let values: Vec<f64> = subgroups
            .iter()
            .flat_map(|s| s.values().iter().copied())
            .collect();
        let capability = spec.compute(&values);
        if let Capability::Unavailable { reason } = &capability {
            warn!(?reason, "capability not assessed");
        }
        let performance = PerformanceSummary::compute(&values);

        let insights = insight::generate(
            &stability,
            &capability,
            performance.as_ref(),
            &self.config.insights,
        );

        info!(
            stability = ?stability.status,
            critical = stability.counts.critical,
            warning = stability.counts.warning,
            info = stability.counts.info,
            insights = insights.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            chart_results: ChartResults {
                family: charts.family(),
                primary_chart: primary.clone(),
                secondary_chart: secondary.clone(),
                within_sigma: charts.within_sigma(),
                constants: *charts.constants(),
                series: series.clone(),
            },
            capability,
            performance,
            violations,
            stability,
            insights,
        })
    }
}
