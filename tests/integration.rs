//! Integration tests for the SPC engine.

use serde_json::{json, Value};
use u_spc::spc::{ChartFamily, Severity, ViolationType};
use u_spc::stability::Stability;
use u_spc::{AnalysisRequest, Engine, EngineConfig, InsightThresholds, SpcError};

fn fixture_request() -> AnalysisRequest {
    let json = r#"{
    "chartFamily": "meanRange",
    "usl": 10.6,
    "lsl": 9.4,
    "measurements": [
      {"value": 10.02, "subgroupId": "lot-1"}, {"value": 9.98, "subgroupId": "lot-1"},
      {"value": 10.05, "subgroupId": "lot-1"}, {"value": 9.96, "subgroupId": "lot-1"},
      {"value": 10.01, "subgroupId": "lot-2"}, {"value": 10.04, "subgroupId": "lot-2"},
      {"value": 9.97, "subgroupId": "lot-2"}, {"value": 10.00, "subgroupId": "lot-2"},
      {"value": 9.95, "subgroupId": "lot-3"}, {"value": 10.03, "subgroupId": "lot-3"},
      {"value": 10.02, "subgroupId": "lot-3"}, {"value": 9.99, "subgroupId": "lot-3"},
      {"value": 10.06, "subgroupId": "lot-4"}, {"value": 9.98, "subgroupId": "lot-4"},
      {"value": 10.00, "subgroupId": "lot-4"}, {"value": 10.01, "subgroupId": "lot-4"},
      {"value": 9.99, "subgroupId": "lot-5"}, {"value": 10.02, "subgroupId": "lot-5"},
      {"value": 9.97, "subgroupId": "lot-5"}, {"value": 10.03, "subgroupId": "lot-5"}
    ]
  }"#;
    serde_json::from_str(json).unwrap()
}

fn request(family: ChartFamily, groups: &[(&str, &[f64])]) -> AnalysisRequest {
    let rows = groups
        .iter()
        .flat_map(|(id, values)| {
            values
                .iter()
                .map(move |v| json!({"value": v, "subgroupId": id}))
        })
        .filter_map(|v| v.as_object().cloned())
        .collect();
    AnalysisRequest::new(rows, family)
}

#[test]
fn fixture_produces_full_report() {
    let engine = Engine::with_defaults();
    let report = engine.analyze(&fixture_request()).unwrap();

    // Chart structure.
    let charts = &report.chart_results;
    assert_eq!(charts.family, ChartFamily::MeanRange);
    assert_eq!(charts.series.means.len(), 5);
    assert_eq!(charts.series.subgroup_indices, vec![1, 2, 3, 4, 5]);
    assert_eq!(charts.series.subgroup_ids[0], "lot-1");
    let p = &charts.primary_chart;
    assert!(p.lcl < p.center_line && p.center_line < p.ucl);
    assert!(((p.ucl - p.center_line) - (p.center_line - p.lcl)).abs() < 1e-12);
    // n = 4: D3 = 0
    assert_eq!(charts.secondary_chart.lcl, 0.0);
    assert!(charts.within_sigma > 0.0);

    // Capability: tight process, wide tolerance.
    let cap = report.capability.result().expect("limits supplied");
    assert!(cap.cpk > 2.0, "cpk = {}", cap.cpk);
    assert!(cap.ppm_total < 1.0);

    // Performance covers every raw value.
    let perf = report.performance.as_ref().unwrap();
    assert_eq!(perf.count, 20);
    assert!((perf.max - 10.06).abs() < 1e-12);

    assert_eq!(report.stability.status, Stability::Stable);
    assert_eq!(report.insights[0].title, "Process Stable");
    assert!(report
        .insights
        .iter()
        .any(|i| i.title == "Excellent Capability"));
}

#[test]
fn report_json_shape() {
    let report = Engine::with_defaults().analyze(&fixture_request()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "chartResults",
        "capability",
        "performance",
        "violations",
        "stability",
        "insights",
    ] {
        assert!(json.get(key).is_some(), "missing `{key}`");
    }
    assert_eq!(json["chartResults"]["family"], "meanRange");
    assert_eq!(json["chartResults"]["constants"]["n"], 4);
    assert!(json["chartResults"]["primaryChart"]["twoSigmaBounds"]["upper"].is_number());
    assert!(json["chartResults"]["series"]["subgroupIds"].is_array());
    assert!(json["violations"]["primaryChart"].is_array());
    assert!(json["violations"]["secondaryChart"].is_array());
    assert_eq!(json["capability"]["status"], "available");
    assert_eq!(json["stability"]["status"], "stable");
    assert_eq!(json["stability"]["color"], "green");
    assert!(json["insights"][0]["type"].is_string());
}

#[test]
fn identical_input_gives_identical_json() {
    let engine = Engine::with_defaults();
    let req = fixture_request();
    let a = serde_json::to_string(&engine.analyze(&req).unwrap()).unwrap();
    let b = serde_json::to_string(&engine.analyze(&req).unwrap()).unwrap();
    assert_eq!(a, b);

    let other = Engine::with_defaults();
    let c = serde_json::to_string(&other.analyze(&req).unwrap()).unwrap();
    assert_eq!(a, c);
}

#[test]
fn equal_subgroup_means_are_stable() {
    let req = request(
        ChartFamily::MeanRange,
        &[
            ("1", &[9.0, 10.0, 11.0]),
            ("2", &[11.0, 10.0, 9.0]),
            ("3", &[10.0, 9.0, 11.0]),
            ("4", &[10.0, 11.0, 9.0]),
            ("5", &[9.0, 11.0, 10.0]),
            ("6", &[11.0, 9.0, 10.0]),
            ("7", &[9.0, 10.0, 11.0]),
            ("8", &[10.0, 11.0, 9.0]),
            ("9", &[11.0, 10.0, 9.0]),
            ("10", &[9.0, 11.0, 10.0]),
        ],
    );
    let report = Engine::with_defaults().analyze(&req).unwrap();
    assert!(report.violations.primary_chart.is_empty());
    assert!(report.violations.secondary_chart.is_empty());
    assert_eq!(report.stability.status, Stability::Stable);
    assert_eq!(report.stability.counts.total, 0);
}

#[test]
fn shifted_process_is_flagged() {
    // Ten in-control subgroups followed by a large shift.
    let base: [&[f64]; 10] = [
        &[10.0, 10.4, 9.6],
        &[10.1, 9.7, 10.3],
        &[9.9, 10.2, 10.0],
        &[10.0, 9.6, 10.4],
        &[10.2, 9.9, 10.0],
        &[9.8, 10.3, 10.0],
        &[10.1, 9.8, 10.2],
        &[9.9, 10.1, 10.0],
        &[10.0, 10.3, 9.9],
        &[10.1, 9.9, 10.1],
    ];
    let ids: Vec<String> = (1..=11).map(|i| format!("s{i}")).collect();
    let mut groups: Vec<(&str, &[f64])> = base
        .iter()
        .zip(&ids)
        .map(|(v, id)| (id.as_str(), *v))
        .collect();
    groups.push((ids[10].as_str(), &[14.0, 14.2, 13.9]));

    let report = Engine::with_defaults()
        .analyze(&request(ChartFamily::MeanStdDev, &groups))
        .unwrap();
    let critical: Vec<_> = report
        .violations
        .primary_chart
        .iter()
        .filter(|v| v.rule == ViolationType::BeyondLimits)
        .collect();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].subgroup_index, 11);
    assert_eq!(critical[0].severity, Severity::Critical);
    assert_eq!(critical[0].rule_id, 1);
    assert_eq!(report.stability.status, Stability::Unstable);
    assert_eq!(report.stability.color, "red");
}

#[test]
fn unequal_subgroup_sizes_abort() {
    let req = request(
        ChartFamily::MeanRange,
        &[("a", &[1.0, 2.0, 3.0]), ("b", &[1.0, 2.0])],
    );
    let err = Engine::with_defaults().analyze(&req).unwrap_err();
    assert!(matches!(err, SpcError::SizeMismatch { .. }), "got {err:?}");
    assert_eq!(err.kind(), "SizeMismatch");
}

#[test]
fn unsupported_subgroup_sizes_abort() {
    let singles = request(ChartFamily::MeanRange, &[("a", &[1.0]), ("b", &[2.0])]);
    assert_eq!(
        Engine::with_defaults().analyze(&singles).unwrap_err(),
        SpcError::UnsupportedSubgroupSize(1)
    );

    let big: Vec<f64> = (0..26).map(f64::from).collect();
    let oversized = request(ChartFamily::MeanStdDev, &[("a", &big), ("b", &big)]);
    assert_eq!(
        Engine::with_defaults().analyze(&oversized).unwrap_err(),
        SpcError::UnsupportedSubgroupSize(26)
    );
}

#[test]
fn malformed_rows_abort() {
    let mut req = fixture_request();
    req.measurements[3].remove("value");
    let err = Engine::with_defaults().analyze(&req).unwrap_err();
    assert_eq!(err, SpcError::missing_field(4, "value"));

    let mut req = fixture_request();
    req.measurements[0].insert("value".into(), Value::String("abc".into()));
    let err = Engine::with_defaults().analyze(&req).unwrap_err();
    assert_eq!(err.kind(), "InvalidMeasurement");

    let empty = AnalysisRequest::new(Vec::new(), ChartFamily::MeanRange);
    assert_eq!(
        Engine::with_defaults().analyze(&empty).unwrap_err(),
        SpcError::NoMeasurements
    );
}

#[test]
fn missing_spec_limits_leave_capability_unavailable() {
    let mut req = fixture_request();
    req.lsl = None;
    let report = Engine::with_defaults().analyze(&req).unwrap();
    let json = serde_json::to_value(&report.capability).unwrap();
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["reason"], "missingSpecLimits");
    // Charts are still computed.
    assert_eq!(report.chart_results.series.means.len(), 5);
}

#[test]
fn constant_measurements_degrade_capability() {
    let req = request(
        ChartFamily::MeanRange,
        &[("a", &[5.0, 5.0]), ("b", &[5.0, 5.0]), ("c", &[5.0, 5.0])],
    )
    .with_spec_limits(Some(6.0), Some(4.0));
    let report = Engine::with_defaults().analyze(&req).unwrap();
    let json = serde_json::to_value(&report.capability).unwrap();
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["reason"], "degenerateVariance");
    assert_eq!(report.stability.status, Stability::Stable);
}

#[test]
fn reversed_spec_limits_abort() {
    let mut req = fixture_request();
    req.usl = Some(9.0);
    let err = Engine::with_defaults().analyze(&req).unwrap_err();
    assert!(matches!(err, SpcError::InvalidSpecLimits(_)));
}

#[test]
fn custom_thresholds_change_insights() {
    let config = EngineConfig {
        insights: InsightThresholds {
            excellent_cpk: 100.0,
            capable_cpk: 50.0,
            ..InsightThresholds::default()
        },
    };
    let report = Engine::new(config).analyze(&fixture_request()).unwrap();
    let titles: Vec<&str> = report.insights.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.contains(&"Marginally Capable"), "{titles:?}");
}
