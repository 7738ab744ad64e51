//! Subgroup aggregation: raw rows to ordered, fixed-size subgroups.
//!
//! The order in which subgroup identifiers first appear becomes the subgroup
//! index (1..=k). That index is the time axis every run rule scans, so the
//! aggregation never sorts or regroups beyond first-seen order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::constants::{MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE};
use crate::error::{Result, SpcError};

/// One raw observation tagged with the subgroup it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub value: f64,
    pub subgroup_id: String,
}

/// An ordered, immutable batch of measurements sharing one subgroup id.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    id: String,
    index: usize,
    values: Vec<f64>,
}

impl Subgroup {
    /// Subgroup identifier as it appeared in the input.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 1-based position in first-seen order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Measurement values in input order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extract measurements from loosely typed rows.
///
/// `measurement_field` must hold a JSON number or a numeric string;
/// `subgroup_field` may hold a string, number or boolean.
pub fn measurements_from_rows(
    rows: &[Map<String, Value>],
    measurement_field: &str,
    subgroup_field: &str,
) -> Result<Vec<Measurement>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let row_no = i + 1;
            let value = field_value(row, row_no, measurement_field)?;
            let subgroup_id = field_subgroup(row, row_no, subgroup_field)?;
            Ok(Measurement { value, subgroup_id })
        })
        .collect()
}

fn field_value(row: &Map<String, Value>, row_no: usize, field: &str) -> Result<f64> {
    let value = match row.get(field) {
        None | Some(Value::Null) => return Err(SpcError::missing_field(row_no, field)),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| SpcError::invalid_measurement(row_no, field, n.to_string()))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| SpcError::invalid_measurement(row_no, field, format!("{s:?}: {e}")))?,
        Some(other) => {
            return Err(SpcError::invalid_measurement(
                row_no,
                field,
                format!("unexpected {other}"),
            ))
        }
    };
    if !value.is_finite() {
        return Err(SpcError::invalid_measurement(row_no, field, value.to_string()));
    }
    Ok(value)
}

/// Ids compare by their text, so `7` and `"7"` name the same subgroup.
fn field_subgroup(row: &Map<String, Value>, row_no: usize, field: &str) -> Result<String> {
    match row.get(field) {
        None | Some(Value::Null) => Err(SpcError::missing_field(row_no, field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(SpcError::InvalidSubgroupId {
            row: row_no,
            field: field.to_string(),
        }),
    }
}

/// Group raw rows into ordered subgroups.
///
/// # Errors
///
/// - [`SpcError::NoMeasurements`] for an empty input
/// - [`SpcError::MissingField`] / [`SpcError::InvalidMeasurement`] /
///   [`SpcError::InvalidSubgroupId`] for malformed rows
/// - [`SpcError::SizeMismatch`] if subgroups differ in size
/// - [`SpcError::UnsupportedSubgroupSize`] if the common size is outside 2..=25
pub fn aggregate(
    rows: &[Map<String, Value>],
    measurement_field: &str,
    subgroup_field: &str,
) -> Result<Vec<Subgroup>> {
    let measurements = measurements_from_rows(rows, measurement_field, subgroup_field)?;
    group_measurements(&measurements)
}

/// Group typed measurements into ordered subgroups.
///
/// See [`aggregate`] for the error conditions.
pub fn group_measurements(measurements: &[Measurement]) -> Result<Vec<Subgroup>> {
    if measurements.is_empty() {
        return Err(SpcError::NoMeasurements);
    }

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    for (i, m) in measurements.iter().enumerate() {
        if !m.value.is_finite() {
            return Err(SpcError::invalid_measurement(
                i + 1,
                "value",
                m.value.to_string(),
            ));
        }
        match positions.get(m.subgroup_id.as_str()) {
            Some(&pos) => groups[pos].1.push(m.value),
            None => {
                positions.insert(m.subgroup_id.as_str(), groups.len());
                groups.push((m.subgroup_id.as_str(), vec![m.value]));
            }
        }
    }

    let expected = groups[0].1.len();
    if let Some((id, values)) = groups.iter().find(|(_, v)| v.len() != expected) {
        return Err(SpcError::SizeMismatch {
            subgroup: (*id).to_string(),
            expected,
            actual: values.len(),
        });
    }
    if !(MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&expected) {
        return Err(SpcError::UnsupportedSubgroupSize(expected));
    }

    Ok(groups
        .into_iter()
        .enumerate()
        .map(|(i, (id, values))| Subgroup {
            id: id.to_string(),
            index: i + 1,
            values,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Map<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    fn m(value: f64, id: &str) -> Measurement {
        Measurement {
            value,
            subgroup_id: id.to_string(),
        }
    }

    #[test]
    fn preserves_first_seen_order() {
        let data = [
            m(1.0, "b"),
            m(2.0, "a"),
            m(3.0, "b"),
            m(4.0, "c"),
            m(5.0, "a"),
            m(6.0, "c"),
        ];
        let groups = group_measurements(&data).unwrap();
        let ids: Vec<&str> = groups.iter().map(|g| g.id()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(groups[0].index(), 1);
        assert_eq!(groups[2].index(), 3);
        assert_eq!(groups[0].values(), &[1.0, 3.0]);
        assert_eq!(groups[1].values(), &[2.0, 5.0]);
    }

    #[test]
    fn rejects_unequal_sizes() {
        let data = [m(1.0, "a"), m(2.0, "a"), m(3.0, "b")];
        let err = group_measurements(&data).unwrap_err();
        assert_eq!(
            err,
            SpcError::SizeMismatch {
                subgroup: "b".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_size_one() {
        let data = [m(1.0, "a"), m(2.0, "b")];
        assert_eq!(
            group_measurements(&data).unwrap_err(),
            SpcError::UnsupportedSubgroupSize(1)
        );
    }

    #[test]
    fn rejects_size_above_25() {
        let data: Vec<Measurement> = (0..26).map(|i| m(i as f64, "a")).collect();
        assert_eq!(
            group_measurements(&data).unwrap_err(),
            SpcError::UnsupportedSubgroupSize(26)
        );
    }

    #[test]
    fn accepts_size_25() {
        let data: Vec<Measurement> = (0..25).map(|i| m(i as f64, "a")).collect();
        let groups = group_measurements(&data).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 25);
    }

    #[test]
    fn empty_input_is_error() {
        assert_eq!(
            group_measurements(&[]).unwrap_err(),
            SpcError::NoMeasurements
        );
        assert_eq!(
            aggregate(&[], "value", "subgroupId").unwrap_err(),
            SpcError::NoMeasurements
        );
    }

    #[test]
    fn aggregate_reads_custom_fields() {
        let input = rows(json!([
            {"diameter": 10.1, "lot": 7},
            {"diameter": "10.3", "lot": 7},
            {"diameter": 9.9, "lot": "8"},
            {"diameter": 10.0, "lot": "8"},
        ]));
        let groups = aggregate(&input, "diameter", "lot").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id(), "7");
        assert_eq!(groups[1].id(), "8");
        assert!((groups[0].values()[1] - 10.3).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_reports_missing_field_with_row() {
        let input = rows(json!([
            {"value": 1.0, "subgroupId": "a"},
            {"subgroupId": "a"},
        ]));
        assert_eq!(
            aggregate(&input, "value", "subgroupId").unwrap_err(),
            SpcError::missing_field(2, "value")
        );

        let input = rows(json!([{"value": 1.0, "subgroupId": null}]));
        assert_eq!(
            aggregate(&input, "value", "subgroupId").unwrap_err(),
            SpcError::missing_field(1, "subgroupId")
        );
    }

    #[test]
    fn aggregate_rejects_non_numeric_value() {
        let input = rows(json!([{"value": "abc", "subgroupId": "a"}]));
        let err = aggregate(&input, "value", "subgroupId").unwrap_err();
        assert_eq!(err.kind(), "InvalidMeasurement");

        let input = rows(json!([{"value": [1.0], "subgroupId": "a"}]));
        let err = aggregate(&input, "value", "subgroupId").unwrap_err();
        assert_eq!(err.kind(), "InvalidMeasurement");

        let input = rows(json!([{"value": "inf", "subgroupId": "a"}]));
        let err = aggregate(&input, "value", "subgroupId").unwrap_err();
        assert_eq!(err.kind(), "InvalidMeasurement");
    }

    #[test]
    fn subgroup_ids_match_by_text() {
        let input = rows(json!([
            {"value": 1.0, "lot": 7},
            {"value": 2.0, "lot": "7"},
            {"value": 3.0, "lot": 8},
            {"value": 4.0, "lot": "8"},
        ]));
        let groups = aggregate(&input, "value", "lot").unwrap();
        let ids: Vec<&str> = groups.iter().map(|g| g.id()).collect();
        assert_eq!(ids, ["7", "8"]);
        assert!(groups.iter().all(|g| g.len() == 2));

        // Integer and float spellings render differently.
        let input = rows(json!([
            {"value": 1.0, "lot": 1},
            {"value": 2.0, "lot": 1.0},
            {"value": 3.0, "lot": 1},
            {"value": 4.0, "lot": 1.0},
        ]));
        let groups = aggregate(&input, "value", "lot").unwrap();
        let ids: Vec<&str> = groups.iter().map(|g| g.id()).collect();
        assert_eq!(ids, ["1", "1.0"]);
    }

    #[test]
    fn aggregate_rejects_object_subgroup_id() {
        let input = rows(json!([{"value": 1.0, "subgroupId": {"x": 1}}]));
        assert_eq!(
            aggregate(&input, "value", "subgroupId").unwrap_err(),
            SpcError::InvalidSubgroupId {
                row: 1,
                field: "subgroupId".into()
            }
        );
    }

    /// Missing fields are reported before any size validation.
    #[test]
    fn field_errors_precede_size_errors() {
        let input = rows(json!([
            {"value": 1.0, "subgroupId": "a"},
            {"value": 2.0},
        ]));
        assert_eq!(
            aggregate(&input, "value", "subgroupId").unwrap_err().kind(),
            "MissingField"
        );
    }
}
