//! # Response Assertions
//!
//! Status checks and the loose "json-like" shape match. A shape match only
//! requires the expected keys to be present; extra keys in the response are
//! ignored, and arrays match element-wise in any order.

pub mod report;

use serde_json::Value;

use crate::error::AssertionFailure;
use crate::http::response::HttpResponse;

pub fn expect_status(response: &HttpResponse, expected: u16) -> Result<(), AssertionFailure> {
    expect_status_in(response, &[expected])
}

/// Passes when the status is any of `accepted`.
pub fn expect_status_in(response: &HttpResponse, accepted: &[u16]) -> Result<(), AssertionFailure> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    let expected = accepted
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    Err(AssertionFailure::Status {
        expected,
        actual: response.status,
    })
}

pub fn expect_json_like(response: &HttpResponse, expected: &Value) -> Result<(), AssertionFailure> {
    if json_like(&response.body, expected) {
        Ok(())
    } else {
        Err(AssertionFailure::ShapeMismatch {
            expected: expected.clone(),
            actual: response.body.clone(),
        })
    }
}

/// Exact check of one top-level key; an absent key reads as `null`.
pub fn expect_field(
    response: &HttpResponse,
    key: &str,
    expected: &Value,
) -> Result<(), AssertionFailure> {
    let actual = response.field(key).cloned().unwrap_or(Value::Null);
    if scalar_eq(&actual, expected) || actual == *expected {
        Ok(())
    } else {
        Err(AssertionFailure::FieldMismatch {
            field: key.to_string(),
            expected: expected.clone(),
            actual,
        })
    }
}

/// True when `actual` contains at least everything in `expected`.
pub fn json_like(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected.iter().all(|(key, want)| {
            actual
                .get(key)
                .is_some_and(|have| json_like(have, want))
        }),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|want| actual.iter().any(|have| json_like(have, want))),
        (actual, expected) => scalar_eq(actual, expected),
    }
}

fn scalar_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if a.is_f64() || b.is_f64() {
                a.as_f64() == b.as_f64()
            } else {
                a == b
            }
        }
        (Value::Object(_), _) | (Value::Array(_), _) => false,
        (actual, expected) => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> HttpResponse {
        HttpResponse {
            status,
            duration_ms: 0,
            size_bytes: 0,
            body,
        }
    }

    #[test]
    fn status_mismatch_reports_expected_and_actual() {
        let err = expect_status(&response(500, Value::Null), 201).unwrap_err();
        match err {
            AssertionFailure::Status { expected, actual } => {
                assert_eq!(expected, "201");
                assert_eq!(actual, 500);
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn status_in_accepts_alternatives() {
        assert!(expect_status_in(&response(204, Value::Null), &[200, 204]).is_ok());
        let err = expect_status_in(&response(404, Value::Null), &[200, 204]).unwrap_err();
        assert_eq!(err.to_string(), "expected status 200 or 204, got 404");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let actual = json!({"id": 1, "name": "Acme", "createdAt": "2024-01-01"});
        assert!(json_like(&actual, &json!({"name": "Acme"})));
        assert!(!json_like(&actual, &json!({"name": "Other"})));
        assert!(!json_like(&actual, &json!({"sector": "Retail"})));
    }

    #[test]
    fn arrays_match_in_any_order() {
        let actual = json!([
            {"id": 1, "name": "First"},
            {"id": 2, "name": "Second", "city": "Criciuma"}
        ]);
        assert!(json_like(&actual, &json!([{"id": 2, "name": "Second"}])));
        assert!(json_like(&actual, &json!([{"id": 2}, {"id": 1}])));
        assert!(!json_like(&actual, &json!([{"id": 3}])));
        assert!(json_like(&actual, &json!([])));
    }

    #[test]
    fn nested_structures_recurse() {
        let actual = json!({"data": {"items": [{"tags": ["a", "b"]}]}, "page": 1});
        assert!(json_like(&actual, &json!({"data": {"items": [{"tags": ["b"]}]}})));
        assert!(!json_like(&actual, &json!({"data": {"items": [{"tags": ["c"]}]}})));
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(json_like(&json!({"id": 1.0}), &json!({"id": 1})));
        assert!(!json_like(&json!({"id": "1"}), &json!({"id": 1})));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let actual = json!({"id": 9_007_199_254_740_993_u64});
        assert!(!json_like(&actual, &json!({"id": 9_007_199_254_740_992_u64})));
        assert!(json_like(&actual, &json!({"id": 9_007_199_254_740_993_u64})));
        assert!(json_like(&json!({"id": -3}), &json!({"id": -3})));
    }

    #[test]
    fn container_kinds_must_agree() {
        assert!(!json_like(&json!({"id": 1}), &json!([{"id": 1}])));
        assert!(!json_like(&json!([{"id": 1}]), &json!({"id": 1})));
    }

    #[test]
    fn expect_field_treats_absent_as_null() {
        let resp = response(200, json!({"id": 5}));
        assert!(expect_field(&resp, "id", &json!(5)).is_ok());
        let err = expect_field(&resp, "name", &json!("Acme")).unwrap_err();
        match err {
            AssertionFailure::FieldMismatch { field, actual, .. } => {
                assert_eq!(field, "name");
                assert_eq!(actual, Value::Null);
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn shape_mismatch_carries_both_bodies() {
        let resp = response(200, json!([]));
        let expected = json!([{"id": 1}]);
        match expect_json_like(&resp, &expected).unwrap_err() {
            AssertionFailure::ShapeMismatch { expected: e, actual } => {
                assert_eq!(e, expected);
                assert_eq!(actual, json!([]));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }
}
