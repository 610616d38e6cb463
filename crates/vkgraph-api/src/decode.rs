//! Envelope validation and typed decoding of API payloads.
//!
//! Pure functions over `serde_json::Value`, kept apart from the transport
//! so the envelope rules stay unit-testable.

use serde_json::Value;

use vkgraph_core::{Group, User};

use crate::client::ApiError;

/// Unwrap the `{"response": ...}` / `{"error": ...}` envelope.
///
/// An `error` key fails the call with the method name and the raw payload
/// attached. An empty `response` fails unless the call site allows it.
pub fn unwrap_envelope(
    method: &str,
    mut data: Value,
    allow_empty: bool,
) -> Result<Value, ApiError> {
    if data.get("error").is_some() {
        return Err(ApiError::RemoteApi {
            method: method.to_string(),
            payload: data,
        });
    }

    let response = data
        .get_mut("response")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if is_empty(&response) && !allow_empty {
        return Err(ApiError::EmptyResponse {
            method: method.to_string(),
        });
    }

    Ok(response)
}

/// Decode a `users.get` response: a bare array of user records.
pub fn users(method: &str, response: Value) -> Result<Option<Vec<User>>, ApiError> {
    if is_empty(&response) {
        return Ok(None);
    }
    serde_json::from_value(response)
        .map(Some)
        .map_err(|e| decode_error(method, e))
}

/// Decode a `users.getFollowers` response: `{count, items}`.
///
/// An explicit `count == 0` decodes to `None`, distinguishing "fetched,
/// zero followers" from the item sequence expected downstream.
pub fn followers(method: &str, response: Value) -> Result<Option<Vec<i64>>, ApiError> {
    if is_empty(&response) {
        return Ok(None);
    }

    let count = response.get("count").and_then(Value::as_i64).unwrap_or(0);
    if count == 0 {
        return Ok(None);
    }

    let items = response
        .get("items")
        .cloned()
        .ok_or_else(|| ApiError::Decode {
            method: method.to_string(),
            detail: "missing items".to_string(),
        })?;
    serde_json::from_value(items)
        .map(Some)
        .map_err(|e| decode_error(method, e))
}

/// Decode a `groups.get` extended response: `{count, items}` of groups.
pub fn groups(method: &str, response: Value) -> Result<Option<Vec<Group>>, ApiError> {
    if is_empty(&response) {
        return Ok(None);
    }

    let items = response
        .get("items")
        .cloned()
        .ok_or_else(|| ApiError::Decode {
            method: method.to_string(),
            detail: "missing items".to_string(),
        })?;
    serde_json::from_value(items)
        .map(Some)
        .map_err(|e| decode_error(method, e))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn decode_error(method: &str, e: serde_json::Error) -> ApiError {
    ApiError::Decode {
        method: method.to_string(),
        detail: e.to_string(),
    }
}
