//! Normalization of the backend's response envelope.
//!
//! The backend API wraps some responses as `{"success": true, "data": ...}`
//! and returns others as the raw object. Every call site used to decide for
//! itself which shape it was looking at; that decision now lives here, once,
//! and is applied at the proxy boundary.

use serde_json::Value;

/// Unwrap a backend response envelope, returning the canonical payload.
///
/// If the value is an object carrying both a `success` flag and a `data`
/// field, the payload is `data`. Anything else is already the payload and is
/// returned unchanged. `success: false` envelopes are also unwrapped; the
/// caller decides how to surface the failure based on the HTTP status.
#[must_use]
pub fn unwrap_envelope(response: Value) -> Value {
    match response {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            // contains_key checked above, remove cannot miss
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwraps_enveloped_object() {
        let wrapped = json!({"success": true, "data": {"id": "u1"}});
        assert_eq!(unwrap_envelope(wrapped), json!({"id": "u1"}));
    }

    #[test]
    fn test_raw_object_passes_through() {
        let raw = json!({"id": "u1", "phone": "0300"});
        assert_eq!(unwrap_envelope(raw.clone()), raw);
    }

    #[test]
    fn test_success_without_data_is_not_an_envelope() {
        // A payload that merely has a `success` field of its own.
        let raw = json!({"success": true, "message": "order placed"});
        assert_eq!(unwrap_envelope(raw.clone()), raw);
    }

    #[test]
    fn test_failed_envelope_still_unwraps() {
        let wrapped = json!({"success": false, "data": null});
        assert_eq!(unwrap_envelope(wrapped), Value::Null);
    }

    #[test]
    fn test_non_object_passes_through() {
        assert_eq!(unwrap_envelope(json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(unwrap_envelope(Value::Null), Value::Null);
    }
}
