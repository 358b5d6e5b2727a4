//! Response shaping for the workflow engine's replies
//!
//! The engine answers with whatever its last workflow node produced. The
//! frontend expects a small set of envelopes, built here.

use serde_json::{json, Value};

pub const EMPTY_RESUME_MESSAGE: &str = "File uploaded successfully";
pub const PROCESSED_MESSAGE: &str = "Invoice processed";
pub const INVALID_START_JSON: &str = "Invalid JSON response from n8n";

/// JavaScript truthiness of a JSON value
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy, everything else (empty
/// arrays and objects included) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value
        .as_object()
        .and_then(|obj| obj.get(field))
        .filter(|v| is_truthy(v))
}

/// Envelope for a start-workflow reply
///
/// Valid JSON is passed back untouched.
pub fn start_response(body: &str) -> Value {
    match serde_json::from_str::<Value>(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to parse start workflow JSON: {e}");
            json!({
                "success": false,
                "error": INVALID_START_JSON,
                "raw": body,
            })
        }
    }
}

/// Envelope for a successful (2xx) resume-workflow reply
pub fn resume_response(body: &str, tracking_id_field: &str) -> Value {
    if body.trim().is_empty() {
        tracing::warn!("Empty response from workflow engine, treating as success");
        return json!({ "success": true, "message": EMPTY_RESUME_MESSAGE });
    }

    let data = match serde_json::from_str::<Value>(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Resume response is not JSON ({e}), returning raw text");
            return json!({ "success": true, "message": body, "raw": true });
        }
    };

    if let Some(first) = data
        .as_array()
        .and_then(|items| items.first())
        .filter(|first| truthy_field(first, tracking_id_field).is_some())
    {
        tracing::info!(field = tracking_id_field, "Tracked response detected (array format)");
        return json!({
            "success": true,
            "message": PROCESSED_MESSAGE,
            "response": first,
        });
    }

    if let Some(inner) = truthy_field(&data, "response") {
        tracing::info!("Tracked response detected (object format)");
        return json!({
            "success": true,
            "message": PROCESSED_MESSAGE,
            "response": inner,
        });
    }

    json!({ "success": true, "data": data })
}
