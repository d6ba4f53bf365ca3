use serde_json::Value;

use crate::errors::GatewayError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of a function URL / HTTP API v2 event, or `""` when absent.
pub fn request_method(event: &Value) -> &str {
    v_str(event, &["requestContext", "http", "method"]).unwrap_or("")
}

/// Pulls the `input` field out of the JSON-encoded event body.
pub fn extract_input(event: &Value) -> Result<Value, GatewayError> {
    let body = event
        .get("body")
        .ok_or_else(|| GatewayError::MissingField("body".to_string()))?;

    let Some(body_str) = body.as_str() else {
        return Err(GatewayError::ParseError(
            "request body is not a string".to_string(),
        ));
    };

    let parsed: Value = serde_json::from_str(body_str)?;

    parsed
        .get("input")
        .cloned()
        .ok_or_else(|| GatewayError::MissingField("input".to_string()))
}
