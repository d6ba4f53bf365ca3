//! Response builders for the API handler.
//!
//! Every response carries the same CORS headers; non-preflight responses
//! also carry a JSON content type.

use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::core::models::ApiResponse;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST,OPTIONS";
pub const ALLOW_HEADERS: &str = "content-type";

fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Access-Control-Allow-Origin".to_string(),
            ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            ALLOW_METHODS.to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            ALLOW_HEADERS.to_string(),
        ),
    ])
}

fn json_headers() -> BTreeMap<String, String> {
    let mut headers = cors_headers();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers
}

/// Returns the 200 response for a CORS preflight request: headers only.
#[must_use]
pub fn preflight() -> ApiResponse {
    ApiResponse {
        status_code: 200,
        headers: cors_headers(),
        body: None,
    }
}

/// Returns a 200 response wrapping the endpoint output under `response`.
#[must_use]
pub fn ok_response(result: &Value) -> ApiResponse {
    ApiResponse {
        status_code: 200,
        headers: json_headers(),
        body: Some(json!({ "response": result }).to_string()),
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> ApiResponse {
    ApiResponse {
        status_code,
        headers: json_headers(),
        body: Some(json!({ "error": message }).to_string()),
    }
}
