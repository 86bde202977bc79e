use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{HeaderMap, StatusCode, header},
};
use serde_json::Value;

use crate::error::GatewayError;

const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "cookie", "x-api-key", "proxy-authorization"];

// Key masking for logs
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let start: String = chars[..4].iter().collect();
    let end: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", start, end)
}

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn is_json_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Unwraps the buffered body, mapping a body-limit rejection to 413.
pub fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, GatewayError> {
    body.map_err(|rejection| {
        tracing::error!("Failed to read request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::bad_request("Request body could not be read")
        }
    })
}

/// Checks the content type and parses the body as JSON.
pub fn parse_json_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, GatewayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    if !content_type.as_deref().is_some_and(is_json_content_type) {
        tracing::error!("Request Content-Type is not application/json");
        return Err(GatewayError::UnsupportedContentType {
            received: content_type,
        });
    }

    let data: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::error!("Failed to parse JSON: {}", e);
        GatewayError::bad_request("Invalid JSON format")
    })?;
    tracing::debug!("Parsed JSON data: {}", data);
    Ok(data)
}

/// First `max_chars` characters of `text`, with `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().nth(max_chars).is_some() {
        out.push_str("...");
    }
    out
}

pub fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let raw = String::from_utf8_lossy(value.as_bytes());
            let shown = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                mask_key(&raw)
            } else {
                raw.into_owned()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}
