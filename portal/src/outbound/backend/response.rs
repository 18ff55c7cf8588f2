//! Pure helpers for reading backend responses.
//!
//! Kept free of reqwest types so the message and URL rules are testable
//! without a server.

use serde_json::Value;

/// Human-readable message for a non-success response.
///
/// Precedence: `error` (a string, or an object carrying `message`), then a
/// top-level `message`, then `status N`.
pub(super) fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_from_body)
        .unwrap_or_else(|| format!("status {status}"))
}

fn message_from_body(body: &Value) -> Option<String> {
    let from_error = match body.get("error") {
        Some(Value::String(text)) => Some(text.as_str()),
        Some(Value::Object(inner)) => inner.get("message").and_then(Value::as_str),
        _ => None,
    };
    from_error
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Public URLs in an upload response: `url`, `urls`, or `files[].url`.
pub(super) fn upload_urls(body: &Value) -> Vec<String> {
    if let Some(url) = body.get("url").and_then(Value::as_str) {
        return vec![url.to_owned()];
    }
    if let Some(urls) = body.get("urls").and_then(Value::as_array) {
        return urls
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect();
    }
    body.get("files")
        .and_then(Value::as_array)
        .map(|files| {
            files
                .iter()
                .filter_map(|file| file.get("url").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a success body; an empty body reads as JSON `null`.
pub(super) fn json_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}
