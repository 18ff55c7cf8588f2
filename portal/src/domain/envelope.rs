//! Defensive decoding of backend list responses.
//!
//! Endpoints are inconsistent about where they put their rows. A response
//! may be a bare array, or an object holding the array under `rows`,
//! `items`, `data` (possibly `data.<entity>`) or the entity-named key. The
//! first array found wins; anything else is read as an empty collection.
//! Rows that fail to decode are skipped with a warning rather than failing
//! the whole screen.

use pagination::{Cursor, Page};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

const GENERIC_KEYS: [&str; 3] = ["rows", "items", "data"];
const CURSOR_KEYS: [&str; 2] = ["nextCursor", "next_cursor"];

/// Locate the row array in a response body.
///
/// # Examples
/// ```
/// use portal::domain::envelope::extract_rows;
/// use serde_json::json;
///
/// let body = json!({"data": {"sales": [{"id": 1}]}});
/// assert_eq!(extract_rows(&body, "sales").len(), 1);
/// assert!(extract_rows(&json!({"ok": true}), "sales").is_empty());
/// ```
pub fn extract_rows<'a>(body: &'a Value, collection_key: &str) -> &'a [Value] {
    match body {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => {
            let direct = GENERIC_KEYS
                .iter()
                .chain(std::iter::once(&collection_key))
                .find_map(|key| map.get(*key).and_then(Value::as_array));
            if let Some(rows) = direct {
                return rows.as_slice();
            }
            match map.get("data") {
                Some(data) if data.is_object() => extract_rows(data, collection_key),
                _ => &[],
            }
        }
        _ => &[],
    }
}

/// Read the continuation cursor, if the endpoint paginates.
///
/// Numeric cursors are string-coerced; blank or missing cursors mean there
/// is nothing more to load.
pub fn extract_next_cursor(body: &Value) -> Option<Cursor> {
    let map = body.as_object()?;
    let raw = CURSOR_KEYS
        .iter()
        .find_map(|key| map.get(*key))
        .or_else(|| map.get("data").and_then(|data| data.get("nextCursor")))?;
    match raw {
        Value::String(text) => Cursor::from_optional(Some(text.as_str())),
        Value::Number(number) => Cursor::from_optional(Some(number.to_string().as_str())),
        _ => None,
    }
}

/// Decode a response body into a typed page.
pub fn decode_page<T: DeserializeOwned>(body: &Value, collection_key: &str) -> Page<T> {
    let rows = decode_rows(body, collection_key);
    Page::new(rows, extract_next_cursor(body))
}

/// Decode the rows of a response body, skipping rows that do not fit `T`.
pub fn decode_rows<T: DeserializeOwned>(body: &Value, collection_key: &str) -> Vec<T> {
    extract_rows(body, collection_key)
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match T::deserialize(row) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(%error, index, collection = collection_key, "skipping undecodable row");
                None
            }
        })
        .collect()
}

/// Decode a single-object response, accepting the entity wrapped under its
/// singular key or `data`.
pub fn decode_object<T: DeserializeOwned>(body: &Value, key: &str) -> Option<T> {
    [body.get(key), body.get("data"), Some(body)]
        .into_iter()
        .flatten()
        .find_map(|candidate| T::deserialize(candidate).ok())
}
