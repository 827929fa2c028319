//! # Cursor Utilities
//!
//! Opaque pagination cursors. A cursor carries the id of the last record on
//! the previous page; lists are ordered by id ascending.

use crate::error::ApiError;
use axum::http::StatusCode;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Longest cursor string accepted from a client.
const MAX_CURSOR_LEN: usize = 256;

/// Payload behind the opaque cursor string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorData {
    pub after_id: i32,
}

/// Encode the last id of a page as an opaque base64 string
pub fn encode_cursor(after_id: i32) -> String {
    let json = serde_json::json!({ "after_id": after_id }).to_string();
    base64::engine::general_purpose::STANDARD.encode(json.as_bytes())
}

fn invalid(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
}

/// Decode cursor data from an opaque base64 string with validation
pub fn decode_cursor(cursor: &str) -> Result<CursorData, ApiError> {
    if cursor.len() > MAX_CURSOR_LEN {
        return Err(invalid("cursor is too long"));
    }

    if cursor.is_empty() {
        return Err(invalid("cursor cannot be empty"));
    }

    if !cursor
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
    {
        return Err(invalid("cursor contains invalid characters"));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(cursor)
        .map_err(|_| invalid("cursor is not valid base64"))?;

    let json =
        String::from_utf8(decoded).map_err(|_| invalid("cursor contains invalid UTF-8 data"))?;

    let cursor_data: CursorData = serde_json::from_str(&json)
        .map_err(|_| invalid("cursor contains invalid JSON structure"))?;

    if cursor_data.after_id < 1 {
        return Err(invalid("cursor contains invalid ID"));
    }

    Ok(cursor_data)
}
