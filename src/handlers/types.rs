//! # Common API Types
//!
//! Shared response structures and pagination utilities used across the
//! record handlers.

use axum::http::{HeaderName, StatusCode, header::LOCATION};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cursor::encode_cursor;
use crate::repositories::Paged;

/// Generic paginated response wrapper for list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// List of items for the current page
    pub data: Vec<T>,
    /// Opaque cursor for fetching the next page (null if this is the last page)
    pub next_cursor: Option<String>,
    /// Convenience field indicating if more pages exist
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_more = next_cursor.is_some();
        Self {
            data,
            next_cursor,
            has_more,
        }
    }

    /// Converts a repository page, encoding its continuation as a cursor
    pub fn from_page<R>(page: Paged<R>, convert: impl FnMut(R) -> T) -> Self {
        let next_cursor = page.next_after.map(encode_cursor);
        Self::new(page.items.into_iter().map(convert).collect(), next_cursor)
    }
}

/// `201 Created` with a `Location` header pointing at the new record
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_page_encodes_continuation() {
        let page = Paged {
            items: vec![1, 2],
            next_after: Some(2),
        };
        let response = PaginatedResponse::from_page(page, |id: i32| id * 10);

        assert_eq!(response.data, vec![10, 20]);
        assert!(response.has_more);
        assert_eq!(response.next_cursor, Some(encode_cursor(2)));
    }

    #[test]
    fn test_final_page_has_no_cursor() {
        let page: Paged<i32> = Paged {
            items: vec![],
            next_after: None,
        };
        let response = PaginatedResponse::from_page(page, |id| id);

        assert!(!response.has_more);
        assert!(response.next_cursor.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["next_cursor"], serde_json::Value::Null);
    }
}
