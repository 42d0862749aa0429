//! Canonical `{data, error, meta}` response envelope.
//!
//! This is the response contract resolved by the design notes' open
//! question: sources that offer a legacy `{success, data}` wrapper alongside
//! `{data, error, meta}` pick the latter exclusively. [`crate::responses`]'s
//! builders remain available for handlers that don't need the full envelope
//! shape (e.g. 204 No Content); `Envelope<T>` is additive, not a replacement.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};

/// Fallback trace ID used when no request-scoped trace ID is available
/// (tracing disabled, or the envelope is built outside request scope).
pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// Pagination metadata, present on list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let page_size = page_size.clamp(1, Self::MAX_PAGE_SIZE);
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items as f64) / (page_size as f64)).ceil() as u32
        };
        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// Metadata carried by every envelope. `trace_id` is always present, falling
/// back to [`UNKNOWN_TRACE_ID`] when tracing is disabled or no request scope
/// exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(rename = "traceId")]
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl ResponseMeta {
    pub fn new(trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        let trace_id = if trace_id.is_empty() {
            UNKNOWN_TRACE_ID.to_string()
        } else {
            trace_id
        };
        Self {
            trace_id,
            pagination: None,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TRACE_ID)
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Canonical success envelope. Exactly one of `data`/the `error` variant is
/// ever constructed — this type only ever represents the success case;
/// failures are represented by [`crate::problem::ProblemDetail`], which is a
/// distinct `IntoResponse` type returned from the `Err` arm of a handler's
/// `Result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T> Envelope<T> {
    pub fn new(data: T, trace_id: impl Into<String>) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(trace_id),
        }
    }

    pub fn paginated(data: T, trace_id: impl Into<String>, pagination: Pagination) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(trace_id).with_pagination(pagination),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_trace_id_used_when_empty() {
        let meta = ResponseMeta::new("");
        assert_eq!(meta.trace_id, UNKNOWN_TRACE_ID);
    }

    #[test]
    fn envelope_roundtrips_through_json() {
        let envelope = Envelope::new(vec![1, 2, 3], "trace-123");
        let json = serde_json::to_value(&envelope).unwrap();
        let data: Vec<i32> = serde_json::from_value(json["data"].clone()).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(json["meta"]["traceId"], "trace-123");
    }

    #[test]
    fn pagination_computes_total_pages() {
        let p = Pagination::new(1, 20, 45);
        assert_eq!(p.total_pages, 3);
        let empty = Pagination::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn pagination_clamps_page_size() {
        let p = Pagination::new(1, 1000, 10);
        assert_eq!(p.page_size, Pagination::MAX_PAGE_SIZE);
    }
}
