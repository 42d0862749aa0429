//! 404 handler for routes that match no registered handler.

use axum::http::{HeaderMap, Uri};

use hexaframe_service::problem::ProblemDetail;

use super::trace_id;

const ERROR_BASE_URL: &str = "https://errors.hexaframe.example.com";

/// Mounted via `Router::fallback`; returns an RFC 7807 body naming the
/// unmatched path as `instance` instead of axum's bare 404.
pub async fn not_found_fallback(headers: HeaderMap, uri: Uri) -> ProblemDetail {
    ProblemDetail::new(
        ERROR_BASE_URL,
        "NOT_FOUND",
        "the requested resource does not exist",
        uri.path(),
        trace_id(&headers),
    )
}
