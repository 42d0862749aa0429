//! RFC 7807 problem details for error responses
//!
//! [`ProblemDetail`] is the canonical shape for every error the HTTP pipeline
//! returns. It is produced from a `Code` (an `UPPER_SNAKE` identifier, never a
//! language-level type name) via a single central map from [`status_for_code`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::envelope::ResponseMeta;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFieldError {
    /// Dotted/bracketed path to the offending field (e.g. `"email"`, `"items[2].sku"`).
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

/// RFC 7807 `application/problem+json` body.
///
/// `type` is a URI built from a configurable base URL and a slug derived from
/// `code`; `status` is looked up from `code` via [`status_for_code`] — never
/// set independently, so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    pub code: String,
    #[serde(rename = "validationErrors", skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationFieldError>>,
    pub meta: ResponseMeta,
}

/// Generic internal-error detail. 5xx responses never carry the real error
/// message; it is logged instead, keyed by `meta.trace_id`.
const INTERNAL_DETAIL: &str = "An internal error occurred. Reference the trace ID for support.";

/// Resolve `(HTTP status, title)` for an `UPPER_SNAKE` error code, per the
/// central table. Unknown codes map to 500/"Internal Server Error" — the
/// table is intentionally the only place this mapping exists.
pub fn status_for_code(code: &str) -> (StatusCode, &'static str) {
    match code {
        "USER_NOT_FOUND" | "NOT_FOUND" => (StatusCode::NOT_FOUND, "Not Found"),
        "EMAIL_EXISTS" | "CONFLICT" => (StatusCode::CONFLICT, "Conflict"),
        "VALIDATION_ERROR" => (StatusCode::BAD_REQUEST, "Validation Error"),
        "UNAUTHORIZED" => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        "FORBIDDEN" => (StatusCode::FORBIDDEN, "Forbidden"),
        "RATE_LIMITED" => (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"),
        "SERVICE_UNAVAILABLE" => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    }
}

impl ProblemDetail {
    /// Build a problem detail. `detail` is replaced with a constant message
    /// for 5xx codes; the caller's `detail` is logged instead of returned.
    pub fn new(
        base_url: &str,
        code: impl Into<String>,
        detail: impl Into<String>,
        instance: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        let code = code.into();
        let (status, title) = status_for_code(&code);
        let slug = code.to_lowercase().replace('_', "-");
        let raw_detail = detail.into();

        let safe_detail = if status.is_server_error() {
            tracing::error!(code = %code, detail = %raw_detail, "internal error mapped to problem detail");
            INTERNAL_DETAIL.to_string()
        } else {
            raw_detail
        };

        Self {
            type_uri: format!("{}/{}", base_url.trim_end_matches('/'), slug),
            title: title.to_string(),
            status: status.as_u16(),
            detail: safe_detail,
            instance: instance.into(),
            code,
            validation_errors: None,
            meta: ResponseMeta::new(trace_id),
        }
    }

    /// Attach field-level validation errors (only meaningful for `VALIDATION_ERROR`).
    pub fn with_validation_errors(mut self, errors: Vec<ValidationFieldError>) -> Self {
        self.validation_errors = Some(errors);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetail {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(status_for_code("NOT_FOUND").0, StatusCode::NOT_FOUND);
        assert_eq!(status_for_code("EMAIL_EXISTS").0, StatusCode::CONFLICT);
        assert_eq!(status_for_code("RATE_LIMITED").0, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn unknown_code_is_500() {
        let (status, title) = status_for_code("SOMETHING_WEIRD");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(title, "Internal Server Error");
    }

    #[test]
    fn server_error_detail_never_leaks() {
        let problem = ProblemDetail::new(
            "https://errors.example.com",
            "INTERNAL_ERROR",
            "panic: index out of bounds at db.rs:42",
            "/v1/users/1",
            "trace-abc",
        );
        assert_eq!(problem.detail, INTERNAL_DETAIL);
        assert!(!problem.detail.contains("index out of bounds"));
    }

    #[test]
    fn validation_error_keeps_detail_and_fields() {
        let problem = ProblemDetail::new(
            "https://errors.example.com",
            "VALIDATION_ERROR",
            "request failed validation",
            "/v1/users",
            "trace-def",
        )
        .with_validation_errors(vec![ValidationFieldError {
            field: "email".into(),
            message: "must be a valid email address".into(),
        }]);

        assert_eq!(problem.status, 400);
        assert_eq!(problem.validation_errors.as_ref().unwrap()[0].field, "email");
    }

    #[test]
    fn type_uri_slug_is_kebab_case() {
        let problem = ProblemDetail::new(
            "https://errors.example.com/",
            "USER_NOT_FOUND",
            "no such user",
            "/v1/users/9",
            "trace-ghi",
        );
        assert_eq!(problem.type_uri, "https://errors.example.com/user-not-found");
    }
}
