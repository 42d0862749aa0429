//! Strict-JSON extraction.
//!
//! `axum::Json` silently ignores unknown fields and trailing data. `StrictJson<T>`
//! rejects both, returning a `VALIDATION_ERROR` [`ProblemDetail`] that names the
//! offending field, rather than a generic parse-error string.
//!
//! Decoding is two passes over the same bytes: a permissive pass into
//! `serde_json::Value` gives us the document shape to diff against `T`'s field
//! names when the strict pass fails, so the error can point at the specific
//! unknown key instead of just "unknown field". The strict pass decodes
//! straight into `T`, which the caller derives with `#[serde(deny_unknown_fields)]`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::problem::{ProblemDetail, ValidationFieldError};

/// Drop-in replacement for `axum::Json<T>` that rejects unknown fields and
/// trailing data instead of silently accepting them.
#[derive(Debug, Clone)]
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemDetail;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_string();
        let trace_id = req
            .extensions()
            .get::<tower_http::request_id::RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| crate::ids::RequestId::new().to_string());

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ProblemDetail::new(
                "https://errors.example.com",
                "VALIDATION_ERROR",
                format!("failed to read request body: {e}"),
                instance.clone(),
                trace_id.clone(),
            )
        })?;

        if bytes.is_empty() {
            return Err(ProblemDetail::new(
                "https://errors.example.com",
                "VALIDATION_ERROR",
                "request body is empty",
                instance,
                trace_id,
            ));
        }

        let mut strict_de = serde_json::Deserializer::from_slice(&bytes);
        match serde_path_to_error::deserialize::<_, T>(&mut strict_de) {
            Ok(value) => {
                // A trailing non-whitespace byte after the first JSON value means
                // the body contained more than one document (e.g. `{}{}` or `{}x`).
                if has_trailing_data(&bytes) {
                    return Err(trailing_data_error(instance, trace_id));
                }
                Ok(StrictJson(value))
            }
            Err(err) => Err(strict_decode_error(&bytes, err, instance, trace_id)),
        }
    }
}

/// Checks whether anything but whitespace follows the first JSON value in `bytes`.
fn has_trailing_data(bytes: &[u8]) -> bool {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(_)) => stream.next().is_some(),
        _ => false,
    }
}

fn trailing_data_error(instance: String, trace_id: String) -> ProblemDetail {
    ProblemDetail::new(
        "https://errors.example.com",
        "VALIDATION_ERROR",
        "request body contains trailing data after the JSON document",
        instance,
        trace_id,
    )
    .with_validation_errors(vec![ValidationFieldError {
        field: "$".to_string(),
        message: "unexpected trailing data".to_string(),
    }])
}

/// Turns a `serde_path_to_error` failure into a `ProblemDetail`, naming the
/// offending field when the underlying error is an unknown-field rejection.
fn strict_decode_error(
    bytes: &[u8],
    err: serde_path_to_error::Error<serde_json::Error>,
    instance: String,
    trace_id: String,
) -> ProblemDetail {
    let path = err.path().to_string();
    let inner = err.into_inner();
    let message = inner.to_string();

    let field = if path.is_empty() || path == "." {
        unknown_field_name(&message, bytes)
    } else {
        path
    };

    ProblemDetail::new(
        "https://errors.example.com",
        "VALIDATION_ERROR",
        format!("request body failed validation: {message}"),
        instance,
        trace_id,
    )
    .with_validation_errors(vec![ValidationFieldError { field, message }])
}

/// `serde`'s "unknown field `x`, expected ..." message carries the field name
/// inline but no `Path`, since the rejection happens before a path segment is
/// pushed. Pull it out of the message; fall back to the raw document keys.
fn unknown_field_name(message: &str, bytes: &[u8]) -> String {
    if let Some(start) = message.find("unknown field `") {
        let rest = &message[start + "unknown field `".len()..];
        if let Some(end) = rest.find('`') {
            return rest[..end].to_string();
        }
    }
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| v.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>().join(",")))
        .unwrap_or_else(|| "$".to_string())
}

impl<T> axum::response::IntoResponse for StrictJson<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

#[allow(dead_code)]
const _: StatusCode = StatusCode::BAD_REQUEST;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Widget {
        name: String,
        quantity: u32,
    }

    async fn extract(body: &'static str) -> Result<StrictJson<Widget>, ProblemDetail> {
        let req = HttpRequest::builder()
            .uri("/v1/widgets")
            .body(Body::from(body))
            .unwrap();
        StrictJson::<Widget>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn accepts_well_formed_body() {
        let widget = extract(r#"{"name":"bolt","quantity":3}"#).await.unwrap();
        assert_eq!(widget.0.name, "bolt");
        assert_eq!(widget.0.quantity, 3);
    }

    #[tokio::test]
    async fn rejects_unknown_field_and_names_it() {
        let err = extract(r#"{"name":"bolt","quantity":3,"color":"red"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
        let fields = err.validation_errors.unwrap();
        assert_eq!(fields[0].field, "color");
    }

    #[tokio::test]
    async fn rejects_trailing_data() {
        let err = extract(r#"{"name":"bolt","quantity":3}{"extra":true}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_empty_body() {
        let err = extract("").await.unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }
}
