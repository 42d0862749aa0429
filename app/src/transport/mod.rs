//! Inbound HTTP adapters. Each submodule builds its own fully-resolved
//! `Router<()>` with state already attached, ready to be merged inside a
//! `VersionedApiBuilder::add_version` closure.

mod admin;
mod fallback;
mod widgets;

pub use admin::admin_routes;
pub use fallback::not_found_fallback;
pub use widgets::widget_routes;

/// Reads the request-scoped id set by
/// `hexaframe_service::middleware::request_id_layer` (an `x-request-id`
/// header carrying a `req_`-prefixed TypeID). Falls back to a freshly
/// generated id when no such header is present -- e.g. in unit tests that
/// exercise a transport router directly, without the middleware stack
/// `bin/api.rs` layers on top.
pub(crate) fn trace_id(headers: &axum::http::HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| hexaframe_service::ids::RequestId::new().to_string())
}
