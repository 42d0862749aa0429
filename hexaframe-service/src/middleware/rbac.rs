//! RBAC middleware factories atop the existing `Claims` extraction.
//!
//! [`RequireRole`]/[`RequirePermission`] read the `Claims` request extension
//! (already populated by whichever auth middleware ran earlier in the
//! pipeline — PASETO or JWT) and return 403 on mismatch, using
//! [`crate::middleware::token::Claims::has_role`]/`has_permission`.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::token::Claims;
use crate::problem::ProblemDetail;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RbacError {
    #[error("no authenticated actor in request context")]
    Unauthenticated,
    #[error("actor lacks required role: {0}")]
    MissingRole(String),
    #[error("actor lacks required permission: {0}")]
    MissingPermission(String),
}

impl RbacError {
    fn into_problem(self, instance: &str) -> ProblemDetail {
        let code = match &self {
            RbacError::Unauthenticated => "UNAUTHORIZED",
            RbacError::MissingRole(_) | RbacError::MissingPermission(_) => "FORBIDDEN",
        };
        ProblemDetail::new(
            "https://errors.hexaframe.example.com",
            code,
            self.to_string(),
            instance,
            "unknown",
        )
    }
}

/// Middleware requiring `role` on the request's `Claims`.
#[derive(Clone)]
pub struct RequireRole(pub String);

impl RequireRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub async fn middleware(
        State(this): State<Self>,
        request: Request<Body>,
        next: Next,
    ) -> Response {
        let instance = request.uri().path().to_string();
        match request.extensions().get::<Claims>().cloned() {
            None => RbacError::Unauthenticated.into_problem(&instance).into_response(),
            Some(claims) if claims.has_role(&this.0) => next.run(request).await,
            Some(_) => RbacError::MissingRole(this.0.clone())
                .into_problem(&instance)
                .into_response(),
        }
    }
}

/// Middleware requiring `permission` on the request's `Claims`.
#[derive(Clone)]
pub struct RequirePermission(pub String);

impl RequirePermission {
    pub fn new(permission: impl Into<String>) -> Self {
        Self(permission.into())
    }

    pub async fn middleware(
        State(this): State<Self>,
        request: Request<Body>,
        next: Next,
    ) -> Response {
        let instance = request.uri().path().to_string();
        match request.extensions().get::<Claims>().cloned() {
            None => RbacError::Unauthenticated.into_problem(&instance).into_response(),
            Some(claims) if claims.has_permission(&this.0) => next.run(request).await,
            Some(_) => RbacError::MissingPermission(this.0.clone())
                .into_problem(&instance)
                .into_response(),
        }
    }
}

/// Convenience constructor matching the factory-function naming in the
/// design notes (`RequireRole(role)`).
pub fn require_role(role: impl Into<String>) -> RequireRole {
    RequireRole::new(role)
}

/// Convenience constructor matching the factory-function naming in the
/// design notes (`RequirePermission(perm)`).
pub fn require_permission(permission: impl Into<String>) -> RequirePermission {
    RequirePermission::new(permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mismatch_maps_to_forbidden() {
        let problem = RbacError::MissingRole("admin".into()).into_problem("/v1/admin/flags");
        assert_eq!(problem.code, "FORBIDDEN");
        assert_eq!(problem.status, 403);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let problem = RbacError::Unauthenticated.into_problem("/v1/admin/flags");
        assert_eq!(problem.code, "UNAUTHORIZED");
        assert_eq!(problem.status, 401);
    }

    #[test]
    fn factory_functions_build_middleware_state() {
        let role_mw = require_role("admin");
        assert_eq!(role_mw.0, "admin");
        let perm_mw = require_permission("widgets:write");
        assert_eq!(perm_mw.0, "widgets:write");
    }
}
