//! Domain-layer error sentinel and the `AppError` shape the app layer
//! converts into.
//!
//! This module is held to the layer-boundary contract enforced by
//! `tests/layer_boundaries.rs`: it imports only the standard library, no
//! framework or `async-trait`/`thiserror` dependency, so code built on top of
//! it (app, transport) never has to reach back through a framework type to
//! understand what went wrong in the domain.

use std::fmt;

/// A domain-level error sentinel, independent of how it will eventually be
/// reported (HTTP status, job failure, etc). Transport resolves these to a
/// `Code`/status pair; the domain itself knows nothing about HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The requested entity does not exist.
    NotFound { entity: String, id: String },
    /// A uniqueness constraint would be violated.
    Conflict { entity: String, reason: String },
    /// The caller is not authenticated.
    Unauthorized,
    /// The caller is authenticated but not permitted to perform this action.
    Forbidden,
    /// Input failed domain-level validation (distinct from wire-format
    /// validation, which is the transport layer's `StrictJson` concern).
    Validation { field: String, message: String },
    /// A downstream dependency (store, broker, upstream service) failed.
    DependencyFailure(String),
    /// The calling context was cancelled or timed out.
    Cancelled,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Conflict { entity, reason } => write!(f, "{entity} conflict: {reason}"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Validation { field, message } => write!(f, "validation failed on {field}: {message}"),
            Self::DependencyFailure(msg) => write!(f, "dependency failure: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for DomainError {}

/// The app-layer error shape every use case returns. Carries the
/// `UPPER_SNAKE` code transport maps to a status via `problem::status_for_code`,
/// a safe-to-log message, the originating error (if any), and the operation
/// name for observability -- mirrors `repository::RepositoryError`'s
/// op/kind/message shape one layer up.
#[derive(Debug)]
pub struct AppError {
    pub code: &'static str,
    pub message: String,
    pub op: &'static str,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl AppError {
    pub fn new(code: &'static str, message: impl Into<String>, op: &'static str) -> Self {
        Self {
            code,
            message: message.into(),
            op,
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert a `DomainError` sentinel into its app-layer shape, assigning
    /// the `Code` transport will map to an HTTP status.
    pub fn from_domain(err: DomainError, op: &'static str) -> Self {
        let code = match &err {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Conflict { .. } => "CONFLICT",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Forbidden => "FORBIDDEN",
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::DependencyFailure(_) => "SERVICE_UNAVAILABLE",
            DomainError::Cancelled => "INTERNAL_ERROR",
        };
        let message = err.to_string();
        Self::new(code, message, op).with_source(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.op, self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found_code() {
        let err = AppError::from_domain(
            DomainError::NotFound {
                entity: "widget".into(),
                id: "123".into(),
            },
            "get_widget",
        );
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("widget"));
    }

    #[test]
    fn dependency_failure_maps_to_service_unavailable() {
        let err = AppError::from_domain(DomainError::DependencyFailure("redis down".into()), "enqueue");
        assert_eq!(err.code, "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn source_chain_is_preserved() {
        let err = AppError::from_domain(DomainError::Forbidden, "delete_widget");
        assert!(std::error::Error::source(&err).is_some());
    }
}
