//! One illustrative hexagonal service: a `Widget` CRUD core plus the admin
//! surface (feature flags, user roles, queue management) that sits beside
//! it. `domain` and `app` hold business logic; `infra` and `transport` are
//! the adapters either side of the port boundary; `admin` is its own thin
//! vertical slice reusing the same `AuditLog` port.

pub mod admin;
pub mod app;
pub mod bootstrap;
pub mod domain;
pub mod infra;
pub mod transport;
