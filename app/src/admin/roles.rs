//! User roles: get/set/add/remove, gated by UUID validation and a role
//! allowlist, audited on every mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use hexaframe_service::domain::{AppError, DomainError};
use serde_json::json;
use uuid::Uuid;

use super::audit_log::AuditEvent;
use crate::admin::AdminDeps;
use crate::app::ActorContext;

const OP: &str = "user_roles";

/// Roles this deployment recognizes. Anything else is rejected at the
/// boundary rather than silently stored.
pub const ALLOWED_ROLES: &[&str] = &["admin", "operator", "viewer"];

#[derive(Default)]
pub struct RoleStore {
    roles: RwLock<BTreeMap<Uuid, BTreeSet<String>>>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_raw(&self, user_id: Uuid) -> Vec<String> {
        self.roles
            .read()
            .unwrap()
            .get(&user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn set_raw(&self, user_id: Uuid, roles: BTreeSet<String>) {
        self.roles.write().unwrap().insert(user_id, roles);
    }

    fn add_raw(&self, user_id: Uuid, role: &str) {
        self.roles
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(role.to_string());
    }

    fn remove_raw(&self, user_id: Uuid, role: &str) {
        if let Some(set) = self.roles.write().unwrap().get_mut(&user_id) {
            set.remove(role);
        }
    }
}

fn parse_user_id(user_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(user_id).map_err(|_| {
        AppError::from_domain(
            DomainError::Validation {
                field: "userId".into(),
                message: "must be a valid UUID".into(),
            },
            OP,
        )
    })
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if ALLOWED_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::from_domain(
            DomainError::Validation {
                field: "role".into(),
                message: format!("must be one of {ALLOWED_ROLES:?}"),
            },
            OP,
        ))
    }
}

impl AdminDeps {
    pub async fn get_roles(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.roles.get_raw(user_id))
    }

    pub async fn set_roles(
        &self,
        user_id: &str,
        roles: Vec<String>,
        ctx: &ActorContext,
    ) -> Result<(), AppError> {
        let user_id = parse_user_id(user_id)?;
        for role in &roles {
            validate_role(role)?;
        }
        self.roles.set_raw(user_id, roles.iter().cloned().collect());
        self.audit
            .record(AuditEvent::new(
                "user.roles_set",
                ctx.actor_id.clone(),
                "user",
                user_id.to_string(),
                json!({"roles": roles}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }

    pub async fn add_role(
        &self,
        user_id: &str,
        role: &str,
        ctx: &ActorContext,
    ) -> Result<(), AppError> {
        let user_id = parse_user_id(user_id)?;
        validate_role(role)?;
        self.roles.add_raw(user_id, role);
        self.audit
            .record(AuditEvent::new(
                "user.role_added",
                ctx.actor_id.clone(),
                "user",
                user_id.to_string(),
                json!({"role": role}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }

    pub async fn remove_role(
        &self,
        user_id: &str,
        role: &str,
        ctx: &ActorContext,
    ) -> Result<(), AppError> {
        let user_id = parse_user_id(user_id)?;
        validate_role(role)?;
        self.roles.remove_raw(user_id, role);
        self.audit
            .record(AuditEvent::new(
                "user.role_removed",
                ctx.actor_id.clone(),
                "user",
                user_id.to_string(),
                json!({"role": role}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }
}
