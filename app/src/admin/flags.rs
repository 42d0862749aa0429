//! Feature flags: list/get/enable/disable, audited on every mutation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use hexaframe_service::domain::{AppError, DomainError};
use serde_json::json;

use super::audit_log::AuditEvent;
use crate::admin::AdminDeps;
use crate::app::ActorContext;

const OP: &str = "feature_flags";

/// In-memory flag store, defaulting every unknown flag to `false` on first
/// `enable`/`disable` rather than requiring pre-registration.
#[derive(Default)]
pub struct FeatureFlagStore {
    flags: RwLock<BTreeMap<String, bool>>,
}

impl FeatureFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_raw(&self) -> Vec<(String, bool)> {
        self.flags
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    fn get_raw(&self, name: &str) -> Option<bool> {
        self.flags.read().unwrap().get(name).copied()
    }

    fn set_raw(&self, name: &str, enabled: bool) {
        self.flags
            .write()
            .unwrap()
            .insert(name.to_string(), enabled);
    }
}

impl AdminDeps {
    pub async fn list_flags(&self) -> Vec<(String, bool)> {
        self.flags.list_raw()
    }

    pub async fn get_flag(&self, name: &str) -> Result<bool, AppError> {
        self.flags.get_raw(name).ok_or_else(|| {
            AppError::from_domain(
                DomainError::NotFound {
                    entity: "feature_flag".into(),
                    id: name.to_string(),
                },
                OP,
            )
        })
    }

    pub async fn enable_flag(&self, name: &str, ctx: &ActorContext) -> Result<(), AppError> {
        self.flags.set_raw(name, true);
        self.audit
            .record(AuditEvent::new(
                "flag.enabled",
                ctx.actor_id.clone(),
                "feature_flag",
                name,
                json!({}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }

    pub async fn disable_flag(&self, name: &str, ctx: &ActorContext) -> Result<(), AppError> {
        self.flags.set_raw(name, false);
        self.audit
            .record(AuditEvent::new(
                "flag.disabled",
                ctx.actor_id.clone(),
                "feature_flag",
                name,
                json!({}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminDeps;

    #[tokio::test]
    async fn get_unknown_flag_is_not_found() {
        let deps = AdminDeps::new();
        let err = deps.get_flag("dark-mode").await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn enable_then_get_then_disable_round_trips() {
        let deps = AdminDeps::new();
        let ctx = ActorContext::new(Some("admin:1".into()), "req-1");
        deps.enable_flag("dark-mode", &ctx).await.unwrap();
        assert!(deps.get_flag("dark-mode").await.unwrap());
        deps.disable_flag("dark-mode", &ctx).await.unwrap();
        assert!(!deps.get_flag("dark-mode").await.unwrap());
        assert_eq!(deps.audit.recent(10).await.len(), 2);
    }
}
