//! Admin operations: user management, settings reload, backup, and the
//! audit log. Admin routes vary the most across deployments, so nearly
//! everything here probes a candidate list.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::normalize::extract_rows;
use crate::types::{AdminUser, AuditLogEntry};

use super::client::ApiClient;

const USERS_LIST_PATHS: &[&str] = &[
    "/api/admin/users",
    "/api/users",
    "/api/user/all",
    "/api/user/list",
];

const USER_CREATE_PATHS: &[&str] = &["/api/admin/users", "/api/users", "/api/user/create"];

const SETTINGS_RELOAD_PATHS: &[&str] = &[
    "/api/admin/settings/reload",
    "/api/settings/reload",
    "/api/admin/settings/sync",
];

const BACKUP_PATHS: &[&str] = &["/api/admin/backup", "/api/admin/maintenance/backup"];

const AUDIT_PATHS: &[&str] = &["/api/admin/audit-log", "/api/audit/logs", "/api/admin/audit"];

impl ApiClient {
    /// All users. When no list route exists, falls back to the signed-in
    /// profile as a one-element list so the panel is never empty.
    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        match self.get_first(USERS_LIST_PATHS).await {
            Ok(v) => Ok(extract_rows(&v).iter().map(AdminUser::from_value).collect()),
            Err(e) => {
                log::debug!("no user list route, falling back to /api/user/me: {}", e);
                let me = self.get_json("/api/user/me").await?;
                let profile = me.get("user").unwrap_or(&me);
                Ok(vec![AdminUser::from_value(profile)])
            }
        }
    }

    pub async fn admin_create_user(&self, user: &Value) -> Result<Value, ApiError> {
        self.post_first(USER_CREATE_PATHS, user).await
    }

    pub async fn admin_set_role(&self, user_id: &str, role: &str) -> Result<Value, ApiError> {
        self.put_json(
            &format!("/api/admin/users/{}/role", user_id),
            &json!({ "role": role }),
        )
        .await
    }

    pub async fn admin_set_status(&self, user_id: &str, status: &str) -> Result<Value, ApiError> {
        self.put_json(
            &format!("/api/admin/users/{}/status", user_id),
            &json!({ "status": status }),
        )
        .await
    }

    pub async fn admin_reload_settings(&self) -> Result<Value, ApiError> {
        self.post_first(SETTINGS_RELOAD_PATHS, &json!({})).await
    }

    /// Trigger a backend backup; returns the backup file name.
    pub async fn admin_backup(&self) -> Result<String, ApiError> {
        let v = self.post_first(BACKUP_PATHS, &json!({})).await?;
        let name = v
            .get("filename")
            .or_else(|| v.get("file"))
            .and_then(Value::as_str)
            .unwrap_or("backup");
        Ok(name.to_string())
    }

    pub async fn admin_audit_log(&self, limit: usize) -> Result<Vec<AuditLogEntry>, ApiError> {
        let paths: Vec<String> = AUDIT_PATHS
            .iter()
            .map(|p| format!("{}?limit={}", p, limit))
            .collect();
        let v = self.get_first(&paths).await?;
        Ok(extract_rows(&v)
            .iter()
            .enumerate()
            .map(|(i, row)| AuditLogEntry::from_value(row, i))
            .collect())
    }
}
