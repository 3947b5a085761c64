//! Supervisor operations. Supervisors are role-scoped: an HR supervisor
//! sees onboarding, finance sees expenses, logistics sees stationery.
//! The role maps directly to a URL prefix on the backend.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::normalize::{normalize, sort_newest_first};
use crate::types::{Domain, RequestRow};

use super::client::ApiClient;

/// The three supervisor roles the backend recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorRole {
    Hr,
    Finance,
    Logistics,
}

impl SupervisorRole {
    /// URL segment, e.g. `/api/hr/requests`.
    pub fn as_path(&self) -> &'static str {
        match self {
            SupervisorRole::Hr => "hr",
            SupervisorRole::Finance => "finance",
            SupervisorRole::Logistics => "logistics",
        }
    }

    /// Which domain this role's request list is normalized as.
    pub fn domain(&self) -> Domain {
        match self {
            SupervisorRole::Hr => Domain::Onboarding,
            SupervisorRole::Finance => Domain::Expense,
            SupervisorRole::Logistics => Domain::Stationery,
        }
    }

    /// From a user's role string; non-supervisor roles map to None.
    pub fn parse(role: &str) -> Option<Self> {
        match role.trim().to_lowercase().as_str() {
            "hr" => Some(SupervisorRole::Hr),
            "finance" => Some(SupervisorRole::Finance),
            "logistics" => Some(SupervisorRole::Logistics),
            _ => None,
        }
    }
}

impl ApiClient {
    pub async fn supervisor_stats(&self, role: SupervisorRole) -> Result<Value, ApiError> {
        self.get_json(&format!("/api/{}/stats", role.as_path())).await
    }

    /// Role-scoped request queue, newest first.
    pub async fn supervisor_requests(
        &self,
        role: SupervisorRole,
        organization_id: u64,
    ) -> Result<Vec<RequestRow>, ApiError> {
        let v = self
            .get_with_params(
                &format!("/api/{}/requests", role.as_path()),
                &[("organization_id", organization_id.to_string())],
            )
            .await?;
        let mut rows = normalize(role.domain(), &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn supervisor_approve(
        &self,
        role: SupervisorRole,
        request_id: &str,
    ) -> Result<Value, ApiError> {
        self.post_json(
            &format!("/api/{}/requests/{}/approve", role.as_path(), request_id),
            &json!({}),
        )
        .await
    }

    pub async fn supervisor_reject(
        &self,
        role: SupervisorRole,
        request_id: &str,
    ) -> Result<Value, ApiError> {
        self.post_json(
            &format!("/api/{}/requests/{}/reject", role.as_path(), request_id),
            &json!({}),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_mapping() {
        assert_eq!(SupervisorRole::parse("HR"), Some(SupervisorRole::Hr));
        assert_eq!(SupervisorRole::parse("finance"), Some(SupervisorRole::Finance));
        assert_eq!(SupervisorRole::parse(" logistics "), Some(SupervisorRole::Logistics));
        assert_eq!(SupervisorRole::parse("employee"), None);
        assert_eq!(SupervisorRole::Hr.domain(), Domain::Onboarding);
        assert_eq!(SupervisorRole::Finance.domain(), Domain::Expense);
        assert_eq!(SupervisorRole::Logistics.domain(), Domain::Stationery);
    }
}
