use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.whizdesk/config.json
///
/// Every field has a default so a missing or partial file still yields a
/// usable config. `WHIZDESK_API_URL`, `WHIZDESK_ORG_ID` and
/// `WHIZDESK_TOKEN` override the file (see `config::load`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_base_url: String,
    pub organization_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Pending requests older than this count as "delayed" (non-onboarding).
    pub delayed_threshold_days: i64,
    /// Activity feed refresh interval.
    pub activity_poll_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".to_string(),
            organization_id: 1,
            auth_token: None,
            delayed_threshold_days: 3,
            activity_poll_secs: 12,
        }
    }
}

/// Which backend resource a normalization call is processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Expense,
    Stationery,
    Travel,
    Onboarding,
    Attendance,
    Approval,
}

impl Domain {
    /// Row label used when the source has no role/position field.
    pub fn default_role_label(&self) -> &'static str {
        match self {
            Domain::Expense => "Expense",
            Domain::Stationery | Domain::Travel => "Request",
            Domain::Onboarding => "Onboarding",
            Domain::Attendance => "Attendance",
            Domain::Approval => "Approval",
        }
    }
}

/// Request status, normalized to lowercase. Unknown statuses are carried
/// verbatim so the render never lies about the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl RequestStatus {
    /// Case-insensitive parse; absent input defaults to Pending.
    pub fn parse(raw: Option<&str>) -> Self {
        let lower = match raw {
            Some(s) if !s.trim().is_empty() => s.trim().to_lowercase(),
            _ => return RequestStatus::Pending,
        };
        match lower.as_str() {
            "pending" => RequestStatus::Pending,
            "approved" => RequestStatus::Approved,
            "rejected" => RequestStatus::Rejected,
            _ => RequestStatus::Other(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One requested item on a stationery/travel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub qty: u32,
}

impl LineItem {
    /// Display form used by table cells: `pen×2`.
    pub fn display(&self) -> String {
        format!("{}\u{00d7}{}", self.name, self.qty)
    }
}

/// Uniform row shape produced by the normalizer, regardless of which
/// backend list it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow {
    pub id: String,
    pub employee_name: String,
    pub department: String,
    pub role_text: String,
    pub status: RequestStatus,
    /// RFC 3339 timestamp. Lexicographic compare is a valid time order.
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The signed-in (or demo) user, from GET /api/user/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl UserProfile {
    /// Offline fallback so the agent still runs without a backend.
    pub fn demo() -> Self {
        Self {
            id: "demo-user".to_string(),
            name: "Demo User".to_string(),
            role: "employee".to_string(),
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

/// One chat transcript entry. Append-only per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// RFC 3339.
    pub timestamp: String,
}

impl ChatMessage {
    pub fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Category tag on an activity feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Expense,
    Stationery,
    Onboarding,
    Approval,
    Attendance,
    System,
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub message: String,
    pub status: String,
    /// RFC 3339.
    pub at: String,
}

/// Aggregated numbers for the admin overview panel.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub pending_approvals: usize,
    pub active_sessions: usize,
    pub requests_today: usize,
    pub total_expenses: f64,
}

/// Pragmatic health snapshot built by timing a few real endpoints.
/// There is no native health endpoint on the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub avg_latency_ms: u64,
    pub online: bool,
    pub probes_ok: usize,
    pub probes_total: usize,
}

/// A user row on the admin management panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub role: String,
    pub status: String,
}

/// One audit log entry, shape-tolerant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    pub kind: String,
    pub message: String,
}

/// Payload for POST /api/expense/submit.
#[derive(Debug, Clone, Serialize)]
pub struct ExpensePayload {
    pub user_id: String,
    pub organization_id: u64,
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(RequestStatus::parse(Some("Pending")), RequestStatus::Pending);
        assert_eq!(RequestStatus::parse(Some("APPROVED")), RequestStatus::Approved);
        assert_eq!(RequestStatus::parse(Some("rejected")), RequestStatus::Rejected);
        assert_eq!(RequestStatus::parse(None), RequestStatus::Pending);
        assert_eq!(RequestStatus::parse(Some("  ")), RequestStatus::Pending);
        assert_eq!(
            RequestStatus::parse(Some("Review")),
            RequestStatus::Other("review".into())
        );
    }

    #[test]
    fn test_line_item_display() {
        let item = LineItem { name: "pen".into(), qty: 2 };
        assert_eq!(item.display(), "pen×2");
    }

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.organization_id, 1);
        assert_eq!(cfg.delayed_threshold_days, 3);
        assert_eq!(cfg.activity_poll_secs, 12);
    }
}
