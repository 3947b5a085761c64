//! Response normalization layer.
//!
//! The backend is loosely typed: the same list may arrive as a bare array
//! or nested under `data`, `items`, `approvals`, ... and row fields vary
//! by route (`employeeName` vs `employee_name` vs `user.name`). Everything
//! here is a pure function from raw `serde_json::Value` to a renderable
//! shape — never throws, never returns half a row. Availability over
//! precision: a shape mismatch produces placeholders, not a blank panel.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::types::{
    AdminUser, AuditLogEntry, ChatMessage, Domain, LineItem, RequestRow, RequestStatus, Sender,
    UserProfile,
};

/// Placeholder for string fields nothing resolves for.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Wrapper keys probed, in priority order, when a payload is not a bare
/// array. First array-valued key wins.
const WRAPPER_KEYS: &[&str] = &[
    "data",
    "items",
    "approvals",
    "requests",
    "users",
    "messages",
    "activities",
    "claims",
];

// ---------------------------------------------------------------------------
// Payload extraction
// ---------------------------------------------------------------------------

/// Unwrap a list payload. Returns an empty vec for anything that is not a
/// bare array or a known wrapper object — never an error.
pub fn extract_rows(payload: &Value) -> Vec<Value> {
    if let Some(arr) = payload.as_array() {
        return arr.clone();
    }
    if let Some(obj) = payload.as_object() {
        for key in WRAPPER_KEYS {
            if let Some(arr) = obj.get(*key).and_then(Value::as_array) {
                return arr.clone();
            }
        }
    }
    Vec::new()
}

// ---------------------------------------------------------------------------
// Field coalescing helpers
// ---------------------------------------------------------------------------

/// First present, non-empty string among the candidate keys. Numbers are
/// accepted and stringified (ids arrive as either).
pub(crate) fn first_string(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match row.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// String at a nested object path, e.g. `["user", "name"]`.
pub(crate) fn nested_string(row: &Value, path: &[&str]) -> Option<String> {
    let mut cur = row;
    for key in path {
        cur = cur.get(key)?;
    }
    match cur {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// First numeric value among the candidate keys; numeric strings count.
pub(crate) fn first_number(row: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match row.get(key) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => {
                if let Ok(n) = s.trim().parse::<f64>() {
                    if n.is_finite() {
                        return Some(n);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a timestamp in any of the shapes the backend emits: RFC 3339,
/// naive datetime, or a bare date.
pub(crate) fn parse_flexible_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
    }
    None
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Normalize a whole payload into table rows. Tolerates every wrapper
/// shape `extract_rows` does; rows come back in source order.
pub fn normalize(domain: Domain, payload: &Value) -> Vec<RequestRow> {
    extract_rows(payload)
        .iter()
        .map(|row| normalize_row(domain, row))
        .collect()
}

/// Normalize a single raw row.
pub fn normalize_row(domain: Domain, row: &Value) -> RequestRow {
    let id = first_string(row, &["id", "_id", "request_id"])
        // Random token: unique within this batch, NOT stable across reloads.
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let employee_name = first_string(row, &["employeeName", "employee_name"])
        .or_else(|| nested_string(row, &["user", "name"]))
        .or_else(|| nested_string(row, &["requester", "name"]))
        .or_else(|| first_string(row, &["user_id"]).map(|uid| format!("User #{}", uid)))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let department = first_string(row, &["department", "dept", "team"])
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let role_text = first_string(row, &["role", "position"])
        .unwrap_or_else(|| domain.default_role_label().to_string());

    let status = RequestStatus::parse(row.get("status").and_then(Value::as_str));
    let created_at = resolve_created_at(row);

    let amount = match domain {
        // Invalid or missing amount coerces to 0, never NaN.
        Domain::Expense => Some(first_number(row, &["amount", "total"]).unwrap_or(0.0)),
        _ => None,
    };

    let items = match domain {
        Domain::Stationery | Domain::Travel => resolve_items(row),
        _ => None,
    };

    let joining_date = match domain {
        Domain::Onboarding => resolve_joining_date(row),
        _ => None,
    };

    let (title, description) = match domain {
        Domain::Approval => (
            Some(
                first_string(row, &["title", "type"])
                    .unwrap_or_else(|| "General".to_string()),
            ),
            first_string(row, &["description", "details"]),
        ),
        _ => (None, first_string(row, &["description", "details"])),
    };

    RequestRow {
        id,
        employee_name,
        department,
        role_text,
        status,
        created_at,
        amount,
        items,
        joining_date,
        title,
        description,
    }
}

/// Creation timestamp from any of the usual field names, normalized to
/// RFC 3339. Unparsable input falls back to "now" — a lossy default, so
/// it is logged rather than silently fabricated.
fn resolve_created_at(row: &Value) -> String {
    for key in ["createdAt", "created_at", "timestamp", "date"] {
        if let Some(s) = row.get(key).and_then(Value::as_str) {
            if let Some(dt) = parse_flexible_datetime(s) {
                return dt.to_rfc3339();
            }
        }
    }
    log::warn!("request row has no parsable creation timestamp; substituting now");
    Utc::now().to_rfc3339()
}

/// Items from an array of `{name, qty}` objects, plain strings, or a
/// JSON-encoded string field. A string that fails to parse as JSON
/// becomes a single display item rather than being dropped.
fn resolve_items(row: &Value) -> Option<Vec<LineItem>> {
    for key in ["items", "request_items", "details"] {
        match row.get(key) {
            Some(Value::Array(arr)) => return Some(items_from_array(arr)),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return Some(items_from_string(s))
            }
            _ => {}
        }
    }
    None
}

fn items_from_array(arr: &[Value]) -> Vec<LineItem> {
    arr.iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(LineItem { name: s.clone(), qty: 1 }),
            Value::Object(_) => {
                let name = first_string(v, &["name"])?;
                let qty = first_number(v, &["qty", "quantity"])
                    .filter(|q| q.is_finite() && *q >= 1.0)
                    .map(|q| q as u32)
                    .unwrap_or(1);
                Some(LineItem { name, qty })
            }
            _ => None,
        })
        .collect()
}

fn items_from_string(s: &str) -> Vec<LineItem> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Array(arr)) => items_from_array(&arr),
        // Not a JSON list: surface the raw text as one item.
        _ => vec![LineItem { name: s.trim().to_string(), qty: 1 }],
    }
}

/// Joining date for onboarding rows. Invalid dates yield None — a
/// commitment date must never be fabricated.
fn resolve_joining_date(row: &Value) -> Option<NaiveDate> {
    for key in ["joiningDate", "join_date", "joining_date"] {
        if let Some(s) = row.get(key).and_then(Value::as_str) {
            if let Ok(d) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                return Some(d);
            }
            if let Some(dt) = parse_flexible_datetime(s) {
                return Some(dt.date_naive());
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Sorting and filtering
// ---------------------------------------------------------------------------

/// Sort newest first. All timestamps are normalized RFC 3339 UTC, so a
/// lexicographic compare is a valid time order.
pub fn sort_newest_first(rows: &mut [RequestRow]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Table view filter, applied after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFilter {
    #[default]
    All,
    Today,
    Delayed,
}

impl RowFilter {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "today" => RowFilter::Today,
            "delayed" => RowFilter::Delayed,
            _ => RowFilter::All,
        }
    }
}

/// Apply a view filter.
///
/// "Delayed" is domain-specific: for most domains it means a
/// pending request older than the threshold; for onboarding it means a
/// not-yet-approved request whose joining date has already passed. The
/// onboarding variant is about a missed commitment date, not submission
/// age, and must stay that way.
pub fn apply_filter(
    domain: Domain,
    rows: Vec<RequestRow>,
    filter: RowFilter,
    now: DateTime<Utc>,
    delayed_threshold_days: i64,
) -> Vec<RequestRow> {
    match filter {
        RowFilter::All => rows,
        RowFilter::Today => {
            let today = now.format("%Y-%m-%d").to_string();
            rows.into_iter()
                .filter(|r| r.created_at.get(..10) == Some(today.as_str()))
                .collect()
        }
        RowFilter::Delayed if domain == Domain::Onboarding => rows
            .into_iter()
            .filter(|r| {
                r.status != RequestStatus::Approved
                    && r.joining_date.map(|d| d < now.date_naive()).unwrap_or(false)
            })
            .collect(),
        RowFilter::Delayed => {
            let cutoff = now - Duration::days(delayed_threshold_days);
            rows.into_iter()
                .filter(|r| {
                    r.status.is_pending()
                        && parse_flexible_datetime(&r.created_at)
                            .map(|dt| dt < cutoff)
                            .unwrap_or(false)
                })
                .collect()
        }
    }
}

/// Display message for an expense: `travel – ₹250 (taxi from airport)`.
pub fn expense_summary(category: &str, amount: f64, description: &str, symbol: &str) -> String {
    format!("{} \u{2013} {}{} ({})", category, symbol, amount, description)
}

// ---------------------------------------------------------------------------
// Shape-tolerant constructors for non-table payloads
// ---------------------------------------------------------------------------

impl UserProfile {
    /// From GET /api/user/me, tolerating numeric or missing ids.
    pub fn from_value(v: &Value) -> Self {
        Self {
            id: first_string(v, &["id", "_id", "user_id"])
                .unwrap_or_else(|| "demo-user".to_string()),
            name: first_string(v, &["name", "username"])
                .unwrap_or_else(|| "Demo User".to_string()),
            role: first_string(v, &["role"])
                .unwrap_or_else(|| "employee".to_string())
                .to_lowercase(),
        }
    }
}

impl ChatMessage {
    /// From a chat history row.
    pub fn from_value(v: &Value) -> Self {
        let sender = match v.get("sender").and_then(Value::as_str) {
            Some(s) if s.eq_ignore_ascii_case("user") => Sender::User,
            Some(s) if s.eq_ignore_ascii_case("system") => Sender::System,
            _ => Sender::Bot,
        };
        let text = first_string(v, &["text", "content", "message"]).unwrap_or_default();
        let timestamp = v
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(parse_flexible_datetime)
            .unwrap_or_else(Utc::now)
            .to_rfc3339();
        Self { sender, text, timestamp }
    }
}

impl AdminUser {
    /// From a user management row. Name falls back to first/last parts.
    pub fn from_value(v: &Value) -> Self {
        let assembled = format!(
            "{} {}",
            first_string(v, &["first_name"]).unwrap_or_default(),
            first_string(v, &["last_name"]).unwrap_or_default()
        )
        .trim()
        .to_string();
        let name = first_string(v, &["name"])
            .or(if assembled.is_empty() { None } else { Some(assembled) })
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            id: first_string(v, &["id", "_id", "user_id"])
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            name,
            email: first_string(v, &["email", "username"])
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            department: first_string(v, &["department", "dept"]),
            role: first_string(v, &["role"])
                .unwrap_or_else(|| "employee".to_string())
                .to_lowercase(),
            status: first_string(v, &["status"])
                .unwrap_or_else(|| "active".to_string())
                .to_lowercase(),
        }
    }
}

impl AuditLogEntry {
    /// From an audit log row. Exact route and shape vary by deployment.
    pub fn from_value(v: &Value, index: usize) -> Self {
        Self {
            id: first_string(v, &["id", "_id"]).unwrap_or_else(|| index.to_string()),
            when: first_string(v, &["timestamp", "createdAt", "created_at", "time"]),
            kind: first_string(v, &["type", "event"]).unwrap_or_else(|| "log".to_string()),
            message: first_string(v, &["message", "action", "detail"])
                .unwrap_or_else(|| v.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
