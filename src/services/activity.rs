//! Recent-activity feed assembly and the background poller.
//!
//! Preferred source is the unified activity route; older backends lack
//! it, so the fallback stitches a feed together from the per-domain
//! lists the user's own requests appear in.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::normalize::{extract_rows, first_string, sort_newest_first};
use crate::state::AppState;
use crate::types::{ActivityItem, ActivityKind, RequestRow};

/// Delay before the first poll so startup traffic settles.
const STARTUP_DELAY: Duration = Duration::from_secs(2);

impl ActivityItem {
    /// From a unified activity route row.
    pub fn from_value(v: &Value, index: usize) -> Self {
        let kind = match first_string(v, &["type", "kind", "category"])
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "expense" => ActivityKind::Expense,
            "stationery" | "travel" => ActivityKind::Stationery,
            "onboarding" => ActivityKind::Onboarding,
            "approval" => ActivityKind::Approval,
            "attendance" => ActivityKind::Attendance,
            _ => ActivityKind::System,
        };
        Self {
            id: first_string(v, &["id", "_id"]).unwrap_or_else(|| index.to_string()),
            kind,
            title: first_string(v, &["title", "type"]).unwrap_or_else(|| "Activity".to_string()),
            message: first_string(v, &["message", "description", "detail"]).unwrap_or_default(),
            status: first_string(v, &["status"]).unwrap_or_else(|| "info".to_string()),
            at: first_string(v, &["createdAt", "created_at", "timestamp"])
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        }
    }

    fn from_row(kind: ActivityKind, title: &str, row: &RequestRow) -> Self {
        Self {
            id: format!("{}-{}", title.to_lowercase(), row.id),
            kind,
            title: title.to_string(),
            message: row
                .description
                .clone()
                .unwrap_or_else(|| row.employee_name.clone()),
            status: row.status.as_str().to_string(),
            at: row.created_at.clone(),
        }
    }
}

/// Load the feed for one user, newest first.
pub async fn load_feed(client: &ApiClient, user_id: &str) -> Result<Vec<ActivityItem>, ApiError> {
    match unified_feed(client, user_id).await {
        Ok(items) => Ok(items),
        Err(e) => {
            log::debug!("unified activity route unavailable ({}), using domain fallback", e);
            domain_fallback_feed(client).await
        }
    }
}

async fn unified_feed(client: &ApiClient, user_id: &str) -> Result<Vec<ActivityItem>, ApiError> {
    let paths = [
        format!("/api/activity/user/{}", user_id),
        format!("/api/activity/user?userId={}", user_id),
    ];
    let v = client.get_first(&paths).await?;
    let rows = extract_rows(&v);
    if rows.is_empty() && !v.is_array() && v.get("data").is_none() {
        // A wrong route that happens to 200 with an unrelated object
        // must not masquerade as an empty feed.
        return Err(ApiError::Decode("activity payload has no rows".to_string()));
    }
    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, row)| ActivityItem::from_value(row, i))
        .collect())
}

/// Stitch a feed from the per-domain lists. Domains fail independently;
/// an empty vec only happens when every domain is down.
async fn domain_fallback_feed(client: &ApiClient) -> Result<Vec<ActivityItem>, ApiError> {
    let (expenses, stationery, onboarding) = tokio::join!(
        client.my_expenses(),
        client.stationery_list(),
        client.onboarding_list(),
    );

    let mut items = Vec::new();
    collect(&mut items, expenses, ActivityKind::Expense, "Expense");
    collect(&mut items, stationery, ActivityKind::Stationery, "Stationery");
    collect(&mut items, onboarding, ActivityKind::Onboarding, "Onboarding");

    items.sort_by(|a, b| b.at.cmp(&a.at));
    Ok(items)
}

fn collect(
    items: &mut Vec<ActivityItem>,
    result: Result<Vec<RequestRow>, ApiError>,
    kind: ActivityKind,
    title: &str,
) {
    match result {
        Ok(mut rows) => {
            sort_newest_first(&mut rows);
            items.extend(rows.iter().map(|row| ActivityItem::from_row(kind, title, row)));
        }
        Err(e) => log::debug!("activity fallback: {} list unavailable: {}", title, e),
    }
}

/// Long-lived refresh loop. Cancellation is advisory: the shutdown flag
/// is checked before results are applied, so a poll in flight when
/// shutdown lands is discarded rather than interrupted.
pub async fn run_activity_poller(state: Arc<AppState>) {
    tokio::time::sleep(STARTUP_DELAY).await;
    log::info!("Activity poller started");

    loop {
        if state.is_shutdown() {
            break;
        }

        let user_id = state.user_id();
        match load_feed(state.client(), &user_id).await {
            Ok(items) => {
                if state.is_shutdown() {
                    break;
                }
                log::debug!("activity poll: {} items", items.len());
                state.activity.replace_all(items);
            }
            Err(e) => log::warn!("activity poll failed: {}", e),
        }

        tokio::time::sleep(Duration::from_secs(state.activity_poll_secs())).await;
    }

    log::info!("Activity poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unified_row_kind_mapping() {
        let item = ActivityItem::from_value(
            &json!({ "id": 5, "type": "expense", "message": "Claim filed", "status": "pending" }),
            0,
        );
        assert_eq!(item.kind, ActivityKind::Expense);
        assert_eq!(item.id, "5");
        assert_eq!(item.message, "Claim filed");

        let unknown = ActivityItem::from_value(&json!({ "type": "mystery" }), 3);
        assert_eq!(unknown.kind, ActivityKind::System);
        assert_eq!(unknown.id, "3", "missing id falls back to index");
    }
}
