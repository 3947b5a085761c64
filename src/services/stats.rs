//! Admin overview numbers.
//!
//! The backend has no aggregate stats endpoint, so the numbers are
//! computed client-side from the raw lists. The counting rules are
//! deliberate product decisions, not incidental:
//! - a request counts for "today" on its creation date string
//! - an attendance session is "active" if it started today and has no
//!   clock-out, or its status is literally "present"

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::api::ApiClient;
use crate::normalize::{extract_rows, first_string};
use crate::types::AdminStats;

/// Rows whose creation date (either field spelling) falls on `today`.
pub fn count_created_today(rows: &[Value], today: NaiveDate) -> usize {
    let today = today.format("%Y-%m-%d").to_string();
    rows.iter()
        .filter(|row| {
            first_string(row, &["createdAt", "created_at"])
                .map(|s| s.get(..10) == Some(today.as_str()))
                .unwrap_or(false)
        })
        .count()
}

/// Sum of amounts; missing or invalid amounts count as zero.
pub fn sum_amounts(rows: &[Value]) -> f64 {
    rows.iter()
        .map(|row| crate::normalize::first_number(row, &["amount", "total"]).unwrap_or(0.0))
        .sum()
}

/// Attendance rows representing a live session.
pub fn count_active_sessions(rows: &[Value], today: NaiveDate) -> usize {
    let today = today.format("%Y-%m-%d").to_string();
    rows.iter()
        .filter(|row| {
            let started_today = first_string(row, &["clock_in", "clockIn", "createdAt"])
                .map(|s| s.get(..10) == Some(today.as_str()))
                .unwrap_or(false);
            let open = first_string(row, &["clock_out", "clockOut"]).is_none();
            let marked_present = first_string(row, &["status"])
                .map(|s| s.eq_ignore_ascii_case("present"))
                .unwrap_or(false);
            started_today && (open || marked_present)
        })
        .count()
}

/// Assemble the overview panel. Each number degrades independently: a
/// failed fetch zeroes its own stat and the rest still load.
pub async fn load_admin_stats(client: &ApiClient) -> AdminStats {
    let (users, approvals, attendance, expense, stationery, travel, onboarding) = tokio::join!(
        client.admin_users(),
        client.get_json("/api/approvals/pending"),
        client.get_json("/api/attendance/list"),
        client.get_json("/api/expense/list"),
        client.get_json("/api/stationery/list"),
        client.get_json("/api/travel/list"),
        client.get_json("/api/onboarding/list"),
    );

    let today = Utc::now().date_naive();

    let total_users = match users {
        Ok(list) => list.len(),
        Err(e) => {
            log::warn!("stats: user count unavailable: {}", e);
            0
        }
    };

    let pending_approvals = rows_or_empty("approvals", approvals).len();

    let expense_rows = rows_or_empty("expense", expense);
    let total_expenses = sum_amounts(&expense_rows);

    let mut requests_today = count_created_today(&expense_rows, today);
    for (name, result) in [
        ("stationery", stationery),
        ("travel", travel),
        ("onboarding", onboarding),
    ] {
        requests_today += count_created_today(&rows_or_empty(name, result), today);
    }

    let active_sessions = count_active_sessions(&rows_or_empty("attendance", attendance), today);

    AdminStats {
        total_users,
        pending_approvals,
        active_sessions,
        requests_today,
        total_expenses,
    }
}

fn rows_or_empty(name: &str, result: Result<Value, crate::error::ApiError>) -> Vec<Value> {
    match result {
        Ok(v) => extract_rows(&v),
        Err(e) => {
            log::warn!("stats: {} list unavailable: {}", name, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).expect("valid date")
    }

    #[test]
    fn test_count_created_today_accepts_both_spellings() {
        let rows = vec![
            json!({ "createdAt": "2024-05-10T08:00:00Z" }),
            json!({ "created_at": "2024-05-10" }),
            json!({ "createdAt": "2024-05-09T23:00:00Z" }),
            json!({}),
        ];
        assert_eq!(count_created_today(&rows, day()), 2);
    }

    #[test]
    fn test_sum_amounts_skips_garbage() {
        let rows = vec![
            json!({ "amount": 100 }),
            json!({ "amount": "50.5" }),
            json!({ "amount": "abc" }),
            json!({ "total": 10 }),
            json!({}),
        ];
        assert_eq!(sum_amounts(&rows), 160.5);
    }

    #[test]
    fn test_active_sessions_heuristic() {
        let rows = vec![
            // open session started today: active
            json!({ "clock_in": "2024-05-10T09:00:00Z" }),
            // closed but explicitly present: active
            json!({ "clockIn": "2024-05-10T08:00:00Z",
                    "clockOut": "2024-05-10T12:00:00Z", "status": "present" }),
            // closed and not present: inactive
            json!({ "clock_in": "2024-05-10T07:00:00Z",
                    "clock_out": "2024-05-10T11:00:00Z" }),
            // open session from yesterday: inactive
            json!({ "clock_in": "2024-05-09T09:00:00Z" }),
        ];
        assert_eq!(count_active_sessions(&rows, day()), 2);
    }
}
