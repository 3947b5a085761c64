//! Employee-facing backend operations: profile, chat, attendance, and
//! the four request domains.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::normalize::{extract_rows, normalize, sort_newest_first};
use crate::types::{ChatMessage, Domain, ExpensePayload, LineItem, RequestRow, UserProfile};

use super::client::ApiClient;

/// Candidate routes for "my expense claims"; deployments disagree.
const EXPENSE_MINE_PATHS: &[&str] = &["/api/expense/mine", "/api/expense/my", "/api/expense/user"];

/// Attendance routes: `checkin`/`checkout` is the contract; the hyphen
/// spelling survives as a fallback for older builds.
const CLOCK_IN_PATHS: &[&str] = &["/api/attendance/checkin", "/api/attendance/clock-in"];
const CLOCK_OUT_PATHS: &[&str] = &["/api/attendance/checkout", "/api/attendance/clock-out"];

impl ApiClient {
    // -----------------------------------------------------------------
    // Profile and chat
    // -----------------------------------------------------------------

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let v = self.get_json("/api/user/me").await?;
        // Some builds nest the profile under "user".
        let profile = v.get("user").unwrap_or(&v);
        Ok(UserProfile::from_value(profile))
    }

    pub async fn chat_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let v = self
            .get_with_params("/api/chat/history", &[("userId", user_id.to_string())])
            .await?;
        Ok(extract_rows(&v).iter().map(ChatMessage::from_value).collect())
    }

    /// Free-text passthrough for anything the local interpreter does not
    /// recognize. Returns the backend's reply text.
    pub async fn send_chat(&self, user_id: &str, text: &str) -> Result<String, ApiError> {
        let v = self.post_json("/api/chat/send", &chat_payload(user_id, text)).await?;
        let reply = v
            .get("reply")
            .or_else(|| v.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("...");
        Ok(reply.to_string())
    }

    // -----------------------------------------------------------------
    // Attendance
    // -----------------------------------------------------------------

    pub async fn clock_in(&self, user_id: &str) -> Result<Value, ApiError> {
        self.post_first(CLOCK_IN_PATHS, &json!({ "user_id": user_id }))
            .await
    }

    pub async fn clock_out(&self, user_id: &str) -> Result<Value, ApiError> {
        self.post_first(CLOCK_OUT_PATHS, &json!({ "user_id": user_id }))
            .await
    }

    // -----------------------------------------------------------------
    // Request submission
    // -----------------------------------------------------------------

    pub async fn submit_expense(&self, payload: &ExpensePayload) -> Result<Value, ApiError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post_json("/api/expense/submit", &body).await
    }

    pub async fn request_stationery(
        &self,
        user_id: &str,
        organization_id: u64,
        items: &[LineItem],
    ) -> Result<Value, ApiError> {
        self.post_json(
            "/api/stationery/request",
            &json!({
                "user_id": user_id,
                "organization_id": organization_id,
                "items": items,
            }),
        )
        .await
    }

    pub async fn onboarding_help(&self, user_id: &str, question: &str) -> Result<Value, ApiError> {
        self.post_json(
            "/api/onboarding/help",
            &json!({ "user_id": user_id, "question": question }),
        )
        .await
    }

    // -----------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------

    /// My expense claims, newest first.
    pub async fn my_expenses(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_first(EXPENSE_MINE_PATHS).await?;
        let mut rows = normalize(Domain::Expense, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn expense_list(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/expense/list").await?;
        let mut rows = normalize(Domain::Expense, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn stationery_list(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/stationery/list").await?;
        let mut rows = normalize(Domain::Stationery, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn travel_list(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/travel/list").await?;
        let mut rows = normalize(Domain::Travel, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn onboarding_list(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/onboarding/list").await?;
        let mut rows = normalize(Domain::Onboarding, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    /// My onboarding requests; route spelling varies by deployment.
    pub async fn my_onboarding(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self
            .get_first(&["/api/onboarding/mine", "/api/onboarding/my"])
            .await?;
        let mut rows = normalize(Domain::Onboarding, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn attendance_list(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/attendance/list").await?;
        let mut rows = normalize(Domain::Attendance, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    // -----------------------------------------------------------------
    // Approvals
    // -----------------------------------------------------------------

    pub async fn pending_approvals(&self) -> Result<Vec<RequestRow>, ApiError> {
        let v = self.get_json("/api/approvals/pending").await?;
        let mut rows = normalize(Domain::Approval, &v);
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn approve(&self, request_id: &str) -> Result<Value, ApiError> {
        self.post_json(&format!("/api/approvals/{}/approve", request_id), &json!({}))
            .await
    }

    pub async fn reject(&self, request_id: &str) -> Result<Value, ApiError> {
        self.post_json(&format!("/api/approvals/{}/reject", request_id), &json!({}))
            .await
    }
}

/// Body for the generic chat passthrough. The backend keys the sender
/// as `userId`, matching the history route's query param.
fn chat_payload(user_id: &str, text: &str) -> Value {
    json!({ "userId": user_id, "message": text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_contract_routes_lead_the_probe_lists() {
        assert_eq!(CLOCK_IN_PATHS[0], "/api/attendance/checkin");
        assert_eq!(CLOCK_OUT_PATHS[0], "/api/attendance/checkout");
    }

    #[test]
    fn test_chat_payload_keys() {
        let body = chat_payload("u-1", "what's for lunch");
        assert_eq!(body.get("userId"), Some(&json!("u-1")));
        assert_eq!(body.get("message"), Some(&json!("what's for lunch")));
        assert!(body.get("user_id").is_none());
    }
}
