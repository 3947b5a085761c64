//! Executes interpreter decisions against the backend and shapes the
//! bot's reply text. All failures are absorbed into a reply message;
//! dispatch never returns an error to the chat loop.

use serde_json::Value;

use crate::api::ApiClient;
use crate::normalize::first_string;
use crate::types::{ChatMessage, ExpensePayload, Sender};

use super::{Command, Reply};

/// Shown when the backend chat passthrough itself is unreachable.
const APOLOGY: &str = "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Carry out one interpreter decision and produce the bot's message.
pub async fn dispatch(
    client: &ApiClient,
    user_id: &str,
    organization_id: u64,
    reply: Reply,
) -> ChatMessage {
    let text = match reply {
        Reply::Say(text) => text,
        Reply::Forward(text) => match client.send_chat(user_id, &text).await {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("chat passthrough failed: {}", e);
                APOLOGY.to_string()
            }
        },
        Reply::Call(cmd) => run_command(client, user_id, organization_id, cmd).await,
    };
    ChatMessage::now(Sender::Bot, text)
}

async fn run_command(
    client: &ApiClient,
    user_id: &str,
    organization_id: u64,
    cmd: Command,
) -> String {
    match cmd {
        Command::ClockIn => match client.clock_in(user_id).await {
            Ok(v) => format!("You're clocked in at {}.", clock_time(&v)),
            Err(e) => e.user_message(),
        },
        Command::ClockOut => match client.clock_out(user_id).await {
            Ok(v) => format!("You're clocked out at {}.", clock_time(&v)),
            Err(e) => e.user_message(),
        },
        Command::SubmitExpense { amount, category, description } => {
            let payload = ExpensePayload {
                user_id: user_id.to_string(),
                organization_id,
                amount,
                category: category.clone(),
                description,
            };
            match client.submit_expense(&payload).await {
                Ok(v) => {
                    let id = first_string(v.get("claim").unwrap_or(&v), &["id", "_id"])
                        .unwrap_or_else(|| "?".to_string());
                    format!("Expense claim #{} submitted for approval.", id)
                }
                Err(e) => e.user_message(),
            }
        }
        Command::RequestStationery { items } => {
            match client.request_stationery(user_id, organization_id, &items).await {
                Ok(v) => {
                    let status = first_string(v.get("request").unwrap_or(&v), &["status"])
                        .unwrap_or_else(|| "Pending".to_string());
                    format!("Stationery request submitted. Status: {}.", status)
                }
                Err(e) => e.user_message(),
            }
        }
        Command::OnboardingHelp { question } => {
            match client.onboarding_help(user_id, &question).await {
                Ok(_) => "I've logged your onboarding question. HR will follow up with you."
                    .to_string(),
                Err(e) => e.user_message(),
            }
        }
    }
}

/// Echo the server's attendance timestamp as HH:MM:SS; fall back to the
/// local clock if the response omits it.
fn clock_time(v: &Value) -> String {
    let server = first_string(v.get("attendance").unwrap_or(v), &[
        "clock_in",
        "clockIn",
        "clock_out",
        "clockOut",
        "timestamp",
    ]);
    server
        .as_deref()
        .and_then(crate::normalize::parse_flexible_datetime)
        .unwrap_or_else(chrono::Utc::now)
        .format("%H:%M:%S")
        .to_string()
}
