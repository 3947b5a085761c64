//! Chat command interpreter.
//!
//! `interpret` is pure: text in, `Reply` out. It never touches the
//! network, which keeps the routing contract (flow trigger, then active
//! flow, then intent match, then forward) unit-testable. The `dispatch`
//! module turns `Reply::Call`/`Reply::Forward` into backend requests.

pub mod dispatch;
pub mod flow;
pub mod intent;

pub use flow::{ChatFlow, FlowIntent, FlowStep, FlowSubmission};
pub use intent::{parse_intent, parse_item_list, Intent};

use flow::parse_flow_trigger;

const EXPENSE_USAGE: &str =
    "Format: expense <amount> <category> <description>\nExample: expense 250 travel taxi from airport";

const STATIONERY_USAGE: &str =
    "Format: stationery <item>:<qty>, <item>:<qty>\nExample: stationery pen:2, notebook:1";

const HELP_PROMPT: &str =
    "Ask me an onboarding question, e.g. 'help how do I set up my email?'";

/// What the interpreter decided to do with one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Local response; no backend call.
    Say(String),
    /// A recognized command to execute against the backend.
    Call(Command),
    /// Unrecognized text, forwarded to the backend chat service.
    Forward(String),
}

/// Backend operations the interpreter can request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ClockIn,
    ClockOut,
    SubmitExpense {
        amount: f64,
        category: String,
        description: Option<String>,
    },
    RequestStationery { items: Vec<crate::types::LineItem> },
    OnboardingHelp { question: String },
}

/// Route one chat message. Precedence: flow trigger, active flow,
/// intent match, forward. The flow consumes everything while active,
/// including text that would otherwise match an intent.
pub fn interpret(text: &str, flow: &mut ChatFlow) -> Reply {
    if let Some(intent) = parse_flow_trigger(text) {
        return step_to_reply(flow.start(intent));
    }

    if flow.is_active() {
        return step_to_reply(flow.advance(text));
    }

    match parse_intent(text) {
        Some(Intent::ClockIn) => Reply::Call(Command::ClockIn),
        Some(Intent::ClockOut) => Reply::Call(Command::ClockOut),
        Some(Intent::Expense { amount, category, description }) => Reply::Call(
            Command::SubmitExpense { amount, category, description: Some(description) },
        ),
        Some(Intent::ExpenseUsage) => Reply::Say(EXPENSE_USAGE.to_string()),
        Some(Intent::Stationery(items)) => Reply::Call(Command::RequestStationery { items }),
        Some(Intent::StationeryUsage) => Reply::Say(STATIONERY_USAGE.to_string()),
        Some(Intent::Help(question)) => Reply::Call(Command::OnboardingHelp { question }),
        Some(Intent::HelpPrompt) => Reply::Say(HELP_PROMPT.to_string()),
        None => Reply::Forward(text.trim().to_string()),
    }
}

fn step_to_reply(step: FlowStep) -> Reply {
    match step {
        FlowStep::Prompt(text) | FlowStep::Cancelled(text) => Reply::Say(text),
        FlowStep::Submit(FlowSubmission::ClockIn) => Reply::Call(Command::ClockIn),
        FlowStep::Submit(FlowSubmission::Expense { category, amount, description }) => {
            Reply::Call(Command::SubmitExpense { amount, category, description })
        }
        FlowStep::Submit(FlowSubmission::Stationery { items }) => {
            Reply::Call(Command::RequestStationery { items })
        }
        FlowStep::Submit(FlowSubmission::Onboarding { question }) => {
            Reply::Call(Command::OnboardingHelp { question })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;

    #[test]
    fn test_command_text_becomes_call() {
        let mut flow = ChatFlow::default();
        assert_eq!(interpret("clock in", &mut flow), Reply::Call(Command::ClockIn));
        assert_eq!(
            interpret("stationery pen:2", &mut flow),
            Reply::Call(Command::RequestStationery {
                items: vec![LineItem { name: "pen".into(), qty: 2 }],
            })
        );
    }

    #[test]
    fn test_usage_errors_stay_local() {
        let mut flow = ChatFlow::default();
        let reply = interpret("expense abc", &mut flow);
        match reply {
            Reply::Say(text) => assert!(text.contains("expense 250 travel")),
            other => panic!("expected usage text, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_text_forwards() {
        let mut flow = ChatFlow::default();
        assert_eq!(
            interpret("what's for lunch today?", &mut flow),
            Reply::Forward("what's for lunch today?".to_string())
        );
    }

    #[test]
    fn test_active_flow_consumes_command_like_text() {
        let mut flow = ChatFlow::default();
        interpret("__FLOW__:expense:start", &mut flow);
        // "clock in" is a category answer here, not a command
        let reply = interpret("clock in", &mut flow);
        assert!(matches!(reply, Reply::Say(_)));
        assert!(flow.is_active());
    }

    #[test]
    fn test_full_guided_expense_conversation() {
        let mut flow = ChatFlow::default();
        assert!(matches!(interpret("__FLOW__:expense:start", &mut flow), Reply::Say(_)));
        assert!(matches!(interpret("travel", &mut flow), Reply::Say(_)));
        assert!(matches!(interpret("not-a-number", &mut flow), Reply::Say(_)));
        assert!(matches!(interpret("250", &mut flow), Reply::Say(_)));
        assert_eq!(
            interpret("skip", &mut flow),
            Reply::Call(Command::SubmitExpense {
                amount: 250.0,
                category: "travel".to_string(),
                description: None,
            })
        );
        // flow is done; next message routes normally again
        assert_eq!(
            interpret("random chatter", &mut flow),
            Reply::Forward("random chatter".to_string())
        );
    }

    #[test]
    fn test_clock_in_trigger_submits_without_prompts() {
        let mut flow = ChatFlow::default();
        assert_eq!(
            interpret("__FLOW__:clockin:start", &mut flow),
            Reply::Call(Command::ClockIn)
        );
        assert!(!flow.is_active());
    }
}
