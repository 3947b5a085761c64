//! Guided multi-turn flows.
//!
//! A flow is started by a structured trigger (`__FLOW__:<intent>:start`)
//! rather than free text, so quick-action buttons and scripts can enter
//! a flow without going through intent matching. While a flow is active
//! it consumes ALL input until it submits or the user cancels; "cancel"
//! works at any step.

use crate::types::LineItem;

use super::intent::parse_item_list;

/// Structured trigger prefix.
pub const FLOW_PREFIX: &str = "__FLOW__:";

/// Flows the interpreter can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowIntent {
    ClockIn,
    Expense,
    Stationery,
    Onboarding,
}

impl FlowIntent {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "clockin" => Some(FlowIntent::ClockIn),
            "expense" => Some(FlowIntent::Expense),
            "stationery" => Some(FlowIntent::Stationery),
            "onboarding" => Some(FlowIntent::Onboarding),
            _ => None,
        }
    }
}

/// Recognize `__FLOW__:<intent>:start`. Unknown intents and other verbs
/// yield None and the text falls through to normal interpretation.
pub fn parse_flow_trigger(text: &str) -> Option<FlowIntent> {
    let rest = text.trim().strip_prefix(FLOW_PREFIX)?;
    let (name, verb) = rest.split_once(':')?;
    if verb != "start" {
        return None;
    }
    FlowIntent::parse(name)
}

/// What the flow engine wants next.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep {
    /// Show this prompt and wait for the next input.
    Prompt(String),
    /// Flow complete; perform the backend call.
    Submit(FlowSubmission),
    /// User cancelled; show this acknowledgement.
    Cancelled(String),
}

/// A completed flow, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowSubmission {
    ClockIn,
    Expense {
        category: String,
        amount: f64,
        description: Option<String>,
    },
    Stationery { items: Vec<LineItem> },
    Onboarding { question: String },
}

/// Per-session flow state. Exactly one flow can be active at a time;
/// starting a new one replaces any previous state.
#[derive(Debug, Clone, Default)]
pub struct ChatFlow {
    intent: Option<FlowIntent>,
    step: u32,
    category: Option<String>,
    amount: Option<f64>,
}

impl ChatFlow {
    pub fn is_active(&self) -> bool {
        self.intent.is_some()
    }

    pub fn reset(&mut self) {
        *self = ChatFlow::default();
    }

    /// Enter a flow. Clock-in has no questions to ask and submits
    /// immediately.
    pub fn start(&mut self, intent: FlowIntent) -> FlowStep {
        self.reset();
        match intent {
            FlowIntent::ClockIn => FlowStep::Submit(FlowSubmission::ClockIn),
            FlowIntent::Expense => {
                self.intent = Some(intent);
                FlowStep::Prompt(
                    "Let's file an expense. What category is it? (e.g. travel, food, supplies)"
                        .to_string(),
                )
            }
            FlowIntent::Stationery => {
                self.intent = Some(intent);
                FlowStep::Prompt(
                    "What items do you need? Use name:qty separated by commas, e.g. pen:2, notebook"
                        .to_string(),
                )
            }
            FlowIntent::Onboarding => {
                self.intent = Some(intent);
                FlowStep::Prompt("What would you like to know about onboarding?".to_string())
            }
        }
    }

    /// Feed one user message into the active flow.
    pub fn advance(&mut self, input: &str) -> FlowStep {
        let input = input.trim();
        if input.eq_ignore_ascii_case("cancel") {
            self.reset();
            return FlowStep::Cancelled("Okay, cancelled. Nothing was submitted.".to_string());
        }

        let intent = match self.intent {
            Some(i) => i,
            // Not active; callers check is_active first, but stay safe.
            None => return FlowStep::Cancelled("No active flow.".to_string()),
        };

        match intent {
            FlowIntent::ClockIn => {
                self.reset();
                FlowStep::Submit(FlowSubmission::ClockIn)
            }
            FlowIntent::Expense => self.advance_expense(input),
            FlowIntent::Stationery => {
                let items = parse_item_list(input);
                if items.is_empty() {
                    FlowStep::Prompt(
                        "I couldn't read any items. Try name:qty separated by commas, e.g. pen:2, notebook"
                            .to_string(),
                    )
                } else {
                    self.reset();
                    FlowStep::Submit(FlowSubmission::Stationery { items })
                }
            }
            FlowIntent::Onboarding => {
                if input.is_empty() {
                    FlowStep::Prompt("What would you like to know about onboarding?".to_string())
                } else {
                    self.reset();
                    FlowStep::Submit(FlowSubmission::Onboarding { question: input.to_string() })
                }
            }
        }
    }

    fn advance_expense(&mut self, input: &str) -> FlowStep {
        match self.step {
            0 => {
                if input.is_empty() {
                    return FlowStep::Prompt("What category is the expense?".to_string());
                }
                // Stored as typed; the backend owns canonicalization.
                self.category = Some(input.to_string());
                self.step = 1;
                FlowStep::Prompt("How much was it? Just the number, e.g. 250".to_string())
            }
            1 => match input.parse::<f64>() {
                // Re-prompt on bad amounts; the flow does not abort.
                Ok(a) if a.is_finite() && a > 0.0 => {
                    self.amount = Some(a);
                    self.step = 2;
                    FlowStep::Prompt(
                        "Any description? Type one, or say 'skip' to leave it out.".to_string(),
                    )
                }
                _ => FlowStep::Prompt(
                    "That doesn't look like an amount. Just the number, e.g. 250".to_string(),
                ),
            },
            _ => {
                let description = if input.is_empty() || input.eq_ignore_ascii_case("skip") {
                    None
                } else {
                    Some(input.to_string())
                };
                let category = self.category.take().unwrap_or_default();
                let amount = self.amount.take().unwrap_or(0.0);
                self.reset();
                FlowStep::Submit(FlowSubmission::Expense { category, amount, description })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_parsing() {
        assert_eq!(parse_flow_trigger("__FLOW__:expense:start"), Some(FlowIntent::Expense));
        assert_eq!(parse_flow_trigger("__FLOW__:clockin:start"), Some(FlowIntent::ClockIn));
        assert_eq!(parse_flow_trigger("__FLOW__:stationery:start"), Some(FlowIntent::Stationery));
        assert_eq!(parse_flow_trigger("__FLOW__:onboarding:start"), Some(FlowIntent::Onboarding));
        assert_eq!(parse_flow_trigger("__FLOW__:expense:stop"), None);
        assert_eq!(parse_flow_trigger("__FLOW__:unknown:start"), None);
        assert_eq!(parse_flow_trigger("expense 250 travel taxi"), None);
    }

    #[test]
    fn test_clock_in_flow_submits_immediately() {
        let mut flow = ChatFlow::default();
        assert_eq!(flow.start(FlowIntent::ClockIn), FlowStep::Submit(FlowSubmission::ClockIn));
        assert!(!flow.is_active());
    }

    #[test]
    fn test_expense_flow_happy_path() {
        let mut flow = ChatFlow::default();
        assert!(matches!(flow.start(FlowIntent::Expense), FlowStep::Prompt(_)));
        assert!(matches!(flow.advance("Travel"), FlowStep::Prompt(_)));
        assert!(matches!(flow.advance("250"), FlowStep::Prompt(_)));
        assert_eq!(
            flow.advance("taxi from airport"),
            FlowStep::Submit(FlowSubmission::Expense {
                category: "Travel".to_string(),
                amount: 250.0,
                description: Some("taxi from airport".to_string()),
            })
        );
        assert!(!flow.is_active(), "flow resets after submission");
    }

    #[test]
    fn test_expense_flow_bad_amount_reprompts() {
        let mut flow = ChatFlow::default();
        flow.start(FlowIntent::Expense);
        flow.advance("food");
        assert!(matches!(flow.advance("lots"), FlowStep::Prompt(_)));
        assert!(flow.is_active(), "bad amount does not abort the flow");
        assert!(matches!(flow.advance("-3"), FlowStep::Prompt(_)));
        assert!(matches!(flow.advance("42.5"), FlowStep::Prompt(_)));
        assert_eq!(
            flow.advance("skip"),
            FlowStep::Submit(FlowSubmission::Expense {
                category: "food".to_string(),
                amount: 42.5,
                description: None,
            })
        );
    }

    #[test]
    fn test_expense_flow_keeps_category_as_typed() {
        let mut flow = ChatFlow::default();
        flow.start(FlowIntent::Expense);
        flow.advance("Travel");
        flow.advance("200");
        assert_eq!(
            flow.advance("skip"),
            FlowStep::Submit(FlowSubmission::Expense {
                category: "Travel".to_string(),
                amount: 200.0,
                description: None,
            })
        );
    }

    #[test]
    fn test_cancel_works_at_any_step() {
        let mut flow = ChatFlow::default();
        flow.start(FlowIntent::Expense);
        flow.advance("travel");
        assert!(matches!(flow.advance("CANCEL"), FlowStep::Cancelled(_)));
        assert!(!flow.is_active());
    }

    #[test]
    fn test_stationery_flow_reprompts_on_empty_items() {
        let mut flow = ChatFlow::default();
        flow.start(FlowIntent::Stationery);
        assert!(matches!(flow.advance(",,,"), FlowStep::Prompt(_)));
        assert_eq!(
            flow.advance("pen:2, notebook"),
            FlowStep::Submit(FlowSubmission::Stationery {
                items: vec![
                    LineItem { name: "pen".into(), qty: 2 },
                    LineItem { name: "notebook".into(), qty: 1 },
                ],
            })
        );
    }

    #[test]
    fn test_starting_a_flow_replaces_previous_state() {
        let mut flow = ChatFlow::default();
        flow.start(FlowIntent::Expense);
        flow.advance("travel");
        flow.start(FlowIntent::Onboarding);
        assert_eq!(
            flow.advance("where do I park"),
            FlowStep::Submit(FlowSubmission::Onboarding {
                question: "where do I park".to_string(),
            })
        );
    }
}
