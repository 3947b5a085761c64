//! Intent matching for chat input.
//!
//! Matching is ordered and first-match-wins; the order below is part of
//! the contract. "expense" is checked before "help" so "help me file an
//! expense" still goes to onboarding help only because "expense" needs
//! its argument shape to match, not just the keyword.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::LineItem;

/// A recognized chat command, or a usage hint for a half-typed one.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ClockIn,
    ClockOut,
    Expense {
        amount: f64,
        category: String,
        description: String,
    },
    /// "expense" with missing or malformed arguments.
    ExpenseUsage,
    Stationery(Vec<LineItem>),
    /// "stationery" with no parsable items.
    StationeryUsage,
    Help(String),
    /// "help" with no question text.
    HelpPrompt,
}

fn re_clock_in() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(^|\b)(clock\s?in|check\s?in)(\b|$)").unwrap())
}

fn re_clock_out() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(^|\b)(clock\s?out|check\s?out)(\b|$)").unwrap())
}

/// Match input text against the command set, in order. Returns None when
/// nothing matches; the caller forwards such text to the backend chat
/// service instead.
pub fn parse_intent(text: &str) -> Option<Intent> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if re_clock_in().is_match(trimmed) {
        return Some(Intent::ClockIn);
    }
    if re_clock_out().is_match(trimmed) {
        return Some(Intent::ClockOut);
    }

    if let Some(rest) = strip_keyword(trimmed, "expense") {
        return Some(parse_expense_args(rest));
    }

    if let Some(rest) = strip_keyword(trimmed, "stationery") {
        let items = parse_item_list(rest);
        return Some(if items.is_empty() {
            Intent::StationeryUsage
        } else {
            Intent::Stationery(items)
        });
    }

    for keyword in ["help", "onboarding"] {
        if let Some(rest) = strip_keyword(trimmed, keyword) {
            let question = rest.trim();
            return Some(if question.is_empty() {
                Intent::HelpPrompt
            } else {
                Intent::Help(question.to_string())
            });
        }
    }

    None
}

/// If the text starts with the ASCII keyword as a whole word, return
/// the rest with case preserved for descriptions and questions.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.as_bytes().get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword.as_bytes()) {
        return None;
    }
    let rest = &text[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// `<amount> <category> <description...>`. Anything short of three parts
/// or a non-positive amount is a usage error, not a forwarded message.
fn parse_expense_args(rest: &str) -> Intent {
    let mut parts = rest.split_whitespace();
    let amount = match parts.next().and_then(|s| s.parse::<f64>().ok()) {
        Some(a) if a.is_finite() && a > 0.0 => a,
        _ => return Intent::ExpenseUsage,
    };
    // Category is kept exactly as typed; the backend owns canonicalization.
    let category = match parts.next() {
        Some(c) => c.to_string(),
        None => return Intent::ExpenseUsage,
    };
    let description = parts.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Intent::ExpenseUsage;
    }
    Intent::Expense { amount, category, description }
}

/// Parse `name:qty, name, name:qty`. A bare name means quantity 1, as
/// does any quantity that fails to parse or is below 1.
pub fn parse_item_list(text: &str) -> Vec<LineItem> {
    text.split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            let (name, qty) = match part.split_once(':') {
                Some((name, qty_text)) => {
                    let qty = qty_text
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|q| *q >= 1)
                        .unwrap_or(1);
                    (name.trim(), qty)
                }
                None => (part, 1),
            };
            if name.is_empty() {
                return None;
            }
            Some(LineItem { name: name.to_string(), qty })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_in_variants() {
        for text in ["clock in", "Clock In", "CLOCKIN", "checkin", "please clock in now"] {
            assert_eq!(parse_intent(text), Some(Intent::ClockIn), "input: {:?}", text);
        }
    }

    #[test]
    fn test_clock_out_variants() {
        assert_eq!(parse_intent("clock out"), Some(Intent::ClockOut));
        assert_eq!(parse_intent("checkout"), Some(Intent::ClockOut));
    }

    #[test]
    fn test_expense_full_command() {
        assert_eq!(
            parse_intent("expense 250 Travel taxi from airport"),
            Some(Intent::Expense {
                amount: 250.0,
                category: "Travel".to_string(),
                description: "taxi from airport".to_string(),
            })
        );
    }

    #[test]
    fn test_expense_category_case_preserved() {
        match parse_intent("expense 99 OFFICE-Supplies printer ink") {
            Some(Intent::Expense { category, .. }) => assert_eq!(category, "OFFICE-Supplies"),
            other => panic!("expected expense intent, got {:?}", other),
        }
    }

    #[test]
    fn test_expense_malformed_yields_usage() {
        for text in ["expense", "expense abc travel taxi", "expense 250", "expense 250 travel",
                     "expense -5 travel taxi", "expense 0 travel taxi"] {
            assert_eq!(parse_intent(text), Some(Intent::ExpenseUsage), "input: {:?}", text);
        }
    }

    #[test]
    fn test_stationery_item_list() {
        assert_eq!(
            parse_intent("stationery pen:2, notebook"),
            Some(Intent::Stationery(vec![
                LineItem { name: "pen".into(), qty: 2 },
                LineItem { name: "notebook".into(), qty: 1 },
            ]))
        );
        assert_eq!(parse_intent("stationery"), Some(Intent::StationeryUsage));
        assert_eq!(parse_intent("stationery ,,,"), Some(Intent::StationeryUsage));
    }

    #[test]
    fn test_item_list_bad_quantities_default_to_one() {
        let items = parse_item_list("pen:abc, pencil:0, eraser:3");
        assert_eq!(items[0].qty, 1);
        assert_eq!(items[1].qty, 1);
        assert_eq!(items[2].qty, 3);
    }

    #[test]
    fn test_help_and_onboarding_keywords() {
        assert_eq!(
            parse_intent("help how do I get my laptop"),
            Some(Intent::Help("how do I get my laptop".to_string()))
        );
        assert_eq!(
            parse_intent("onboarding where is the office"),
            Some(Intent::Help("where is the office".to_string()))
        );
        assert_eq!(parse_intent("help"), Some(Intent::HelpPrompt));
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        // "expenses..." is not the expense command
        assert_eq!(parse_intent("expenses are annoying"), None);
        assert_eq!(parse_intent("helpful tips"), None);
    }

    #[test]
    fn test_unrecognized_text_yields_none() {
        assert_eq!(parse_intent("what's the weather like"), None);
        assert_eq!(parse_intent(""), None);
        assert_eq!(parse_intent("   "), None);
    }

    #[test]
    fn test_order_clock_in_beats_substrings() {
        // contains both "check in" and "help"; clock-in is checked first
        assert_eq!(parse_intent("help me check in"), Some(Intent::ClockIn));
    }
}
