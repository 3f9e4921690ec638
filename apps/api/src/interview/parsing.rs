//! Reply parsing: recovers structure from free-form oracle text.
//!
//! Every function here is pure and returns `ParseMiss` instead of guessing;
//! callers decide the fallback value.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Highest score the evaluator may assign. Larger numbers are clamped.
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMiss {
    #[error("no numbered items found in reply")]
    NoNumberedItems,

    #[error("no 'Score:' line found in reply")]
    NoScore,

    #[error("no 'Feedback:' block found in reply")]
    NoFeedback,
}

fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "<integer>. <text>" at line start; leading markdown decoration ("**", "- ", "#") is tolerated.
    RE.get_or_init(|| Regex::new(r"(?m)^[^\w\n]*\d+\.\s*(\S.*)$").expect("valid regex"))
}

fn score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Score:\**\s*(\d+)").expect("valid regex"))
}

fn feedback_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)Feedback:\**\s*(.*)").expect("valid regex"))
}

/// Extracts the text of every numbered list item, in reply order, capped at `limit`.
pub fn parse_numbered_items(reply: &str, limit: usize) -> Result<Vec<String>, ParseMiss> {
    let items: Vec<String> = numbered_item_re()
        .captures_iter(reply)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches("**").trim().to_string())
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect();

    if items.is_empty() {
        Err(ParseMiss::NoNumberedItems)
    } else {
        Ok(items)
    }
}

/// Extracts the first `Score: <digits>` value, clamped to `MAX_SCORE`.
pub fn parse_score(reply: &str) -> Result<u8, ParseMiss> {
    let digits = score_re()
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseMiss::NoScore)?;

    let value: u32 = digits.as_str().parse().map_err(|_| ParseMiss::NoScore)?;
    Ok(value.min(u32::from(MAX_SCORE)) as u8)
}

/// Extracts everything after the first `Feedback:` marker, trimmed. Multi-line.
pub fn parse_feedback(reply: &str) -> Result<String, ParseMiss> {
    let feedback = feedback_re()
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or(ParseMiss::NoFeedback)?;

    if feedback.is_empty() {
        Err(ParseMiss::NoFeedback)
    } else {
        Ok(feedback)
    }
}
