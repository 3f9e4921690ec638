//! Answer evaluation: one question/answer pair in, score and feedback out.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::interview::models::Notices;
use crate::interview::parsing::{parse_feedback, parse_score};
use crate::interview::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use crate::llm_client::prompts::render;
use crate::llm_client::TextGenerator;

pub const NO_FEEDBACK: &str = "No feedback provided.";
pub const EVALUATION_FAILED: &str = "Evaluation failed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0..=10
    pub score: u8,
    pub feedback: String,
}

impl Evaluation {
    fn sentinel(feedback: &str) -> Self {
        Self {
            score: 0,
            feedback: feedback.to_string(),
        }
    }
}

pub fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    render(
        EVALUATION_PROMPT_TEMPLATE,
        &[("question", question), ("answer", answer)],
    )
}

/// Interprets an evaluation reply. Score and feedback fall back independently.
pub fn interpret_evaluation(reply: &str) -> Evaluation {
    let score = parse_score(reply).unwrap_or_else(|miss| {
        debug!("{miss}; defaulting score to 0");
        0
    });
    let feedback = parse_feedback(reply).unwrap_or_else(|miss| {
        debug!("{miss}; using default feedback");
        NO_FEEDBACK.to_string()
    });
    Evaluation { score, feedback }
}

/// Scores one answer. Never fails: a failed call raises an error notice and
/// returns `(0, "Evaluation failed.")`.
pub async fn evaluate_answer(
    llm: &dyn TextGenerator,
    question: &str,
    answer: &str,
    notices: &mut Notices,
) -> Evaluation {
    let prompt = build_evaluation_prompt(question, answer);

    match llm.complete(EVALUATION_SYSTEM, &prompt).await {
        Ok(reply) => interpret_evaluation(&reply),
        Err(e) => {
            warn!("Answer evaluation failed: {e}");
            notices.error(format!("Error evaluating answer: {e}"));
            Evaluation::sentinel(EVALUATION_FAILED)
        }
    }
}
