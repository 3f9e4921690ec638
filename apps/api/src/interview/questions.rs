//! Question generation: profile in, numbered questions out.

use tracing::{info, warn};

use crate::interview::models::{CandidateProfile, Notices};
use crate::interview::parsing::parse_numbered_items;
use crate::interview::prompts::{QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM};
use crate::llm_client::prompts::render;
use crate::llm_client::TextGenerator;

/// Number of questions requested per batch.
pub const QUESTIONS_PER_BATCH: usize = 5;

/// Builds the generation prompt for a profile, excluding previously seen questions.
pub fn build_question_prompt(profile: &CandidateProfile, excluded: &[String]) -> String {
    let experience = profile.experience_years.to_string();
    let tech_stack = profile.tech_stack.join(", ");
    let previous = if excluded.is_empty() {
        "none".to_string()
    } else {
        excluded.join("; ")
    };
    let count = QUESTIONS_PER_BATCH.to_string();

    render(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("role", profile.desired_position.as_str()),
            ("experience", experience.as_str()),
            ("tech_stack", tech_stack.as_str()),
            ("previous_questions", previous.as_str()),
            ("count", count.as_str()),
        ],
    )
}

/// Generates up to `QUESTIONS_PER_BATCH` questions for the candidate.
///
/// - Numbered items are extracted in order.
/// - A reply with no numbered items comes back whole, as a single question.
/// - A failed call raises an error notice and yields no questions.
pub async fn generate_questions(
    llm: &dyn TextGenerator,
    profile: &CandidateProfile,
    excluded: &[String],
    notices: &mut Notices,
) -> Vec<String> {
    let prompt = build_question_prompt(profile, excluded);

    let reply = match llm.complete(QUESTION_SYSTEM, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Question generation failed: {e}");
            notices.error(format!("Error generating questions: {e}"));
            return Vec::new();
        }
    };

    match parse_numbered_items(&reply, QUESTIONS_PER_BATCH) {
        Ok(questions) => {
            info!(
                "Generated {} questions for role '{}'",
                questions.len(),
                profile.desired_position
            );
            questions
        }
        Err(miss) => {
            warn!("{miss}; using raw reply as a single question");
            vec![reply.trim().to_string()]
        }
    }
}
