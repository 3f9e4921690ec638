// All LLM prompt constants for the interview module.
// Rendered with llm_client::prompts::render.

/// System framing for question generation.
pub const QUESTION_SYSTEM: &str = "You are an AI recruiter generating interview questions.";

/// Question generation prompt template.
/// Replace: {role}, {experience}, {tech_stack}, {previous_questions}, {count}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are an AI recruiter drafting technical interview questions for a candidate.

- Role: **{role}**
- Experience: **{experience} years**
- Tech Stack: **{tech_stack}**
- Do NOT repeat any of these previous questions: **{previous_questions}**

Write exactly **{count}** new technical questions that:
- are relevant to both the role and the tech stack,
- increase in difficulty from first to last,
- cannot be answered with a simple yes or no.

Return them as a numbered list, one per line, in the form "1. <question>"."#;

/// System framing for answer evaluation.
pub const EVALUATION_SYSTEM: &str = "You are an AI technical recruiter.";

/// Answer evaluation prompt template.
/// Replace: {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this answer from a technical interview.

Question: {question}
Candidate's Answer: {answer}

- Assign a score from 0 to 10 based on correctness, clarity, and completeness.
- Give constructive feedback the candidate can act on.

Respond in exactly this format:
Score: <0-10>
Feedback: <detailed feedback>"#;
