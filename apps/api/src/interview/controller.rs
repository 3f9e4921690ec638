//! Session Controller: the interview stage machine.
//!
//! ```text
//!   Greeting --submit_profile--> QuestionAnswering --submit_answers--> QuestionAnswering
//!                                        |  \--refresh_questions--> QuestionAnswering
//!   any stage --exit--> Greeting (session cleared)
//! ```
//!
//! Every oracle failure is converted to a notice plus a safe default at the
//! call site. The only errors returned to the caller are validation and
//! stage conflicts, and both leave the session untouched.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::interview::evaluator::{evaluate_answer, Evaluation};
use crate::interview::models::{
    AnswerRecord, InterviewReport, InterviewSession, Notices, ProfileForm, ScoreBand, Stage,
    NO_ANSWER_FEEDBACK,
};
use crate::interview::parsing::MAX_SCORE;
use crate::interview::questions::generate_questions;
use crate::llm_client::TextGenerator;
use crate::report::{build_report, PageConfig, ReportEntry};

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields: Full Name, Email, Tech Stack, and Desired Position.";

/// One row of the results view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub number: usize,
    pub question: String,
    pub answer: String,
    pub score: u8,
    /// score / 10, for a progress bar.
    pub progress: f32,
    pub band: ScoreBand,
    pub feedback: String,
}

pub struct SessionController {
    llm: Arc<dyn TextGenerator>,
    page_config: PageConfig,
}

impl SessionController {
    pub fn new(llm: Arc<dyn TextGenerator>, page_config: PageConfig) -> Self {
        Self { llm, page_config }
    }

    /// Greeting → QuestionAnswering.
    ///
    /// Validates the form, generates the first batch of questions and opens
    /// one empty answer slot per question. A failed generation still advances
    /// the session, with no questions to answer.
    pub async fn submit_profile(
        &self,
        session: &mut InterviewSession,
        form: ProfileForm,
    ) -> Result<Notices, AppError> {
        if session.stage != Stage::Greeting {
            return Err(AppError::Conflict(
                "An interview is already in progress. Exit to start over.".to_string(),
            ));
        }

        let profile = form
            .into_profile()
            .ok_or_else(|| AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()))?;

        info!(
            "Starting interview for '{}' ({}, {} years)",
            profile.full_name, profile.desired_position, profile.experience_years
        );

        let mut notices = Notices::new();
        let questions = generate_questions(self.llm.as_ref(), &profile, &[], &mut notices).await;
        if questions.is_empty() {
            notices.warning("No questions are available right now. Exit and try again later.");
        }

        session.profile = Some(profile);
        session.load_questions(questions);
        session.form_submitted = true;
        session.stage = Stage::QuestionAnswering;
        session.started_at = Some(Utc::now());

        Ok(notices)
    }

    /// QuestionAnswering → QuestionAnswering, scoring every answer and building the report.
    ///
    /// Blank answers are scored 0 without consulting the oracle. Missing
    /// trailing answers count as blank.
    pub async fn submit_answers(
        &self,
        session: &mut InterviewSession,
        answers: Vec<String>,
    ) -> Result<Notices, AppError> {
        if session.stage != Stage::QuestionAnswering {
            return Err(AppError::Conflict(
                "Submit your profile before answering questions.".to_string(),
            ));
        }
        if answers.len() > session.questions.len() {
            return Err(AppError::Validation(format!(
                "Received {} answers for {} questions.",
                answers.len(),
                session.questions.len()
            )));
        }

        let mut notices = Notices::new();
        notices.success("Evaluating responses...");

        let mut answers = answers.into_iter();
        for index in 0..session.questions.len() {
            let answer = answers.next().unwrap_or_default();
            let evaluation = if answer.trim().is_empty() {
                Evaluation {
                    score: 0,
                    feedback: NO_ANSWER_FEEDBACK.to_string(),
                }
            } else {
                evaluate_answer(
                    self.llm.as_ref(),
                    &session.questions[index],
                    &answer,
                    &mut notices,
                )
                .await
            };

            session.answers[index] = AnswerRecord {
                question_index: index,
                answer_text: answer,
                score: evaluation.score,
                feedback: evaluation.feedback,
            };
        }
        session.evaluated = true;
        info!(
            "Scored {} answers ({} evaluation errors)",
            session.answers.len(),
            notices.errors().count()
        );
        notices.success("Evaluation complete! Here are your results:");

        self.attach_report(session, &mut notices).await?;
        Ok(notices)
    }

    /// QuestionAnswering → QuestionAnswering with a fresh batch of questions,
    /// excluding every question already shown. Answers and results are cleared.
    pub async fn refresh_questions(&self, session: &mut InterviewSession) -> Result<Notices, AppError> {
        let profile = match (&session.stage, &session.profile) {
            (Stage::QuestionAnswering, Some(profile)) => profile.clone(),
            _ => {
                return Err(AppError::Conflict(
                    "Submit your profile before requesting new questions.".to_string(),
                ))
            }
        };

        let mut notices = Notices::new();
        let excluded = session.seen_questions.clone();
        let questions =
            generate_questions(self.llm.as_ref(), &profile, &excluded, &mut notices).await;

        if questions.is_empty() {
            notices.warning("Keeping the current questions.");
        } else {
            notices.success(format!("Loaded {} new questions.", questions.len()));
            session.load_questions(questions);
        }
        Ok(notices)
    }

    /// Any stage → Greeting. Clears everything; calling it twice is the same as once.
    pub fn exit(&self, session: &mut InterviewSession) {
        if session.stage != Stage::Greeting {
            info!("Interview reset");
        }
        *session = InterviewSession::default();
    }

    async fn attach_report(
        &self,
        session: &mut InterviewSession,
        notices: &mut Notices,
    ) -> Result<(), AppError> {
        let (full_name, email) = session
            .profile
            .as_ref()
            .map(|p| (p.full_name.clone(), p.email.clone()))
            .unwrap_or_default();
        let entries = report_entries(session);
        let config = self.page_config.clone();
        let name_for_build = full_name.clone();

        // PDF layout is CPU-bound; keep it off the async executor.
        let built = tokio::task::spawn_blocking(move || {
            build_report(&name_for_build, &email, &entries, &config)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in report build: {e}")))?;

        match built {
            Ok(bytes) => {
                session.report = Some(InterviewReport {
                    file_name: report_file_name(&full_name),
                    bytes,
                });
                session.report_error = None;
                notices.success(
                    "Thank you for completing the interview! You can download your report below.",
                );
            }
            Err(e) => {
                error!("Report generation failed: {e}");
                session.report = None;
                session.report_error = Some(e.to_string());
                notices.error(format!("Could not generate the report: {e}"));
            }
        }
        Ok(())
    }
}

/// One composite record per question, in question order.
pub fn report_entries(session: &InterviewSession) -> Vec<ReportEntry> {
    session
        .answers
        .iter()
        .filter_map(|record| {
            session
                .questions
                .get(record.question_index)
                .map(|question| ReportEntry {
                    question: question.clone(),
                    answer: record.answer_text.clone(),
                    score: record.score,
                    feedback: record.feedback.clone(),
                })
        })
        .collect()
}

/// Per-question results with presentational banding. Empty until answers are scored.
pub fn results(session: &InterviewSession) -> Vec<QuestionResult> {
    if !session.evaluated {
        return Vec::new();
    }
    report_entries(session)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| QuestionResult {
            number: i + 1,
            progress: f32::from(entry.score) / f32::from(MAX_SCORE),
            band: ScoreBand::from_score(entry.score),
            question: entry.question,
            answer: entry.answer,
            score: entry.score,
            feedback: entry.feedback,
        })
        .collect()
}

/// `"{name}_report.pdf"`, restricted to characters that are safe in a
/// Content-Disposition header. Falls back to `"interview"`.
pub fn report_file_name(full_name: &str) -> String {
    let stem: String = full_name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let stem = if stem.trim_matches('_').is_empty() {
        "interview"
    } else {
        stem.as_str()
    };
    format!("{stem}_report.pdf")
}
