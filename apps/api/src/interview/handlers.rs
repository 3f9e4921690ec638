//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::controller::{results, QuestionResult};
use crate::interview::models::{CandidateProfile, InterviewSession, Notices, ProfileForm, Stage};
use crate::state::AppState;

const GREETING: &str = "Hello! I'll guide you through your technical interview screening.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub text: String,
    pub answer: String,
}

/// Everything the front end needs to render the current stage.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub stage: Stage,
    pub form_submitted: bool,
    pub profile: Option<CandidateProfile>,
    pub questions: Vec<QuestionView>,
    /// Present once answers have been scored.
    pub results: Option<Vec<QuestionResult>>,
    pub report_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub notices: Notices,
}

impl SessionView {
    fn build(session_id: Uuid, session: &InterviewSession, notices: Notices) -> Self {
        let questions = session
            .questions
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionView {
                number: i + 1,
                text: text.trim().to_string(),
                answer: session
                    .answers
                    .get(i)
                    .map(|a| a.answer_text.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            session_id,
            stage: session.stage,
            form_submitted: session.form_submitted,
            profile: session.profile.clone(),
            questions,
            results: session.evaluated.then(|| results(session)),
            report_url: session
                .report
                .as_ref()
                .map(|_| format!("/api/v1/sessions/{session_id}/report")),
            started_at: session.started_at,
            notices,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens a new interview in the Greeting stage.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let (session_id, handle) = state.sessions.create().await;
    let session = handle.lock().await;

    let mut notices = Notices::new();
    notices.info(GREETING);

    Ok((
        StatusCode::CREATED,
        Json(SessionView::build(session_id, &session, notices)),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::build(session_id, &session, Notices::new())))
}

/// POST /api/v1/sessions/:id/profile
///
/// Candidate intake form. Generates the first batch of questions.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let notices = state.controller.submit_profile(&mut session, form).await?;

    Ok(Json(SessionView::build(session_id, &session, notices)))
}

/// POST /api/v1/sessions/:id/answers
///
/// Scores every answer and builds the downloadable report.
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswersRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let notices = state
        .controller
        .submit_answers(&mut session, request.answers)
        .await?;

    Ok(Json(SessionView::build(session_id, &session, notices)))
}

/// POST /api/v1/sessions/:id/questions/refresh
///
/// Replaces the questions with a new batch that avoids every question already shown.
pub async fn handle_refresh_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let notices = state.controller.refresh_questions(&mut session).await?;

    Ok(Json(SessionView::build(session_id, &session, notices)))
}

/// GET /api/v1/sessions/:id/report
///
/// Downloads the PDF report as `{full_name}_report.pdf`.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;

    match (&session.report, &session.report_error) {
        (Some(report), _) => {
            let disposition = format!("attachment; filename=\"{}\"", report.file_name);
            Ok((
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.bytes.clone(),
            )
                .into_response())
        }
        (None, Some(reason)) => Err(AppError::UnprocessableEntity(format!(
            "Report generation failed: {reason}"
        ))),
        (None, None) => Err(AppError::NotFound(
            "No report yet. Submit your answers first.".to_string(),
        )),
    }
}

/// POST /api/v1/sessions/:id/exit
///
/// Clears the session and returns to the intake form.
pub async fn handle_exit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    state.controller.exit(&mut session);

    Ok(Json(SessionView::build(session_id, &session, Notices::new())))
}
