pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answers),
        )
        .route(
            "/api/v1/sessions/:id/questions/refresh",
            post(handlers::handle_refresh_questions),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(handlers::handle_download_report),
        )
        .route("/api/v1/sessions/:id/exit", post(handlers::handle_exit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::interview::controller::SessionController;
    use crate::interview::store::SessionStore;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::report::default_page_config;

    const FIVE_QUESTIONS: &str = "1. What is a list comprehension?\n\
                                  2. Explain GIL.\n\
                                  3. How are dicts implemented?\n\
                                  4. What does asyncio solve?\n\
                                  5. Design a rate limiter.";

    fn app(oracle: Arc<ScriptedGenerator>) -> Router {
        build_router(AppState {
            sessions: SessionStore::default(),
            controller: Arc::new(SessionController::new(oracle, default_page_config())),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn new_session(app: &Router) -> String {
        let (status, view) = send_json(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["stage"], "greeting");
        view["session_id"].as_str().unwrap().to_string()
    }

    fn jane() -> Value {
        json!({
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "experience_years": 3,
            "desired_position": "Backend Engineer",
            "tech_stack": "Python"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(ScriptedGenerator::new()));
        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_profile_missing_email_is_rejected() {
        let app = app(Arc::new(ScriptedGenerator::new()));
        let id = new_session(&app).await;
        let mut form = jane();
        form["email"] = json!("");

        let (status, body) =
            send_json(&app, "POST", &format!("/api/v1/sessions/{id}/profile"), Some(form)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, view) = send_json(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["stage"], "greeting");
        assert_eq!(view["form_submitted"], false);
    }

    #[tokio::test]
    async fn test_full_interview_and_report_download() {
        let oracle = Arc::new(
            ScriptedGenerator::new()
                .reply(FIVE_QUESTIONS)
                .reply("Score: 9\nFeedback: Excellent.")
                .reply("Score: 6\nFeedback: Decent.")
                .reply("Score: 2\nFeedback: Needs work."),
        );
        let app = app(oracle.clone());
        let id = new_session(&app).await;

        let (status, view) =
            send_json(&app, "POST", &format!("/api/v1/sessions/{id}/profile"), Some(jane())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["stage"], "question_answering");
        assert_eq!(view["questions"].as_array().unwrap().len(), 5);
        assert_eq!(view["questions"][1]["text"], "Explain GIL.");
        assert_eq!(view["questions"][1]["number"], 2);

        let answers = json!({"answers": ["Inline loop.", "", "Hash table.", " ", "Token bucket."]});
        let (status, view) =
            send_json(&app, "POST", &format!("/api/v1/sessions/{id}/answers"), Some(answers)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(oracle.calls(), 4);

        let results = view["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0]["band"], "excellent");
        assert_eq!(results[1]["score"], 0);
        assert_eq!(results[1]["feedback"], "No answer provided.");
        assert_eq!(results[2]["band"], "acceptable");
        assert_eq!(results[3]["score"], 0);
        assert_eq!(results[4]["band"], "poor");
        let report_url = view["report_url"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(Request::builder().uri(&report_url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_report.pdf\""
        );
        let pdf = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_report_before_answers_is_not_found() {
        let app = app(Arc::new(ScriptedGenerator::new().reply(FIVE_QUESTIONS)));
        let id = new_session(&app).await;
        send_json(&app, "POST", &format!("/api/v1/sessions/{id}/profile"), Some(jane())).await;

        let (status, _) = send(&app, "GET", &format!("/api/v1/sessions/{id}/report"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_answers_in_greeting_conflict() {
        let app = app(Arc::new(ScriptedGenerator::new()));
        let id = new_session(&app).await;

        let (status, body) = send_json(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/answers"),
            Some(json!({"answers": []})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STAGE_CONFLICT");
    }

    #[tokio::test]
    async fn test_exit_returns_to_greeting() {
        let app = app(Arc::new(ScriptedGenerator::new().reply(FIVE_QUESTIONS)));
        let id = new_session(&app).await;
        send_json(&app, "POST", &format!("/api/v1/sessions/{id}/profile"), Some(jane())).await;

        let uri = format!("/api/v1/sessions/{id}/exit");
        let (status, first) = send_json(&app, "POST", &uri, None).await;
        let (_, second) = send_json(&app, "POST", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["stage"], "greeting");
        assert_eq!(first["questions"].as_array().unwrap().len(), 0);
        assert!(first["profile"].is_null());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app(Arc::new(ScriptedGenerator::new()));
        let (status, body) = send_json(
            &app,
            "GET",
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
