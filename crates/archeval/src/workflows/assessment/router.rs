use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::answers::{AnswerSet, AnswerSubmission, ApiTolerance};
use super::narrative::NarrativeGenerator;
use super::questions::{
    GatekeeperQuestion, ScoredQuestion, API_TOLERANCE_LABEL, GATEKEEPERS, MAX_SCORE,
    SCORED_QUESTIONS, SCORING_THRESHOLD,
};
use super::service::AssessmentService;
use super::store::{SubmissionId, SubmissionStore};

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Seconds a client should wait before polling a record whose narrative is pending.
const NARRATIVE_RETRY_AFTER_SECS: &str = "1";

/// Router builder exposing the questionnaire schema, submissions, and history.
pub fn assessment_router<S, N>(service: Arc<AssessmentService<S, N>>) -> Router
where
    S: SubmissionStore + ?Sized + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler))
        .route(
            "/api/v1/assessments",
            get(history_handler::<S, N>).post(submit_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:submission_id",
            get(status_handler::<S, N>),
        )
        .with_state(service)
}

/// Static questionnaire layout served to form clients.
#[derive(Debug, Serialize)]
pub struct QuestionnaireView {
    pub gatekeepers: &'static [GatekeeperQuestion],
    pub api_tolerance: ApiToleranceView,
    pub scored_questions: &'static [ScoredQuestion],
    pub max_score: u32,
    pub threshold: u32,
}

#[derive(Debug, Serialize)]
pub struct ApiToleranceView {
    pub label: &'static str,
    pub options: [ApiTolerance; 3],
}

impl QuestionnaireView {
    pub fn current() -> Self {
        Self {
            gatekeepers: &GATEKEEPERS,
            api_tolerance: ApiToleranceView {
                label: API_TOLERANCE_LABEL,
                options: [
                    ApiTolerance::NotAcceptable,
                    ApiTolerance::RiskMitigation,
                    ApiTolerance::FullyAcceptable,
                ],
            },
            scored_questions: &SCORED_QUESTIONS,
            max_score: MAX_SCORE,
            threshold: SCORING_THRESHOLD,
        }
    }
}

pub(crate) async fn questions_handler() -> Json<QuestionnaireView> {
    Json(QuestionnaireView::current())
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<AssessmentService<S, N>>>,
    Json(submission): Json<AnswerSubmission>,
) -> Response
where
    S: SubmissionStore + ?Sized + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    match AnswerSet::try_from(submission) {
        Ok(answers) => {
            let record = service.submit(answers).await;
            (StatusCode::ACCEPTED, Json(record)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<S, N>(
    State(service): State<Arc<AssessmentService<S, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    S: SubmissionStore + ?Sized + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    let record = match Uuid::parse_str(&submission_id) {
        Ok(id) => service.get(&SubmissionId(id)).await,
        Err(_) => None,
    };

    match record {
        Some(record) if record.narrative_pending() => (
            StatusCode::OK,
            [(header::RETRY_AFTER, NARRATIVE_RETRY_AFTER_SECS)],
            Json(record),
        )
            .into_response(),
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => {
            let payload = json!({
                "error": "submission not found",
                "submission_id": submission_id,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<S, N>(
    State(service): State<Arc<AssessmentService<S, N>>>,
    headers: HeaderMap,
) -> Response
where
    S: SubmissionStore + ?Sized + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    let provided = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());
    if !service.authorize_history(provided) {
        let payload = json!({ "error": "admin password required" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    let records = service.history().await;
    (StatusCode::OK, Json(records)).into_response()
}
