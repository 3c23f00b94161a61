use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::classifier::ControlTestStatus;
use super::domain::{AiFinding, Answer, AssessmentId, EvidenceExcerpt, QuestionId};
use super::repository::{AssessmentRepository, DocumentAnalyzer, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the assessment HTTP endpoints.
pub fn assessment_router<R, A>(service: Arc<AssessmentService<R, A>>) -> Router
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(start_handler::<R, A>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/answers",
            put(answer_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/evidence",
            put(evidence_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/analysis",
            post(analysis_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/approvals",
            post(approval_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/status-override",
            post(override_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/finalize",
            post(finalize_handler::<R, A>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/score",
            get(score_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartAssessmentRequest {
    pub(crate) template_key: String,
    #[serde(default)]
    pub(crate) started_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) question_id: QuestionId,
    pub(crate) answer: Answer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvidenceRequest {
    pub(crate) question_id: QuestionId,
    pub(crate) excerpts: Vec<EvidenceExcerpt>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisBody {
    pub(crate) findings: Vec<AiFinding>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApprovalRequest {
    pub(crate) question_id: QuestionId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) question_id: QuestionId,
    pub(crate) classification: ControlTestStatus,
}

pub(crate) async fn start_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    axum::Json(request): axum::Json<StartAssessmentRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let started_on = request
        .started_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.start(&request.template_key, started_on) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.record_answer(&id, &request.question_id, request.answer) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evidence_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<EvidenceRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.edit_evidence(&id, &request.question_id, request.excerpts) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analysis_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(body): axum::Json<AnalysisBody>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.apply_findings(&id, body.findings) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approval_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<ApprovalRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.approve(&id, &request.question_id) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn override_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.override_status(&id, &request.question_id, request.classification) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.finalize(&id) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R, A>(
    State(service): State<Arc<AssessmentService<R, A>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.score(&id) {
        Ok(score) => {
            let payload = json!({
                "score": score.score,
                "risk_level": score.level.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::UnknownTemplate(_) | AssessmentServiceError::UnknownQuestion(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::AssessmentFinalized(_)
        | AssessmentServiceError::IncompleteReview { .. } => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AssessmentServiceError::Analysis(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
