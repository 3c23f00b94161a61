use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use riskwise::workflows::assessment::{
    assessment_router, score_answers, Answer, AnswerCsvImporter, AssessmentRepository,
    AssessmentService, DocumentAnalyzer, QuestionId, TemplateCatalog,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScorePreviewRequest {
    pub(crate) template_key: String,
    #[serde(default)]
    pub(crate) answers: BTreeMap<QuestionId, Answer>,
    #[serde(default)]
    pub(crate) answers_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScorePreviewResponse {
    pub(crate) template_key: String,
    pub(crate) data_source: AnswerSource,
    pub(crate) answered: usize,
    pub(crate) total_questions: usize,
    pub(crate) score: u8,
    pub(crate) risk_level: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AnswerSource {
    Csv,
    Inline,
}

pub(crate) fn with_assessment_routes<R, A>(
    service: Arc<AssessmentService<R, A>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    A: DocumentAnalyzer + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/score-preview",
            axum::routing::post(score_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score a template against ad-hoc answers without creating an assessment.
/// Accepts inline answers or a raw `Question ID,Answer` CSV export.
pub(crate) async fn score_preview_endpoint(
    Json(payload): Json<ScorePreviewRequest>,
) -> Response {
    let catalog = TemplateCatalog::standard();
    let Some(template) = catalog.find(&payload.template_key) else {
        let body = json!({
            "error": format!("unknown assessment template '{}'", payload.template_key),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    };

    let (answers, data_source) = if let Some(csv) = payload.answers_csv {
        let reader = Cursor::new(csv.into_bytes());
        match AnswerCsvImporter::from_reader(reader, template) {
            Ok(rows) => (rows.into_iter().collect(), AnswerSource::Csv),
            Err(err) => {
                let body = json!({ "error": err.to_string() });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        }
    } else {
        (payload.answers, AnswerSource::Inline)
    };

    let score = score_answers(&template.questions, &answers, template.category);
    let response = ScorePreviewResponse {
        template_key: template.key.to_string(),
        data_source,
        answered: answers.len(),
        total_questions: template.questions.len(),
        score: score.score,
        risk_level: score.level.label(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
