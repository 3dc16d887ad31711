use crate::infra::AppState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use quizgate::error::AppError;
use quizgate::workflows::admission::{
    admission_router, AdmissionRangeRepository, AdmissionValidator,
};
use quizgate::workflows::quiz::{
    caller_from_headers, quiz_router, BoardError, Clock, GradebookImporter, QuizBoardService,
    QuizRepository, Role,
};
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct GradebookImportResponse {
    pub(crate) quizzes: usize,
    pub(crate) submissions: usize,
}

pub(crate) fn with_quiz_routes<R, C, A>(
    board: Arc<QuizBoardService<R, C>>,
    admissions: Arc<AdmissionValidator<A>>,
) -> axum::Router
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
    A: AdmissionRangeRepository + 'static,
{
    quiz_router(board)
        .merge(admission_router(admissions))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/gradebook",
            axum::routing::post(gradebook_import_endpoint),
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

/// Replaces the submission lists of every quiz named in a gradebook CSV body.
pub(crate) async fn gradebook_import_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    let caller = caller_from_headers(&headers)?;
    if caller.role != Role::Admin {
        return Err(BoardError::Forbidden {
            role: caller.role,
            action: "import gradebooks",
        }
        .into());
    }

    let response = import_gradebook(&state, body)?;
    info!(
        user = %caller.user_id.0,
        quizzes = response.quizzes,
        submissions = response.submissions,
        "gradebook imported"
    );
    Ok((StatusCode::OK, Json(response)).into_response())
}

fn import_gradebook(state: &AppState, body: String) -> Result<GradebookImportResponse, AppError> {
    let imported = GradebookImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let quizzes = imported.len();
    let submissions = state.quizzes.import_submissions(imported)?;

    Ok(GradebookImportResponse {
        quizzes,
        submissions,
    })
}
