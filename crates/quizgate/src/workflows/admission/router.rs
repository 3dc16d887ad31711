use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::AdmissionError;
use super::repository::AdmissionRangeRepository;
use super::service::{AdmissionCheck, AdmissionServiceError, AdmissionValidator};

/// Router builder exposing admission-number checks and range lookup.
pub fn admission_router<R>(validator: Arc<AdmissionValidator<R>>) -> Router
where
    R: AdmissionRangeRepository + 'static,
{
    Router::new()
        .route("/api/v1/admissions/validate", post(validate_handler::<R>))
        .route("/api/v1/admissions/ranges", get(range_handler::<R>))
        .with_state(validator)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RangeQuery {
    department: String,
    year: u8,
    section: String,
}

pub(crate) async fn validate_handler<R>(
    State(validator): State<Arc<AdmissionValidator<R>>>,
    axum::Json(check): axum::Json<AdmissionCheck>,
) -> Response
where
    R: AdmissionRangeRepository + 'static,
{
    match validator.validate(&check) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(AdmissionServiceError::Admission(error)) => {
            let mut payload = json!({
                "error": error.to_string(),
                "code": error.code(),
            });
            if let AdmissionError::OutOfRange { kind, start, end } = &error {
                payload["entry"] = json!(kind.label());
                payload["bounds"] = json!({ "start": start, "end": end });
            }
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn range_handler<R>(
    State(validator): State<Arc<AdmissionValidator<R>>>,
    Query(query): Query<RangeQuery>,
) -> Response
where
    R: AdmissionRangeRepository + 'static,
{
    match validator.range_for(&query.department, query.year, &query.section) {
        Ok(range) => (StatusCode::OK, axum::Json(range)).into_response(),
        Err(AdmissionServiceError::Admission(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
