use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::board::BoardRequest;
use super::domain::{Caller, QuizId, Role};
use super::facets::FacetQuery;
use super::repository::{Clock, QuizRepository};
use super::service::{BoardError, QuizBoardService};
use super::visibility::StudentRoute;
use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Router builder exposing quiz boards, single quiz status, and statistics.
pub fn quiz_router<R, C>(service: Arc<QuizBoardService<R, C>>) -> Router
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/quizzes", get(board_handler::<R, C>))
        .route(
            "/api/v1/quizzes/:quiz_id/status",
            get(status_handler::<R, C>),
        )
        .route(
            "/api/v1/statistics/quizzes",
            get(statistics_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BoardQuery {
    #[serde(default)]
    route: Option<String>,
    #[serde(flatten)]
    facets: FacetQuery,
}

/// Reads the caller identity set by the upstream authentication layer.
pub fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, CallerError> {
    let user_id = header_value(headers, USER_ID_HEADER).ok_or(CallerError::MissingHeader {
        name: USER_ID_HEADER,
    })?;
    let role = header_value(headers, USER_ROLE_HEADER).ok_or(CallerError::MissingHeader {
        name: USER_ROLE_HEADER,
    })?;
    let role = Role::from_label(role).ok_or_else(|| CallerError::UnknownRole {
        value: role.to_string(),
    })?;

    Ok(Caller::new(user_id, role))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallerError {
    #[error("missing {name} header")]
    MissingHeader { name: &'static str },
    #[error("unknown role '{value}'")]
    UnknownRole { value: String },
}

pub(crate) async fn board_handler<R, C>(
    State(service): State<Arc<QuizBoardService<R, C>>>,
    headers: HeaderMap,
    Query(query): Query<BoardQuery>,
) -> Result<Response, AppError>
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
{
    let caller = caller_from_headers(&headers)?;

    let request = if caller.is_student() {
        let raw = query.route.unwrap_or_default();
        let route = StudentRoute::parse(&raw).ok_or_else(|| BoardError::UnknownRoute(raw))?;
        BoardRequest::student(route)
    } else {
        let filters = query.facets.into_filters().map_err(BoardError::from)?;
        BoardRequest::manage(filters)
    };

    let board = service.board(&caller, &request)?;
    Ok((StatusCode::OK, axum::Json(board)).into_response())
}

pub(crate) async fn status_handler<R, C>(
    State(service): State<Arc<QuizBoardService<R, C>>>,
    headers: HeaderMap,
    Path(quiz_id): Path<String>,
) -> Result<Response, AppError>
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
{
    let caller = caller_from_headers(&headers)?;
    let card = service.quiz_card(&caller, &QuizId(quiz_id))?;
    Ok((StatusCode::OK, axum::Json(card)).into_response())
}

pub(crate) async fn statistics_handler<R, C>(
    State(service): State<Arc<QuizBoardService<R, C>>>,
    headers: HeaderMap,
    Query(query): Query<FacetQuery>,
) -> Result<Response, AppError>
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
{
    let caller = caller_from_headers(&headers)?;
    let facets = query.into_filters().map_err(BoardError::from)?.facets;

    let report = service.statistics(&caller, facets)?;
    Ok((StatusCode::OK, axum::Json(report)).into_response())
}
