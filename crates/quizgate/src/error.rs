use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admission::{AdmissionServiceError, RangeLoadError};
use crate::workflows::quiz::{
    BoardError, CallerError, GradebookImportError, RepositoryError, SnapshotError,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Snapshot(SnapshotError),
    Gradebook(GradebookImportError),
    Board(BoardError),
    Admission(AdmissionServiceError),
    Ranges(RangeLoadError),
    Caller(CallerError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Snapshot(err) => write!(f, "snapshot error: {}", err),
            AppError::Gradebook(err) => write!(f, "gradebook error: {}", err),
            AppError::Board(err) => write!(f, "quiz board error: {}", err),
            AppError::Admission(err) => write!(f, "admission error: {}", err),
            AppError::Ranges(err) => write!(f, "admission ranges error: {}", err),
            AppError::Caller(err) => write!(f, "unauthenticated: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Gradebook(err) => Some(err),
            AppError::Board(err) => Some(err),
            AppError::Admission(err) => Some(err),
            AppError::Ranges(err) => Some(err),
            AppError::Caller(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Caller(_) => StatusCode::UNAUTHORIZED,
            AppError::Snapshot(_) | AppError::Gradebook(_) => StatusCode::BAD_REQUEST,
            AppError::Board(BoardError::QuizNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Board(BoardError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            AppError::Board(BoardError::Filter(_) | BoardError::UnknownRoute(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Admission(AdmissionServiceError::Admission(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Board(BoardError::Repository(_))
            | AppError::Admission(AdmissionServiceError::Repository(_))
            | AppError::Ranges(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<SnapshotError> for AppError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<GradebookImportError> for AppError {
    fn from(value: GradebookImportError) -> Self {
        Self::Gradebook(value)
    }
}

impl From<BoardError> for AppError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Board(BoardError::Repository(value))
    }
}

impl From<AdmissionServiceError> for AppError {
    fn from(value: AdmissionServiceError) -> Self {
        Self::Admission(value)
    }
}

impl From<RangeLoadError> for AppError {
    fn from(value: RangeLoadError) -> Self {
        Self::Ranges(value)
    }
}

impl From<CallerError> for AppError {
    fn from(value: CallerError) -> Self {
        Self::Caller(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admission::{AdmissionError, EntryKind};
    use crate::workflows::quiz::QuizId;

    #[test]
    fn maps_workflow_errors_to_status_codes() {
        let cases = [
            (
                AppError::from(BoardError::QuizNotFound(QuizId("q-1".to_string()))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(AdmissionServiceError::from(AdmissionError::InvalidFormat {
                    value: "y1".to_string(),
                })),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(RepositoryError::Unavailable("offline".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Config(ConfigError::InvalidPort), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::from(CallerError::MissingHeader { name: "x-user-id" }),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::from(BoardError::UnknownRoute("archive".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(RangeLoadError::InvertedEntry {
                    id: "r-1".to_string(),
                    kind: EntryKind::Lateral,
                    start: "l24cs120".to_string(),
                    end: "l24cs101".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
