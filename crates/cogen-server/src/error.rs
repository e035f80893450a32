//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cogen_course::CourseError;
use cogen_storage::{ErrorStatus, StorageError, StorageErrorKind};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No course with the given path or title.
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// No page with the given path in the course.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// The course start was requested but the course has no pages.
    #[error("Course has no pages")]
    EmptyCourse,

    /// No roster record with the given id.
    #[error("Student not found: {student} in {course}")]
    StudentNotFound {
        /// Course path.
        course: String,
        /// Requested student id.
        student: String,
    },

    /// The request needs a training session.
    #[error("Not signed in")]
    NotSignedIn,

    /// Another course already uses the title.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rejected request body or parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking storage task failed to complete.
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        let key = err
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match err.kind() {
            StorageErrorKind::NotFound => Self::CourseNotFound(key),
            StorageErrorKind::AlreadyExists => {
                Self::Conflict(format!("course title already in use: {key}"))
            }
            StorageErrorKind::InvalidPath => Self::BadRequest(format!("invalid course path: {key}")),
            _ => Self::Storage(err),
        }
    }
}

impl From<CourseError> for ServerError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::SectionNotFound(path) => Self::SectionNotFound(path),
            CourseError::EmptyCourse => Self::EmptyCourse,
        }
    }
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::CourseNotFound(_)
            | Self::SectionNotFound(_)
            | Self::EmptyCourse
            | Self::StudentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotSignedIn => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(err) if err.status == ErrorStatus::Temporary => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Storage(_) | Self::Json(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::CourseNotFound(course) => json!({"error": "Course not found", "course": course}),
            Self::SectionNotFound(path) => json!({"error": "Section not found", "path": path}),
            Self::StudentNotFound { course, student } => {
                json!({"error": "Student not found", "course": course, "student": student})
            }
            _ => json!({"error": self.to_string()}),
        };

        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }

        (status, axum::Json(body)).into_response()
    }
}
