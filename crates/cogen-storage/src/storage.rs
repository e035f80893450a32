//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for loading and replacing course
//! documents and rosters, along with [`StorageError`] for unified error
//! handling across backends.
//!
//! # Keys
//!
//! Courses are addressed by their URL path (`"cloud-lab"`). [`Storage::load`]
//! also accepts the course title. Rosters are always addressed by course path.

use std::path::PathBuf;

use cogen_course::{Course, StudentRecord};
use serde::Serialize;

/// Course listing entry returned by [`Storage::list`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    /// Unique course title.
    pub title: String,
    /// Display name.
    pub name: String,
    /// URL path.
    pub path: String,
    /// Hidden from public listings.
    pub private: bool,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            name: course.name.clone(),
            path: course.path.clone(),
            private: course.private,
        }
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Another course already uses this title or path.
    AlreadyExists,
    /// Invalid key or path.
    InvalidPath,
    /// Stored document could not be decoded or encoded.
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, invalid path, conflict).
    #[default]
    Permanent,
    /// Worth retrying later (timeout, interrupted); served as 503.
    Temporary,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Path or key context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            std::io::ErrorKind::TimedOut => StorageErrorKind::Unavailable,
            _ => StorageErrorKind::Other,
        };
        let status = match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => ErrorStatus::Temporary,
            _ => ErrorStatus::Permanent,
        };
        let mut error = Self::new(kind).with_status(status).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Create a storage error from a JSON encoding or decoding error.
    #[must_use]
    pub fn json(err: serde_json::Error, path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidData)
            .with_path(path)
            .with_source(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Unavailable => "Unavailable",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for course documents and rosters.
///
/// Courses are loaded and replaced whole; there is no partial update.
/// Implementations must make [`save`](Storage::save) atomic per document
/// (readers see either the old or the new course, never a mix). Concurrent
/// saves of the same course are last-write-wins.
pub trait Storage: Send + Sync {
    /// List all stored courses, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn list(&self) -> Result<Vec<CourseSummary>, StorageError>;

    /// Load a course by path or title.
    ///
    /// The returned course is normalized (derived paths filled in).
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no course matches `key`.
    fn load(&self, key: &str) -> Result<Course, StorageError>;

    /// Replace a course document, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::AlreadyExists`] if a different course
    /// already uses the title.
    fn save(&self, course: &Course) -> Result<(), StorageError>;

    /// Load the roster for a course path.
    ///
    /// A course without an uploaded roster has an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the roster exists but cannot be read.
    fn roster(&self, path: &str) -> Result<Vec<StudentRecord>, StorageError>;

    /// Replace the roster for a course path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the roster cannot be written.
    fn save_roster(&self, path: &str, records: &[StudentRecord]) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_course_summary_from_course() {
        let mut course = Course::new("Cloud Lab");
        course.name = "LTRCLD-2121".to_owned();
        course.private = true;

        let summary = CourseSummary::from(&course);

        assert_eq!(summary.title, "Cloud Lab");
        assert_eq!(summary.name, "LTRCLD-2121");
        assert_eq!(summary.path, "cloud-lab");
        assert!(summary.private);
    }

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert!(err.path.as_deref().is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_with_path() {
        let err = StorageError::new(StorageErrorKind::NotFound).with_path("/foo/bar");

        assert_eq!(err.path.as_deref(), Some(Path::new("/foo/bar")));
    }

    #[test]
    fn test_storage_error_with_status() {
        let err =
            StorageError::new(StorageErrorKind::Unavailable).with_status(ErrorStatus::Temporary);

        assert_eq!(err.status, ErrorStatus::Temporary);
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound).with_source(io_err);

        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::io(io_err, None);

        assert_eq!(err.kind(), StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_storage_error_io_timeout_is_temporary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = StorageError::io(io_err, None);

        assert_eq!(err.kind(), StorageErrorKind::Unavailable);
        assert_eq!(err.status, ErrorStatus::Temporary);
    }

    #[test]
    fn test_storage_error_json() {
        let json_err = serde_json::from_str::<Course>("{").unwrap_err();
        let err = StorageError::json(json_err, "courses/lab.json");

        assert_eq!(err.kind(), StorageErrorKind::InvalidData);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/data/courses/lab.json")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /data/courses/lab.json)"
        );
    }

    #[test]
    fn test_storage_error_display_simple() {
        assert_eq!(
            StorageError::new(StorageErrorKind::AlreadyExists).to_string(),
            "Already exists"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }

    #[test]
    fn test_storage_is_object_safe() {
        fn assert_dyn(_: Option<&dyn Storage>) {}
        assert_dyn(None);
    }
}
