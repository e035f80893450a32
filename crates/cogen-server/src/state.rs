//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use cogen_storage::{Storage, StorageError};
use uuid::Uuid;

use crate::error::ServerError;
use crate::session::{Session, SessionStore};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Storage backend for courses and rosters.
    pub(crate) storage: Arc<dyn Storage>,
    /// Training sessions.
    pub(crate) sessions: SessionStore,
    /// Name of the session cookie.
    pub(crate) cookie_name: String,
    /// Roster column identifying a student.
    pub(crate) id_column: String,
    /// Limit on empty drawers skipped when opening a course.
    pub(crate) start_depth: Option<usize>,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}

impl AppState {
    /// Run a storage call on the blocking thread pool.
    pub(crate) async fn with_storage<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&dyn Storage) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let result = tokio::task::spawn_blocking(move || f(storage.as_ref())).await?;
        Ok(result?)
    }

    /// Session id carried by the request cookie, if it parses.
    pub(crate) fn session_id(&self, jar: &CookieJar) -> Option<Uuid> {
        jar.get(&self.cookie_name)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    }

    /// The live session for this request.
    pub(crate) fn session(&self, jar: &CookieJar) -> Result<(Uuid, Session), ServerError> {
        let id = self.session_id(jar).ok_or(ServerError::NotSignedIn)?;
        let session = self.sessions.get(id).ok_or(ServerError::NotSignedIn)?;
        Ok((id, session))
    }
}
