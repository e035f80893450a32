//! Whole-course export.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;
use cogen_course::export;

use crate::error::ServerError;
use crate::handlers::session_variables;
use crate::state::AppState;

/// Handle GET /api/courses/{course}/export.
///
/// Returns the flattened course as a standalone HTML document, rendered with
/// the session's variables.
pub(crate) async fn export_course(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Html<String>, ServerError> {
    let (_, session) = state.session(&jar)?;
    let course = state.with_storage(move |storage| storage.load(&key)).await?;

    let vars = session_variables(&course, &session);
    let document = export(&course, &vars);
    tracing::debug!(course = %course.path, bytes = document.body.len(), "Exported course");

    Ok(Html(document.to_html()))
}
