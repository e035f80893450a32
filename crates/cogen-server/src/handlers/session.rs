//! Training session endpoints.
//!
//! A trainer opens a session by picking a student on the splash page; the
//! session cookie then carries that student's variables into every section.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cogen_course::find_student;
use serde_json::json;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/training-login/{course}/{student}.
///
/// The session keeps the roster record exactly as uploaded.
pub(crate) async fn training_login(
    Path((key, student_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ServerError> {
    let (course, roster) = state
        .with_storage(move |storage| {
            let course = storage.load(&key)?;
            let roster = storage.roster(&course.path)?;
            Ok((course, roster))
        })
        .await?;

    let student = find_student(&roster, &state.id_column, &student_id)
        .cloned()
        .ok_or_else(|| ServerError::StudentNotFound {
            course: course.path.clone(),
            student: student_id.clone(),
        })?;

    let id = state.sessions.create(&course.path, student);
    tracing::info!(course = %course.path, student = %student_id, "Training session started");

    let cookie = Cookie::build((state.cookie_name.clone(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(json!({"response": "Success"}))))
}

/// Handle GET /api/sidebar/{show}.
///
/// Anything other than `true` hides the sidebar.
pub(crate) async fn set_sidebar(
    Path(show): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ServerError> {
    let id = state.session_id(&jar).ok_or(ServerError::NotSignedIn)?;
    if !state.sessions.set_sidebar(id, show == "true") {
        return Err(ServerError::NotSignedIn);
    }

    Ok(Json(json!({"response": "Success"})))
}

/// Handle POST /api/logout.
pub(crate) async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(id) = state.session_id(&jar) {
        state.sessions.remove(id);
    }

    let jar = jar.remove(Cookie::build(state.cookie_name.clone()).path("/"));
    (jar, Json(json!({"response": "Success"})))
}
