//! Course editor endpoints.
//!
//! The editor always works on whole documents: it fetches a course, edits it
//! client-side and posts the complete course back.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use cogen_course::{Course, StudentRecord, placeholder_defaults, roster_keys};
use serde_json::{Value, json};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/get-course/{course}.
pub(crate) async fn get_course(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Course>, ServerError> {
    let course = state.with_storage(move |storage| storage.load(&key)).await?;
    Ok(Json(course))
}

/// Handle POST /api/update-course.
pub(crate) async fn update_course(
    State(state): State<Arc<AppState>>,
    Json(mut course): Json<Course>,
) -> Result<Json<Value>, ServerError> {
    if course.title.trim().is_empty() {
        return Err(ServerError::BadRequest("courseTitle cannot be empty".to_owned()));
    }
    course.normalize();

    let path = course.path.clone();
    state
        .with_storage(move |storage| storage.save(&course))
        .await?;
    tracing::info!(course = %path, "Course updated");

    Ok(Json(json!({"success": true})))
}

/// Handle POST /api/upload-roster/{course}.
///
/// Stores the roster and resets the course defaults so every roster column
/// renders as its own placeholder until a student is chosen.
pub(crate) async fn upload_roster(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<StudentRecord>>,
) -> Result<Json<Value>, ServerError> {
    let keys = roster_keys(&records)
        .ok_or_else(|| ServerError::BadRequest("roster records must share the same columns".to_owned()))?;

    if !records.is_empty() && !keys.contains(&state.id_column.as_str()) {
        return Err(ServerError::BadRequest(format!(
            "roster is missing the {} column",
            state.id_column
        )));
    }

    let defaults = placeholder_defaults(keys);
    let count = records.len();

    let path = state
        .with_storage(move |storage| {
            let mut course = storage.load(&key)?;
            course.default_variables = defaults;
            storage.save_roster(&course.path, &records)?;
            storage.save(&course)?;
            Ok(course.path)
        })
        .await?;
    tracing::info!(course = %path, students = count, "Roster uploaded");

    Ok(Json(json!({"success": true, "students": count})))
}
