//! Course API endpoints.
//!
//! Course listing, the splash page data, rendered sections and the variable
//! palette.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use cogen_course::{
    RenderedButton, Target, Variables, render_buttons, render_menu, render_section, student_ids,
};
use cogen_storage::CourseSummary;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::session_variables;
use crate::state::AppState;

/// Response for GET /api/courses/{course}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SplashResponse {
    /// Splash heading.
    title: String,
    /// Splash instructions.
    instructions: String,
    course_name: String,
    course_slug: String,
    /// Course path, used in URLs.
    course_title: String,
    raw_course_title: String,
    user_nomenclature: String,
    show_logo: bool,
    /// Student ids to choose from.
    users: Vec<String>,
}

/// Response for GET /api/courses/{course}/sections/{section}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionResponse {
    /// Sidebar menu markup.
    menu: String,
    /// Expanded section body.
    content: String,
    /// Expanded modal buttons.
    buttons: Vec<RenderedButton>,
    sidebar_shown: bool,
    course_slug: String,
    course_name: String,
    /// Course path, used in URLs.
    course_title: String,
    raw_course_title: String,
    show_logo: bool,
    /// Variables the section was rendered with.
    user_data: Variables,
}

/// Handle GET /api/courses.
pub(crate) async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CourseSummary>>, ServerError> {
    let courses = state.with_storage(|storage| storage.list()).await?;
    Ok(Json(courses))
}

/// Handle GET /api/courses/{course}.
pub(crate) async fn get_splash(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let (course, roster) = state
        .with_storage(move |storage| {
            let course = storage.load(&key)?;
            let roster = storage.roster(&course.path)?;
            Ok((course, roster))
        })
        .await?;

    let users = student_ids(&roster, &state.id_column)
        .into_iter()
        .map(str::to_owned)
        .collect();

    Ok(Json(SplashResponse {
        title: course.splash_title,
        instructions: course.splash_instructions,
        course_name: course.name,
        course_slug: course.slug,
        course_title: course.path,
        raw_course_title: course.title,
        user_nomenclature: course.user_nomenclature,
        show_logo: course.show_logo,
        users,
    }))
}

/// Handle GET /api/courses/{course}/sections/{section}.
pub(crate) async fn get_section(
    Path((key, section)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let (_, session) = state.session(&jar)?;
    let course = state.with_storage(move |storage| storage.load(&key)).await?;

    let vars = session_variables(&course, &session);
    let content = render_section(&course, &Target::parse(&section), &vars, state.start_depth)?;

    let response = SectionResponse {
        menu: render_menu(&course.children, &course.path),
        content,
        buttons: render_buttons(&course.buttons, &vars),
        sidebar_shown: session.sidebar_shown,
        course_slug: course.slug,
        course_name: course.name,
        course_title: course.path,
        raw_course_title: course.title,
        show_logo: course.show_logo,
        user_data: vars,
    };
    let body = serde_json::to_string(&response)?;

    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::CACHE_CONTROL, "private, no-cache".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Handle GET /api/courses/{course}/variables.
pub(crate) async fn get_variables(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ServerError> {
    let course = state.with_storage(move |storage| storage.load(&key)).await?;
    Ok(Json(
        course
            .variable_names()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    ))
}

/// Compute `ETag` from version and response body.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(compute_etag("0.1.0", "body"), compute_etag("0.1.1", "body"));
    }

    #[test]
    fn test_compute_etag_includes_content() {
        assert_ne!(compute_etag("0.1.0", "a"), compute_etag("0.1.0", "b"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("0.1.0", "body");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_section_response_field_names() {
        let response = SectionResponse {
            menu: String::new(),
            content: "Hi".to_owned(),
            buttons: Vec::new(),
            sidebar_shown: true,
            course_slug: String::new(),
            course_name: "LTRCLD-2121".to_owned(),
            course_title: "cloud-lab".to_owned(),
            raw_course_title: "Cloud Lab".to_owned(),
            show_logo: true,
            user_data: Variables::new(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sidebarShown"], true);
        assert_eq!(json["courseTitle"], "cloud-lab");
        assert_eq!(json["rawCourseTitle"], "Cloud Lab");
        assert_eq!(json["content"], "Hi");
    }
}
