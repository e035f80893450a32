//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let course_routes = Router::new()
        .route("/api/courses", get(handlers::courses::list_courses))
        .route("/api/courses/{course}", get(handlers::courses::get_splash))
        .route(
            "/api/courses/{course}/sections/{section}",
            get(handlers::courses::get_section),
        )
        .route(
            "/api/courses/{course}/variables",
            get(handlers::courses::get_variables),
        )
        .route(
            "/api/courses/{course}/export",
            get(handlers::export::export_course),
        );

    let session_routes = Router::new()
        .route(
            "/api/training-login/{course}/{student}",
            get(handlers::session::training_login),
        )
        .route("/api/sidebar/{show}", get(handlers::session::set_sidebar))
        .route("/api/logout", post(handlers::session::logout));

    let editor_routes = Router::new()
        .route("/api/get-course/{course}", get(handlers::editor::get_course))
        .route("/api/update-course", post(handlers::editor::update_course))
        .route(
            "/api/upload-roster/{course}",
            post(handlers::editor::upload_roster),
        );

    Router::new()
        .merge(course_routes)
        .merge(session_routes)
        .merge(editor_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
