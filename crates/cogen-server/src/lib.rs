//! HTTP server for CoGen courses.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Course listing and splash data
//! - Rendered course sections for a signed-in training session
//! - Whole-course export as a standalone HTML document
//! - Editor endpoints for fetching and replacing course documents
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cogen_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         data_dir: PathBuf::from("data"),
//!         version: "0.1.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (cogen-server)
//!                        │
//!                        ├─► session store (cookie → student record)
//!                        │
//!                        ├─► Storage (spawn_blocking) ──► course JSON, roster JSON
//!                        │
//!                        └─► cogen-course (menu, section, export)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod session;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use cogen_storage::{FsStorage, Storage};
use session::SessionStore;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding course documents and rosters.
    pub data_dir: PathBuf,
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Session lifetime after last use.
    pub session_ttl: Duration,
    /// Roster column identifying a student.
    pub id_column: String,
    /// Limit on empty drawers skipped when opening a course.
    pub start_depth: Option<usize>,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8040,
            data_dir: PathBuf::from("data"),
            cookie_name: "session".to_owned(),
            session_ttl: Duration::from_secs(120 * 60),
            id_column: "Number".to_owned(),
            start_depth: None,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.data_dir.clone()));

    let state = Arc::new(AppState {
        storage,
        sessions: SessionStore::new(config.session_ttl),
        cookie_name: config.cookie_name.clone(),
        id_column: config.id_column.clone(),
        start_depth: config.start_depth,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, data_dir = %config.data_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from CoGen config.
#[must_use]
pub fn server_config_from_config(config: &cogen_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_dir: config.storage_resolved.data_dir.clone(),
        cookie_name: config.session.cookie_name.clone(),
        session_ttl: Duration::from_secs(config.session.duration_minutes.saturating_mul(60)),
        id_column: config.students.id_column.clone(),
        start_depth: config.course.start_depth,
        version,
    }
}
