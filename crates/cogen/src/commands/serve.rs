//! `cogen serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use cogen_config::{CliSettings, Config};
use cogen_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover cogen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory with courses and rosters (overrides config).
    #[arg(short, long, env = "COGEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Maximum number of empty drawers skipped when a course opens.
    #[arg(long)]
    start_depth: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir,
            start_depth: self.start_depth,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Data directory: {}",
            config.storage_resolved.data_dir.display()
        ));
        match config.course.start_depth {
            Some(depth) => output.info(&format!("Course start: skips up to {depth} empty drawer(s)")),
            None => output.info("Course start: first page with content"),
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
