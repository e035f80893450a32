//! `cogen export` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use cogen_config::{CliSettings, Config};
use cogen_course::{export, find_student, resolve};
use cogen_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Course path or title.
    course: String,

    /// Student id to render the course for (default: course defaults).
    #[arg(short, long)]
    student: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover cogen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory with courses and rosters (overrides config).
    #[arg(short, long, env = "COGEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ExportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let storage = FsStorage::new(config.storage_resolved.data_dir.clone());
        let html = render_export(
            &storage,
            &self.course,
            self.student.as_deref(),
            &config.students.id_column,
        )?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Exported {} to {}", self.course, path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

/// Render a course export for an optional student.
fn render_export(
    storage: &dyn Storage,
    key: &str,
    student: Option<&str>,
    id_column: &str,
) -> Result<String, CliError> {
    let course = storage.load(key)?;

    let record = match student {
        Some(id) => {
            let roster = storage.roster(&course.path)?;
            let record = find_student(&roster, id_column, id).cloned().ok_or_else(|| {
                CliError::Validation(format!("Student {id} not found in {}", course.path))
            })?;
            Some(record)
        }
        None => None,
    };

    let vars = resolve(&course.default_variables, record.as_ref());
    tracing::info!(course = %course.path, student = ?student, "Exporting course");

    Ok(export(&course, &vars).to_html())
}
