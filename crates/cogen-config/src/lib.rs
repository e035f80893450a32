//! Configuration management for CoGen.
//!
//! Parses `cogen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `storage.data_dir`
//! - `session.cookie_name`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override data directory.
    pub data_dir: Option<PathBuf>,
    /// Override how far the course start descends into empty drawers.
    pub start_depth: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cogen.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Storage configuration (paths are relative strings from TOML).
    storage: StorageConfigRaw,
    /// Session cookie configuration.
    pub session: SessionConfig,
    /// Roster configuration.
    pub students: StudentsConfig,
    /// Course navigation configuration.
    pub course: CourseConfig,

    /// Resolved storage configuration (set after loading).
    #[serde(skip)]
    pub storage_resolved: StorageConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8040,
        }
    }
}

/// Raw storage configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StorageConfigRaw {
    data_dir: Option<String>,
}

/// Resolved storage configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StorageConfig {
    /// Directory holding `courses/` and `students/`.
    pub data_dir: PathBuf,
}

/// Session cookie configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Session lifetime in minutes.
    pub duration_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_owned(),
            duration_minutes: 120,
        }
    }
}

/// Roster configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StudentsConfig {
    /// Roster column that identifies a student.
    pub id_column: String,
}

impl Default for StudentsConfig {
    fn default() -> Self {
        Self {
            id_column: "Number".to_owned(),
        }
    }
}

/// Course navigation configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CourseConfig {
    /// Maximum number of empty drawers skipped when opening a course.
    ///
    /// `None` descends until a page with content is found.
    pub start_depth: Option<usize>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`COGEN_HOST`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cogen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(data_dir) = &settings.data_dir {
            self.storage_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(start_depth) = settings.start_depth {
            self.course.start_depth = Some(start_depth);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfigRaw::default(),
            session: SessionConfig::default(),
            students: StudentsConfig::default(),
            course: CourseConfig::default(),
            storage_resolved: StorageConfig {
                data_dir: base.join("data"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".to_owned()));
        }

        require_non_empty(&self.session.cookie_name, "session.cookie_name")?;
        if self.session.duration_minutes == 0 {
            return Err(ConfigError::Validation(
                "session.duration_minutes must be greater than 0".to_owned(),
            ));
        }

        require_non_empty(&self.students.id_column, "students.id_column")?;

        if self.course.start_depth == Some(0) {
            return Err(ConfigError::Validation(
                "course.start_depth must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.session.cookie_name =
            expand::expand_env(&self.session.cookie_name, "session.cookie_name")?;

        if let Some(ref data_dir) = self.storage.data_dir {
            self.storage.data_dir = Some(expand::expand_env(data_dir, "storage.data_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.storage_resolved = StorageConfig {
            data_dir: config_dir.join(self.storage.data_dir.as_deref().unwrap_or("data")),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8040);
        assert_eq!(config.storage_resolved.data_dir, PathBuf::from("/test/data"));
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.session.duration_minutes, 120);
        assert_eq!(config.students.id_column, "Number");
        assert_eq!(config.course.start_depth, None);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.port, 8040);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[storage]
data_dir = "store"

[session]
cookie_name = "cogen"
duration_minutes = 30

[students]
id_column = "pod"

[course]
start_depth = 1
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage_resolved.data_dir, PathBuf::from("/project/store"));
        assert_eq!(config.session.cookie_name, "cogen");
        assert_eq!(config.session.duration_minutes, 30);
        assert_eq!(config.students.id_column, "pod");
        assert_eq!(config.course.start_depth, Some(1));
    }

    #[test]
    fn test_absolute_data_dir_kept() {
        let mut config: Config = toml::from_str("[storage]\ndata_dir = \"/srv/cogen\"").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.storage_resolved.data_dir, PathBuf::from("/srv/cogen"));
    }

    #[test]
    fn test_validate_port_zero() {
        let config: Config = toml::from_str("[server]\nport = 0").unwrap();

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_empty_cookie_name() {
        let config: Config = toml::from_str("[session]\ncookie_name = \"\"").unwrap();

        assert!(config.validate().unwrap_err().to_string().contains("session.cookie_name"));
    }

    #[test]
    fn test_validate_zero_duration() {
        let config: Config = toml::from_str("[session]\nduration_minutes = 0").unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_id_column() {
        let config: Config = toml::from_str("[students]\nid_column = \"\"").unwrap();

        assert!(config.validate().unwrap_err().to_string().contains("students.id_column"));
    }

    #[test]
    fn test_validate_zero_start_depth() {
        let config: Config = toml::from_str("[course]\nstart_depth = 0").unwrap();

        assert!(config.validate().unwrap_err().to_string().contains("course.start_depth"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            data_dir: Some(PathBuf::from("/custom")),
            start_depth: Some(2),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage_resolved.data_dir, PathBuf::from("/custom"));
        assert_eq!(config.course.start_depth, Some(2));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cogen.toml");
        std::fs::write(&path, "[server]\nport = 8123\n[storage]\ndata_dir = \"courses-data\"").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.storage_resolved.data_dir, dir.path().join("courses-data"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/cogen.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cogen.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cogen.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            start_depth: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
