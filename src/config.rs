//! Tool configuration.
//!
//! [`ToolConfig::load`] reads the optional `config/config.toml` file and
//! `DATAVERSE_TO_SQL__*` environment variables. Command-line values are layered
//! on top by the CLI.
//!
//! ```toml
//! [dataverse]
//! connection = "Server=tcp:localhost,1433;Database=crm;User Id=sa;Password=secret"
//! xml = "customizations.xml"
//! connect_timeout_seconds = 30
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
const ENV_PREFIX: &str = "DATAVERSE_TO_SQL";
const SECTION: &str = "dataverse";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolConfig {
    /// ADO.NET connection string of the target database
    #[serde(default)]
    pub connection: Option<String>,
    /// Path of the `customizations.xml` document
    #[serde(default)]
    pub xml: Option<PathBuf>,
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

fn default_connect_timeout_seconds() -> u64 {
    15
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            connection: None,
            xml: None,
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

impl ToolConfig {
    /// Load from `config/config.toml` (optional), then env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from the given file (optional), then env vars.
    ///
    /// A file that exists but cannot be parsed is skipped with a warning, so
    /// a connection string exported in the environment still reaches the run.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env_source())
            .build()
            .or_else(|file_err| {
                log::warn!("Ignoring {}: {}", path.display(), file_err);
                Config::builder().add_source(env_source()).build()
            })
            .map_err(|err| {
                ConfigError::Message(format!(
                    "Cannot read {}__* environment settings: {}",
                    ENV_PREFIX, err
                ))
            })?;

        Self::dataverse_section(&settings)
    }

    /// Interpret `[dataverse]`; an absent section means all defaults
    fn dataverse_section(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<ToolConfig>(SECTION) {
            Err(ConfigError::NotFound(_)) => Ok(ToolConfig::default()),
            other => other.map_err(|e| {
                ConfigError::Message(format!("Invalid [{}] settings: {}", SECTION, e))
            }),
        }
    }

    /// Timeout for opening the SQL Server connection
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = ToolConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg.xml, None);
        assert_eq!(cfg.connect_timeout_seconds, 15);
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[dataverse]
connection = "Server=localhost;Database=crm"
xml = "customizations.xml"
connect_timeout_seconds = 40
"#,
        )
        .unwrap();

        let cfg = ToolConfig::load_from(&path).unwrap();
        assert_eq!(cfg.connection.as_deref(), Some("Server=localhost;Database=crm"));
        assert_eq!(cfg.xml, Some(PathBuf::from("customizations.xml")));
        assert_eq!(cfg.connect_timeout_seconds, 40);
    }

    #[test]
    fn test_load_from_file_without_section() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[other]\nkey = 1\n").unwrap();

        let cfg = ToolConfig::load_from(&path).unwrap();
        assert_eq!(cfg.xml, None);
        assert_eq!(cfg.connect_timeout_seconds, 15);
    }

    #[test]
    fn test_load_from_unparsable_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml [").unwrap();

        let cfg = ToolConfig::load_from(&path).unwrap();
        assert_eq!(cfg.xml, None);
    }

    #[test]
    fn test_load_from_invalid_section_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[dataverse]\nconnect_timeout_seconds = \"soon\"\n").unwrap();

        let err = ToolConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid [dataverse] settings"));
    }

    #[test]
    fn test_connect_timeout_follows_seconds() {
        let cfg = ToolConfig {
            connect_timeout_seconds: 3,
            ..ToolConfig::default()
        };
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(3));
    }
}
