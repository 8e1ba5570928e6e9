//! TOML configuration file loading
//!
//! Supports `~/.config/thermostat-skill/config.toml` as a persistent config source.
//! All fields are optional: the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SkillConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Voice platform application settings
    #[serde(default)]
    pub skill: SkillFileConfig,

    /// Remote thermostat endpoint
    #[serde(default)]
    pub device: DeviceFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port the invocation endpoint listens on
    pub port: Option<u16>,
}

/// Voice platform configuration
#[derive(Debug, Default, Deserialize)]
pub struct SkillFileConfig {
    /// Expected application ID of inbound requests
    pub application_id: Option<String>,
}

/// Thermostat endpoint configuration
#[derive(Debug, Default, Deserialize)]
pub struct DeviceFileConfig {
    /// Scheme, host and port (e.g. "https://server.host:443")
    pub base_url: Option<String>,

    /// Path segment placed before the device ID (e.g. "/nest")
    pub path_prefix: Option<String>,

    /// Device identifier segment
    pub id: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `SkillConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> SkillConfigFile {
    let Some(path) = config_file_path() else {
        return SkillConfigFile::default();
    };

    if !path.exists() {
        return SkillConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config file");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            SkillConfigFile::default()
        }
    }
}

/// Read and parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML
pub fn read_config_file(path: &Path) -> Result<SkillConfigFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Return the config file path: `~/.config/thermostat-skill/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("thermostat-skill").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let config: SkillConfigFile = toml::from_str(
            r#"
            [device]
            id = "hallway"
            "#,
        )
        .unwrap();

        assert_eq!(config.device.id.as_deref(), Some("hallway"));
        assert!(config.device.base_url.is_none());
        assert!(config.server.port.is_none());
        assert!(config.skill.application_id.is_none());
    }

    #[test]
    fn read_config_file_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            read_config_file(&path),
            Err(crate::Error::Toml(_))
        ));
    }

    #[test]
    fn read_config_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(read_config_file(&path), Err(crate::Error::Io(_))));
    }
}
