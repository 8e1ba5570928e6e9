//! Configuration management for the thermostat skill

pub mod file;

use std::path::Path;

use self::file::SkillConfigFile;
use crate::{Error, Result};

/// Default port for the invocation endpoint
pub const DEFAULT_PORT: u16 = 8443;

/// Default thermostat endpoint
pub const DEFAULT_DEVICE_URL: &str = "https://server.host:443";

/// Default path segment placed before the device ID
pub const DEFAULT_PATH_PREFIX: &str = "/nest";

/// Default device identifier
pub const DEFAULT_DEVICE_ID: &str = "logikz";

/// Skill gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Voice platform configuration
    pub skill: SkillConfig,

    /// Remote thermostat endpoint
    pub device: DeviceConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// Voice platform configuration
#[derive(Debug, Clone, Default)]
pub struct SkillConfig {
    /// Expected application ID; `None` disables the check
    pub application_id: Option<String>,
}

/// Thermostat endpoint configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Scheme, host and port without a trailing slash
    pub base_url: String,

    /// Path prefix starting with `/`, without a trailing slash
    pub path_prefix: String,

    /// Device identifier segment
    pub device_id: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEVICE_URL.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
        }
    }
}

impl DeviceConfig {
    /// URL of a device resource, e.g. `https://host:443/nest/logikz/temperature/`
    #[must_use]
    pub fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}{}/{}/{resource}/",
            self.base_url, self.path_prefix, self.device_id
        )
    }
}

impl Config {
    /// Load configuration from the environment and a TOML file
    ///
    /// An explicit `path` must exist and parse; otherwise the default config
    /// file location is tried and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns error if the explicit config file is unusable or a value is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = match path {
            Some(p) => file::read_config_file(p).map_err(|e| {
                Error::Config(format!("failed to load {}: {e}", p.display()))
            })?,
            None => file::load_config_file(),
        };

        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Merge a config file with an environment lookup (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if the device URL or port is invalid
    pub fn resolve<F>(fc: SkillConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match env("THERMOSTAT_PORT").or_else(|| env("PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid port: {raw}")))?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let application_id = env("THERMOSTAT_APPLICATION_ID")
            .or(fc.skill.application_id)
            .filter(|id| !id.is_empty());

        let base_url = env("THERMOSTAT_DEVICE_URL")
            .or(fc.device.base_url)
            .unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string());
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "device url must be http(s): {base_url}"
            )));
        }

        let path_prefix = env("THERMOSTAT_DEVICE_PATH_PREFIX")
            .or(fc.device.path_prefix)
            .unwrap_or_else(|| DEFAULT_PATH_PREFIX.to_string());

        let device_id = env("THERMOSTAT_DEVICE_ID")
            .or(fc.device.id)
            .unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string());
        if device_id.is_empty() || device_id.contains('/') {
            return Err(Error::Config(format!("invalid device id: {device_id:?}")));
        }

        Ok(Self {
            server: ServerConfig { port },
            skill: SkillConfig { application_id },
            device: DeviceConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                path_prefix: normalize_prefix(&path_prefix),
                device_id,
            },
        })
    }
}

/// Ensure a leading slash and strip trailing ones ("" and "/" become "")
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
