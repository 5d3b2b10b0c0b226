//! Shared configuration for bonfwd.
//!
//! TOML config file + `BONFWD_` environment overrides, and resolution of
//! the dashboard API key from the environment or a masked prompt.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod credentials;

pub use credentials::{CredentialSource, DEFAULT_API_KEY_ENV};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key: {var} is not set and no key was entered")]
    MissingCredential { var: String },

    #[error("API key prompt failed: {source}")]
    Prompt {
        #[source]
        source: std::io::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

/// `[dashboard]` table.
#[derive(Debug, Deserialize, Serialize)]
pub struct DashboardSettings {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Organization id or name (prompted for when several exist).
    #[serde(default)]
    pub organization: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization: None,
            timeout: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.meraki.com/api/v1".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.into()
}

impl DashboardSettings {
    /// Parsed and checked base URL.
    pub fn base_url(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self.base_url.parse().map_err(|_| ConfigError::Validation {
            field: "dashboard.base_url".into(),
            reason: format!("invalid URL: {}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "dashboard.base_url".into(),
                reason: format!("expected an http(s) URL, got '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bonfwd", "bonfwd").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bonfwd");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the default location) + environment.
///
/// A missing file is not an error; defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    load_config_from(&path)
}

/// Load the config from an explicit file path + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BONFWD_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config_from(Path::new("/nonexistent/bonfwd/config.toml")).unwrap();
        assert_eq!(cfg.dashboard.base_url, "https://api.meraki.com/api/v1");
        assert_eq!(cfg.dashboard.timeout, 30);
        assert_eq!(cfg.dashboard.api_key_env, "MERAKI_DASHBOARD_API_KEY");
        assert_eq!(cfg.dashboard.organization, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            "[dashboard]\n\
             organization = \"Campus\"\n\
             timeout = 90\n\
             api_key_env = \"DASHBOARD_KEY\"\n",
        );
        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.dashboard.organization.as_deref(), Some("Campus"));
        assert_eq!(cfg.dashboard.timeout(), Duration::from_secs(90));
        assert_eq!(cfg.dashboard.api_key_env, "DASHBOARD_KEY");
        assert_eq!(cfg.dashboard.base_url, "https://api.meraki.com/api/v1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("[dashboard]\ntimeout = \"soon\"\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn base_url_must_be_http() {
        let settings = DashboardSettings {
            base_url: "ftp://api.example.com".into(),
            ..DashboardSettings::default()
        };
        assert!(matches!(
            settings.base_url(),
            Err(ConfigError::Validation { .. })
        ));

        let settings = DashboardSettings {
            base_url: "not a url".into(),
            ..DashboardSettings::default()
        };
        assert!(settings.base_url().is_err());
        assert!(DashboardSettings::default().base_url().is_ok());
    }
}
