//! Configuration for the albumkit client.
//!
//! Layers built-in defaults, an optional TOML file under the platform
//! config directory, and `ALBUMKIT_*` environment variables, validates
//! the result, and translates it into an `albumkit_core::ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use albumkit_core::{ClientConfig, UploadPolicy};

pub const ENV_PREFIX: &str = "ALBUMKIT_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Top-level settings, as read from TOML and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub upload: UploadSettings,
}

/// Where the file server lives.
///
/// Outside proxy mode the URL is `{protocol}://{host}:{port}{base_path}`.
/// In proxy mode requests go through `proxy_origin` (the dev server
/// fronting the file server) and only `base_path` is appended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub use_proxy: bool,

    #[serde(default = "default_proxy_origin")]
    pub proxy_origin: String,

    pub protocol: Option<String>,
    pub host: Option<String>,
    /// Kept wider than `u16` so an out-of-range value reaches validation.
    pub port: Option<u32>,

    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            use_proxy: false,
            proxy_origin: default_proxy_origin(),
            protocol: None,
            host: None,
            port: None,
            base_path: default_base_path(),
        }
    }
}

/// Client-side upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadSettings {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,

    /// Largest accepted file, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Comma-separated extensions, e.g. `jpg,png`.
    #[serde(default = "default_supported_formats")]
    pub supported_formats: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout_ms(),
            max_file_size: default_max_file_size(),
            supported_formats: default_supported_formats(),
        }
    }
}

fn default_proxy_origin() -> String {
    "http://localhost:5173".into()
}
fn default_base_path() -> String {
    "/api/files".into()
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_max_file_size() -> u64 {
    10_485_760
}
fn default_supported_formats() -> String {
    "jpg,jpeg,png,gif,webp".into()
}

const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u32 = 8888;

impl ServerSettings {
    fn non_empty(value: Option<&String>) -> Option<&str> {
        value.map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    /// Settings the direct (non-proxy) URL needs but that were not given.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if Self::non_empty(self.host.as_ref()).is_none() {
            missing.push("server.host");
        }
        if self.port.is_none() {
            missing.push("server.port");
        }
        if Self::non_empty(self.protocol.as_ref()).is_none() {
            missing.push("server.protocol");
        }
        missing
    }

    /// Full base URL of the file API.
    pub fn url(&self) -> Result<Url, ConfigError> {
        let base_path = if self.base_path.starts_with('/') {
            self.base_path.clone()
        } else {
            format!("/{}", self.base_path)
        };

        let raw = if self.use_proxy {
            format!("{}{base_path}", self.proxy_origin.trim_end_matches('/'))
        } else {
            let protocol = Self::non_empty(self.protocol.as_ref()).unwrap_or(DEFAULT_PROTOCOL);
            let host = Self::non_empty(self.host.as_ref()).unwrap_or(DEFAULT_HOST);
            let port = self.port.unwrap_or(DEFAULT_PORT);
            format!("{protocol}://{host}:{port}{base_path}")
        };

        Url::parse(&raw).map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: format!("cannot build URL from '{raw}': {e}"),
        })
    }
}

impl UploadSettings {
    /// The supported-format list, trimmed and lower-cased.
    pub fn formats(&self) -> Vec<String> {
        self.supported_formats
            .split(',')
            .map(|f| f.trim().trim_start_matches('.').to_lowercase())
            .filter(|f| !f.is_empty())
            .collect()
    }
}

impl Settings {
    /// Check the settings. Outside proxy mode a missing host or protocol
    /// only warns; a missing or out-of-range port is an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.use_proxy {
            return Ok(());
        }

        let missing = self.server.missing();
        if !missing.is_empty() {
            warn!(?missing, "file server settings missing, using defaults");
        }

        let Some(port) = self.server.port else {
            return Err(ConfigError::Validation {
                field: "server.port".into(),
                reason: "no port configured; set server.port or ALBUMKIT_SERVER_PORT".into(),
            });
        };
        if !(1..=65_535).contains(&port) {
            return Err(ConfigError::Validation {
                field: "server.port".into(),
                reason: format!("{port} is outside 1..=65535"),
            });
        }
        Ok(())
    }

    /// Validate and translate into the core crate's runtime config.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.validate()?;
        let base_url = self.server.url()?;
        debug!(url = %base_url, proxy = self.server.use_proxy, "file server configured");
        Ok(self.client_config_for(base_url))
    }

    /// Runtime config for an explicitly given server URL. The server
    /// section is not consulted, so it is not validated either.
    pub fn client_config_for(&self, base_url: Url) -> ClientConfig {
        ClientConfig {
            base_url,
            timeout: Duration::from_millis(self.upload.timeout),
            upload: UploadPolicy {
                max_file_size: self.upload.max_file_size,
                supported_formats: self.upload.formats(),
            },
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "albumkit", "albumkit").map_or_else(
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
    p.push("albumkit");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Map a flat `ALBUMKIT_*` name onto its settings path.
fn env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    match key.as_str() {
        "use_proxy" | "proxy_origin" => format!("server.{key}"),
        "upload_timeout" => "upload.timeout".into(),
        "max_file_size" | "supported_formats" => format!("upload.{key}"),
        other => match other.strip_prefix("server_") {
            Some(rest) => format!("server.{rest}"),
            None => other.to_owned(),
        },
    }
}

/// The layered figment: defaults, then `path`, then the environment.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).map(|key| Uncased::from(env_key(key.as_str()))))
}

/// Load settings from the given file (if it exists) and the environment.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = figment(path).extract()?;
    Ok(settings)
}

/// Load settings from the canonical config path and the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize settings to TOML at `path`, creating parent directories.
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn missing_port_is_rejected() {
        let err = Settings::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server.port"));
        assert!(Settings::default().to_client_config().is_err());
    }

    #[test]
    fn port_alone_builds_local_url() {
        let mut settings = Settings::default();
        settings.server.port = Some(8888);
        let config = settings.to_client_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8888/api/files");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.upload.max_file_size, 10_485_760);
        assert_eq!(
            config.upload.supported_formats,
            vec!["jpg", "jpeg", "png", "gif", "webp"]
        );
    }

    #[test]
    fn proxy_mode_skips_port_check() {
        let mut settings = Settings::default();
        settings.server.use_proxy = true;
        assert!(settings.validate().is_ok());
        let config = settings.to_client_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5173/api/files");
    }

    #[test]
    fn explicit_url_ignores_server_section() {
        let mut settings = Settings::default();
        settings.upload.timeout = 1500;
        let url = Url::parse("http://10.0.0.5:9000/api/files").unwrap();
        let config = settings.client_config_for(url.clone());
        assert_eq!(config.base_url, url);
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn proxy_mode_uses_origin_and_base_path() {
        let settings = Settings {
            server: ServerSettings {
                use_proxy: true,
                port: Some(0),
                base_path: "api/v2".into(),
                ..ServerSettings::default()
            },
            ..Settings::default()
        };
        // The port is ignored in proxy mode, so it is not validated either.
        let config = settings.to_client_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5173/api/v2");
    }

    #[test]
    fn invalid_port_is_rejected() {
        for port in [0, 65_536] {
            let settings = Settings {
                server: ServerSettings {
                    port: Some(port),
                    ..ServerSettings::default()
                },
                ..Settings::default()
            };
            let err = settings.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server.port"));
        }
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut server = ServerSettings::default();
        assert_eq!(server.missing(), vec!["server.host", "server.port", "server.protocol"]);
        server.host = Some("photos.lan".into());
        server.port = Some(9000);
        server.protocol = Some("https".into());
        assert!(server.missing().is_empty());
        assert_eq!(server.url().unwrap().as_str(), "https://photos.lan:9000/api/files");
    }

    #[test]
    fn formats_parse_from_comma_list() {
        let upload = UploadSettings {
            supported_formats: " JPG, .png,,heic ".into(),
            ..UploadSettings::default()
        };
        assert_eq!(upload.formats(), vec!["jpg", "png", "heic"]);
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                host = "file-host"
                port = 7000

                [upload]
                max_file_size = 1024
                "#,
            )?;
            jail.set_env("ALBUMKIT_SERVER_PORT", "7100");
            jail.set_env("ALBUMKIT_SERVER_BASE_PATH", "/files");
            jail.set_env("ALBUMKIT_SUPPORTED_FORMATS", "png,gif");
            jail.set_env("ALBUMKIT_UPLOAD_TIMEOUT", "5000");

            let settings = load_settings_from(Path::new("config.toml")).unwrap();
            assert_eq!(settings.server.host.as_deref(), Some("file-host"));
            assert_eq!(settings.server.port, Some(7100));
            assert_eq!(settings.server.base_path, "/files");
            assert_eq!(settings.upload.max_file_size, 1024);
            assert_eq!(settings.upload.timeout, 5000);
            assert_eq!(settings.upload.formats(), vec!["png", "gif"]);
            Ok(())
        });
    }

    #[test]
    fn env_enables_proxy() {
        Jail::expect_with(|jail| {
            jail.set_env("ALBUMKIT_USE_PROXY", "true");
            jail.set_env("ALBUMKIT_PROXY_ORIGIN", "http://127.0.0.1:3000/");

            let settings = load_settings_from(Path::new("missing.toml")).unwrap();
            assert!(settings.server.use_proxy);
            let url = settings.server.url().unwrap();
            assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/files");
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested/config.toml");
            let mut settings = Settings::default();
            settings.server.host = Some("saved".into());
            save_settings_to(&settings, &path).unwrap();

            let loaded = load_settings_from(&path).unwrap();
            assert_eq!(loaded, settings);
            Ok(())
        });
    }
}
