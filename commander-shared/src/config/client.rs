use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
use std::{env, fs, path::Path};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported configuration format '{0}'; use 'yaml' or 'json'")]
    UnsupportedFormat(String),

    /// The file contents did not parse.
    #[error("invalid configuration file: {0}")]
    Parse(String),

    /// A resolved value is out of range or malformed.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Setting or environment variable at fault.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Settings needed to talk to a Proxmox Commander backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin (and optional path prefix) under which `/api/...` is served.
    pub api_base_url: Url,

    /// Per-request timeout on native targets.
    pub request_timeout_secs: u64,

    /// Default `tracing` level when `RUST_LOG` is not set.
    pub log_level: String,

    /// Text or JSON log lines.
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates the default configuration.
    ///
    /// # Panics
    /// Never; the default URL is a valid literal.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
        }
    }

    /// Checks the resolved values.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a non-HTTP base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                message: format!("expected an http(s) URL, got '{}'", self.api_base_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, lowest first: defaults, the file at `config_path`
    /// (`.yaml`/`.yml` or `.json`), `COMMANDER_*` environment variables for
    /// values the file left at their defaults, and finally `base_url_override`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// variable holds an invalid value, or validation fails.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<&Path>,
        base_url_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        Self::load_config_with_env(config_path, base_url_override, |key| env::var(key).ok())
    }

    /// [`ClientConfig::load_config`] with the environment read through
    /// `lookup` instead of the process environment.
    ///
    /// # Errors
    /// Same as [`ClientConfig::load_config`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config_with_env(
        config_path: Option<&Path>,
        base_url_override: Option<Url>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => defaults.clone(),
        };

        if config.api_base_url == defaults.api_base_url
            && let Some(raw) = lookup("COMMANDER_API_URL")
        {
            config.api_base_url = Url::parse(&raw).map_err(|err| ConfigError::InvalidValue {
                field: "COMMANDER_API_URL",
                message: err.to_string(),
            })?;
        }
        if config.request_timeout_secs == defaults.request_timeout_secs
            && let Some(raw) = lookup("COMMANDER_REQUEST_TIMEOUT_SECS")
        {
            config.request_timeout_secs =
                raw.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "COMMANDER_REQUEST_TIMEOUT_SECS",
                    message: format!("'{raw}' is not a number of seconds"),
                })?;
        }
        if config.log_level == defaults.log_level
            && let Some(level) = lookup("COMMANDER_LOG_LEVEL")
        {
            config.log_level = level;
        }

        if let Some(url) = base_url_override {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(
        path: Option<&Path>,
        override_url: Option<Url>,
        vars: &[(&str, &str)],
    ) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ClientConfig::load_config_with_env(path, override_url, |key| vars.get(key).cloned())
    }

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = load(None, None, &[]).unwrap();
        assert_eq!(config, ClientConfig::with_defaults());
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let file = write_temp(
            ".yaml",
            "api_base_url: https://commander.lab.local/\nlog_level: debug\nlog_format: json\n",
        );
        let config = load(Some(file.path()), None, &[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://commander.lab.local/");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn json_file_is_supported() {
        let file = write_temp(".json", r#"{"request_timeout_secs": 5}"#);
        let config = load(Some(file.path()), None, &[]).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".toml", "log_level = 'info'");
        let err = load(Some(file.path()), None, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
    }

    #[test]
    fn env_fills_values_left_at_default() {
        let config = load(
            None,
            None,
            &[
                ("COMMANDER_API_URL", "http://10.0.0.5:8000"),
                ("COMMANDER_LOG_LEVEL", "warn"),
            ],
        )
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://10.0.0.5:8000/");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn file_values_win_over_env() {
        let file = write_temp(".yaml", "log_level: debug\n");
        let config = load(Some(file.path()), None, &[("COMMANDER_LOG_LEVEL", "warn")]).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn invalid_timeout_env_is_reported() {
        let err = load(None, None, &[("COMMANDER_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "COMMANDER_REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn cli_override_wins_over_env() {
        let override_url = Url::parse("http://127.0.0.1:9000").unwrap();
        let config = load(
            None,
            Some(override_url.clone()),
            &[("COMMANDER_API_URL", "http://10.0.0.5:8000")],
        )
        .unwrap();
        assert_eq!(config.api_base_url, override_url);
    }

    #[test]
    fn validation_rejects_non_http_scheme() {
        let config = ClientConfig {
            api_base_url: Url::parse("ftp://files.local").unwrap(),
            ..ClientConfig::with_defaults()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let config = ClientConfig {
            request_timeout_secs: 0,
            ..ClientConfig::with_defaults()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                ..
            })
        ));
    }
}
