//! Core configuration data types used in the config crate.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{Error, defaults};

/// Mapping from remote source name to CSV column name.
pub type FieldMapping = BTreeMap<String, String>;

/// Remote endpoint connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Obs {
    /// Host name or address.
    #[serde(default = "defaults::default_obs_host")]
    pub host: String,
    /// WebSocket port.
    #[serde(default = "defaults::default_obs_port")]
    pub port: u16,
    /// Server password; absent or empty for unauthenticated servers.
    #[serde(default)]
    pub password: Option<String>,
    /// Bound on the handshake and on each request, in milliseconds.
    #[serde(default = "defaults::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for Obs {
    fn default() -> Self {
        Self {
            host: defaults::default_obs_host(),
            port: defaults::OBS_PORT,
            password: None,
            request_timeout_ms: defaults::REQUEST_TIMEOUT_MS,
        }
    }
}

impl Obs {
    /// The password, treating an empty string as none.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Bounded retry policy for the startup connect handshake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Retry {
    /// Total connection attempts, including the first.
    #[serde(default = "defaults::default_retry_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "defaults::default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
            delay_ms: defaults::RETRY_DELAY_MS,
        }
    }
}

impl Retry {
    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Fully loaded csvsync configuration.
///
/// Constructed once at startup and threaded into each component; nothing
/// reads configuration from global state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CSV data source. Relative paths resolve against the config file's directory.
    pub data_file: PathBuf,
    /// Remote endpoint.
    #[serde(default)]
    pub obs: Obs,
    /// Startup connect retry policy.
    #[serde(default)]
    pub retry: Retry,
    /// Poll interval for the data file, in milliseconds.
    #[serde(default = "defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// While disconnected, how often the connect path is retried, in milliseconds.
    #[serde(default = "defaults::default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Exit at startup when the remote endpoint cannot be reached.
    #[serde(default = "defaults::default_require_connection")]
    pub require_connection: bool,
    /// Scene new sources are created in; defaults to the first listed scene.
    #[serde(default)]
    pub scene: Option<String>,
    /// Remote kind used for text sources.
    #[serde(default = "defaults::default_text_input_kind")]
    pub text_input_kind: String,
    /// Remote source name to CSV column.
    #[serde(default)]
    pub mapping: FieldMapping,
    /// Default log level when neither CLI flags nor `RUST_LOG` set one.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Optional log file; events are appended alongside stderr output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Minimal configuration for `data_file` with every other field defaulted.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            obs: Obs::default(),
            retry: Retry::default(),
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            reconnect_interval_ms: defaults::RECONNECT_INTERVAL_MS,
            require_connection: true,
            scene: None,
            text_input_kind: defaults::default_text_input_kind(),
            mapping: FieldMapping::new(),
            log_level: None,
            log_file: None,
        }
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reconnect interval as a duration.
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    /// Resolve relative file paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.data_file.is_relative() {
            self.data_file = base.join(&self.data_file);
        }
        if let Some(log) = &self.log_file
            && log.is_relative()
        {
            self.log_file = Some(base.join(log));
        }
    }

    /// Check ranges and mapping entries.
    pub fn validate(&self) -> Result<(), Error> {
        fn invalid(field: &str, message: impl Into<String>) -> Result<(), Error> {
            Err(Error::Validation {
                path: None,
                field: field.to_string(),
                message: message.into(),
            })
        }

        if self.data_file.as_os_str().is_empty() {
            return invalid("data_file", "data_file must not be empty");
        }
        if self.obs.host.trim().is_empty() {
            return invalid("obs.host", "host must not be empty");
        }
        if self.obs.port == 0 {
            return invalid("obs.port", "port must be non-zero");
        }
        if self.obs.request_timeout_ms == 0 {
            return invalid("obs.request_timeout_ms", "timeout must be non-zero");
        }
        if self.retry.max_attempts == 0 {
            return invalid("retry.max_attempts", "at least one attempt is required");
        }
        if self.poll_interval_ms == 0 {
            return invalid("poll_interval_ms", "poll interval must be non-zero");
        }
        if self.text_input_kind.trim().is_empty() {
            return invalid("text_input_kind", "text input kind must not be empty");
        }
        for (source, column) in &self.mapping {
            if source.trim().is_empty() {
                return invalid("mapping", format!("empty source name for column '{column}'"));
            }
            if column.trim().is_empty() {
                return invalid("mapping", format!("empty column for source '{source}'"));
            }
        }
        Ok(())
    }
}
