//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag; the file must exist)
//! 2. `~/.schema-annotator/config.toml` (user)
//! 3. built-in defaults (local backend on `http://localhost:11434`)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.schema-annotator/secrets.toml` (user, must be 0600 or 0400)
//! 2. `OPENAI_API_KEY` environment variable

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::eval::{DEFAULT_MAX_CASES, ErrorPolicy, Evaluator, Pacing};
use crate::providers::{ChatBackend, LocalChatBackend, RemoteChatBackend, local, remote};
use crate::{AnnotatorError, Result};

/// Name of the per-user configuration directory.
const CONFIG_DIR: &str = ".schema-annotator";

/// Environment variable consulted when no secrets file provides a key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            backend: BackendConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// Which backend kind to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl std::str::FromStr for BackendKind {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(AnnotatorError::Configuration(format!(
                "unknown backend '{other}' (expected 'local' or 'remote')"
            ))),
        }
    }
}

/// Backend selection and per-backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Local inference server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    /// Server base URL (default: http://localhost:11434).
    #[serde(default = "default_local_url")]
    pub base_url: String,
    #[serde(default = "default_local_model")]
    pub model: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_url(),
            model: default_local_model(),
        }
    }
}

fn default_local_url() -> String {
    local::DEFAULT_BASE_URL.to_string()
}

fn default_local_model() -> String {
    local::DEFAULT_MODEL.to_string()
}

/// Hosted chat-completion API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_url")]
    pub base_url: String,
    #[serde(default = "default_remote_model")]
    pub model: String,
    /// Sampling temperature (default: 0.3).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_url(),
            model: default_remote_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_remote_url() -> String {
    remote::DEFAULT_BASE_URL.to_string()
}

fn default_remote_model() -> String {
    remote::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    remote::DEFAULT_TEMPERATURE
}

/// Evaluation run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Path of the labeled test-case file.
    #[serde(default = "default_test_cases")]
    pub test_cases: PathBuf,
    /// Cases taken from the front of the file (default and maximum: 20).
    #[serde(default = "default_max_cases")]
    pub max_cases: usize,
    /// Pause between cases in milliseconds (default: 1000).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Whether the pause also follows the final case (default: true).
    #[serde(default = "default_true")]
    pub pace_after_last: bool,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_cases: default_test_cases(),
            max_cases: default_max_cases(),
            delay_ms: default_delay_ms(),
            pace_after_last: true,
            error_policy: ErrorPolicy::default(),
        }
    }
}

fn default_test_cases() -> PathBuf {
    PathBuf::from("test_cases.json")
}

fn default_max_cases() -> usize {
    DEFAULT_MAX_CASES
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl EvaluationConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing::new(Duration::from_millis(self.delay_ms)).after_last(self.pace_after_last)
    }

    /// Evaluator configured from these settings.
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new()
            .max_cases(self.max_cases)
            .pacing(self.pacing())
            .error_policy(self.error_policy)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.schema-annotator/config.toml`
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnnotatorError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AnnotatorError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(AnnotatorError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR).join("config.toml"))
            .filter(|path| path.exists()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Secrets for the configured backend. The local backend needs none, so
    /// the secrets file is only read when the remote backend is selected.
    pub fn load_secrets(&self) -> Result<Secrets> {
        match self.backend.kind {
            BackendKind::Local => Ok(Secrets::default()),
            BackendKind::Remote => Secrets::load(),
        }
    }

    /// Build the configured backend. Called once at startup.
    pub fn build_backend(&self, secrets: &Secrets) -> Result<Box<dyn ChatBackend>> {
        let timeout = self.request_timeout();
        match self.backend.kind {
            BackendKind::Local => {
                let local = &self.backend.local;
                Ok(Box::new(LocalChatBackend::with_base_url(
                    &local.base_url,
                    &local.model,
                    timeout,
                )?))
            }
            BackendKind::Remote => {
                let remote = &self.backend.remote;
                let api_key = secrets.api_key().ok_or_else(|| {
                    AnnotatorError::Configuration(format!(
                        "remote backend needs an API key: set [remote] api_key in \
                         ~/{CONFIG_DIR}/secrets.toml or {API_KEY_ENV_VAR}"
                    ))
                })?;
                Ok(Box::new(
                    RemoteChatBackend::with_base_url(
                        api_key,
                        &remote.base_url,
                        &remote.model,
                        timeout,
                    )?
                    .temperature(remote.temperature),
                ))
            }
        }
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub remote: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Secrets {
    /// Load secrets from `~/.schema-annotator/secrets.toml` with a permission check.
    ///
    /// A missing file gives empty secrets. Either way `OPENAI_API_KEY` fills in
    /// the key when the file does not provide one.
    pub fn load() -> Result<Self> {
        let secrets = match dirs::home_dir() {
            Some(home) => Self::load_checked(&home.join(CONFIG_DIR).join("secrets.toml"))?,
            None => Secrets::default(),
        };
        Ok(secrets.with_fallback_key(std::env::var(API_KEY_ENV_VAR).ok()))
    }

    /// Load a secrets file after checking its permissions. A missing file
    /// gives empty secrets.
    pub fn load_checked(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Secrets::default());
        }
        Self::check_permissions(path)?;
        Self::load_from_file(path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnnotatorError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AnnotatorError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            AnnotatorError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(AnnotatorError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Use `key` when these secrets carry no usable API key.
    pub fn with_fallback_key(mut self, key: Option<String>) -> Self {
        if self.api_key().is_none() {
            self.remote = key.map(|api_key| ApiKeySecret { api_key });
        }
        self
    }

    /// API key for the remote backend, if a non-blank one is set.
    pub fn api_key(&self) -> Option<String> {
        self.remote
            .as_ref()
            .map(|s| s.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }
}
