//! Client configuration loading.
//!
//! Configuration comes from the environment (`SEALION_API_KEY`,
//! `SEALION_BASE_URL`) or, when present, a YAML file whose string values may
//! reference environment variables as `${VAR}` or `${VAR:-default}`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::errors::ClientError;
use super::fallback::FallbackTable;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Public SEA-LION endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.sea-lion.ai/v1";

/// General-purpose instruct model.
pub const INSTRUCT_MODEL: &str = "aisingapore/Gemma-SEA-LION-v3-9B-IT";
/// Backup for [`INSTRUCT_MODEL`].
pub const INSTRUCT_BACKUP_MODEL: &str = "aisingapore/Llama-SEA-LION-v3-70B-IT";
/// Reasoning model with a thinking-mode toggle.
pub const REASONING_MODEL: &str = "aisingapore/Llama-SEA-LION-v3.5-8B-R";
/// Backup for [`REASONING_MODEL`].
pub const REASONING_BACKUP_MODEL: &str = "aisingapore/Llama-SEA-LION-v3.5-70B-R";
/// Safety-classification model used for moderation.
pub const GUARD_MODEL: &str = "aisingapore/Gemma-SEA-LION-Guard";

pub const API_KEY_ENV: &str = "SEALION_API_KEY";
pub const BASE_URL_ENV: &str = "SEALION_BASE_URL";
pub const CONFIG_PATH_ENV: &str = "SEALION_CONFIG";

const CONFIG_FILE_NAME: &str = "sealion.yaml";

// ─── Public Types ────────────────────────────────────────────────────────────

/// Which model serves which purpose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelRoles {
    #[serde(default = "default_instruct")]
    pub instruct: String,
    #[serde(default = "default_reasoning")]
    pub reasoning: String,
    #[serde(default = "default_guard")]
    pub guard: String,
}

impl Default for ModelRoles {
    fn default() -> Self {
        Self {
            instruct: default_instruct(),
            reasoning: default_reasoning(),
            guard: default_guard(),
        }
    }
}

fn default_instruct() -> String {
    INSTRUCT_MODEL.to_string()
}
fn default_reasoning() -> String {
    REASONING_MODEL.to_string()
}
fn default_guard() -> String {
    GUARD_MODEL.to_string()
}

/// Full client configuration (mirrors `sealion.yaml`).
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub models: ModelRoles,
    #[serde(default)]
    pub fallbacks: FallbackTable,
    /// How long a health probe result is served from cache.
    #[serde(default = "default_health_ttl_secs")]
    pub health_ttl_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Total request timeout. Unset means calls run until the transport gives up.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_health_ttl_secs() -> u64 {
    300
}
fn default_connect_timeout_secs() -> u64 {
    10
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("fallbacks", &self.fallbacks)
            .field("health_ttl_secs", &self.health_ttl_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            models: ModelRoles::default(),
            fallbacks: FallbackTable::default(),
            health_ttl_secs: default_health_ttl_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Build a config pointing at `base_url` with the given key and defaults
    /// for everything else.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            ..Self::default()
        }
        .normalized()
    }

    /// Read `SEALION_API_KEY` and `SEALION_BASE_URL` from the environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_base_url);

        Self {
            api_key,
            base_url,
            ..Self::default()
        }
        .normalized()
    }

    /// Load from the discovered config file, or the environment when none exists.
    pub fn load() -> Result<Self, ClientError> {
        let cwd = std::env::current_dir().unwrap_or_default();
        match find_config_path(&cwd) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading SEA-LION config file");
                load_client_config(&path)
            }
            None => Ok(Self::from_env()),
        }
    }

    pub fn health_ttl(&self) -> Duration {
        Duration::from_secs(self.health_ttl_secs)
    }

    /// Whether calls can be made at all.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Blank keys count as missing; trailing slashes are dropped from the URL.
    fn normalized(mut self) -> Self {
        self.api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            default_base_url()
        } else {
            trimmed.to_string()
        };
        self
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Locate a config file.
///
/// Resolution order: `SEALION_CONFIG`, then `sealion.yaml` walking upward
/// from `start`, then `<config_dir>/sealion/config.yaml`.
pub fn find_config_path(start: &Path) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let candidate = PathBuf::from(expand_tilde(&path));
        if candidate.is_file() {
            return Some(candidate);
        }
        tracing::warn!(path = %candidate.display(), "SEALION_CONFIG points at a missing file");
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|d| d.join("sealion").join("config.yaml"))
        .filter(|p| p.is_file())
}

/// Load and parse a YAML config file, interpolating environment variables.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, ClientError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ClientError::ConfigError {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;
    parse_client_config(&raw)
}

/// Parse YAML config text.
pub fn parse_client_config(raw: &str) -> Result<ClientConfig, ClientError> {
    let interpolated = interpolate_env_vars(raw);

    // An empty file deserializes as unit; treat it as "all defaults".
    if interpolated.trim().is_empty() {
        return Ok(ClientConfig::default());
    }

    let config: ClientConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ClientError::ConfigError {
            reason: format!("failed to parse config: {e}"),
        })?;

    if config.health_ttl_secs == 0 {
        tracing::warn!("health_ttl_secs is 0; every health request will probe");
    }

    Ok(config.normalized())
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve `VAR` or `VAR:-default`. Unset and empty variables both take the default.
fn resolve_var_expr(expr: &str) -> String {
    match expr.split_once(":-") {
        Some((name, default)) => std::env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| expand_tilde(default)),
        None => std::env::var(expr).unwrap_or_default(),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars_with_default() {
        std::env::remove_var("__SEALION_TEST_UNSET__");
        let result = interpolate_env_vars("url: ${__SEALION_TEST_UNSET__:-http://localhost:9000}");
        assert_eq!(result, "url: http://localhost:9000");
    }

    #[test]
    fn test_interpolate_env_vars_with_value() {
        std::env::set_var("__SEALION_TEST_KEY__", "sk-test");
        let result = interpolate_env_vars("api_key: ${__SEALION_TEST_KEY__}");
        assert_eq!(result, "api_key: sk-test");
        std::env::remove_var("__SEALION_TEST_KEY__");
    }

    #[test]
    fn test_interpolate_no_vars() {
        let input = "plain: text";
        assert_eq!(interpolate_env_vars(input), input);
    }

    #[test]
    fn test_expand_tilde() {
        let result = expand_tilde("~/sealion.yaml");
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("/sealion.yaml"));
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_client_config("api_key: abc\n").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.models, ModelRoles::default());
        assert_eq!(config.health_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(
            config.fallbacks.candidates(INSTRUCT_MODEL),
            vec![INSTRUCT_MODEL.to_string(), INSTRUCT_BACKUP_MODEL.to_string()]
        );
    }

    #[test]
    fn test_parse_empty_file_is_default() {
        let config = parse_client_config("").unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_full_file() {
        let yaml = r#"
            api_key: key-1
            base_url: "http://localhost:8000/v1/"
            models:
              instruct: small
              reasoning: thinker
            fallbacks:
              small: [large, larger]
            health_ttl_secs: 60
            request_timeout_secs: 30
        "#;
        let config = parse_client_config(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000/v1");
        assert_eq!(config.models.instruct, "small");
        assert_eq!(config.models.guard, GUARD_MODEL);
        assert_eq!(
            config.fallbacks.candidates("small"),
            vec!["small".to_string(), "large".to_string(), "larger".to_string()]
        );
        assert_eq!(config.health_ttl_secs, 60);
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        std::env::remove_var("__SEALION_TEST_MISSING_KEY__");
        let config = parse_client_config("api_key: \"${__SEALION_TEST_MISSING_KEY__}\"\n").unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_client_config("health_ttl_secs: [not, a, number]");
        assert!(matches!(result, Err(ClientError::ConfigError { .. })));
    }

    #[test]
    fn test_load_client_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "api_key: from-file\nhealth_ttl_secs: 5\n").unwrap();

        let config = load_client_config(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.health_ttl_secs, 5);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_client_config(&dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ClientError::ConfigError { .. })));
    }

    #[test]
    fn test_find_config_path_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = find_config_path(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = ClientConfig::new("k", "http://127.0.0.1:1234/");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret", DEFAULT_BASE_URL);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
