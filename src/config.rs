//! Configuration file parser for ~/.config/reel/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `api_token` to prevent secret leakage in logs,
/// error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the video API.
    pub api_url: String,

    /// Base URL of the public site, used for "open in browser".
    pub site_url: String,

    /// Incremental page size for load-more fetches.
    pub load_limit: u32,

    /// Bulk page size for the one-time backfill on the first order switch.
    pub initial_limit: u32,

    /// Number of resolved author profiles kept in memory.
    pub author_cache_size: usize,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// API bearer token (alternative to REEL_API_TOKEN env var).
    /// Env var takes precedence over config file.
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api/".to_string(),
            site_url: "http://localhost:3000".to_string(),
            load_limit: 10,
            initial_limit: 30,
            author_cache_size: 256,
            request_timeout_secs: 10,
            api_token: None,
        }
    }
}

/// Mask api_token in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("site_url", &self.site_url)
            .field("load_limit", &self.load_limit)
            .field("initial_limit", &self.initial_limit)
            .field("author_cache_size", &self.author_cache_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to prevent memory exhaustion from a
        // maliciously large or corrupted config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "api_url",
                "site_url",
                "load_limit",
                "initial_limit",
                "author_cache_size",
                "request_timeout_secs",
                "api_token",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(path = %path.display(), api_url = %config.api_url, "Loaded configuration");
        Ok(config)
    }

    /// Page sizes of zero would issue degenerate fetches that the backend
    /// answers with empty pages, immediately exhausting the order. Called by
    /// [`load`](Self::load) and again after CLI overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_limit == 0 {
            return Err(ConfigError::Invalid("load_limit must be at least 1".into()));
        }
        if self.initial_limit == 0 {
            return Err(ConfigError::Invalid(
                "initial_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The bearer token, preferring the `REEL_API_TOKEN` env var over the
    /// config file.
    pub fn resolve_token(&self) -> Option<String> {
        match std::env::var("REEL_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Some(token),
            _ => self.api_token.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
