//! Console configuration - operator-tunable TOML values
//!
//! Each struct implements `Default` with the values from [`super::defaults`],
//! so a missing file or a partial file behaves exactly like the stock demo.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "CRISISTRACE_CONFIG";

/// File looked up in the working directory when nothing else is given.
pub const LOCAL_CONFIG_FILE: &str = "crisistrace.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a console deployment.
///
/// Load with `DispatchConfig::load()` which searches:
/// 1. explicit path (`--config`)
/// 2. `$CRISISTRACE_CONFIG`
/// 3. `./crisistrace.toml`
/// 4. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl DispatchConfig {
    /// Load configuration using the standard search order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Explicit path must exist; a typo here is an operator error
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "Loaded config from --config");
            return Ok(config);
        }

        // 2. Env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                let config = Self::load_from_file(&p)?;
                info!(path = %p.display(), "Loaded config from {}", CONFIG_ENV_VAR);
                return Ok(config);
            }
            warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
        }

        // 3. Working directory
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
            return Ok(config);
        }

        // 4. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }
        if self.knowledge.collection.trim().is_empty() {
            errors.push("knowledge.collection must not be empty".to_string());
        }
        if self.knowledge.timeout_secs == 0 {
            errors.push("knowledge.timeout_secs must be > 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            errors.push(format!(
                "llm.temperature ({:.2}) must be within 0.0..=2.0",
                self.llm.temperature
            ));
        }
        if self.llm.max_tokens == 0 {
            errors.push("llm.max_tokens must be > 0".to_string());
        }
        if self.llm.model.trim().is_empty() {
            errors.push("llm.model must not be empty".to_string());
        }
        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            errors.push(format!("llm.base_url ({}) must be an http(s) URL", self.llm.base_url));
        }
        if self.llm.timeout_secs == 0 {
            errors.push("llm.timeout_secs must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `CRISISTRACE_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub collection: String,
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            collection: defaults::KNOWLEDGE_COLLECTION.to_string(),
            timeout_secs: defaults::KNOWLEDGE_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LLM_BASE_URL.to_string(),
            model: defaults::LLM_MODEL.to_string(),
            system_prompt: defaults::LLM_SYSTEM_PROMPT.to_string(),
            temperature: defaults::LLM_TEMPERATURE,
            max_tokens: defaults::LLM_MAX_TOKENS,
            timeout_secs: defaults::LLM_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Pause before a strategy is returned (ms). 0 disables it.
    pub delay_ms: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::STRATEGY_DELAY_MS,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Required secret {0} is not set")]
    MissingSecret(&'static str),
}

// ============================================================================
// Tests
// ============================================================================
