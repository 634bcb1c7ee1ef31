//! Service credentials read from the environment at startup.
//!
//! A `.env` file in the working directory is loaded first (if present). Every
//! secret is required: a missing or empty value aborts startup.

use secrecy::SecretString;

use super::ConfigError;

pub const QDRANT_URL_VAR: &str = "QDRANT_URL";
pub const QDRANT_KEY_VAR: &str = "QDRANT_KEY";
pub const GROQ_KEY_VAR: &str = "GROQ_KEY";

/// Endpoint and keys for the external services.
///
/// `Debug` output never includes the key material.
#[derive(Debug)]
pub struct Secrets {
    pub qdrant_url: String,
    pub qdrant_key: SecretString,
    pub groq_key: SecretString,
}

impl Secrets {
    /// Read all secrets from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingSecret(key))
        };

        Ok(Self {
            qdrant_url: require(QDRANT_URL_VAR)?,
            qdrant_key: SecretString::from(require(QDRANT_KEY_VAR)?),
            groq_key: SecretString::from(require(GROQ_KEY_VAR)?),
        })
    }
}
