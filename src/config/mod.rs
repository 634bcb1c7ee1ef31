//! Console Configuration Module
//!
//! Non-secret settings come from a TOML file (see [`DispatchConfig::load`]);
//! service credentials come from the environment (see [`Secrets::from_env`]).
//!
//! ## Loading Order
//!
//! 1. `--config <path>` CLI flag
//! 2. `CRISISTRACE_CONFIG` environment variable (path to TOML file)
//! 3. `crisistrace.toml` in the current working directory
//! 4. Built-in defaults from [`defaults`]

mod dispatch_config;
mod secrets;
pub mod defaults;

pub use dispatch_config::*;
pub use secrets::{Secrets, GROQ_KEY_VAR, QDRANT_KEY_VAR, QDRANT_URL_VAR};
