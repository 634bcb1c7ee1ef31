//! CrisisTrace Ultra: Emergency Dispatch Command Console
//!
//! Operator console backend for crisis call dispatch.
//!
//! ## Architecture
//!
//! - **Embedding**: Deterministic 128-dim character-code query vectors
//! - **Knowledge**: Top-1 protocol retrieval from a Qdrant collection, with keyword highlighting
//! - **Strategy**: Canned recommendation table keyed by crisis type
//! - **Chat**: Groq chat-completion passthrough with per-session history
//! - **Session**: Accept-any-input login gate and explicit per-operator state
//! - **Console**: Map, mission, vitals, supervisor and feature widgets
//! - **API**: Axum REST surface plus the embedded dashboard

pub mod api;
pub mod chat;
pub mod config;
pub mod console;
pub mod embedding;
pub mod knowledge;
pub mod session;
pub mod strategy;

// Re-export configuration
pub use config::{ConfigError, DispatchConfig, Secrets};

// Re-export core operations
pub use embedding::{embed, QueryVector, EMBEDDING_DIM};
pub use knowledge::{
    highlight, search_protocol, KnowledgeIndex, KnowledgeRecord, ProtocolLookup, QdrantIndex,
};
pub use strategy::{recommend, CrisisType, Demographic, Strategy};

// Re-export chat and session state
pub use chat::{ChatBackend, ChatHistory, GroqChat};
pub use session::{Page, Session, SessionStore};
