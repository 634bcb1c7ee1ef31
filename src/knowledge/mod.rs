//! Knowledge module - protocol retrieval over an external vector index
//!
//! Operators type a crisis signal ("cardiac", "suicide", ...). The text is
//! embedded with [`crate::embedding::embed`], the index is asked for its single
//! nearest record, and the record's steps are highlighted for display.
//!
//! ## KnowledgeIndex trait
//!
//! The `KnowledgeIndex` trait abstracts the nearest-neighbour lookup so the
//! Qdrant backend can be swapped for an in-memory fake in tests.

pub mod highlight;
pub mod qdrant;

pub use highlight::{highlight, render_steps, KEYWORDS};
pub use qdrant::QdrantIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::embedding::{embed, QueryVector};

/// Hint shown when the index is reachable but has nothing for the query.
pub const NO_MATCH_HINT: &str = "No protocols found. Try: 'suicide', 'cardiac', 'domestic violence'";

/// Hint shown alongside index failures for `collection`.
pub fn index_error_hint(collection: &str) -> String {
    format!("Make sure Qdrant collection '{collection}' exists with data")
}

/// Protocol record stored in the external index. Read-only from our side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Point id as reported by the index (numeric or UUID, rendered as text)
    #[serde(default)]
    pub id: String,
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Result of a top-1 query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Match(KnowledgeRecord),
    /// Index answered with zero points. Not an error.
    NoMatch,
}

/// Knowledge index errors
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Index returned status {status}: {body}")]
    ServerError {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Malformed index response: {0}")]
    Decode(String),
}

/// Trait for nearest-neighbour backends
///
/// Implementations must be thread-safe since the API shares one instance
/// across all request handlers.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// Return the single best-matching record for `vector`, if any.
    async fn nearest(&self, vector: &QueryVector) -> Result<SearchOutcome, IndexError>;

    /// Backend name for logging and health output
    fn index_name(&self) -> &'static str;

    /// Collection queried, for operator-facing hints
    fn collection(&self) -> &str;
}

/// Protocol ready for display: raw fields plus highlighted steps.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolView {
    pub category: String,
    pub text: String,
    pub steps: Vec<String>,
    pub highlighted_steps: Vec<String>,
}

impl From<KnowledgeRecord> for ProtocolView {
    fn from(record: KnowledgeRecord) -> Self {
        let highlighted_steps = render_steps(&record.steps);
        Self {
            category: record.category,
            text: record.text,
            steps: record.steps,
            highlighted_steps,
        }
    }
}

/// Outcome of the full search flow as presented to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProtocolLookup {
    Found { protocol: ProtocolView },
    NotFound { hint: &'static str },
}

/// Embed `query`, fetch the nearest record and render it.
pub async fn search_protocol(
    index: &dyn KnowledgeIndex,
    query: &str,
) -> Result<ProtocolLookup, IndexError> {
    let vector = embed(query);
    let outcome = index.nearest(&vector).await?;

    Ok(match outcome {
        SearchOutcome::Match(record) => {
            tracing::info!(
                index = index.index_name(),
                category = %record.category,
                steps = record.steps.len(),
                "Protocol matched"
            );
            ProtocolLookup::Found {
                protocol: record.into(),
            }
        }
        SearchOutcome::NoMatch => {
            tracing::info!(index = index.index_name(), "No protocol found for query");
            ProtocolLookup::NotFound {
                hint: NO_MATCH_HINT,
            }
        }
    })
}

/// In-memory index returning a fixed outcome. Stands in for Qdrant in tests.
pub struct FixedIndex {
    outcome: Option<KnowledgeRecord>,
}

impl FixedIndex {
    /// Index that always answers with `record`.
    pub fn with_record(record: KnowledgeRecord) -> Self {
        Self {
            outcome: Some(record),
        }
    }

    /// Index that never matches anything.
    pub fn empty() -> Self {
        Self { outcome: None }
    }
}

#[async_trait]
impl KnowledgeIndex for FixedIndex {
    async fn nearest(&self, _vector: &QueryVector) -> Result<SearchOutcome, IndexError> {
        Ok(match &self.outcome {
            Some(record) => SearchOutcome::Match(record.clone()),
            None => SearchOutcome::NoMatch,
        })
    }

    fn index_name(&self) -> &'static str {
        "Fixed"
    }

    fn collection(&self) -> &str {
        crate::config::defaults::KNOWLEDGE_COLLECTION
    }
}
