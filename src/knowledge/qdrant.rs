//! Qdrant REST client
//!
//! Issues a single `points/query` call per search against the configured
//! collection and decodes the top point's payload. No retries, no caching.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{IndexError, KnowledgeIndex, KnowledgeRecord, SearchOutcome};
use crate::embedding::QueryVector;

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: serde_json::Value,
    #[serde(default)]
    score: f32,
    payload: Option<PointPayload>,
}

#[derive(Deserialize)]
struct PointPayload {
    category: String,
    text: String,
    #[serde(default)]
    steps: Vec<String>,
}

/// Nearest-neighbour lookups against a Qdrant collection
pub struct QdrantIndex {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    collection: String,
}

impl QdrantIndex {
    /// Create a new client for `collection` at `base_url`.
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, IndexError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            collection: collection.to_string(),
        })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/collections/{}/points/query",
            self.base_url, self.collection
        )
    }
}

#[async_trait]
impl KnowledgeIndex for QdrantIndex {
    async fn nearest(&self, vector: &QueryVector) -> Result<SearchOutcome, IndexError> {
        let body = QueryRequest {
            query: vector,
            limit: 1,
            with_payload: true,
        };

        tracing::debug!(collection = %self.collection, "Querying Qdrant");

        let resp = self
            .http
            .post(self.query_url())
            .header("api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, collection = %self.collection, "Qdrant query rejected");
            return Err(IndexError::ServerError { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: QueryResponse =
            serde_json::from_slice(&bytes).map_err(|e| IndexError::Decode(e.to_string()))?;

        let Some(point) = parsed.result.points.into_iter().next() else {
            return Ok(SearchOutcome::NoMatch);
        };

        let payload = point
            .payload
            .ok_or_else(|| IndexError::Decode("point has no payload".to_string()))?;

        let id = match point.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        tracing::debug!(id = %id, score = point.score, "Qdrant top match");

        Ok(SearchOutcome::Match(KnowledgeRecord {
            id,
            category: payload.category,
            text: payload.text,
            steps: payload.steps,
        }))
    }

    fn index_name(&self) -> &'static str {
        "Qdrant"
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
