//! Operator session extractor

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use super::envelope::ApiErrorResponse;
use super::handlers::DashboardState;

/// Signed-in operator, resolved from `Authorization: Bearer <token>`.
pub struct OperatorSession {
    pub token: String,
}

/// Extract Bearer token from Authorization header.
fn extract_bearer(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl FromRequestParts<DashboardState> for OperatorSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DashboardState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)
            .ok_or_else(|| ApiErrorResponse::unauthorized("Missing Bearer token"))?;

        if !state.sessions.touch(&token).await {
            return Err(ApiErrorResponse::unauthorized(
                "Session expired or unknown, please sign in again",
            ));
        }

        Ok(OperatorSession { token })
    }
}
