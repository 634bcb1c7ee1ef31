//! REST API module using Axum
//!
//! Provides HTTP endpoints for the CrisisTrace operator console:
//! - `/api` routes with a consistent envelope and bearer-token sessions
//! - `/health` for liveness checks
//! - Static dashboard served via `rust-embed` (compiled into the binary)

pub mod auth;
pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use rust_embed::Embed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Env var holding a comma-separated list of allowed cross-origin callers.
pub const CORS_ORIGINS_ENV_VAR: &str = "CRISISTRACE_CORS_ORIGINS";

/// Dashboard assets compiled from `dashboard/`.
#[derive(Embed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Serve a static asset or fall back to `index.html` for client-side routing.
async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if let Some(content) = DashboardAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.into_owned(),
        )
            .into_response();
    }

    if let Some(index) = DashboardAssets::get("index.html") {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            index.data.into_owned(),
        )
            .into_response();
    }

    (StatusCode::OK, "CrisisTrace is running. Dashboard assets not bundled.").into_response()
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `CRISISTRACE_CORS_ORIGINS` to a comma-separated list of allowed
/// origins for local development.
fn build_cors_layer() -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];

    match std::env::var(CORS_ORIGINS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(methods)
                .allow_headers(headers)
        }
        Err(_) => CorsLayer::new().allow_methods(methods).allow_headers(headers),
    }
}

/// Create the complete application router with API and dashboard serving.
pub fn create_app(state: DashboardState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest("/api", routes::api_routes(state.clone()))
        .merge(routes::health_routes(state))
        .fallback(serve_asset)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::CannedChat;
    use crate::knowledge::FixedIndex;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(DashboardState::new(
            Arc::new(FixedIndex::empty()),
            Arc::new(CannedChat::replying("ok")),
            Duration::ZERO,
        ))
    }

    #[tokio::test]
    async fn test_root_serves_dashboard() {
        let resp = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let ct = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(ct.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_health_is_mounted_at_root() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
