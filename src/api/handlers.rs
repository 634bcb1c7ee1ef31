//! API route handlers
//!
//! Request handling logic for the operator console:
//! - Login gate and session navigation
//! - Protocol search against the knowledge index
//! - Canned strategy recommendations
//! - Chat assistant passthrough
//! - Console widget data
//!
//! All handlers return `Response` via [`ApiResponse::ok`] or [`ApiErrorResponse`].

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::auth::OperatorSession;
use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::chat::{ChatBackend, ChatMessage};
use crate::console::{self, ChecklistUpdate, ConsoleAction};
use crate::knowledge::{self, KnowledgeIndex};
use crate::session::{Page, Session, SessionStore};
use crate::strategy::{self, Demographic};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Operator sessions keyed by bearer token
    pub sessions: SessionStore,
    /// Nearest-neighbour protocol index
    pub index: Arc<dyn KnowledgeIndex>,
    /// Chat completion backend
    pub chat: Arc<dyn ChatBackend>,
    /// Artificial pause before a strategy is returned
    pub strategy_delay: Duration,
    /// Server start, for uptime
    pub started_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(
        index: Arc<dyn KnowledgeIndex>,
        chat: Arc<dyn ChatBackend>,
        strategy_delay: Duration,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            index,
            chat,
            strategy_delay,
            started_at: Utc::now(),
        }
    }
}

/// Session vanished between extraction and use (concurrent logout).
fn session_gone() -> Response {
    ApiErrorResponse::unauthorized("Session expired or unknown, please sign in again")
}

// ============================================================================
// Health Endpoint
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub knowledge_index: &'static str,
    pub chat_backend: &'static str,
    pub active_sessions: usize,
}

/// GET /health
pub async fn health(State(state): State<DashboardState>) -> Response {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;
    ApiResponse::ok(HealthResponse {
        status: "ok",
        uptime_secs,
        knowledge_index: state.index.index_name(),
        chat_backend: state.chat.backend_name(),
        active_sessions: state.sessions.active_count().await,
    })
}

// ============================================================================
// Login / Session
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub operator_id: String,
    #[serde(default)]
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub operator_id: String,
    pub page: Page,
}

/// POST /api/login - accept any non-empty operator id + PIN
pub async fn login(State(state): State<DashboardState>, Json(req): Json<LoginRequest>) -> Response {
    match state.sessions.login(&req.operator_id, &req.pin).await {
        Ok(token) => ApiResponse::ok(LoginResponse {
            token,
            operator_id: req.operator_id.clone(),
            page: Page::default(),
        }),
        Err(e) => {
            info!("Login rejected: {}", e);
            ApiErrorResponse::validation(e.to_string())
        }
    }
}

/// POST /api/logout
pub async fn logout(State(state): State<DashboardState>, session: OperatorSession) -> Response {
    let signed_out = state.sessions.logout(&session.token).await;
    ApiResponse::ok(serde_json::json!({ "signed_out": signed_out }))
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub operator_id: String,
    pub authenticated: bool,
    pub page: Page,
    pub pages: Vec<&'static str>,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: u64,
    pub chat_messages: usize,
}

impl SessionSummary {
    fn from_session(session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            operator_id: session.operator_id.clone(),
            authenticated: session.authenticated,
            page: session.page,
            pages: Page::ALL.iter().map(|p| p.label()).collect(),
            started_at: session.started_at,
            elapsed_secs: session.elapsed_secs(now),
            chat_messages: session.chat.len(),
        }
    }
}

/// GET /api/session
pub async fn get_session(State(state): State<DashboardState>, session: OperatorSession) -> Response {
    match state.sessions.get(&session.token).await {
        Some(s) => ApiResponse::ok(SessionSummary::from_session(&s, Utc::now())),
        None => session_gone(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: String,
}

/// PUT /api/session/page - switch console tab
pub async fn set_page(
    State(state): State<DashboardState>,
    session: OperatorSession,
    Json(req): Json<PageRequest>,
) -> Response {
    let Some(page) = Page::ALL.into_iter().find(|p| p.label() == req.page) else {
        return ApiErrorResponse::validation(format!("Unknown page '{}'", req.page));
    };

    let now = Utc::now();
    match state
        .sessions
        .with_session(&session.token, |s| {
            s.page = page;
            SessionSummary::from_session(s, now)
        })
        .await
    {
        Some(summary) => ApiResponse::ok(summary),
        None => session_gone(),
    }
}

// ============================================================================
// Knowledge Search
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// POST /api/knowledge/search - top-1 protocol for the signal input
pub async fn search_knowledge(
    State(state): State<DashboardState>,
    _session: OperatorSession,
    Json(req): Json<SearchRequest>,
) -> Response {
    if req.query.is_empty() {
        return ApiErrorResponse::validation("Type a crisis type to search (e.g. suicide, cardiac)");
    }

    match knowledge::search_protocol(state.index.as_ref(), &req.query).await {
        Ok(lookup) => ApiResponse::ok(lookup),
        Err(e) => {
            warn!(index = state.index.index_name(), error = %e, "Knowledge search failed");
            let hint = knowledge::index_error_hint(state.index.collection());
            ApiErrorResponse::upstream("INDEX_ERROR", format!("Qdrant Error: {e}"), Some(&hint))
        }
    }
}

// ============================================================================
// Strategy
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StrategyRequest {
    pub crisis_type: String,
    #[serde(default)]
    pub demographic: Option<String>,
}

/// POST /api/strategy - canned recommendation after the analysis pause
pub async fn generate_strategy(
    State(state): State<DashboardState>,
    _session: OperatorSession,
    Json(req): Json<StrategyRequest>,
) -> Response {
    let demographic = match req.demographic.as_deref() {
        None => Demographic::default(),
        Some(raw) => match raw.parse::<Demographic>() {
            Ok(d) => d,
            Err(msg) => return ApiErrorResponse::validation(msg),
        },
    };

    if !state.strategy_delay.is_zero() {
        tokio::time::sleep(state.strategy_delay).await;
    }

    let recommendation = strategy::recommend(&req.crisis_type, demographic);
    info!(
        crisis = %recommendation.crisis_type,
        protocol = %recommendation.protocol,
        match_percent = recommendation.match_percent,
        "Strategy generated"
    );
    ApiResponse::ok(recommendation)
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
}

/// GET /api/chat
pub async fn get_chat(State(state): State<DashboardState>, session: OperatorSession) -> Response {
    match state
        .sessions
        .with_session(&session.token, |s| s.chat.messages().to_vec())
        .await
    {
        Some(messages) => ApiResponse::ok(ChatTranscript { messages }),
        None => session_gone(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/chat - append the prompt, ask the model, append the reply
pub async fn send_chat(
    State(state): State<DashboardState>,
    session: OperatorSession,
    Json(req): Json<ChatRequest>,
) -> Response {
    if req.message.trim().is_empty() {
        return ApiErrorResponse::validation("Message must not be empty");
    }
    // Sent and recorded exactly as typed.
    let prompt = req.message.as_str();

    // User turn is recorded before the call and kept even if the call fails.
    if state
        .sessions
        .with_session(&session.token, |s| s.chat.push_user(prompt))
        .await
        .is_none()
    {
        return session_gone();
    }

    match state.chat.complete(prompt).await {
        Ok(reply) => {
            let messages = state
                .sessions
                .with_session(&session.token, |s| {
                    s.chat.push_assistant(&reply);
                    s.chat.messages().to_vec()
                })
                .await;
            match messages {
                Some(messages) => ApiResponse::ok(ChatReply { reply, messages }),
                None => session_gone(),
            }
        }
        Err(e) => {
            warn!(backend = state.chat.backend_name(), error = %e, "Chat completion failed");
            ApiErrorResponse::upstream("LLM_ERROR", format!("Groq Error: {e}"), None)
        }
    }
}

/// DELETE /api/chat
pub async fn clear_chat(State(state): State<DashboardState>, session: OperatorSession) -> Response {
    match state
        .sessions
        .with_session(&session.token, |s| s.chat.clear())
        .await
    {
        Some(()) => ApiResponse::ok(ChatTranscript { messages: Vec::new() }),
        None => session_gone(),
    }
}

// ============================================================================
// Console Widgets
// ============================================================================

/// GET /api/console/map
pub async fn get_map(_session: OperatorSession) -> Response {
    ApiResponse::ok(console::caller_location())
}

/// GET /api/console/mission
pub async fn get_mission(State(state): State<DashboardState>, session: OperatorSession) -> Response {
    let now = Utc::now();
    match state
        .sessions
        .with_session(&session.token, |s| {
            console::mission_status(s.elapsed_secs(now), s.checklist)
        })
        .await
    {
        Some(status) => ApiResponse::ok(status),
        None => session_gone(),
    }
}

/// PUT /api/console/mission/checklist
pub async fn update_checklist(
    State(state): State<DashboardState>,
    session: OperatorSession,
    Json(update): Json<ChecklistUpdate>,
) -> Response {
    let now = Utc::now();
    match state
        .sessions
        .with_session(&session.token, |s| {
            s.checklist.apply(&update);
            console::mission_status(s.elapsed_secs(now), s.checklist)
        })
        .await
    {
        Some(status) => ApiResponse::ok(status),
        None => session_gone(),
    }
}

/// GET /api/console/vitals
pub async fn get_vitals(_session: OperatorSession) -> Response {
    let mut rng = rand::thread_rng();
    match console::vitals_snapshot(&mut rng) {
        Ok(snapshot) => ApiResponse::ok(snapshot),
        Err(e) => ApiErrorResponse::internal(format!("Vitals generator misconfigured: {e}")),
    }
}

/// GET /api/console/supervisor
pub async fn get_supervisor(_session: OperatorSession) -> Response {
    ApiResponse::ok(console::supervisor_feed())
}

/// GET /api/console/features
pub async fn get_features(_session: OperatorSession) -> Response {
    ApiResponse::ok(console::FEATURES)
}

#[derive(Debug, Serialize)]
pub struct ToastResponse {
    pub action: String,
    pub toast: &'static str,
}

/// POST /api/console/actions/:action - dispatch / supervisor / handover buttons
pub async fn console_action(
    State(state): State<DashboardState>,
    session: OperatorSession,
    Path(action): Path<String>,
) -> Response {
    let parsed = match action.parse::<ConsoleAction>() {
        Ok(a) => a,
        Err(msg) => return ApiErrorResponse::not_found(msg),
    };

    if let Some(s) = state.sessions.get(&session.token).await {
        info!(operator = %s.operator_id, action = %action, "Console action");
    }
    ApiResponse::ok(ToastResponse {
        action,
        toast: parsed.toast(),
    })
}
