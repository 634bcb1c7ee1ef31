//! Operator sessions
//!
//! All per-operator console state lives in an explicit [`Session`] held by
//! the [`SessionStore`]. Nothing here is process-global.
//!
//! The login gate only checks that both fields are non-empty. There is no
//! credential store behind it; any operator id and PIN pair is accepted.
//!
//! Sessions idle for longer than the store's TTL are dropped the next time
//! the store is touched, so abandoned logins do not accumulate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::chat::ChatHistory;
use crate::config::defaults;
use crate::console::MissionChecklist;

/// Console tabs, in navbar order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum Page {
    #[default]
    #[serde(rename = "Dashboard")]
    Dashboard,
    #[serde(rename = "Deployment Map")]
    DeploymentMap,
    #[serde(rename = "Vitals & Memory")]
    VitalsMemory,
    #[serde(rename = "Mission Tracker")]
    MissionTracker,
    #[serde(rename = "Supervisor")]
    Supervisor,
    #[serde(rename = "System Features")]
    SystemFeatures,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::DeploymentMap,
        Page::VitalsMemory,
        Page::MissionTracker,
        Page::Supervisor,
        Page::SystemFeatures,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::DeploymentMap => "Deployment Map",
            Page::VitalsMemory => "Vitals & Memory",
            Page::MissionTracker => "Mission Tracker",
            Page::Supervisor => "Supervisor",
            Page::SystemFeatures => "System Features",
        }
    }
}

/// Login rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter both Operator ID and PIN")]
    MissingCredentials,
}

/// State for one signed-in operator.
#[derive(Debug, Clone)]
pub struct Session {
    pub operator_id: String,
    pub authenticated: bool,
    pub page: Page,
    pub chat: ChatHistory,
    pub started_at: DateTime<Utc>,
    pub checklist: MissionChecklist,
    /// Last authenticated request, for idle expiry
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(operator_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            operator_id: operator_id.to_string(),
            authenticated: true,
            page: Page::default(),
            chat: ChatHistory::new(),
            started_at: now,
            checklist: MissionChecklist::default(),
            last_seen: now,
        }
    }

    /// Whole seconds since the session started, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }
}

/// Check the login form. Both fields must be non-empty; content is not inspected.
pub fn validate_credentials(operator_id: &str, pin: &str) -> Result<(), LoginError> {
    if operator_id.is_empty() || pin.is_empty() {
        return Err(LoginError::MissingCredentials);
    }
    Ok(())
}

/// Token-keyed session map shared by the API handlers.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(defaults::SESSION_IDLE_TTL_SECS))
    }
}

/// Drop every session not seen within `ttl` of `now`.
fn prune_idle(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>, ttl: Duration) {
    let before = sessions.len();
    sessions.retain(|_, s| now - s.last_seen <= ttl);
    let pruned = before - sessions.len();
    if pruned > 0 {
        tracing::info!(pruned, remaining = sessions.len(), "Expired idle sessions");
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sessions expire after `idle_ttl` without a request.
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Validate the form and open a new session. Returns its token.
    pub async fn login(&self, operator_id: &str, pin: &str) -> Result<String, LoginError> {
        self.login_at(operator_id, pin, Utc::now()).await
    }

    async fn login_at(
        &self,
        operator_id: &str,
        pin: &str,
        now: DateTime<Utc>,
    ) -> Result<String, LoginError> {
        validate_credentials(operator_id, pin)?;

        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut sessions = self.inner.write().await;
        prune_idle(&mut sessions, now, self.idle_ttl);
        sessions.insert(token.clone(), Session::new(operator_id, now));

        tracing::info!(operator = %operator_id, "Operator authenticated");
        Ok(token)
    }

    /// Drop a session. Returns whether it existed.
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.inner.write().await.remove(token);
        if let Some(session) = &removed {
            tracing::info!(operator = %session.operator_id, "Operator signed out");
        }
        removed.is_some()
    }

    /// Whether `token` names a live session. A hit refreshes its idle timer.
    pub async fn touch(&self, token: &str) -> bool {
        self.touch_at(token, Utc::now()).await
    }

    async fn touch_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut sessions = self.inner.write().await;
        prune_idle(&mut sessions, now, self.idle_ttl);
        match sessions.get_mut(token) {
            Some(session) => {
                session.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// Snapshot of a session.
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.inner.read().await.get(token).cloned()
    }

    /// Run `f` against a session under the write lock.
    ///
    /// Keep `f` synchronous: the lock must not be held across network calls.
    pub async fn with_session<R>(&self, token: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.inner.write().await;
        sessions.get_mut(token).map(f)
    }

    pub async fn active_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_must_be_non_empty() {
        assert!(validate_credentials("ADMIN-MAS-TRACK", "1234").is_ok());
        assert_eq!(
            validate_credentials("", "1234"),
            Err(LoginError::MissingCredentials)
        );
        assert_eq!(
            validate_credentials("ADMIN", ""),
            Err(LoginError::MissingCredentials)
        );
    }

    #[test]
    fn test_whitespace_credentials_are_non_empty() {
        assert!(validate_credentials("ADMIN", " ").is_ok());
        assert!(validate_credentials("  ", "1234").is_ok());
    }

    #[test]
    fn test_any_pin_is_accepted() {
        assert!(validate_credentials("op", "0000").is_ok());
        assert!(validate_credentials("op", "not-a-number").is_ok());
    }

    #[tokio::test]
    async fn test_login_creates_fresh_session() {
        let store = SessionStore::new();
        let token = store.login("ADMIN-MAS-TRACK", "1234").await.unwrap();

        let session = store.get(&token).await.unwrap();
        assert!(session.authenticated);
        assert_eq!(session.operator_id, "ADMIN-MAS-TRACK");
        assert_eq!(session.page, Page::Dashboard);
        assert!(session.chat.is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_unchanged() {
        let store = SessionStore::new();
        assert!(store.login("", "").await.is_err());
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_logout_removes_session() {
        let store = SessionStore::new();
        let token = store.login("op", "1").await.unwrap();
        assert!(store.logout(&token).await);
        assert!(!store.touch(&token).await);
        assert!(!store.logout(&token).await);
    }

    #[tokio::test]
    async fn test_with_session_mutates_in_place() {
        let store = SessionStore::new();
        let token = store.login("op", "1").await.unwrap();

        store
            .with_session(&token, |s| s.page = Page::Supervisor)
            .await
            .unwrap();
        assert_eq!(store.get(&token).await.unwrap().page, Page::Supervisor);
        assert!(store.with_session("bogus", |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_operator_id_kept_verbatim() {
        let store = SessionStore::new();
        let token = store.login(" op 7 ", " ").await.unwrap();
        assert_eq!(store.get(&token).await.unwrap().operator_id, " op 7 ");
    }

    #[tokio::test]
    async fn test_idle_sessions_expire_on_next_login() {
        let store = SessionStore::with_idle_ttl(Duration::seconds(60));
        let t0 = Utc::now();

        let stale = store.login_at("op", "1", t0).await.unwrap();
        let fresh = store
            .login_at("op", "1", t0 + Duration::seconds(61))
            .await
            .unwrap();

        assert_eq!(store.active_count().await, 1);
        assert!(store.get(&stale).await.is_none());
        assert!(store.get(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_touch_refreshes_idle_timer() {
        let store = SessionStore::with_idle_ttl(Duration::seconds(60));
        let t0 = Utc::now();
        let token = store.login_at("op", "1", t0).await.unwrap();

        assert!(store.touch_at(&token, t0 + Duration::seconds(50)).await);
        assert!(store.touch_at(&token, t0 + Duration::seconds(100)).await);
        assert!(!store.touch_at(&token, t0 + Duration::seconds(161)).await);
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_anonymous_login_flood_is_bounded_by_ttl() {
        let store = SessionStore::with_idle_ttl(Duration::seconds(60));
        let t0 = Utc::now();
        for i in 0..1_000 {
            store
                .login_at("anon", "0", t0 + Duration::seconds(i))
                .await
                .unwrap();
        }
        assert!(store.active_count().await <= 61);
    }

    #[test]
    fn test_elapsed_secs() {
        let start = Utc::now();
        let session = Session::new("op", start);
        assert_eq!(session.elapsed_secs(start + Duration::seconds(125)), 125);
        assert_eq!(session.elapsed_secs(start - Duration::seconds(5)), 0);
    }

    #[test]
    fn test_page_labels_roundtrip_through_serde() {
        for page in Page::ALL {
            let v = serde_json::to_value(page).unwrap();
            assert_eq!(v, page.label());
            let back: Page = serde_json::from_value(v).unwrap();
            assert_eq!(back, page);
        }
    }
}
