//! Session management
//!
//! [`SessionManager`] is the single source of truth for who is logged in.
//! It is cheap to clone; clones share the same state, backend and store.
//!
//! Every mutating call (restore, login, logout, refresh) takes a ticket from a
//! monotonically increasing sequence before it suspends. A result is applied
//! only when its ticket is still the newest one issued, so a login that
//! completes after a logout cannot bring the old session back.
//!
//! Refreshes are additionally serialized: concurrent callers that saw the
//! same rejected access token share one exchange with the backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::auth::backend::AuthBackend;
use crate::auth::guard::{self, GuardDecision};
use crate::auth::models::{Role, Session, User};
use crate::auth::store::{CredentialStore, ACCESS_KEY, REFRESH_KEY, USER_KEY};
use crate::error::AuthError;

/// Lifecycle state of the session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Before `restore` has run
    Unknown,
    LoggedOut,
    LoggedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::LoggedIn(session) => Some(session),
            _ => None,
        }
    }
}

pub struct SessionManager {
    state: Arc<RwLock<SessionState>>,
    sequence: Arc<AtomicU64>,
    refreshing: Arc<Mutex<()>>,
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn CredentialStore>,
}

impl SessionManager {
    /// Create a session manager in the `Unknown` state
    pub fn new(backend: Arc<dyn AuthBackend>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Unknown)),
            sequence: Arc::new(AtomicU64::new(0)),
            refreshing: Arc::new(Mutex::new(())),
            backend,
            store,
        }
    }

    /// Issue a ticket for a session-mutating call
    fn next_ticket(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket
    }

    /// Adopt the persisted session, if there is a valid one.
    ///
    /// Storage or parse failures are treated as "no session". A login or
    /// logout issued while this runs takes precedence.
    pub async fn restore(&self) -> SessionState {
        let ticket = self.next_ticket();
        let restored = self.read_persisted();
        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale restore");
            return state.clone();
        }

        *state = match restored {
            Some(session) => {
                tracing::debug!(
                    "Restored session for {} ({})",
                    session.user.username,
                    session.user.role
                );
                SessionState::LoggedIn(session)
            }
            None => {
                tracing::debug!("No persisted session to restore");
                SessionState::LoggedOut
            }
        };
        state.clone()
    }

    fn read_persisted(&self) -> Option<Session> {
        let raw_user = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read credential store: {}", e);
                return None;
            }
        };

        let user = match serde_json::from_str::<User>(&raw_user) {
            Ok(user) if user.is_complete() => user,
            Ok(_) => {
                tracing::debug!("Persisted user is incomplete, ignoring");
                return None;
            }
            Err(e) => {
                tracing::debug!("Persisted user is malformed, ignoring: {}", e);
                return None;
            }
        };

        let access = self.store.get(ACCESS_KEY).ok().flatten();
        let refresh = self.store.get(REFRESH_KEY).ok().flatten();
        Some(Session::new(user, access, refresh))
    }

    fn persist(&self, session: &Session) {
        let result = serde_json::to_string(&session.user)
            .map_err(crate::error::Error::from)
            .and_then(|user| self.store.set(USER_KEY, &user))
            .and_then(|_| write_optional(self.store.as_ref(), ACCESS_KEY, &session.access_token))
            .and_then(|_| write_optional(self.store.as_ref(), REFRESH_KEY, &session.refresh_token));

        if let Err(e) = result {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    /// Log in with a username and password.
    ///
    /// On failure the previous state is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let ticket = self.next_ticket();
        let outcome = self.backend.login(username, password).await;

        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale login response for {}", username);
            return Err(AuthError::Superseded);
        }

        match outcome {
            Ok(grant) => {
                let session = Session::new(grant.user, Some(grant.access), Some(grant.refresh));
                self.persist(&session);
                let user = session.user.clone();
                *state = SessionState::LoggedIn(session);
                tracing::info!("Logged in as {} ({})", user.username, user.role);
                Ok(user)
            }
            Err(e) => {
                tracing::info!("Login failed for {}: {}", username, e);
                Err(e)
            }
        }
    }

    /// Forget the session in memory and in the credential store. Idempotent.
    pub async fn logout(&self) {
        self.next_ticket();
        let mut state = self.state.write().await;
        self.clear_locked(&mut state);
    }

    fn clear_locked(&self, state: &mut SessionState) {
        if let SessionState::LoggedIn(session) = &*state {
            tracing::info!("Logged out {}", session.user.username);
        }
        *state = SessionState::LoggedOut;
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear credential store: {}", e);
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure of a logged-in session ends it; callers must check the
    /// result. Without a session there is nothing to refresh and the state
    /// and store are left alone.
    pub async fn refresh_token(&self) -> Result<String, AuthError> {
        let _refreshing = self.refreshing.lock().await;
        self.refresh_serialized().await
    }

    /// Refresh after the backend rejected `rejected`.
    ///
    /// When another caller already replaced that token, its replacement is
    /// returned without a second exchange.
    pub async fn refresh_rejected(&self, rejected: Option<&str>) -> Result<String, AuthError> {
        let _refreshing = self.refreshing.lock().await;
        if let Some(current) = self.access_token().await {
            if Some(current.as_str()) != rejected {
                tracing::debug!("Access token already refreshed");
                return Ok(current);
            }
        }
        self.refresh_serialized().await
    }

    async fn refresh_serialized(&self) -> Result<String, AuthError> {
        let (ticket, refresh) = {
            let mut state = self.state.write().await;
            let Some(session) = state.session() else {
                return Err(AuthError::NoRefreshToken);
            };
            let refresh = session.refresh_token.clone();
            let ticket = self.next_ticket();
            match refresh {
                Some(refresh) => (ticket, refresh),
                None => {
                    self.clear_locked(&mut state);
                    return Err(AuthError::NoRefreshToken);
                }
            }
        };

        let outcome = self.backend.refresh(&refresh).await;

        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale refresh response");
            return Err(AuthError::Superseded);
        }

        match outcome {
            Ok(access) => match &mut *state {
                SessionState::LoggedIn(session) => {
                    session.access_token = Some(access.clone());
                    if let Err(e) = self.store.set(ACCESS_KEY, &access) {
                        tracing::warn!("Failed to persist access token: {}", e);
                    }
                    tracing::info!("Refreshed access token for {}", session.user.username);
                    Ok(access)
                }
                _ => Err(AuthError::SessionExpired),
            },
            Err(e) => {
                tracing::info!("Token refresh failed, logging out: {}", e);
                self.clear_locked(&mut state);
                Err(e)
            }
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.session().map(|s| s.user.clone())
    }

    pub async fn role(&self) -> Option<Role> {
        self.state.read().await.session().map(Session::role)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session().is_some()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .session()
            .and_then(|s| s.access_token.clone())
    }

    /// Route guard evaluated against the current session
    pub async fn guard(&self, required: Option<Role>) -> GuardDecision {
        let state = self.state.read().await;
        guard::check(state.session().map(|s| &s.user), required)
    }
}

fn write_optional(
    store: &dyn CredentialStore,
    key: &str,
    value: &Option<String>,
) -> crate::error::Result<()> {
    match value {
        Some(value) => store.set(key, value),
        None => store.remove(key),
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sequence: Arc::clone(&self.sequence),
            refreshing: Arc::clone(&self.refreshing),
            backend: Arc::clone(&self.backend),
            store: Arc::clone(&self.store),
        }
    }
}
