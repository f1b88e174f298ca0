//! Authentication and session management

pub mod backend;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod session;
pub mod store;

pub use backend::{AuthBackend, HttpAuthBackend, LocalAuthBackend, LoginGrant};
pub use guard::{check, GuardDecision, LOGIN_PATH, UNAUTHORIZED_PATH};
pub use jwt::{Claims, TokenIssuer, TokenType};
pub use models::{Role, Session, User};
pub use session::{SessionManager, SessionState};
pub use store::{CredentialStore, FileStore, MemoryStore};

use std::sync::Arc;

use crate::config::{BackendMode, Config};
use crate::error::Result;

/// Build the backend selected by the configuration
pub fn backend_from_config(config: &Config) -> Result<Arc<dyn AuthBackend>> {
    let backend: Arc<dyn AuthBackend> = match config.backend.mode {
        BackendMode::Http => Arc::new(HttpAuthBackend::new(&config.backend)?),
        BackendMode::Local => Arc::new(LocalAuthBackend::from_config(&config.server)?),
    };
    Ok(backend)
}

/// Session manager wired to the configured backend and a file-backed store
pub fn session_from_config(config: &Config) -> Result<SessionManager> {
    let backend = backend_from_config(config)?;
    let store = Arc::new(FileStore::new(config.store.path.clone()));
    Ok(SessionManager::new(backend, store))
}
