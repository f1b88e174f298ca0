//! Smart College - session core of the college portal
//!
//! This is the library interface for Smart College: the session manager and
//! its credential store, the route guard, the role-scoped shells, and an
//! authenticated client for the portal's REST backend.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod shell;

pub use auth::{Role, SessionManager, User};
pub use config::Config;
pub use error::{AuthError, Error};
