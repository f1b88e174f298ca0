//! Route guard

use serde::Serialize;

use crate::auth::models::{Role, User};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Outcome of checking a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToUnauthorized,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Where to navigate instead, if anywhere
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }
}

/// Decide whether `user` may see a view that optionally requires `required`
pub fn check(user: Option<&User>, required: Option<Role>) -> GuardDecision {
    match (user, required) {
        (None, _) => GuardDecision::RedirectToLogin,
        (Some(user), Some(role)) if user.role != role => GuardDecision::RedirectToUnauthorized,
        _ => GuardDecision::Allow,
    }
}
