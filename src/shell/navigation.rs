//! Path resolution

use serde::Serialize;

use super::{Screen, Shell};
use crate::auth::{check, GuardDecision, Role, User, LOGIN_PATH, UNAUTHORIZED_PATH};

/// Longest redirect chain [`follow`] will walk
const MAX_REDIRECTS: usize = 4;

/// What a path renders for the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    LoginPage,
    UnauthorizedPage,
    Screen {
        role: Role,
        path: String,
        screen: Screen,
    },
    Redirect {
        to: String,
    },
}

impl Navigation {
    fn redirect(to: &str) -> Self {
        Navigation::Redirect { to: to.to_string() }
    }
}

/// Resolve one navigation step for `path`
pub fn navigate(path: &str, user: Option<&User>) -> Navigation {
    let path = normalize(path);

    match path.as_str() {
        LOGIN_PATH => return Navigation::LoginPage,
        UNAUTHORIZED_PATH => return Navigation::UnauthorizedPage,
        _ => {}
    }

    let Some((shell, rest)) = Shell::for_path(&path) else {
        return Navigation::redirect(LOGIN_PATH);
    };

    // Unmatched paths fall through to the catch-all before any role check
    let Some(screen) = shell.resolve(rest) else {
        return Navigation::redirect(LOGIN_PATH);
    };

    match check(user, Some(shell.role())) {
        GuardDecision::Allow => Navigation::Screen {
            role: shell.role(),
            path: shell.path_of(screen),
            screen: *screen,
        },
        denied => Navigation::redirect(denied.redirect_path().unwrap_or(LOGIN_PATH)),
    }
}

/// Follow redirects until something renders
pub fn follow(path: &str, user: Option<&User>) -> Navigation {
    let mut current = navigate(path, user);
    for _ in 0..MAX_REDIRECTS {
        match current {
            Navigation::Redirect { to } => current = navigate(&to, user),
            rendered => return rendered,
        }
    }
    current
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
