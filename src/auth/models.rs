//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Roles of the college portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator - manages classes, subjects, teachers, notices
    Admin,
    /// Teacher - attendance, marks, assignments for their classes
    Teacher,
    /// Student - read access to their own records
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Create a new user
    pub fn new(username: impl Into<String>, role: Role, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role,
            name: name.into(),
            email: None,
        }
    }

    /// Attach the portal's default mailbox address
    pub fn with_default_email(mut self) -> Self {
        self.email = Some(format!("{}@smartcollege.edu", self.username));
        self
    }

    /// Username, role and display name all populated
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// A logged-in session: identity plus whatever tokens the backend issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(user: User, access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            user,
            access_token: non_empty(access_token),
            refresh_token: non_empty(refresh_token),
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User object as sent by the backend.
///
/// Accepts both `name` and the `first_name`/`last_name` pair.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.to_string(),
            name: Some(user.name.clone()),
            first_name: None,
            last_name: None,
            email: user.email.clone(),
        }
    }
}

impl TryFrom<UserPayload> for User {
    type Error = AuthError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let role = payload
            .role
            .parse::<Role>()
            .map_err(AuthError::InvalidResponse)?;

        let name = match payload.name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                let joined = [payload.first_name, payload.last_name]
                    .into_iter()
                    .flatten()
                    .filter(|part| !part.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if joined.is_empty() {
                    payload.username.clone()
                } else {
                    joined
                }
            }
        };

        let user = User {
            username: payload.username,
            role,
            name,
            email: payload.email,
        };

        if !user.is_complete() {
            return Err(AuthError::InvalidResponse(
                "user is missing username or name".to_string(),
            ));
        }
        Ok(user)
    }
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserPayload,
    /// Django answers `token`, the SPA contract says `access`
    #[serde(alias = "token")]
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Error body returned by the authentication endpoints
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            detail: None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.detail.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}
