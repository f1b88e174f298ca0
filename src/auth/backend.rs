//! Authentication collaborators
//!
//! The session manager only needs two exchanges: credentials for an identity
//! plus tokens, and a refresh token for a new access token. [`HttpAuthBackend`]
//! performs them against the REST backend; [`LocalAuthBackend`] answers them
//! from the built-in demo accounts.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

use crate::auth::jwt::{TokenIssuer, TokenType};
use crate::auth::models::{
    ErrorBody, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, Role, User,
    UserPayload,
};
use crate::config::{BackendConfig, ServerConfig};
use crate::error::{AuthError, Result};

/// Identity and tokens returned by a successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

impl TryFrom<LoginResponse> for LoginGrant {
    type Error = AuthError;

    fn try_from(response: LoginResponse) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(response.user)?,
            access: response.access,
            refresh: response.refresh,
        })
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for identity and tokens
    async fn login(&self, username: &str, password: &str)
        -> std::result::Result<LoginGrant, AuthError>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<String, AuthError>;
}

/// REST authentication backend
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    login_url: String,
    refresh_url: String,
}

impl HttpAuthBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            login_url: config.url(&config.login_path),
            refresh_url: config.url(&config.refresh_path),
        })
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<LoginGrant, AuthError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(&self.login_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Login rejected with status {}", status);
            if !is_credential_rejection(status) {
                return Err(unavailable(status));
            }
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let message = body.message().unwrap_or("Invalid credentials").to_string();
            return Err(AuthError::InvalidCredentials(message));
        }

        let body = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        LoginGrant::try_from(body)
    }

    async fn refresh(&self, refresh_token: &str) -> std::result::Result<String, AuthError> {
        let response = self
            .client
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Token refresh rejected with status {}", status);
            if status.is_server_error() {
                return Err(unavailable(status));
            }
            return Err(AuthError::SessionExpired);
        }

        let body = response
            .json::<RefreshResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(body.access)
    }
}

/// Statuses the login endpoint uses to refuse credentials
fn is_credential_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

fn unavailable(status: StatusCode) -> AuthError {
    if status.is_server_error() {
        AuthError::Network(format!("authentication service returned {}", status))
    } else {
        AuthError::InvalidResponse(format!("unexpected status {}", status))
    }
}

struct Account {
    user: User,
    password_hash: String,
}

/// Demo accounts with bcrypt-hashed passwords, issuing signed JWTs
pub struct LocalAuthBackend {
    accounts: HashMap<String, Account>,
    issuer: TokenIssuer,
}

/// Minimum bcrypt cost
const DEMO_HASH_COST: u32 = 4;

impl LocalAuthBackend {
    /// Empty directory
    pub fn new(issuer: TokenIssuer) -> Self {
        Self {
            accounts: HashMap::new(),
            issuer,
        }
    }

    /// The three portal demo accounts: admin/admin, teacher/teacher, student/student
    pub fn with_demo_accounts(issuer: TokenIssuer) -> Result<Self> {
        let mut backend = Self::new(issuer);
        backend.add_account(User::new("admin", Role::Admin, "Admin User"), "admin")?;
        backend.add_account(User::new("teacher", Role::Teacher, "Teacher User"), "teacher")?;
        backend.add_account(User::new("student", Role::Student, "Student User"), "student")?;
        Ok(backend)
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::with_demo_accounts(TokenIssuer::new(
            &config.token_secret,
            config.access_ttl_secs,
            config.refresh_ttl_secs,
        ))
    }

    pub fn add_account(&mut self, user: User, password: &str) -> Result<()> {
        let password_hash = bcrypt::hash(password, DEMO_HASH_COST)?;
        let user = user.with_default_email();
        self.accounts.insert(
            user.username.clone(),
            Account {
                user,
                password_hash,
            },
        );
        Ok(())
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Verify credentials and mint a token pair
    pub fn authenticate(&self, username: &str, password: &str) -> std::result::Result<LoginResponse, AuthError> {
        let account = self
            .accounts
            .get(username)
            .filter(|account| bcrypt::verify(password, &account.password_hash).unwrap_or(false))
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid username or password".to_string()))?;

        let access = self
            .issuer
            .create_access_token(&account.user)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let refresh = self
            .issuer
            .create_refresh_token(&account.user)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(LoginResponse {
            user: UserPayload::from(&account.user),
            access,
            refresh,
        })
    }

    /// Mint a new access token from a valid refresh token
    pub fn reissue(&self, refresh_token: &str) -> std::result::Result<String, AuthError> {
        let claims = self
            .issuer
            .validate(refresh_token, TokenType::Refresh)
            .map_err(|_| AuthError::SessionExpired)?;

        // Subject must still be a known account
        let account = self
            .accounts
            .get(&claims.sub)
            .ok_or(AuthError::SessionExpired)?;

        self.issuer
            .create_access_token(&account.user)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for LocalAuthBackend {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<LoginGrant, AuthError> {
        LoginGrant::try_from(self.authenticate(username, password)?)
    }

    async fn refresh(&self, refresh_token: &str) -> std::result::Result<String, AuthError> {
        self.reissue(refresh_token)
    }
}
