//! Authenticated HTTP client for the portal's REST resources
//!
//! Every request carries the session's current access token. A 401 answer
//! triggers one token refresh and one retry; if the refresh fails the session
//! is already logged out and the call reports [`AuthError::SessionExpired`].
//! Concurrent requests rejected with the same token share a single refresh.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::auth::models::UserPayload;
use crate::auth::{SessionManager, User};
use crate::config::BackendConfig;
use crate::error::{AuthError, Error, Result};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    backend: BackendConfig,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(backend: BackendConfig, session: SessionManager) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(backend.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            backend,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send once with the current access token, returning the token used
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(reqwest::Response, Option<String>)> {
        let token = self.session.access_token().await;
        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok((request.send().await?, token))
    }

    /// Send a request, refreshing the access token once on 401
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.backend.url(path);
        let (response, sent) = self.send_once(&method, &url, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("{} {} returned 401, refreshing token", method, path);
        match self.session.refresh_rejected(sent.as_deref()).await {
            Ok(_) => Ok(self.send_once(&method, &url, body).await?.0),
            Err(AuthError::Superseded) => Err(AuthError::Superseded.into()),
            Err(_) => Err(AuthError::SessionExpired.into()),
        }
    }

    /// Current user's profile as the backend reports it
    pub async fn profile(&self) -> Result<User> {
        let payload: UserPayload = self.get(&self.backend.user_path).await?;
        Ok(User::try_from(payload)?)
    }

    /// Send and decode a JSON answer, mapping non-2xx to [`Error::Api`]
    pub async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let response = ensure_success(self.send(method, path, body).await?).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.json(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.json(Method::POST, path, Some(&body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.json(Method::PUT, path, Some(&body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        ensure_success(self.send(Method::DELETE, path, None).await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}
