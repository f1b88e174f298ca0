//! API route handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::server::SharedState;
use crate::auth::middleware::claims_from_headers;
use crate::auth::models::{ErrorBody, LoginRequest, RefreshRequest, RefreshResponse, UserPayload};
use crate::error::AuthError;

/// Handler failure rendered as `{"error": "..."}`
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::InvalidCredentials(_) | AuthError::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match err {
            AuthError::SessionExpired => "Token is invalid or expired".to_string(),
            other => other.user_message(),
        };
        ApiError::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// Authentication routes

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    let response = state.backend.authenticate(&req.username, &req.password)?;
    tracing::info!("Issued tokens for {}", req.username);
    Ok(Json(response))
}

pub async fn refresh(
    State(state): State<SharedState>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access = state.backend.reissue(&req.refresh)?;
    Ok(Json(RefreshResponse { access }))
}

pub async fn current_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = claims_from_headers(&headers, state.backend.issuer()).map_err(|e| {
        tracing::debug!("Rejected profile request: {}", e);
        ApiError::new(StatusCode::UNAUTHORIZED, "Authentication credentials were not provided or are invalid")
    })?;
    Ok(Json(UserPayload::from(&claims.user())))
}
