//! Bearer token extraction for the demo authentication server

use axum::http::HeaderMap;

use crate::auth::jwt::{Claims, TokenIssuer, TokenType};
use crate::error::{Error, Result};

/// Pull the token out of an `Authorization: Bearer ...` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate the request's access token
pub fn claims_from_headers(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<Claims> {
    let token = bearer_token(headers)
        .ok_or_else(|| Error::Unauthorized("No valid authentication token found".to_string()))?;
    issuer.validate(token, TokenType::Access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Role, User};
    use axum::http::HeaderValue;

    #[test]
    fn test_no_token() {
        let headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        assert!(matches!(
            claims_from_headers(&headers, &TokenIssuer::new("k", 60, 60)),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_bearer_scheme_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic YWRtaW46YWRtaW4="));
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_valid_access_token() {
        let issuer = TokenIssuer::new("k", 60, 60);
        let token = issuer
            .create_access_token(&User::new("admin", Role::Admin, "Admin User"))
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        let claims = claims_from_headers(&headers, &issuer).unwrap();
        assert_eq!(claims.sub, "admin");
    }
}
