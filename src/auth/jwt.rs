//! JWT token handling for the local authentication backend

use crate::auth::models::{Role, User};
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    pub role: Role,
    /// Display name
    pub name: String,
    pub token_type: TokenType,
    /// Unique token id
    pub jti: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims from user
    pub fn for_user(user: &User, token_type: TokenType, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
            token_type,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Rebuild the user this token was issued to
    pub fn user(&self) -> User {
        User::new(self.sub.clone(), self.role, self.name.clone()).with_default_email()
    }
}

/// Signs and verifies HS256 tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn create_access_token(&self, user: &User) -> Result<String> {
        self.sign(&Claims::for_user(user, TokenType::Access, self.access_ttl_secs))
    }

    pub fn create_refresh_token(&self, user: &User) -> Result<String> {
        self.sign(&Claims::for_user(user, TokenType::Refresh, self.refresh_ttl_secs))
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(Error::from)
    }

    /// Validate and decode a token, requiring the given token type
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)?;

        if claims.token_type != expected {
            return Err(Error::Unauthorized(format!(
                "Token has wrong type: expected {:?}, got {:?}",
                expected, claims.token_type
            )));
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 300, 3600)
    }

    #[test]
    fn test_create_and_validate_access_token() {
        let user = User::new("teacher", Role::Teacher, "Teacher User");
        let token = issuer().create_access_token(&user).expect("Failed to create token");
        let claims = issuer()
            .validate(&token, TokenType::Access)
            .expect("Failed to validate token");

        assert_eq!(claims.sub, "teacher");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.user().name, "Teacher User");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let user = User::new("admin", Role::Admin, "Admin User");
        let refresh = issuer().create_refresh_token(&user).unwrap();
        assert!(matches!(
            issuer().validate(&refresh, TokenType::Access),
            Err(Error::Unauthorized(_))
        ));
        assert!(issuer().validate(&refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = User::new("student", Role::Student, "Student User");
        let short = TokenIssuer::new("test-secret", -10, -10);
        let token = short.create_access_token(&user).unwrap();
        assert!(issuer().validate(&token, TokenType::Access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = User::new("admin", Role::Admin, "Admin User");
        let token = TokenIssuer::new("other", 300, 300)
            .create_access_token(&user)
            .unwrap();
        assert!(issuer().validate(&token, TokenType::Access).is_err());
    }

    #[test]
    fn test_invalid_token() {
        assert!(issuer().validate("invalid.token.here", TokenType::Access).is_err());
    }
}
