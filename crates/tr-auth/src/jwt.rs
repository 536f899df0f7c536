//! Bearer tokens
//!
//! A token names the user and nothing else. Roles come from group
//! membership and are looked up on every request, so a token never
//! outlives a revoked role.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tr_core::config::AuthConfig;
use tr_core::traits::Id;

const DEFAULT_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Claims {
    fn issue(user_id: Id, username: Option<String>, lifetime: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            sub: user_id.to_string(),
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
            username,
        }
    }

    pub fn user_id(&self) -> Result<Id, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Invalid(format!("subject '{}' is not a user id", self.sub)))
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(err.to_string()),
        }
    }
}

/// Signs and verifies HS256 tokens with a shared secret
pub struct JwtService {
    signing: EncodingKey,
    verifying: DecodingKey,
    lifetime: Duration,
}

impl JwtService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            signing: EncodingKey::from_secret(secret),
            verifying: DecodingKey::from_secret(secret),
            lifetime: Duration::seconds(DEFAULT_LIFETIME_SECONDS),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes()).with_expiration(config.token_expiration_seconds)
    }

    pub fn with_expiration(self, seconds: u64) -> Self {
        let seconds = i64::try_from(seconds).unwrap_or(DEFAULT_LIFETIME_SECONDS);
        Self {
            lifetime: Duration::seconds(seconds),
            ..self
        }
    }

    pub fn create_token(&self, user_id: Id, username: Option<String>) -> Result<String, JwtError> {
        let claims = Claims::issue(user_id, username, self.lifetime);
        jsonwebtoken::encode(&Header::default(), &claims, &self.signing)
            .map_err(|err| JwtError::EncodingFailed(err.to_string()))
    }

    /// Verifies signature and expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.verifying, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn get_user_id(&self, token: &str) -> Result<Id, JwtError> {
        self.validate_token(token)?.user_id()
    }
}

/// The token part of an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
