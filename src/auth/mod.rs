use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod password;

/// Role id reserved for administrators
pub const PRIVILEGED_ROLE_ID: i64 = 1;

/// Role id handed out to self-registered users
pub const REGULAR_ROLE_ID: i64 = 2;

/// Identity embedded in a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub role: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(identity: Identity, issued_at: i64, lifetime: Duration) -> Self {
        Self {
            id: identity.user_id,
            role: identity.role_id,
            exp: issued_at + lifetime.num_seconds(),
            iat: issued_at,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role_id: self.role,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, wrongly signed or expired token
    #[error("invalid token")]
    Invalid,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// Issues and verifies HS256 identity tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::hours(expiry_hours as i64),
        }
    }

    pub fn issue(&self, identity: Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    pub fn issue_at(&self, identity: Identity, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims::new(identity, issued_at, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Signature is checked by jsonwebtoken; expiry is checked here against `now`
    /// so a token is valid up to and including its `exp` second.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            TokenError::Invalid
        })?;

        if now > data.claims.exp {
            tracing::debug!("Token for user {} expired at {}", data.claims.id, data.claims.exp);
            return Err(TokenError::Invalid);
        }

        Ok(data.claims.identity())
    }
}
