//! Access-token validation: a narrow bearer-token hookup.
//!
//! Credential issuance and password verification live outside this
//! service. This module only answers "is this bearer token valid, and
//! which user does it belong to" for the one route that needs an
//! identity.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer token")]
    MissingToken,

    #[error("invalid bearer token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// The identity carried by a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Validates a bearer token string, returning the identity it carries.
/// Implementations own their own notion of "valid" — signature, secret,
/// expiry — the API layer only calls through this trait.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<AuthenticatedUser>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Validates a JWT signed with a single static HS256 secret. Issuance of
/// these tokens is someone else's problem; this only checks signature and
/// expiry and reads the subject claim as the participant's identifier.
pub struct SharedSecretValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SharedSecretValidator {
    pub fn new(shared_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(shared_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl TokenValidator for SharedSecretValidator {
    fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AuthenticatedUser {
            user_id: data.claims.sub,
        })
    }
}
