//! Authentication ports: bearer tokens and password hashes.

use uuid::Uuid;

/// Principal recovered from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Unix seconds.
    pub expires_at: i64,
}

pub trait TokenService: Send + Sync {
    fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry, then return the principal.
    fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn token_ttl_seconds(&self) -> i64;
}

pub trait PasswordService: Send + Sync {
    /// Salted hash in PHC string format.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` for a wrong password; `Err` only when `hash` is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No bearer token supplied")]
    Missing,

    #[error("Token has expired")]
    Expired,

    #[error("Token rejected: {0}")]
    Rejected(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
