//! HS256 access tokens.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_core::ports::{AuthError, TokenClaims, TokenService};

const DEV_SECRET: &str = "scribe-dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    /// Written to `iss` and required on decode.
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "scribe-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.secret == DEV_SECRET {
            let production = std::env::var("RUST_ENV")
                .is_ok_and(|env| matches!(env.as_str(), "production" | "prod"));
            if production {
                tracing::error!("JWT_SECRET is unset in production; tokens are forgeable");
            } else {
                tracing::warn!("JWT_SECRET is unset; using the development secret");
            }
        }

        config
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
    iss: String,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Rejected(e.to_string()))
    }

    fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Rejected(e.to_string()),
            },
        )?;

        Ok(TokenClaims {
            user_id: data.claims.sub,
            email: data.claims.email,
            expires_at: data.claims.exp,
        })
    }

    fn token_ttl_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str, expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_issued_token_decodes_to_principal() {
        let service = service("scribe-test", 1);
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id, "writer@example.com").unwrap();
        let claims = service.decode_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "writer@example.com");
        assert!(claims.expires_at > Utc::now().timestamp());
        assert_eq!(service.token_ttl_seconds(), 3600);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = service("scribe-test", 1).decode_token("not-a-jwt");
        assert!(matches!(result, Err(AuthError::Rejected(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service("scribe-test", -2);
        let token = service.issue_token(Uuid::new_v4(), "late@example.com").unwrap();

        assert!(matches!(service.decode_token(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let token = service("issuer-a", 1)
            .issue_token(Uuid::new_v4(), "a@example.com")
            .unwrap();

        assert!(service("issuer-b", 1).decode_token(&token).is_err());
    }
}
