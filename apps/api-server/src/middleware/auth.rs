//! Bearer-token authentication extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;

use scribe_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated principal.
///
/// Taking `Identity` as a handler argument makes the route require a valid
/// `Authorization: Bearer <token>` header; anything else is a 401.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState not found in app data".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Rejected("Authorization header is not ASCII".to_string()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Rejected("Expected a Bearer token".to_string()))?;

    Ok(state.tokens.decode_token(token.trim())?.into())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).inspect_err(|e| {
            tracing::debug!(error = %e, path = %req.path(), "Rejected unauthenticated request");
        }))
    }
}
