//! Authentication handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use scribe_core::domain::User;
use scribe_core::ports::BaseRepository;
use scribe_core::validation::field_errors;
use scribe_shared::Envelope;
use scribe_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .issue_token(user.id, &user.email)?;

    Ok(AuthResponse::bearer(
        token,
        state.tokens.token_ttl_seconds().max(0) as u64,
    ))
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()
        .map_err(|errors| AppError::Validation(field_errors(&errors)))?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state.users.save(User::new(&req.email, password_hash)).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(Envelope::success(issue_token(&state, &user)?)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(HttpResponse::Ok().json(Envelope::success(issue_token(&state, &user)?)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A token can outlive its user.
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(Envelope::success(UserResponse {
        id: user.id,
        email: user.email,
    })))
}
