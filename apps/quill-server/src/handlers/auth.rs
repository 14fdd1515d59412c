//! Authentication handlers.

use actix_web::{HttpResponse, HttpResponseBuilder, web};
use chrono::Utc;
use validator::Validate;

use quill_core::domain::User;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::{Identity, auth_cookie, clear_auth_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;
use crate::state::AppState;

fn issue_token(state: &AppState, user: &User) -> AppResult<(String, i64)> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())?;
    Ok((token, state.tokens.expiration_seconds()))
}

/// Issue a token, set the auth cookie and return the token body.
fn signed_in(
    state: &AppState,
    user: User,
    mut response: HttpResponseBuilder,
) -> AppResult<HttpResponse> {
    let (token, expires_in) = issue_token(state, &user)?;

    Ok(response
        .cookie(auth_cookie(token.clone(), expires_in, state.cookie_secure))
        .json(AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in.max(0) as u64,
            user: user.into(),
        }))
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if session.users().username_exists(&req.username).await? {
        return Err(AppError::Conflict("Username is already taken".to_string()));
    }
    if session.users().email_exists(&req.email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.username, req.email, password_hash);

    session.users().add(user.clone()).await;
    session.commit().await?;

    tracing::info!(user_id = %user.id, "User registered");
    signed_in(&state, user, HttpResponse::Created())
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let mut user = session
        .users()
        .get_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Rejected login attempt");
        return Err(AppError::Unauthorized);
    }
    if !user.is_active {
        return Err(AppError::Forbidden("Account is disabled".to_string()));
    }

    user.last_login = Some(Utc::now());
    session.users().update(user.clone()).await;
    session.commit().await?;

    tracing::info!(user_id = %user.id, "User logged in");
    signed_in(&state, user, HttpResponse::Ok())
}

/// POST /api/auth/logout
pub async fn logout() -> HttpResponse {
    HttpResponse::NoContent().cookie(clear_auth_cookie()).finish()
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity, session: Session) -> AppResult<HttpResponse> {
    let user = session
        .users()
        .get_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", identity.user_id))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
