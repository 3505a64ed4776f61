//! Auth gateway: registration, login and bearer-token resolution.
//!
//! Every task and analytics operation receives its acting user from
//! [`authenticate`]; nothing downstream accepts a user id from the caller.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::User,
};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    // verified against when the email is unknown so both login failures cost the same
    static ref DUMMY_HASH: Option<String> = hash_password("dummy-password-for-timing").ok();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[instrument(skip(users, keys, payload))]
pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    payload: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let email = payload.email.trim();

    if !is_valid_email(email) {
        return Err(AppError::validation("email", "Invalid email"));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;
    // the store's unique constraint still catches a concurrent registration
    let user = users.create(email, &hash).await?;
    let token = keys.issue(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse::bearer(token, user.into()))
}

#[instrument(skip(users, keys, payload))]
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    payload: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = payload.email.trim();

    let Some(user) = users.find_by_email(email).await? else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(&payload.password, dummy);
        }
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse::bearer(token, user.into()))
}

/// Resolve a bearer token to the user it was issued for.
pub async fn authenticate(
    users: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<User, AppError> {
    let claims = keys.verify(token).map_err(|e| {
        debug!(error = %e, "token rejected");
        AppError::Unauthenticated
    })?;

    users.find_by_id(claims.sub).await?.ok_or_else(|| {
        warn!(user_id = %claims.sub, "token subject no longer exists");
        AppError::UserNotFound
    })
}
