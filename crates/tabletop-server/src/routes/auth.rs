use std::sync::OnceLock;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tabletop_shared::constants::ACCESS_TOKEN_COOKIE;
use tabletop_shared::password::{hash_password, verify_password};
use tabletop_store::User;

use crate::api::AppState;
use crate::auth::{AuthFailure, CurrentUser};
use crate::error::ServerError;
use crate::extract::AppForm;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

async fn register(
    State(state): State<AppState>,
    AppForm(form): AppForm<RegisterForm>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    if !state.config.registration_open {
        return Err(ServerError::Forbidden("Registration is closed".into()));
    }
    if form.password.is_empty() {
        return Err(ServerError::BadRequest("password is required".into()));
    }

    let user = state
        .with_db(move |db| -> Result<User, ServerError> {
            if db.find_user_by_email(&form.email)?.is_some() {
                return Err(ServerError::BadRequest("Email already registered".into()));
            }
            let hash = hash_password(&form.password)?;
            Ok(db.create_user(&form.nickname, &form.email, &hash)?)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// OAuth2-style password form: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Hash checked against when the email is unknown.
fn dummy_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_password("tabletop-unknown-account").ok())
        .as_deref()
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<LoginForm>,
) -> Result<(CookieJar, Json<TokenResponse>), ServerError> {
    let email = form.username.clone();
    let user = state
        .with_db(move |db| -> Result<Option<User>, ServerError> {
            let Some(user) = db.find_user_by_email(&form.username)? else {
                // Same argon2 cost as a real mismatch.
                if let Some(hash) = dummy_hash() {
                    let _ = verify_password(&form.password, hash);
                }
                return Ok(None);
            };
            let valid = verify_password(&form.password, &user.password_hash)?;
            Ok(valid.then_some(user))
        })
        .await?;

    let Some(user) = user else {
        tracing::warn!(email = %email, "rejected login");
        return Err(AuthFailure::BadCredentials.into());
    };

    let token = state
        .jwt
        .issue(&user.id.to_string(), Some(state.config.access_token_lifetime()))?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax);

    tracing::info!(user_id = user.id, "login");

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer",
        }),
    ))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_is_stable_and_rejects_guesses() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(dummy_hash(), Some(hash));
        assert!(!verify_password("pw123", hash).unwrap());
    }
}
