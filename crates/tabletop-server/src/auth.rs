//! Current-user resolution.
//!
//! A request authenticates with an access token taken from the
//! `Authorization: Bearer` header or, failing that, the `access_token`
//! cookie. The token's subject is the user id.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use tabletop_shared::constants::ACCESS_TOKEN_COOKIE;
use tabletop_shared::error::TokenError;
use tabletop_store::{StoreError, User};
use thiserror::Error;

use crate::api::AppState;
use crate::error::ServerError;

/// Why a request could not be tied to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Not authenticated")]
    MissingToken,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("User no longer exists")]
    UnknownUser,

    #[error("Incorrect username or password")]
    BadCredentials,
}

/// The authenticated user. Use as a handler argument to require login.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Pick the token to check. The header wins over the cookie.
pub fn select_token<'a>(bearer: Option<&'a str>, cookie: Option<&'a str>) -> Option<&'a str> {
    bearer
        .or(cookie)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value());

        let token = select_token(bearer_token(parts), cookie).ok_or(AuthFailure::MissingToken)?;

        let claims = state.jwt.verify(token).map_err(|e| match e {
            TokenError::Expired => AuthFailure::ExpiredToken,
            _ => AuthFailure::InvalidToken,
        })?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthFailure::InvalidToken)?;

        let user = state
            .with_db(move |db| db.get_user(user_id).map_err(unknown_user))
            .await?;

        Ok(CurrentUser(user))
    }
}

/// A valid token whose user row is gone.
fn unknown_user(e: StoreError) -> ServerError {
    match e {
        StoreError::NotFound(_) => AuthFailure::UnknownUser.into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_wins_over_cookie() {
        assert_eq!(select_token(Some("h"), Some("c")), Some("h"));
        assert_eq!(select_token(None, Some("c")), Some("c"));
        assert_eq!(select_token(Some("h"), None), Some("h"));
        assert_eq!(select_token(None, None), None);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        assert_eq!(select_token(Some("  "), None), None);
    }

    #[test]
    fn failures_have_distinct_messages() {
        let messages = [
            AuthFailure::MissingToken,
            AuthFailure::InvalidToken,
            AuthFailure::ExpiredToken,
            AuthFailure::UnknownUser,
            AuthFailure::BadCredentials,
        ]
        .map(|f| f.to_string());
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
