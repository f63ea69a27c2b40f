use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tabletop_shared::error::{PasswordError, TokenError};
use tabletop_store::StoreError;
use thiserror::Error;

use crate::auth::AuthFailure;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// An extractor refused the request body, path or query.
    #[error("{1}")]
    Rejected(StatusCode, String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::Rejected(status, message) => (*status, message.clone()),
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(entity) => ServerError::NotFound(format!("{entity} not found")),
            StoreError::Validation(_)
            | StoreError::UnknownAttribute(_)
            | StoreError::UnknownSkill(_)
            | StoreError::Constraint(_) => ServerError::BadRequest(e.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for ServerError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => ServerError::Unauthenticated(AuthFailure::ExpiredToken),
            TokenError::Invalid(_) => ServerError::Unauthenticated(AuthFailure::InvalidToken),
            TokenError::Signing(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServerError {
    fn from(e: PasswordError) -> Self {
        ServerError::Internal(e.to_string())
    }
}

impl From<AuthFailure> for ServerError {
    fn from(e: AuthFailure) -> Self {
        ServerError::Unauthenticated(e)
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ServerError {
                fn from(rejection: $rejection) -> Self {
                    ServerError::Rejected(rejection.status(), rejection.body_text())
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, FormRejection, PathRejection, QueryRejection);

impl From<tokio::task::JoinError> for ServerError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("blocking task failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::NotFound("character"), StatusCode::NOT_FOUND),
            (
                StoreError::Validation("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::UnknownSkill("Алхимия".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Constraint("UNIQUE".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Migration("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn token_errors_are_unauthorized() {
        for err in [TokenError::Expired, TokenError::Invalid("bad".into())] {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
        let response = ServerError::from(TokenError::Signing("key".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn rejections_keep_their_status_and_use_the_json_body() {
        let response = ServerError::Rejected(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing field `password`".into(),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "missing field `password`");
    }
}
