/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - gate の失敗種別 → HTTP status/message の対応はここに集約する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::GateError;
use crate::repos::error::RepoError;

pub const NO_ACCESS_MESSAGE: &str = "You have no access to this route";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    Unauthorized { code: &'static str, message: String },
    #[error("{code}: {message}")]
    NotFound { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized { code, message } => (StatusCode::UNAUTHORIZED, code, message),
            AppError::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GateError> for AppError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::MissingToken => AppError::unauthorized("MISSING_TOKEN", NO_ACCESS_MESSAGE),
            // verifier wording goes back to the caller as-is
            GateError::InvalidToken(err) => AppError::unauthorized("INVALID_TOKEN", err.reason()),
            GateError::UserNotFound => AppError::not_found("USER_NOT_FOUND", USER_NOT_FOUND_MESSAGE),
            GateError::RoleNotAuthorized => {
                AppError::unauthorized("ROLE_NOT_AUTHORIZED", NO_ACCESS_MESSAGE)
            }
            GateError::Store(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_token_and_forbidden_role_share_the_same_message() {
        let (status, body) = status_and_body(GateError::MissingToken.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_TOKEN");
        assert_eq!(body["error"]["message"], NO_ACCESS_MESSAGE);

        let (status, body) = status_and_body(GateError::RoleNotAuthorized.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "ROLE_NOT_AUTHORIZED");
        assert_eq!(body["error"]["message"], NO_ACCESS_MESSAGE);
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (status, body) = status_and_body(GateError::UserNotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "User not found");
    }

    #[tokio::test]
    async fn store_failure_is_500_without_details() {
        let err = GateError::Store(RepoError::Db(sqlx::Error::PoolTimedOut));
        let (status, body) = status_and_body(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }
}
