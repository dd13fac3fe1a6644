use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{AppError, NO_ACCESS_MESSAGE};

use super::Principal;

/// Handler で Principal を受け取るための extractor
/// gate が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（gate が掛かっていないルート）
pub struct PrincipalExtractor(pub Principal);

impl<S> FromRequestParts<S> for PrincipalExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(PrincipalExtractor)
            .ok_or_else(|| AppError::unauthorized("MISSING_TOKEN", NO_ACCESS_MESSAGE))
    }
}
