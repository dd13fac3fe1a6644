/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - gate が検証して request extensions に格納し、handler はこの型だけを受け取る
 */
use serde::Serialize;

use crate::services::auth::{AccessTokenClaims, Role};

/// 認証・認可を通過したリクエストに付与される主体
///
/// - `email` / `role` は検証済み access token の claim そのまま
/// - リクエスト単位で生成され、downstream からは読み取り専用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub email: String,
    pub role: Role,
}

impl From<AccessTokenClaims> for Principal {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            email: claims.email,
            role: claims.role,
        }
    }
}
