/*
 * Responsibility
 * - gate の内側にある handler (Principal を読むだけ)
 * - /me: 任意の認証済みユーザー, /admin/ping: admin のみ
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::{Principal, PrincipalExtractor};

pub async fn me(PrincipalExtractor(principal): PrincipalExtractor) -> Json<Principal> {
    Json(principal)
}

pub async fn admin_ping(PrincipalExtractor(principal): PrincipalExtractor) -> Json<Value> {
    Json(json!({ "status": "ok", "role": principal.role }))
}
