/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - ルートごとに AuthorizationGate を route_layer で掛ける (許可 role はここで決める)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    account::{admin_ping, me},
    health::health,
};
use crate::middleware::auth::{AuthorizationGate, gate};
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    // role 指定なし: 認証済みなら誰でも
    let authenticated = gate::apply(
        Router::new().route("/me", get(me)),
        AuthorizationGate::from_state(state, []),
    );

    let admin = gate::apply(
        Router::new().route("/admin/ping", get(admin_ping)),
        AuthorizationGate::from_state(state, [Role::admin()]),
    );

    public.merge(authenticated).merge(admin)
}
