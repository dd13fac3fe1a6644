//! Bearer access token → user existence → role check → Principal を extensions に入れる
//!
//! 1 リクエストの流れ（順序固定・失敗したらそこで終了）:
//! 1. `Authorization: Bearer <token>` の抽出
//! 2. 署名 / exp の検証 (TokenVerifier)
//! 3. email で UserStore に存在確認（唯一の await）
//! 4. AllowedRoles が空でなければ role のメンバーシップ確認
//! 5. Principal を extensions に格納して next へ

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::Principal;
use crate::error::AppError;
use crate::repos::{error::RepoError, user_repo::UserStore};
use crate::services::auth::{Role, TokenVerifier, VerifyError};
use crate::state::AppState;

/// Why the gate refused a request. Every variant is terminal for the request.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("missing or malformed bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] VerifyError),
    #[error("user not found")]
    UserNotFound,
    #[error("role not authorized")]
    RoleNotAuthorized,
    #[error("user store failure")]
    Store(#[from] RepoError),
}

impl GateError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::UserNotFound => "user_not_found",
            Self::RoleNotAuthorized => "role_not_authorized",
            Self::Store(_) => "store",
        }
    }
}

/// Per-route authentication + role gate.
///
/// Holds only shared, immutable collaborators, so one value can serve any
/// number of concurrent requests. An empty role set admits every
/// authenticated user.
#[derive(Clone)]
pub struct AuthorizationGate {
    verifier: Arc<TokenVerifier>,
    users: Arc<dyn UserStore>,
    allowed_roles: Arc<BTreeSet<Role>>,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("allowed_roles", &self.allowed_roles)
            .finish_non_exhaustive()
    }
}

impl AuthorizationGate {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        users: Arc<dyn UserStore>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            verifier,
            users,
            allowed_roles: Arc::new(roles.into_iter().collect()),
        }
    }

    pub fn from_state(state: &AppState, roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(state.verifier.clone(), state.users.clone(), roles)
    }

    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.allowed_roles
    }

    pub fn permits(&self, role: &Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(role)
    }

    /// Run the full decision for one request.
    ///
    /// The store lookup is the only suspension point; dropping the returned
    /// future cancels it and nothing is produced.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Principal, GateError> {
        let token = bearer_token(headers).ok_or(GateError::MissingToken)?;

        let claims = self.verifier.verify(token)?;

        if self.users.find_by_email(&claims.email).await?.is_none() {
            return Err(GateError::UserNotFound);
        }

        if !self.permits(&claims.role) {
            return Err(GateError::RoleNotAuthorized);
        }

        Ok(Principal::from(claims))
    }
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
///
/// The value must be exactly two whitespace-separated parts and the scheme
/// must be `Bearer` (ASCII case-insensitive).
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    scheme.eq_ignore_ascii_case("Bearer").then_some(token)
}

/// ルーター全体に gate を掛ける。`route_layer` なので未マッチの 404 は素通り。
///
/// 例：
/// ```ignore
/// let admin = Router::new().route("/admin/ping", get(ping));
/// let admin = middleware::auth::gate::apply(admin, AuthorizationGate::from_state(&state, [Role::admin()]));
/// ```
pub fn apply<S>(router: Router<S>, gate: AuthorizationGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, gate_middleware))
}

async fn gate_middleware(
    State(gate): State<AuthorizationGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match gate.authorize(req.headers()).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by authorization gate"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(role = %principal.role, "authorization gate passed");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
