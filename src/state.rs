/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: 署名鍵を束ねた TokenVerifier, users: UserStore 実装
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::user_repo::UserStore;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }
}
