/*!
 * Principal extractor
 *
 * Responsibility:
 * - gate を通過したリクエストの認証済み主体（Principal）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - Principal
 * - PrincipalExtractor
 */

mod core;
mod types;

pub use core::PrincipalExtractor;
pub use types::Principal;
