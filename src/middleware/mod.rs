/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer 認証 + role 認可 gate, http: 横断的な HTTP レイヤ
 */
pub mod auth;
pub mod http;
