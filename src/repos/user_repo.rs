/*
 * Responsibility
 * - users テーブルへの参照専用クエリ (存在確認のみ)
 * - UserStore trait: gate が依存する境界。Postgres 実装を提供
 * - DB エラーは RepoError で返し、HTTP への変換は上位に任せる
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
}

/// Read-only view of the user storage backend.
///
/// Implementations are shared across requests behind an `Arc`, so they must
/// be `Send + Sync`. The returned future is dropped when the request is
/// cancelled; implementations must not rely on running to completion.
#[async_trait]
pub trait UserStore: Send + Sync {
    // `Ok(None)` means the identity is unknown, not a failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError>;
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "email"
        FROM users
        WHERE "email" = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError> {
        find_by_email(&self.db, email).await
    }
}
