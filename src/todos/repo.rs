use async_trait::async_trait;

use super::repo_types::Todo;
use crate::store::{PgStore, StoreResult};

/// Per-user todo rows. Every query is scoped by `owner_id`.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Todo>>;
    async fn create(&self, owner_id: i64, text: &str) -> StoreResult<Todo>;
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, text, completed, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, owner_id: i64, text: &str) -> StoreResult<Todo> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, text)
            VALUES ($1, $2)
            RETURNING id, user_id, text, completed, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(text)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
