use async_trait::async_trait;

use crate::auth::repo_types::{NewUser, User};
use crate::store::{PgStore, StoreResult};

/// Credential persistence. `create` reports a taken username as
/// [`StoreError::Conflict`](crate::store::StoreError::Conflict).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn create(&self, user: NewUser<'_>) -> StoreResult<User>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser<'_>) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, email, created_at
            "#,
        )
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.email)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}
