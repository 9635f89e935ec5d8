use async_trait::async_trait;

use super::repo_types::{NewTransaction, Transaction};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Transaction>>;
    async fn create(&self, owner_id: i64, tx: NewTransaction) -> StoreResult<Transaction>;
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, date, status, description, created_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, owner_id: i64, tx: NewTransaction) -> StoreResult<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, amount, date, status, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount, date, status, description, created_at
            "#,
        )
        .bind(owner_id)
        .bind(tx.amount)
        .bind(tx.date)
        .bind(tx.status)
        .bind(tx.description)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
