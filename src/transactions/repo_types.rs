use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Column width of `transactions.status`.
pub const STATUS_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub status: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated fields for a new transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: i64,
    pub date: OffsetDateTime,
    pub status: String,
    pub description: Option<String>,
}
