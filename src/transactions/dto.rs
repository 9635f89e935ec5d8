use serde::{Deserialize, Serialize};

use super::repo_types::Transaction;

/// Amount as sent by clients: a bare number or a formatted string such as `"100.000.000"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct TransactionCreatedResponse {
    pub success: bool,
    pub message: String,
    pub transaction: Transaction,
}
