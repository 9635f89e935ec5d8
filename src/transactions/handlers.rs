use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{
    dto::{CreateTransactionRequest, TransactionCreatedResponse, TransactionListResponse},
    services::create_transaction,
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transaction/add", post(add_transaction))
}

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<TransactionListResponse>, AppError> {
    let transactions = state.transactions.list(identity.id).await?;
    Ok(Json(TransactionListResponse {
        success: true,
        transactions,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_transaction(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTransactionRequest>, AppError>,
) -> Result<Json<TransactionCreatedResponse>, AppError> {
    let transaction =
        create_transaction(state.transactions.as_ref(), identity.id, &payload).await?;
    Ok(Json(TransactionCreatedResponse {
        success: true,
        message: "Transaction added".into(),
        transaction,
    }))
}
