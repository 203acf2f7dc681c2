// Ledger lookup endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{WebhookError, WebhookResult};
use crate::handlers::AppState;
use crate::models::TransactionRecord;

/// GET /transactions/{hash} — Stored record for a transaction hash
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_hash): Path<String>,
) -> WebhookResult<Json<TransactionRecord>> {
    let record = state
        .store()
        .get(&transaction_hash)
        .await
        .inspect_err(|e| tracing::error!("Lookup of {} failed: {}", transaction_hash, e))?
        .ok_or_else(|| {
            WebhookError::NotFound(format!("Transaction {} not found", transaction_hash))
        })?;

    Ok(Json(record))
}
