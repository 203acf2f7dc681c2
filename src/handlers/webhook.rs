// Webhook delivery endpoint

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};

use crate::error::WebhookResult;
use crate::handlers::AppState;
use crate::models::MessageResponse;
use crate::services::signature::SIGNATURE_HEADER;

/// POST /webhook — Verify, classify and record one address-activity delivery.
/// Any accepted delivery answers 200, including skipped ones and ones whose
/// storage write failed.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResult<Json<MessageResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.process(&body, signature).await?;

    Ok(Json(MessageResponse::new("SUCCESS")))
}
