// Activity normalizer: raw webhook body -> transaction group

use crate::error::WebhookError;
use crate::models::{TransactionGroup, WebhookPayload};

fn malformed(reason: impl Into<String>) -> WebhookError {
    WebhookError::MalformedPayload(reason.into())
}

/// Parse a webhook body into the legs of a single transaction.
///
/// Every leg must carry a hash and all hashes must agree; the group keeps
/// the legs in delivery order.
pub fn normalize(body: &[u8]) -> Result<TransactionGroup, WebhookError> {
    let payload: WebhookPayload =
        serde_json::from_slice(body).map_err(|e| malformed(format!("invalid JSON body: {}", e)))?;

    let created_at = payload
        .created_at
        .ok_or_else(|| malformed("missing createdAt"))?;
    let legs = payload
        .event
        .and_then(|event| event.activity)
        .ok_or_else(|| malformed("missing event.activity"))?;

    let first_hash = legs
        .first()
        .ok_or_else(|| malformed("event.activity is empty"))?
        .hash
        .clone()
        .ok_or_else(|| malformed("activity entry 0 has no hash"))?;

    for (index, leg) in legs.iter().enumerate() {
        match leg.hash.as_deref() {
            None => return Err(malformed(format!("activity entry {} has no hash", index))),
            Some(hash) if hash != first_hash => {
                return Err(malformed(format!(
                    "activity entry {} belongs to {} instead of {}",
                    index, hash, first_hash
                )))
            }
            Some(_) => {}
        }
    }

    Ok(TransactionGroup {
        transaction_hash: first_hash,
        created_at,
        legs,
    })
}
