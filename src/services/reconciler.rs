// Record reconciler: merges a canonical summary into the ledger

use std::sync::Arc;

use crate::db::{StorageError, TransactionStore};
use crate::models::{
    CanonicalSummary, NativeAssetSummary, NftSummary, RecordUpdate, TransactionRecord,
};

/// Marker written on every NFT write to show the record has been touched
pub const PRESENCE_MARKER: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated,
}

/// Read-then-write merge of summaries into the store.
///
/// The read and the write are not atomic: concurrent deliveries for one hash
/// race and the last writer wins per attribute.
#[derive(Clone)]
pub struct RecordReconciler {
    store: Arc<dyn TransactionStore>,
}

impl RecordReconciler {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    pub async fn reconcile(
        &self,
        transaction_hash: &str,
        created_at: &str,
        summary: &CanonicalSummary,
    ) -> Result<ReconcileOutcome, StorageError> {
        let fields = match summary {
            CanonicalSummary::Nft(nft) => nft_fields(created_at, nft),
            CanonicalSummary::NativeAsset(native) => native_fields(created_at, native),
        };

        match self.store.get(transaction_hash).await? {
            Some(_) => {
                self.store.update(transaction_hash, fields).await?;
                Ok(ReconcileOutcome::Updated)
            }
            None => {
                let record: TransactionRecord = fields.into_record(transaction_hash);
                self.store.put(record).await?;
                Ok(ReconcileOutcome::Created)
            }
        }
    }
}

fn nft_fields(created_at: &str, nft: &NftSummary) -> RecordUpdate {
    RecordUpdate {
        all: Some(PRESENCE_MARKER.to_string()),
        created_at: Some(created_at.to_string()),
        contract_address: nft.contract_address.clone(),
        amount: Some(nft.fungible_amount),
        token_ids: Some(nft.token_ids.clone()),
        buy_sell: Some(nft.direction.as_label().to_string()),
        nft_tx: Some(true),
        ..RecordUpdate::default()
    }
}

fn native_fields(created_at: &str, native: &NativeAssetSummary) -> RecordUpdate {
    RecordUpdate {
        created_at: Some(created_at.to_string()),
        eth_value: Some(native.value.to_string()),
        asset: Some(native.asset.clone()),
        ..RecordUpdate::default()
    }
}
