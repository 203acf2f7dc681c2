// Webhook ingestion pipeline: verify -> normalize -> classify -> reconcile

use std::sync::Arc;

use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::db::{StorageError, TransactionStore};
use crate::error::WebhookError;
use crate::models::TransactionKind;
use crate::services::classifier::{Classification, TransactionClassifier};
use crate::services::normalizer::normalize;
use crate::services::reconciler::{ReconcileOutcome, RecordReconciler};
use crate::services::signature::SignatureVerifier;

/// What happened to one accepted delivery. Every variant answers 200.
#[derive(Debug)]
pub enum ProcessOutcome {
    Persisted {
        transaction_hash: String,
        kind: TransactionKind,
        outcome: ReconcileOutcome,
    },
    Skipped {
        transaction_hash: String,
    },
    /// Storage failed; logged and swallowed
    StorageFailed {
        transaction_hash: String,
        error: StorageError,
    },
}

/// Long-lived handle shared by every invocation
pub struct WebhookService {
    verifier: SignatureVerifier,
    classifier: TransactionClassifier,
    reconciler: RecordReconciler,
}

impl WebhookService {
    pub fn new(
        signing_key: impl Into<String>,
        tracked_wallet: impl Into<String>,
        store: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            verifier: SignatureVerifier::new(signing_key),
            classifier: TransactionClassifier::new(tracked_wallet),
            reconciler: RecordReconciler::new(store),
        }
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        self.reconciler.store()
    }

    /// Runs one delivery through the pipeline.
    ///
    /// Only a bad signature or a malformed body surface as errors; storage
    /// failures come back as `ProcessOutcome::StorageFailed`.
    pub async fn process(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<ProcessOutcome, WebhookError> {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!("webhook", %invocation_id);
        self.process_inner(body, signature).instrument(span).await
    }

    async fn process_inner(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<ProcessOutcome, WebhookError> {
        if let Err(e) = self.verifier.verify(body, signature) {
            warn!("Rejected delivery with invalid signature");
            return Err(e);
        }

        let group = normalize(body).inspect_err(|e| warn!("Rejected delivery: {}", e))?;
        let transaction_hash = group.transaction_hash.clone();

        let summary = match self.classifier.classify(&group) {
            Classification::Summary(summary) => summary,
            Classification::Unclassified => {
                info!(
                    "Skipping {}: category {:?} is not tracked",
                    transaction_hash,
                    group.legs.first().map(|leg| &leg.category)
                );
                return Ok(ProcessOutcome::Skipped { transaction_hash });
            }
        };

        let kind = summary.kind();
        info!(
            "Classified {} as {:?} ({} legs)",
            transaction_hash,
            kind,
            group.legs.len()
        );

        match self
            .reconciler
            .reconcile(&transaction_hash, &group.created_at, &summary)
            .await
        {
            Ok(outcome) => {
                match outcome {
                    ReconcileOutcome::Created => info!("New item inserted for {}", transaction_hash),
                    ReconcileOutcome::Updated => info!("Item updated for {}", transaction_hash),
                }
                Ok(ProcessOutcome::Persisted {
                    transaction_hash,
                    kind,
                    outcome,
                })
            }
            Err(error) => {
                error!("Failed to record {}: {}", transaction_hash, error);
                Ok(ProcessOutcome::StorageFailed {
                    transaction_hash,
                    error,
                })
            }
        }
    }
}
