// Key-value view of the transaction ledger

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::db::error::StorageError;
use crate::models::{RecordUpdate, TransactionRecord};

/// Storage client consumed by the reconciler, keyed by transaction hash.
///
/// `update` only overwrites the attributes present in the partial write and
/// creates the record when the key is unknown, mirroring the upsert
/// behaviour of the backing key-value store.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn get(&self, transaction_hash: &str) -> Result<Option<TransactionRecord>, StorageError>;

    async fn put(&self, record: TransactionRecord) -> Result<(), StorageError>;

    async fn update(&self, transaction_hash: &str, update: RecordUpdate) -> Result<(), StorageError>;

    /// Connectivity check; reads no record and is not counted as a call
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Number of calls each store operation has received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub gets: usize,
    pub puts: usize,
    pub updates: usize,
}

impl StoreCalls {
    pub fn total(&self) -> usize {
        self.gets + self.puts + self.updates
    }
}

/// In-process store for local runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, TransactionRecord>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    updates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            gets: self.gets.load(Ordering::SeqCst),
            puts: self.puts.load(Ordering::SeqCst),
            updates: self.updates.load(Ordering::SeqCst),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn get(&self, transaction_hash: &str) -> Result<Option<TransactionRecord>, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.read().await.get(transaction_hash).cloned())
    }

    async fn put(&self, record: TransactionRecord) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.records
            .write()
            .await
            .insert(record.transaction_hash.clone(), record);
        Ok(())
    }

    async fn update(&self, transaction_hash: &str, update: RecordUpdate) -> Result<(), StorageError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        match records.get_mut(transaction_hash) {
            Some(record) => record.apply(update),
            None => {
                records.insert(
                    transaction_hash.to_string(),
                    update.into_record(transaction_hash),
                );
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
