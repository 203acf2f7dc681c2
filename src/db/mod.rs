// Database Module
// Storage clients for the transaction ledger

pub mod error;
pub mod pool;
pub mod repositories;
pub mod store;

pub use error::StorageError;
pub use pool::DbPool;
pub use repositories::{Repositories, TransactionRecordRepository};
pub use store::{MemoryStore, StoreCalls, TransactionStore};
