// Health check service implementation

use std::sync::Arc;

use crate::db::TransactionStore;

pub struct HealthChecker {
    store: Arc<dyn TransactionStore>,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
