// Handlers Module
// HTTP endpoints of the webhook service

pub mod health;
pub mod transactions;
pub mod webhook;

use std::sync::Arc;

use crate::services::webhook_service::WebhookService;

pub use health::health_check;
pub use transactions::get_transaction;
pub use webhook::handle_webhook;

/// Type alias for the application state
pub type AppState = Arc<WebhookService>;
