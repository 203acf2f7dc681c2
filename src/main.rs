// Wallet tracker webhook server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_tracker_webhook::build_router;
use wallet_tracker_webhook::config::{StorageBackend, WebhookConfig};
use wallet_tracker_webhook::db::{DbPool, MemoryStore, TransactionStore};
use wallet_tracker_webhook::services::webhook_service::WebhookService;

fn load_env() {
    dotenv::dotenv().ok();
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load service configuration from environment
    let config = WebhookConfig::from_env().expect("Failed to load configuration");
    tracing::info!(
        "Configuration loaded (storage: {:?}, tracked wallet: {})",
        config.storage_backend,
        config.tracked_wallet
    );

    // Construct the storage client once for the whole process
    let store: Arc<dyn TransactionStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_pool = DbPool::new(&config)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Connected to database");

            if config.run_migrations {
                db_pool
                    .run_migrations()
                    .await
                    .expect("Failed to run migrations");
                tracing::info!("Migrations applied");
            }

            Arc::new(db_pool.repositories().transactions)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let service = WebhookService::new(
        config.signing_key.clone(),
        config.tracked_wallet.clone(),
        store,
    );
    let app = build_router(Arc::new(service), config.max_body_bytes);

    // Parse server address from config
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
