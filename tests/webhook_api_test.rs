use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use wallet_tracker_webhook::build_router;
use wallet_tracker_webhook::db::{MemoryStore, StorageError, StoreCalls, TransactionStore};
use wallet_tracker_webhook::models::{parse_token_id, RecordUpdate, TransactionRecord};
use wallet_tracker_webhook::services::signature::hmac_hex;
use wallet_tracker_webhook::services::webhook_service::WebhookService;
use wallet_tracker_webhook::DEFAULT_MAX_BODY_BYTES;

const SIGNING_KEY: &str = "whsec_integration";
const WALLET: &str = "0x8acfe17a5fe62966a27e579e28c10e936de614f2";
const HASH: &str = "0x3f1c9c1d2a9d0c8e5b7a6f4e3d2c1b0a99887766554433221100ffeeddccbbaa";

fn app(store: Arc<dyn TransactionStore>) -> Router {
    let service = WebhookService::new(SIGNING_KEY, WALLET, store);
    build_router(Arc::new(service), DEFAULT_MAX_BODY_BYTES)
}

fn event(activity: Value) -> String {
    json!({
        "webhookId": "wh_test",
        "id": "whevt_test",
        "createdAt": "2024-03-01T12:00:00.000Z",
        "type": "ADDRESS_ACTIVITY",
        "event": { "network": "ETH_MAINNET", "activity": activity }
    })
    .to_string()
}

fn signed_request(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("X-Alchemy-Signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn deliver(app: &Router, body: &str) -> (StatusCode, Value) {
    let signature = hmac_hex(SIGNING_KEY, body.as_bytes());
    send(app, signed_request(body, &signature)).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn nft_sell_event() -> String {
    event(json!([{
        "hash": HASH,
        "category": "token",
        "fromAddress": WALLET,
        "toAddress": "0x1111111111111111111111111111111111111111",
        "rawContract": { "address": "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d" },
        "erc721TokenId": "0x0000000000000000000000000000000000000000000000000000000000000005",
        "asset": "BAYC"
    }]))
}

fn native_event() -> String {
    event(json!([{
        "hash": HASH,
        "category": "external",
        "fromAddress": "0x1111111111111111111111111111111111111111",
        "toAddress": WALLET,
        "value": 1.5,
        "asset": "ETH"
    }]))
}

#[tokio::test]
async fn test_invalid_signature_is_forbidden() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    let body = native_event();

    let (status, response) = send(
        &app,
        signed_request(&body, &hmac_hex("some-other-key", body.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response, json!({ "message": "Forbidden - Invalid signature." }));
    assert_eq!(store.calls(), StoreCalls::default());
}

#[tokio::test]
async fn test_missing_signature_is_forbidden() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .body(Body::from(native_event()))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_nft_delivery_creates_record() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let (status, response) = deliver(&app, &nft_sell_event()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "message": "SUCCESS" }));
    assert_eq!(
        store.calls(),
        StoreCalls {
            gets: 1,
            puts: 1,
            updates: 0
        }
    );

    let record = store.get(HASH).await.unwrap().unwrap();
    assert_eq!(record.all.as_deref(), Some("1"));
    assert_eq!(record.nft_tx, Some(true));
    assert_eq!(record.buy_sell.as_deref(), Some("Sell/Transfer Out"));
    assert_eq!(record.token_ids, parse_token_id("5").map(|id| vec![id]));
    assert_eq!(
        record.contract_address.as_deref(),
        Some("0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d")
    );
}

#[tokio::test]
async fn test_full_width_token_ids_are_recorded() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    let ens_name = "0xd1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f80";
    let body = event(json!([
        {
            "hash": HASH,
            "category": "erc721",
            "fromAddress": "0x2222222222222222222222222222222222222222",
            "toAddress": WALLET,
            "rawContract": { "address": "0x57f1887a8bf19b14fc0df6fd9b2acc9af147ea85" },
            "erc721TokenId": ens_name
        },
        {
            "hash": HASH,
            "category": "erc1155",
            "fromAddress": "0x2222222222222222222222222222222222222222",
            "toAddress": WALLET,
            "rawContract": { "address": "0x495f947276749ce646f68ac8c248420045cb7b5e" },
            "erc1155Metadata": [{
                "tokenId": "0x8acfe17a5fe62966a27e579e28c10e936de614f2000000000000000000000001",
                "value": "0x1"
            }]
        }
    ]));

    let (status, _) = deliver(&app, &body).await;
    assert_eq!(status, StatusCode::OK);

    let record = store.get(HASH).await.unwrap().unwrap();
    assert_eq!(record.token_ids, parse_token_id(ens_name).map(|id| vec![id]));
    assert_eq!(record.amount, Some(Decimal::ONE));
    assert_eq!(record.buy_sell.as_deref(), Some("Buy/Transfer In"));
}

#[tokio::test]
async fn test_erc1155_buy_sums_amounts() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    let body = event(json!([
        {
            "hash": HASH,
            "category": "token",
            "fromAddress": "0x2222222222222222222222222222222222222222",
            "toAddress": WALLET,
            "rawContract": { "address": "0x76be3b62873462d2142405439777e971754e8e77" },
            "erc1155Metadata": { "value": 3 }
        },
        {
            "hash": HASH,
            "category": "token",
            "fromAddress": "0x2222222222222222222222222222222222222222",
            "toAddress": WALLET,
            "rawContract": { "address": "0x76be3b62873462d2142405439777e971754e8e77" },
            "erc1155Metadata": { "value": 2 }
        }
    ]));

    let (status, _) = deliver(&app, &body).await;
    assert_eq!(status, StatusCode::OK);

    let record = store.get(HASH).await.unwrap().unwrap();
    assert_eq!(record.amount, Some(Decimal::from(5)));
    assert_eq!(record.buy_sell.as_deref(), Some("Buy/Transfer In"));
    assert_eq!(record.token_ids, Some(vec![]));
}

#[tokio::test]
async fn test_native_delivery_keeps_nft_fields() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    deliver(&app, &nft_sell_event()).await;
    let (status, _) = deliver(&app, &native_event()).await;
    assert_eq!(status, StatusCode::OK);

    let record = store.get(HASH).await.unwrap().unwrap();
    assert_eq!(record.eth_value.as_deref(), Some("1.5"));
    assert_eq!(record.asset.as_deref(), Some("ETH"));
    assert_eq!(record.nft_tx, Some(true));
    assert_eq!(record.buy_sell.as_deref(), Some("Sell/Transfer Out"));
    assert_eq!(record.token_ids, parse_token_id("5").map(|id| vec![id]));
    assert_eq!(store.calls().updates, 1);
}

#[tokio::test]
async fn test_redelivery_updates_without_duplicating() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    deliver(&app, &nft_sell_event()).await;
    let first = store.get(HASH).await.unwrap().unwrap();

    deliver(&app, &nft_sell_event()).await;
    let second = store.get(HASH).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.calls().puts, 1);
    assert_eq!(store.calls().updates, 1);
}

#[tokio::test]
async fn test_unknown_category_is_acknowledged_without_storage() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    let body = event(json!([{ "hash": HASH, "category": "unknown" }]));

    let (status, response) = deliver(&app, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "message": "SUCCESS" }));
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_leg_without_category_is_acknowledged_without_storage() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    let body = event(json!([{ "hash": HASH, "fromAddress": WALLET }]));

    let (status, response) = deliver(&app, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "message": "SUCCESS" }));
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let (status, response) = deliver(&app, &event(json!([]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("event.activity is empty"));
    assert_eq!(store.calls().total(), 0);
}

struct FailingStore;

#[async_trait]
impl TransactionStore for FailingStore {
    async fn get(&self, _: &str) -> Result<Option<TransactionRecord>, StorageError> {
        Err(StorageError::QueryError("throughput exceeded".to_string()))
    }

    async fn put(&self, _: TransactionRecord) -> Result<(), StorageError> {
        Err(StorageError::QueryError("throughput exceeded".to_string()))
    }

    async fn update(&self, _: &str, _: RecordUpdate) -> Result<(), StorageError> {
        Err(StorageError::QueryError("throughput exceeded".to_string()))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(StorageError::ConnectionError("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_still_succeeds() {
    let app = app(Arc::new(FailingStore));

    let (status, response) = deliver(&app, &native_event()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "message": "SUCCESS" }));
}

#[tokio::test]
async fn test_transaction_lookup() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());
    deliver(&app, &native_event()).await;

    let request = Request::builder()
        .uri(format!("/transactions/{}", HASH))
        .body(Body::empty())
        .unwrap();
    let (status, record) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["transactionHash"], HASH);
    assert_eq!(record["ETHValue"], "1.5");
    assert_eq!(record["asset"], "ETH");
    assert!(record.get("NFTtx").is_none());

    let request = Request::builder()
        .uri("/transactions/0xmissing")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let response = app.oneshot(health_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_health_check_reports_unreachable_store() {
    let app = app(Arc::new(FailingStore));

    let response = app.oneshot(health_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
