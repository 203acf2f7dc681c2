// Webhook payload, classification and ledger record models
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Envelope of an address-activity webhook delivery
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub created_at: Option<String>,
    pub event: Option<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub activity: Option<Vec<RawActivityLeg>>,
}

/// Asset category reported for a single leg
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Token,
    Erc721,
    Erc1155,
    SpecialNft,
    External,
    Internal,
    Other(String),
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "token" => Category::Token,
            "erc721" => Category::Erc721,
            "erc1155" => Category::Erc1155,
            "specialnft" => Category::SpecialNft,
            "external" => Category::External,
            "internal" => Category::Internal,
            _ => Category::Other(value),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl Category {
    /// Token-standard categories that route a group into the NFT flow
    pub fn is_token_transfer(&self) -> bool {
        matches!(
            self,
            Category::Token | Category::Erc721 | Category::Erc1155 | Category::SpecialNft
        )
    }

    /// Plain value transfers of the chain's native asset
    pub fn is_native_transfer(&self) -> bool {
        matches!(self, Category::External | Category::Internal)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContract {
    pub address: Option<String>,
}

/// ERC-1155 metadata arrives either as a single entry or as a list of
/// `{ tokenId, value }` entries
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Erc1155Metadata {
    Batch(Vec<Erc1155Entry>),
    Single(Erc1155Entry),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc1155Entry {
    #[serde(default, deserialize_with = "deserialize_optional_quantity")]
    pub value: Option<Decimal>,
}

impl Erc1155Metadata {
    /// Sum of all transferred amounts in this leg
    pub fn total_value(&self) -> Decimal {
        match self {
            Erc1155Metadata::Batch(entries) => entries.iter().filter_map(|e| e.value).sum(),
            Erc1155Metadata::Single(entry) => entry.value.unwrap_or_default(),
        }
    }
}

/// One transfer entry of the incoming event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityLeg {
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Category,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    #[serde(default)]
    pub raw_contract: Option<RawContract>,
    #[serde(default, deserialize_with = "deserialize_optional_token_id")]
    pub erc721_token_id: Option<BigDecimal>,
    pub erc1155_metadata: Option<Erc1155Metadata>,
    pub value: Option<f64>,
    pub asset: Option<String>,
}

impl RawActivityLeg {
    pub fn contract_address(&self) -> Option<&str> {
        self.raw_contract.as_ref().and_then(|c| c.address.as_deref())
    }
}

/// A missing or null category is treated like any unrecognised one
fn deserialize_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(Category::from).unwrap_or_default())
}

/// Accepts a JSON integer, a decimal string or a `0x`-prefixed hex string
fn deserialize_optional_quantity<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => parse_number(&n)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("quantity out of range: {}", n))),
        Some(serde_json::Value::String(s)) => parse_quantity(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid quantity: {}", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected number or string quantity, got {}",
            other
        ))),
    }
}

fn parse_number(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(v) = n.as_u64() {
        Some(Decimal::from(v))
    } else if let Some(v) = n.as_i64() {
        Some(Decimal::from(v))
    } else {
        n.as_f64().and_then(|v| Decimal::try_from(v).ok())
    }
}

/// Parse a decimal or `0x` hex quantity string
pub fn parse_quantity(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if hex.is_empty() {
            return Some(Decimal::ZERO);
        }
        let value = u128::from_str_radix(hex, 16).ok()?;
        Decimal::from_str(&value.to_string()).ok()
    } else {
        Decimal::from_str(trimmed).ok()
    }
}

/// Token IDs are full 256-bit words, so they are kept at arbitrary precision
fn deserialize_optional_token_id<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let text = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected number or string token id, got {}",
                other
            )))
        }
    };
    parse_token_id(&text)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid token id: {}", text)))
}

/// Parse a decimal or `0x` hex token ID of any width
pub fn parse_token_id(input: &str) -> Option<BigDecimal> {
    let trimmed = input.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some("") => Some(BigDecimal::zero()),
        Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16).map(BigDecimal::from),
        None => BigDecimal::from_str(trimmed).ok(),
    }
}

/// All legs of one transaction, as delivered in a single event
#[derive(Debug, Clone)]
pub struct TransactionGroup {
    pub transaction_hash: String,
    pub created_at: String,
    pub legs: Vec<RawActivityLeg>,
}

/// Net flow of an NFT transaction relative to the tracked wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Buy,
    Sell,
    Neutral,
}

impl Direction {
    pub fn from_balance(balance: i64) -> Self {
        if balance < 0 {
            Direction::Sell
        } else if balance > 0 {
            Direction::Buy
        } else {
            Direction::Neutral
        }
    }

    /// Label stored under `buySell`
    pub fn as_label(&self) -> &'static str {
        match self {
            Direction::Buy => "Buy/Transfer In",
            Direction::Sell => "Sell/Transfer Out",
            Direction::Neutral => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Nft,
    NativeAsset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NftSummary {
    pub contract_address: Option<String>,
    pub token_ids: Vec<BigDecimal>,
    pub fungible_amount: Decimal,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeAssetSummary {
    pub asset: String,
    pub value: f64,
}

/// Normalized view of a transaction used for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CanonicalSummary {
    Nft(NftSummary),
    NativeAsset(NativeAssetSummary),
}

impl CanonicalSummary {
    pub fn kind(&self) -> TransactionKind {
        match self {
            CanonicalSummary::Nft(_) => TransactionKind::Nft,
            CanonicalSummary::NativeAsset(_) => TransactionKind::NativeAsset,
        }
    }
}

/// Persisted ledger entry, keyed by transaction hash.
///
/// Holds the union of the fields written by either summary kind; a field
/// absent here has simply never been written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
    #[serde(rename = "all", skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "contractAddress", skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(rename = "amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(rename = "tokenID", skip_serializing_if = "Option::is_none")]
    pub token_ids: Option<Vec<BigDecimal>>,
    #[serde(rename = "buySell", skip_serializing_if = "Option::is_none")]
    pub buy_sell: Option<String>,
    #[serde(rename = "NFTtx", skip_serializing_if = "Option::is_none")]
    pub nft_tx: Option<bool>,
    #[serde(rename = "ETHValue", skip_serializing_if = "Option::is_none")]
    pub eth_value: Option<String>,
    #[serde(rename = "asset", skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

/// Partial write: `None` leaves the stored attribute untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub all: Option<String>,
    pub created_at: Option<String>,
    pub contract_address: Option<String>,
    pub amount: Option<Decimal>,
    pub token_ids: Option<Vec<BigDecimal>>,
    pub buy_sell: Option<String>,
    pub nft_tx: Option<bool>,
    pub eth_value: Option<String>,
    pub asset: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        *self == RecordUpdate::default()
    }

    /// Build a full record for a key that has no stored entry yet
    pub fn into_record(self, transaction_hash: &str) -> TransactionRecord {
        let mut record = TransactionRecord {
            transaction_hash: transaction_hash.to_string(),
            ..TransactionRecord::default()
        };
        record.apply(self);
        record
    }
}

impl TransactionRecord {
    /// Overwrite every attribute present in `update`, keep the rest
    pub fn apply(&mut self, update: RecordUpdate) {
        if let Some(all) = update.all {
            self.all = Some(all);
        }
        if let Some(created_at) = update.created_at {
            self.created_at = Some(created_at);
        }
        if let Some(contract_address) = update.contract_address {
            self.contract_address = Some(contract_address);
        }
        if let Some(amount) = update.amount {
            self.amount = Some(amount);
        }
        if let Some(token_ids) = update.token_ids {
            self.token_ids = Some(token_ids);
        }
        if let Some(buy_sell) = update.buy_sell {
            self.buy_sell = Some(buy_sell);
        }
        if let Some(nft_tx) = update.nft_tx {
            self.nft_tx = Some(nft_tx);
        }
        if let Some(eth_value) = update.eth_value {
            self.eth_value = Some(eth_value);
        }
        if let Some(asset) = update.asset {
            self.asset = Some(asset);
        }
    }
}

/// Body of every webhook response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
