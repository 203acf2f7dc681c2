// Wallet transactions entity - one ledger row per transaction hash
use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use crate::models::TransactionRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_hash: String,
    pub all_marker: Option<String>,
    pub created_at: Option<String>,
    pub contract_address: Option<String>,
    pub amount: Option<Decimal>,
    pub token_ids: Option<Vec<BigDecimal>>,
    pub buy_sell: Option<String>,
    pub nft_tx: Option<bool>,
    pub eth_value: Option<String>,
    pub asset: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TransactionRecord {
    fn from(model: Model) -> Self {
        TransactionRecord {
            transaction_hash: model.transaction_hash,
            all: model.all_marker,
            created_at: model.created_at,
            contract_address: model.contract_address,
            amount: model.amount,
            token_ids: model.token_ids,
            buy_sell: model.buy_sell,
            nft_tx: model.nft_tx,
            eth_value: model.eth_value,
            asset: model.asset,
        }
    }
}
