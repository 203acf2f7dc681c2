// Postgres binding of the transaction ledger

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, Insert};

use crate::db::error::StorageError;
use crate::db::store::TransactionStore;
use crate::entity::wallet_transactions::{self, ActiveModel, Column};
use crate::models::{RecordUpdate, TransactionRecord};

const ALL_COLUMNS: [Column; 9] = [
    Column::AllMarker,
    Column::CreatedAt,
    Column::ContractAddress,
    Column::Amount,
    Column::TokenIds,
    Column::BuySell,
    Column::NftTx,
    Column::EthValue,
    Column::Asset,
];

/// Repository for the `wallet_transactions` table
#[derive(Clone)]
pub struct TransactionRecordRepository {
    conn: DatabaseConnection,
}

impl TransactionRecordRepository {
    /// Creates a new repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        TransactionRecordRepository { conn }
    }
}

/// Marks a column as written only when the partial update carries it
fn write_if_present<T>(
    value: Option<T>,
    column: Column,
    written: &mut Vec<Column>,
) -> ActiveValue<Option<T>>
where
    Option<T>: Into<sea_orm::Value>,
{
    match value {
        Some(v) => {
            written.push(column);
            ActiveValue::Set(Some(v))
        }
        None => ActiveValue::NotSet,
    }
}

/// Insert-or-replace of the whole row
fn replace_row(record: TransactionRecord) -> Insert<ActiveModel> {
    let active = ActiveModel {
        transaction_hash: ActiveValue::Set(record.transaction_hash),
        all_marker: ActiveValue::Set(record.all),
        created_at: ActiveValue::Set(record.created_at),
        contract_address: ActiveValue::Set(record.contract_address),
        amount: ActiveValue::Set(record.amount),
        token_ids: ActiveValue::Set(record.token_ids),
        buy_sell: ActiveValue::Set(record.buy_sell),
        nft_tx: ActiveValue::Set(record.nft_tx),
        eth_value: ActiveValue::Set(record.eth_value),
        asset: ActiveValue::Set(record.asset),
    };

    wallet_transactions::Entity::insert(active).on_conflict(
        OnConflict::column(Column::TransactionHash)
            .update_columns(ALL_COLUMNS)
            .to_owned(),
    )
}

/// Upsert that only touches the columns present in `update`.
/// `None` when there is nothing to write.
fn merge_row(transaction_hash: &str, update: RecordUpdate) -> Option<Insert<ActiveModel>> {
    if update.is_empty() {
        return None;
    }

    let mut written = Vec::new();
    let active = ActiveModel {
        transaction_hash: ActiveValue::Set(transaction_hash.to_string()),
        all_marker: write_if_present(update.all, Column::AllMarker, &mut written),
        created_at: write_if_present(update.created_at, Column::CreatedAt, &mut written),
        contract_address: write_if_present(
            update.contract_address,
            Column::ContractAddress,
            &mut written,
        ),
        amount: write_if_present(update.amount, Column::Amount, &mut written),
        token_ids: write_if_present(update.token_ids, Column::TokenIds, &mut written),
        buy_sell: write_if_present(update.buy_sell, Column::BuySell, &mut written),
        nft_tx: write_if_present(update.nft_tx, Column::NftTx, &mut written),
        eth_value: write_if_present(update.eth_value, Column::EthValue, &mut written),
        asset: write_if_present(update.asset, Column::Asset, &mut written),
    };

    Some(
        wallet_transactions::Entity::insert(active).on_conflict(
            OnConflict::column(Column::TransactionHash)
                .update_columns(written)
                .to_owned(),
        ),
    )
}

#[async_trait]
impl TransactionStore for TransactionRecordRepository {
    async fn get(&self, transaction_hash: &str) -> Result<Option<TransactionRecord>, StorageError> {
        let model = wallet_transactions::Entity::find_by_id(transaction_hash.to_string())
            .one(&self.conn)
            .await?;
        Ok(model.map(TransactionRecord::from))
    }

    async fn put(&self, record: TransactionRecord) -> Result<(), StorageError> {
        replace_row(record).exec_without_returning(&self.conn).await?;
        Ok(())
    }

    async fn update(&self, transaction_hash: &str, update: RecordUpdate) -> Result<(), StorageError> {
        if let Some(statement) = merge_row(transaction_hash, update) {
            statement.exec_without_returning(&self.conn).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.conn
            .ping()
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))
    }
}
