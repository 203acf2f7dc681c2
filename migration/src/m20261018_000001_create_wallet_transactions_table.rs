use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::sea_query::ColumnType;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every attribute except the key is nullable: a record may carry only
        // the native-asset fields, only the NFT fields, or both.
        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::TransactionHash)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WalletTransactions::AllMarker).string().null())
                    .col(ColumnDef::new(WalletTransactions::CreatedAt).string().null())
                    .col(ColumnDef::new(WalletTransactions::ContractAddress).string().null())
                    .col(ColumnDef::new(WalletTransactions::Amount).decimal().null())
                    .col(
                        ColumnDef::new(WalletTransactions::TokenIds)
                            .array(ColumnType::Decimal(None))
                            .null(),
                    )
                    .col(ColumnDef::new(WalletTransactions::BuySell).string().null())
                    .col(ColumnDef::new(WalletTransactions::NftTx).boolean().null())
                    .col(ColumnDef::new(WalletTransactions::EthValue).string().null())
                    .col(ColumnDef::new(WalletTransactions::Asset).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wallet_transactions_contract_address")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::ContractAddress)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum WalletTransactions {
    Table,
    TransactionHash,
    AllMarker,
    CreatedAt,
    ContractAddress,
    Amount,
    TokenIds,
    BuySell,
    NftTx,
    EthValue,
    Asset,
}
