// Transaction classifier: decides how a group is recorded in the ledger

use rust_decimal::Decimal;

use crate::models::{
    CanonicalSummary, Direction, NativeAssetSummary, NftSummary, TransactionGroup,
};

pub const UNKNOWN_ASSET: &str = "N/A";

/// Outcome of classifying a transaction group
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Summary(CanonicalSummary),
    /// Not a transfer we track; nothing is persisted
    Unclassified,
}

/// Classifies groups relative to one tracked wallet
#[derive(Debug, Clone)]
pub struct TransactionClassifier {
    tracked_wallet: String,
}

impl TransactionClassifier {
    pub fn new(tracked_wallet: impl Into<String>) -> Self {
        Self {
            tracked_wallet: tracked_wallet.into(),
        }
    }

    pub fn tracked_wallet(&self) -> &str {
        &self.tracked_wallet
    }

    fn is_tracked(&self, address: Option<&str>) -> bool {
        address.is_some_and(|a| a.eq_ignore_ascii_case(&self.tracked_wallet))
    }

    /// The first leg's category selects the flow
    pub fn classify(&self, group: &TransactionGroup) -> Classification {
        let Some(first) = group.legs.first() else {
            return Classification::Unclassified;
        };

        if first.category.is_token_transfer() {
            Classification::Summary(CanonicalSummary::Nft(self.summarize_nft(group)))
        } else if first.category.is_native_transfer() {
            // Only the first leg is consulted for native transfers
            Classification::Summary(CanonicalSummary::NativeAsset(NativeAssetSummary {
                asset: first
                    .asset
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_ASSET.to_string()),
                value: first.value.unwrap_or(0.0),
            }))
        } else {
            Classification::Unclassified
        }
    }

    fn summarize_nft(&self, group: &TransactionGroup) -> NftSummary {
        let mut balance: i64 = 0;
        let mut contract_address = None;
        let mut token_ids = Vec::new();
        let mut fungible_amount = Decimal::ZERO;

        for leg in &group.legs {
            if self.is_tracked(leg.from_address.as_deref()) {
                balance -= 1;
            }
            if self.is_tracked(leg.to_address.as_deref()) {
                balance += 1;
            }
            // last leg carrying a contract wins
            if let Some(address) = leg.contract_address() {
                contract_address = Some(address.to_string());
            }
            if let Some(token_id) = &leg.erc721_token_id {
                token_ids.push(token_id.clone());
            }
            if let Some(metadata) = &leg.erc1155_metadata {
                fungible_amount += metadata.total_value();
            }
        }

        NftSummary {
            contract_address,
            token_ids,
            fungible_amount,
            direction: Direction::from_balance(balance),
        }
    }
}
