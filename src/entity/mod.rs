//! Entity module for database models

pub mod wallet_transactions;
