// Database repository management

mod transaction_record_repository;

pub use transaction_record_repository::TransactionRecordRepository;

use sea_orm::DatabaseConnection;

/// Container for all database repositories
pub struct Repositories {
    pub transactions: TransactionRecordRepository,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            transactions: TransactionRecordRepository::new(conn),
        }
    }
}
