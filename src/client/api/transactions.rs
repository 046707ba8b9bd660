//! Transactions API trait

use async_trait::async_trait;

use crate::client::models::{Statement, Transaction, TransactionUpdate, UploadSummary};
use crate::error::Result;

/// Transaction and statement operations
#[async_trait]
pub trait TransactionsApi: Send + Sync {
    /// `GET /transactions/history`
    async fn transaction_history(&self) -> Result<Vec<Transaction>>;

    /// `POST /transactions/upload` - upload a bank statement PDF.
    async fn upload_statement(&self, bank: &str, filename: &str, pdf: Vec<u8>)
    -> Result<UploadSummary>;

    /// `PATCH /transactions/{id}` - e.g. re-categorize a transaction.
    async fn update_transaction(
        &self,
        transaction_id: i64,
        update: &TransactionUpdate,
    ) -> Result<Transaction>;

    /// `GET /statements`
    async fn list_statements(&self) -> Result<Vec<Statement>>;
}
