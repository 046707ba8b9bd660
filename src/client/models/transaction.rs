//! Transaction and bank statement models

use serde::{Deserialize, Serialize};

/// A categorized bank transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID
    pub id: i64,

    /// Booking date as sent by the server (ISO-8601)
    pub date: String,

    /// Signed amount: negative for expenses, positive for income
    pub amount: f64,

    /// Statement description
    #[serde(default)]
    pub description: String,

    /// Category assigned by the server or the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Bank the transaction was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
}

/// Body for `PATCH /transactions/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Uploaded bank statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Statement ID
    pub id: i64,

    /// Issuing bank
    #[serde(default)]
    pub bank: String,

    /// Original PDF filename
    #[serde(default)]
    pub filename: String,

    /// Upload timestamp (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

/// Response of `POST /transactions/upload`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSummary {
    /// ID of the created statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<i64>,

    /// Number of transactions parsed out of the PDF
    #[serde(default, alias = "count")]
    pub transactions_imported: usize,

    /// Free-form server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
