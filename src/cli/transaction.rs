//! Transaction and statement command implementations

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::TransactionsApi;
use crate::client::models::{Statement, Transaction, TransactionUpdate};
use crate::error::{Error, Result};
use crate::output::{formatters, json, print_list};

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Transaction for table display
#[derive(Tabled)]
struct TransactionDisplay {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

impl From<&Transaction> for TransactionDisplay {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            date: tx.date.chars().take(10).collect(),
            amount: formatters::format_amount(tx.amount),
            category: tx.category.clone().unwrap_or_else(|| "-".to_string()),
            description: tx.description.clone(),
        }
    }
}

/// Statement for table display
#[derive(Tabled)]
struct StatementDisplay {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "BANK")]
    bank: String,
    #[tabled(rename = "FILE")]
    filename: String,
    #[tabled(rename = "UPLOADED")]
    uploaded_at: String,
}

impl From<&Statement> for StatementDisplay {
    fn from(statement: &Statement) -> Self {
        Self {
            id: statement.id,
            bank: statement.bank.clone(),
            filename: statement.filename.clone(),
            uploaded_at: statement
                .uploaded_at
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Run the transaction history command
pub async fn history(
    ctx: &CommandContext,
    category: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let transactions = ctx.client.transaction_history().await?;
    let filtered = filter_transactions(transactions, category.as_deref(), limit);
    print_list::<Transaction, TransactionDisplay>(
        ctx.format,
        &filtered,
        "No transactions found.",
    )
}

/// Run the transaction upload command
pub async fn upload(ctx: &mut CommandContext, file: &Path, bank: String) -> Result<()> {
    let pdf = std::fs::read(file)?;
    if !pdf.starts_with(PDF_MAGIC) {
        return Err(Error::Other(format!("{} is not a PDF file", file.display())));
    }
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement.pdf".to_string());
    debug!("Uploading {} ({} bytes) for {}", filename, pdf.len(), bank);

    let spinner = upload_spinner(&filename);
    let result = ctx.client.upload_statement(&bank, &filename, pdf).await;
    spinner.finish_and_clear();
    let summary = result?;

    if !ctx.config.statement_uploaded {
        ctx.config.statement_uploaded = true;
        ctx.save_config()?;
    }

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&summary)?);
        return Ok(());
    }

    println!(
        "{} Statement uploaded: {} transactions imported",
        "✓".green(),
        summary.transactions_imported.to_string().bold()
    );
    if let Some(message) = summary.message {
        println!("  {}", message.dimmed());
    }
    Ok(())
}

/// Run the transaction categorize command
pub async fn categorize(ctx: &CommandContext, id: i64, category: String) -> Result<()> {
    let category = category.trim().to_string();
    if category.is_empty() {
        return Err(Error::Other("Category must not be empty".to_string()));
    }
    let update = TransactionUpdate {
        category: Some(category),
        description: None,
    };
    let tx = ctx.client.update_transaction(id, &update).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&tx)?);
    } else {
        println!(
            "{} Transaction #{} is now in {}",
            "✓".green(),
            tx.id,
            tx.category.as_deref().unwrap_or("-").bold()
        );
    }
    Ok(())
}

/// Run the statement list command
pub async fn list_statements(ctx: &CommandContext) -> Result<()> {
    let statements = ctx.client.list_statements().await?;
    print_list::<Statement, StatementDisplay>(
        ctx.format,
        &statements,
        "No statements uploaded yet.",
    )
}

/// Keep transactions in `category` (case-insensitive), in server order,
/// at most `limit` of them.
fn filter_transactions(
    transactions: Vec<Transaction>,
    category: Option<&str>,
    limit: Option<usize>,
) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|tx| match category {
            Some(wanted) => tx
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
            None => true,
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

fn upload_spinner(filename: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(format!("Uploading {}...", filename));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
