//! Analytics command implementations

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::AnalyticsApi;
use crate::client::models::{CategorySpending, IncomeSummary, MonthlySpending};
use crate::error::Result;
use crate::output::{formatters, json, print_list, table};

/// Category spending for table display
#[derive(Tabled)]
struct CategoryDisplay {
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "SPENT")]
    amount: String,
    #[tabled(rename = "SHARE")]
    share: String,
}

impl From<&CategorySpending> for CategoryDisplay {
    fn from(item: &CategorySpending) -> Self {
        Self {
            category: item.category.clone(),
            amount: formatters::format_amount(item.amount),
            share: item
                .share
                .map(|s| format!("{:.1}%", s))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Monthly totals for table display
#[derive(Tabled)]
struct MonthDisplay {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "INCOME")]
    income: String,
    #[tabled(rename = "EXPENSES")]
    expenses: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

impl From<&MonthlySpending> for MonthDisplay {
    fn from(item: &MonthlySpending) -> Self {
        Self {
            month: item.month.clone(),
            income: formatters::format_amount(item.income),
            expenses: formatters::format_amount(item.expenses),
            balance: formatters::format_amount(item.balance()),
        }
    }
}

/// Combined analytics for `analytics overview --format json`
#[derive(Serialize)]
struct Overview<'a> {
    categories: &'a [CategorySpending],
    monthly: &'a [MonthlySpending],
    income: &'a IncomeSummary,
}

const NO_DATA_HINT: &str = "No data yet. Upload a statement with 'finport transaction upload'.";

/// Run the analytics categories command
pub async fn categories(ctx: &CommandContext) -> Result<()> {
    let items = ctx.client.category_breakdown().await?;
    print_list::<CategorySpending, CategoryDisplay>(ctx.format, &items, NO_DATA_HINT)
}

/// Run the analytics monthly command
pub async fn monthly(ctx: &CommandContext) -> Result<()> {
    let items = ctx.client.monthly_summary().await?;
    print_list::<MonthlySpending, MonthDisplay>(ctx.format, &items, NO_DATA_HINT)
}

/// Run the analytics income command
pub async fn income(ctx: &CommandContext) -> Result<()> {
    let summary = ctx.client.income_summary().await?;
    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&summary)?);
    } else {
        print_income(&summary);
    }
    Ok(())
}

/// Run the analytics overview command, fetching all three views in parallel
pub async fn overview(ctx: &CommandContext) -> Result<()> {
    let client = &ctx.client;
    let (categories, monthly, income) = futures::try_join!(
        client.category_breakdown(),
        client.monthly_summary(),
        client.income_summary()
    )?;

    if ctx.format == OutputFormat::Json {
        let overview = Overview {
            categories: &categories,
            monthly: &monthly,
            income: &income,
        };
        println!("{}", json::format_json(&overview)?);
        return Ok(());
    }

    println!("{}", "Spending by category".bold());
    let rows: Vec<CategoryDisplay> = categories.iter().map(CategoryDisplay::from).collect();
    println!("{}\n", table::format_table(&rows, NO_DATA_HINT));

    println!("{}", "By month".bold());
    let rows: Vec<MonthDisplay> = monthly.iter().map(MonthDisplay::from).collect();
    println!("{}\n", table::format_table(&rows, NO_DATA_HINT));

    print_income(&income);
    Ok(())
}

fn print_income(summary: &IncomeSummary) {
    println!("{}", "Income".bold());
    println!("  Total:           {}", formatters::format_amount(summary.total));
    if let Some(avg) = summary.monthly_average {
        println!("  Monthly average: {}", formatters::format_amount(avg));
    }
    for source in &summary.sources {
        println!(
            "  {:<16} {}",
            source.source,
            formatters::format_amount(source.amount)
        );
    }
}
