//! Portrait, advice and forecast commands

use chrono::{Datelike, Local};
use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::InsightsApi;
use crate::client::models::ForecastRequest;
use crate::error::{Error, Result};
use crate::output::{formatters, json};

/// Run the portrait command; month and year default to today
pub async fn portrait(ctx: &CommandContext, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let (month, year) = resolve_period(month, year);
    let portrait = ctx.client.portrait(month, year).await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&portrait)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} {}", formatters::month_name(portrait.month), portrait.year).bold()
    );
    if !portrait.title.is_empty() {
        println!("{}", portrait.title.cyan().bold());
    }
    if !portrait.description.is_empty() {
        println!("\n{}", portrait.description);
    }
    if !portrait.traits.is_empty() {
        println!();
        for item in &portrait.traits {
            println!("  • {}", item);
        }
    }
    if !portrait.top_categories.is_empty() {
        println!("\n{}", "Top categories".bold());
        for item in &portrait.top_categories {
            println!(
                "  {:<16} {}",
                item.category,
                formatters::format_amount(item.amount)
            );
        }
    }
    Ok(())
}

/// Run the advice command
pub async fn advice(ctx: &CommandContext) -> Result<()> {
    let advice = ctx.client.monthly_advice().await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&advice)?);
        return Ok(());
    }

    println!("{}", "This month's advice".bold());
    if let Some(summary) = &advice.summary {
        println!("\n{}", summary);
    }
    if advice.recommendations.is_empty() {
        println!("\n{}", "No recommendations yet.".dimmed());
    } else {
        println!();
        for (i, tip) in advice.recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, tip);
        }
    }
    Ok(())
}

/// Run the forecast command
pub async fn forecast(ctx: &CommandContext, months: u32, category: Option<String>) -> Result<()> {
    if months == 0 {
        return Err(Error::Other("--months must be at least 1".to_string()));
    }
    let forecast = ctx
        .client
        .forecast(&ForecastRequest { months, category })
        .await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&forecast)?);
        return Ok(());
    }

    println!("{}", "Spending forecast".bold());
    for point in &forecast.points {
        println!(
            "  {:<10} {}",
            point.month,
            formatters::format_amount(point.amount)
        );
    }
    if let Some(total) = forecast.total {
        println!("  {:<10} {}", "Total", formatters::format_amount(total));
    }
    Ok(())
}

fn resolve_period(month: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let today = Local::now().date_naive();
    (
        month.unwrap_or_else(|| today.month()),
        year.unwrap_or_else(|| today.year()),
    )
}
