//! Goal command implementations

use chrono::NaiveDate;
use colored::Colorize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::GoalsApi;
use crate::client::models::{Goal, GoalUpdate, NewGoal};
use crate::error::{Error, Result};
use crate::output::{formatters, json, print_list};

/// Goal for table display
#[derive(Tabled)]
struct GoalDisplay {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "GOAL")]
    title: String,
    #[tabled(rename = "SAVED")]
    saved: String,
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "PROGRESS")]
    progress: String,
    #[tabled(rename = "DEADLINE")]
    deadline: String,
}

impl From<&Goal> for GoalDisplay {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            saved: formatters::format_amount(goal.current_amount),
            target: formatters::format_amount(goal.target_amount),
            progress: formatters::progress_bar(goal.progress_percent()),
            deadline: goal
                .deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Run the goal list command
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let goals = ctx.client.list_goals().await?;
    print_list::<Goal, GoalDisplay>(
        ctx.format,
        &goals,
        "No goals yet. Create one with 'finport goal create <TITLE> --target <AMOUNT>'.",
    )
}

/// Run the goal create command
pub async fn create(
    ctx: &CommandContext,
    title: String,
    target: f64,
    deadline: Option<NaiveDate>,
) -> Result<()> {
    ensure_positive(target, "Target amount")?;
    let goal = ctx
        .client
        .create_goal(&NewGoal {
            title,
            target_amount: target,
            deadline,
        })
        .await?;
    print_goal(ctx.format, &goal, "Goal created")
}

/// Run the goal update command
pub async fn update(ctx: &CommandContext, id: i64, update: GoalUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(Error::Other(
            "Nothing to update: pass --title, --target or --deadline".to_string(),
        ));
    }
    if let Some(target) = update.target_amount {
        ensure_positive(target, "Target amount")?;
    }
    let goal = ctx.client.update_goal(id, &update).await?;
    print_goal(ctx.format, &goal, "Goal updated")
}

/// Run the goal deposit command
pub async fn deposit(ctx: &CommandContext, id: i64, amount: f64) -> Result<()> {
    ensure_positive(amount, "Amount")?;
    let goal = ctx.client.contribute_to_goal(id, amount).await?;
    print_goal(
        ctx.format,
        &goal,
        &format!("Added {}", formatters::format_amount(amount)),
    )
}

fn ensure_positive(amount: f64, what: &str) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::Other(format!("{} must be greater than zero", what)))
    }
}

fn print_goal(format: OutputFormat, goal: &Goal, headline: &str) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", json::format_json(goal)?);
        return Ok(());
    }

    println!("{} {}", "✓".green(), headline);
    println!();
    println!("  {} (#{})", goal.title.bold(), goal.id);
    println!(
        "  {} of {}",
        formatters::format_amount(goal.current_amount),
        formatters::format_amount(goal.target_amount)
    );
    println!("  {}", formatters::progress_bar(goal.progress_percent()));
    if goal.remaining() > 0.0 {
        println!("  {} to go", formatters::format_amount(goal.remaining()));
    } else {
        println!("  {}", "Goal reached!".green().bold());
    }
    if let Some(deadline) = goal.deadline {
        println!("  Deadline: {}", deadline);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_display_row() {
        let goal = Goal {
            id: 4,
            title: "Laptop".to_string(),
            target_amount: 2000.0,
            current_amount: 500.0,
            deadline: None,
            created_at: None,
        };
        let row = GoalDisplay::from(&goal);
        assert_eq!(row.saved, "500.00");
        assert_eq!(row.target, "2 000.00");
        assert!(row.progress.ends_with(" 25%"));
        assert_eq!(row.deadline, "-");
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(10.0, "Amount").is_ok());
        assert!(ensure_positive(0.0, "Amount").is_err());
        assert!(ensure_positive(-5.0, "Amount").is_err());
        assert!(ensure_positive(f64::NAN, "Amount").is_err());
    }
}
