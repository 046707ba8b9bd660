//! Finport API data models
//!
//! Domain types exchanged with the Finport backend, organized by resource.

mod analytics;
mod goal;
mod insight;
mod transaction;

pub use analytics::{CategorySpending, IncomeSummary, MonthlySpending};
pub use goal::{Goal, GoalContribution, GoalUpdate, NewGoal};
pub use insight::{Advice, Forecast, ForecastRequest, Portrait};
pub use transaction::{Statement, Transaction, TransactionUpdate, UploadSummary};
