//! API trait definitions split by responsibility
//!
//! This module organizes the Finport API surface into focused sub-traits:
//! - [`AuthApi`] - Login, registration and logout
//! - [`GoalsApi`] - Savings goals
//! - [`TransactionsApi`] - Transaction history and statement upload
//! - [`AnalyticsApi`] - Spending breakdowns
//! - [`InsightsApi`] - Portraits, advice and forecasts
//!
//! The [`FinportApi`](super::FinportApi) super-trait combines all of them.

mod analytics;
mod auth;
mod goals;
mod insights;
mod transactions;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use goals::GoalsApi;
pub use insights::InsightsApi;
pub use transactions::TransactionsApi;
