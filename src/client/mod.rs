//! Finport API client
//!
//! [`Gateway`] builds and decodes every HTTP request, [`FinportClient`]
//! layers the token lifecycle on top and implements the service traits in
//! [`api`].

pub mod api;
pub mod finport;
pub mod gateway;
pub mod models;
pub mod multipart;

pub use api::{AnalyticsApi, AuthApi, GoalsApi, InsightsApi, TransactionsApi};
pub use finport::FinportClient;
pub use gateway::Gateway;
