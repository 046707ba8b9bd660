//! Analytics API trait

use async_trait::async_trait;

use crate::client::models::{CategorySpending, IncomeSummary, MonthlySpending};
use crate::error::Result;

/// Server-computed spending analytics
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `GET /analytics/categories`
    async fn category_breakdown(&self) -> Result<Vec<CategorySpending>>;

    /// `GET /analytics/monthly`
    async fn monthly_summary(&self) -> Result<Vec<MonthlySpending>>;

    /// `GET /analytics/income`
    async fn income_summary(&self) -> Result<IncomeSummary>;
}
