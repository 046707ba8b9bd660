//! Insights API trait

use async_trait::async_trait;

use crate::client::models::{Advice, Forecast, ForecastRequest, Portrait};
use crate::error::Result;

/// Portraits, advice and forecasts
#[async_trait]
pub trait InsightsApi: Send + Sync {
    /// `GET /portrait?month&year`
    async fn portrait(&self, month: u32, year: i32) -> Result<Portrait>;

    /// `GET /advice/monthly`
    async fn monthly_advice(&self) -> Result<Advice>;

    /// `POST /forecast/`
    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast>;
}
