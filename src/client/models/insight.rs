//! Portrait, advice and forecast models

use serde::{Deserialize, Serialize};

use super::analytics::CategorySpending;

/// Monthly "portrait" of spending behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portrait {
    pub month: u32,
    pub year: i32,
    /// Short persona name, e.g. "Careful planner"
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub top_categories: Vec<CategorySpending>,
}

/// Monthly advice from `/advice/monthly`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Advice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, alias = "tips")]
    pub recommendations: Vec<String>,
}

/// Body for `POST /forecast/`
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRequest {
    /// Months ahead to forecast
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Forecast response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub points: Vec<ForecastPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Predicted spending for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub amount: f64,
}
