//! Spending analytics models

use serde::{Deserialize, Serialize};

/// Spending in one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    /// Share of total spending in percent (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<f64>,
}

/// Income and expenses for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySpending {
    /// Month label, e.g. "2024-03"
    pub month: String,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
}

impl MonthlySpending {
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Income overview
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeSummary {
    #[serde(default)]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_average: Option<f64>,
    #[serde(default)]
    pub sources: Vec<IncomeSource>,
}

/// One income source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSource {
    pub source: String,
    pub amount: f64,
}
