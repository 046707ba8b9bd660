//! Financial goal models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Goal ID
    pub id: i64,

    /// Goal name, e.g. "Vacation"
    pub title: String,

    /// Amount to reach
    pub target_amount: f64,

    /// Amount saved so far
    #[serde(default)]
    pub current_amount: f64,

    /// Optional target date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Creation timestamp (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Progress towards the target in percent, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    /// Amount still missing.
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

/// Body for `POST /goals/`
#[derive(Debug, Clone, Serialize)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Body for `PATCH /goals/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.target_amount.is_none() && self.deadline.is_none()
    }
}

/// Body for `POST /goals/{id}/add`
#[derive(Debug, Clone, Serialize)]
pub struct GoalContribution {
    pub amount: f64,
}
