//! Goals API trait

use async_trait::async_trait;

use crate::client::models::{Goal, GoalUpdate, NewGoal};
use crate::error::Result;

/// Savings goal operations
#[async_trait]
pub trait GoalsApi: Send + Sync {
    /// `GET /goals/`
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// `POST /goals/`
    async fn create_goal(&self, goal: &NewGoal) -> Result<Goal>;

    /// `PATCH /goals/{id}` - only the fields set in `update` change.
    async fn update_goal(&self, goal_id: i64, update: &GoalUpdate) -> Result<Goal>;

    /// `POST /goals/{id}/add` - add money to a goal.
    async fn contribute_to_goal(&self, goal_id: i64, amount: f64) -> Result<Goal>;
}
