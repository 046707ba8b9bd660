//! Finport API client implementation

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::api::{AnalyticsApi, AuthApi, GoalsApi, InsightsApi, TransactionsApi};
use super::gateway::Gateway;
use super::models::{
    Advice, CategorySpending, Forecast, ForecastRequest, Goal, GoalContribution, GoalUpdate,
    IncomeSummary, MonthlySpending, NewGoal, Portrait, Statement, Transaction, TransactionUpdate,
    UploadSummary,
};
use super::multipart::MultipartForm;
use crate::auth::{LoginRequest, SessionManager, TokenPair};
use crate::error::Result;

/// MIME type of uploaded bank statements
const STATEMENT_MIME_TYPE: &str = "application/pdf";

/// Finport API client
///
/// Built once per process and shared by reference; cloning the `Arc` around
/// the session manager keeps every request on the same token lifecycle.
pub struct FinportClient {
    gateway: Gateway,
    session: Arc<SessionManager>,
}

impl FinportClient {
    pub fn new(gateway: Gateway, session: Arc<SessionManager>) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Run an authenticated call with the current bearer token.
    ///
    /// On 401 the session manager refreshes (single-flight) and the call is
    /// repeated exactly once with the new token. Any other outcome, including
    /// a second 401, is returned as is.
    async fn authorized<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.session.bearer_token();
        match call(token.clone()).await {
            Err(err) if err.is_unauthorized() => {
                debug!("Received 401, attempting token refresh");
                let fresh = self
                    .session
                    .recover_from_unauthorized(token.as_deref(), &self.gateway)
                    .await?;
                call(Some(fresh)).await
            }
            other => other,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.authorized(|token| async move {
            self.gateway
                .send(Method::GET, path, None, token.as_deref())
                .await
        })
        .await
    }

    async fn with_body<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<T> {
        let body = &body;
        self.authorized(|token| {
            let method = method.clone();
            async move {
                self.gateway
                    .send(method, path, Some(body), token.as_deref())
                    .await
            }
        })
        .await
    }

    async fn authenticate(&self, path: &str, email: &str, password: &str) -> Result<TokenPair> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let pair: TokenPair = self
            .gateway
            .send(Method::POST, path, Some(&body), None)
            .await?;
        self.session.establish(&pair, Some(email.to_string()))?;
        Ok(pair)
    }
}

#[async_trait]
impl AuthApi for FinportClient {
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        self.authenticate("/auth/login", email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<TokenPair> {
        self.authenticate("/auth/register", email, password).await
    }

    async fn logout(&self) -> Result<()> {
        self.session.logout();
        Ok(())
    }
}

#[async_trait]
impl GoalsApi for FinportClient {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.get("/goals/").await
    }

    async fn create_goal(&self, goal: &NewGoal) -> Result<Goal> {
        self.with_body(Method::POST, "/goals/", serde_json::to_value(goal)?)
            .await
    }

    async fn update_goal(&self, goal_id: i64, update: &GoalUpdate) -> Result<Goal> {
        let path = format!("/goals/{}", goal_id);
        self.with_body(Method::PATCH, &path, serde_json::to_value(update)?)
            .await
    }

    async fn contribute_to_goal(&self, goal_id: i64, amount: f64) -> Result<Goal> {
        let path = format!("/goals/{}/add", goal_id);
        let body = serde_json::to_value(GoalContribution { amount })?;
        self.with_body(Method::POST, &path, body).await
    }
}

#[async_trait]
impl TransactionsApi for FinportClient {
    async fn transaction_history(&self) -> Result<Vec<Transaction>> {
        self.get("/transactions/history").await
    }

    async fn upload_statement(
        &self,
        bank: &str,
        filename: &str,
        pdf: Vec<u8>,
    ) -> Result<UploadSummary> {
        let form = MultipartForm::new()
            .text("bank", bank)
            .file("file", filename, STATEMENT_MIME_TYPE, pdf);
        let form = &form;
        self.authorized(|token| async move {
            self.gateway
                .upload_multipart("/transactions/upload", form, token.as_deref())
                .await
        })
        .await
    }

    async fn update_transaction(
        &self,
        transaction_id: i64,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let path = format!("/transactions/{}", transaction_id);
        self.with_body(Method::PATCH, &path, serde_json::to_value(update)?)
            .await
    }

    async fn list_statements(&self) -> Result<Vec<Statement>> {
        self.get("/statements").await
    }
}

#[async_trait]
impl AnalyticsApi for FinportClient {
    async fn category_breakdown(&self) -> Result<Vec<CategorySpending>> {
        self.get("/analytics/categories").await
    }

    async fn monthly_summary(&self) -> Result<Vec<MonthlySpending>> {
        self.get("/analytics/monthly").await
    }

    async fn income_summary(&self) -> Result<IncomeSummary> {
        self.get("/analytics/income").await
    }
}

#[async_trait]
impl InsightsApi for FinportClient {
    async fn portrait(&self, month: u32, year: i32) -> Result<Portrait> {
        let path = format!("/portrait?month={}&year={}", month, year);
        self.get(&path).await
    }

    async fn monthly_advice(&self) -> Result<Advice> {
        self.get("/advice/monthly").await
    }

    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast> {
        self.with_body(Method::POST, "/forecast/", serde_json::to_value(request)?)
            .await
    }
}
