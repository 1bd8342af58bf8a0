//! Repository seam and reqwest client for the training-management API
//!
//! Every mutation the workflow performs goes through [`PlanRepository`]; the
//! trait exists so the workflow layer can be exercised against a recording
//! fake. [`HttpClient`] is the production implementation.
//!
//! Requests are never retried automatically: any failure surfaces to the user
//! on first occurrence, and state is reconciled only after a confirmed
//! response.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CreatedBy, DayPlan, Trainee};
use crate::error::ApiError;
use crate::session::Session;

/// Payload for creating one trainee's day plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayPlanRequest {
    /// Owning trainee's user id
    pub trainee_id: String,

    /// The date the plan covers
    pub date: NaiveDate,

    /// Task lines (blank rows already filtered out)
    pub tasks: Vec<TaskDraft>,

    /// Who is authoring the plan
    pub created_by: CreatedBy,
}

/// One task line of a plan being created
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub time_allocation: String,
}

/// Payload for a reviewer decision
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// "approved" or "rejected"
    pub status: String,

    /// Reviewer remarks (required for rejections, enforced upstream)
    pub review_comments: String,
}

/// Generic `{ success, message? }` acknowledgement
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckEnvelope {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayPlansEnvelope {
    #[serde(default)]
    day_plans: Vec<DayPlan>,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<Trainee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEnvelope {
    success: bool,

    #[serde(default)]
    day_plan: Option<DayPlan>,

    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

/// Repository of day plans and the trainee roster
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Fetch all day plans visible to the current identity
    async fn list_day_plans(&self) -> Result<Vec<DayPlan>, ApiError>;

    /// Fetch the trainee roster
    async fn list_trainees(&self) -> Result<Vec<Trainee>, ApiError>;

    /// Create one trainee's day plan
    async fn create_day_plan(&self, request: &CreateDayPlanRequest) -> Result<DayPlan, ApiError>;

    /// Submit a reviewer decision through the standard review route
    async fn review_day_plan(&self, plan_id: &str, review: &ReviewRequest) -> Result<(), ApiError>;

    /// Submit a reviewer decision through the end-of-day review route
    async fn review_end_of_day(&self, plan_id: &str, review: &ReviewRequest) -> Result<(), ApiError>;

    /// Delete a day plan
    async fn delete_day_plan(&self, plan_id: &str) -> Result<(), ApiError>;
}

/// reqwest-backed [`PlanRepository`]
pub struct HttpClient {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Build a client for the given base URL, attaching the session token
    /// when one is available.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64, session: Option<&Session>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            token: session.map(|s| s.token.clone()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request with the session cookie attached. Errors out before
    /// touching the network when there is no token to attach.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::Unauthorized)?;
        let request_id = uuid::Uuid::now_v7();
        debug!(%request_id, %method, path, "API request");

        Ok(self
            .http
            .request(method, self.url(path))
            .header("Cookie", format!("token={}", token))
            .header("X-Request-Id", request_id.to_string()))
    }

    /// Convert a non-success response into an [`ApiError`], extracting the
    /// server's message when the body carries one.
    async fn error_for_status(response: Response) -> ApiError {
        let status = response.status().as_u16();
        if status == 401 {
            return ApiError::Unauthorized;
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or(text);

        ApiError::Api { status, message }
    }

    /// Parse a `{ success, message? }` acknowledgement, treating an explicit
    /// `success: false` as a server-reported business error.
    async fn expect_ack(response: Response) -> Result<(), ApiError> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let ack: AckEnvelope = response.json().await?;
        if ack.success {
            Ok(())
        } else {
            Err(ApiError::Api {
                status,
                message: ack.message.unwrap_or_else(|| "Request was not successful".to_string()),
            })
        }
    }
}

#[async_trait]
impl PlanRepository for HttpClient {
    async fn list_day_plans(&self) -> Result<Vec<DayPlan>, ApiError> {
        let response = self.request(Method::GET, "/api/day-plans")?.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let envelope: DayPlansEnvelope = response.json().await?;
        debug!(count = envelope.day_plans.len(), "Fetched day plans");
        Ok(envelope.day_plans)
    }

    async fn list_trainees(&self) -> Result<Vec<Trainee>, ApiError> {
        let response = self
            .request(Method::GET, "/api/users")?
            .query(&[("role", "trainee")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let envelope: UsersEnvelope = response.json().await?;
        debug!(count = envelope.users.len(), "Fetched roster");
        Ok(envelope.users)
    }

    async fn create_day_plan(&self, request: &CreateDayPlanRequest) -> Result<DayPlan, ApiError> {
        let response = self
            .request(Method::POST, "/api/day-plans")?
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let envelope: CreateEnvelope = response.json().await?;
        if !envelope.success {
            return Err(ApiError::Api {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Plan creation was not successful".to_string()),
            });
        }

        envelope
            .day_plan
            .ok_or_else(|| ApiError::InvalidResponse("creation succeeded but no dayPlan returned".to_string()))
    }

    async fn review_day_plan(&self, plan_id: &str, review: &ReviewRequest) -> Result<(), ApiError> {
        let path = format!("/api/day-plans/{}/review", plan_id);
        let response = self.request(Method::PUT, &path)?.json(review).send().await?;
        Self::expect_ack(response).await
    }

    async fn review_end_of_day(&self, plan_id: &str, review: &ReviewRequest) -> Result<(), ApiError> {
        let path = format!("/api/day-plans/{}/eod-review", plan_id);
        let response = self.request(Method::PUT, &path)?.json(review).send().await?;
        Self::expect_ack(response).await
    }

    async fn delete_day_plan(&self, plan_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/day-plans/{}", plan_id);
        let response = self.request(Method::DELETE, &path)?.send().await?;
        Self::expect_ack(response).await
    }
}
