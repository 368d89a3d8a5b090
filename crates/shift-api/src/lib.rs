//! HTTP client for the shift backend.
//!
//! Implements the collaborator contracts from `shift-core` (project/task
//! directory, reward service, notification sink) against the backend's
//! REST surface. Failures are mapped into the domain's [`RemoteError`] at
//! the trait boundary; callers log and notify but never retry.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shift_core::{
    AssignmentId, Employee, EmployeeId, NewReward, NotificationSink, ProjectDirectory, ProjectId,
    ProjectRef, RemoteError, Reward, RewardAssignment, RewardId, RewardPatch, RewardService,
    RewardStatus, TaskRef,
};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL was unusable.
    #[error("invalid base URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse a response body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ApiError> for RemoteError {
    fn from(err: ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// Shift backend client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or not http(s), or if the
    /// HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(ApiError::InvalidBaseUrl {
                reason: "base URL cannot be empty",
            });
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidBaseUrl {
                reason: "base URL must start with http:// or https://",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_raw(builder).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }

    async fn send_raw(&self, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }
        Ok(body)
    }
}

/// Extracts a structured API error from an error response body, falling
/// back to the raw body.
fn parse_api_error(status: u16, body: &str) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .map_or_else(|_| body.to_string(), |payload| payload.error.message);
    ApiError::Api { status, message }
}

#[derive(Debug, Serialize)]
struct AssignRequest<'a> {
    employee_id: &'a EmployeeId,
    reward_id: &'a RewardId,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: RewardStatus,
}

#[derive(Debug, Serialize)]
struct NotifyRequest<'a> {
    level: &'a str,
    title: &'a str,
    message: &'a str,
}

impl ProjectDirectory for Client {
    async fn list_projects(&self) -> Result<Vec<ProjectRef>, RemoteError> {
        let builder = self.request(reqwest::Method::GET, "/projects");
        Ok(self.send(builder).await?)
    }

    async fn list_tasks(&self, project: &ProjectId) -> Result<Vec<TaskRef>, RemoteError> {
        let builder = self.request(reqwest::Method::GET, &format!("/projects/{project}/tasks"));
        Ok(self.send(builder).await?)
    }
}

impl RewardService for Client {
    async fn get_rewards(&self) -> Result<Vec<Reward>, RemoteError> {
        let builder = self.request(reqwest::Method::GET, "/rewards");
        Ok(self.send(builder).await?)
    }

    async fn create_reward(&self, reward: &NewReward) -> Result<Reward, RemoteError> {
        let builder = self.request(reqwest::Method::POST, "/rewards").json(reward);
        Ok(self.send(builder).await?)
    }

    async fn update_reward(
        &self,
        id: &RewardId,
        patch: &RewardPatch,
    ) -> Result<Reward, RemoteError> {
        let builder = self
            .request(reqwest::Method::PATCH, &format!("/rewards/{id}"))
            .json(patch);
        Ok(self.send(builder).await?)
    }

    async fn assign_reward(
        &self,
        employee: &EmployeeId,
        reward: &RewardId,
    ) -> Result<RewardAssignment, RemoteError> {
        let builder = self
            .request(reqwest::Method::POST, "/reward-assignments")
            .json(&AssignRequest {
                employee_id: employee,
                reward_id: reward,
            });
        Ok(self.send(builder).await?)
    }

    async fn update_assignment_status(
        &self,
        id: &AssignmentId,
        status: RewardStatus,
    ) -> Result<(), RemoteError> {
        let builder = self
            .request(
                reqwest::Method::PUT,
                &format!("/reward-assignments/{id}/status"),
            )
            .json(&StatusRequest { status });
        self.send_raw(builder).await.map_err(RemoteError::from)?;
        Ok(())
    }

    async fn get_employees(&self, owner: &EmployeeId) -> Result<Vec<Employee>, RemoteError> {
        let builder = self.request(
            reqwest::Method::GET,
            &format!("/employees?owner={owner}"),
        );
        Ok(self.send(builder).await?)
    }
}

impl NotificationSink for Client {
    async fn notify_success(&self, title: &str, message: &str) -> Result<(), RemoteError> {
        self.notify("success", title, message).await
    }

    async fn notify_error(&self, title: &str, message: &str) -> Result<(), RemoteError> {
        self.notify("error", title, message).await
    }
}

impl Client {
    async fn notify(&self, level: &str, title: &str, message: &str) -> Result<(), RemoteError> {
        let builder = self
            .request(reqwest::Method::POST, "/notifications")
            .json(&NotifyRequest {
                level,
                title,
                message,
            });
        if let Err(err) = self.send_raw(builder).await {
            // Fire-and-forget: a lost notification is only worth a log line.
            tracing::warn!(%err, "notification delivery failed");
            return Err(RemoteError::from(err));
        }
        Ok(())
    }
}
