// src/core/service_client.rs
//! HTTP client for the job board backend - jobs and session endpoints

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::app_log;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::query::{JobQuery, JobSource};
use crate::types::{
    Credentials, ErrorBody, Job, JobDetailResponse, JobListResponse, JobSummary, JobUpdate, NewJob,
    SessionResponse, User,
};

const JOBS_ENDPOINT: &str = "/api/v1/jobs";
const CREATE_JOB_ENDPOINT: &str = "/api/v1/createJob";
const LOGIN_ENDPOINT: &str = "/api/v1/login";
const SIGNUP_ENDPOINT: &str = "/api/v1/signup";
const LOGOUT_ENDPOINT: &str = "/api/v1/logout";
const ME_ENDPOINT: &str = "/api/v1/me";

pub struct JobApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl JobApiClient {
    /// Create a client with its own cookie jar, so a login carries over to
    /// every later call made through it
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    // ===== Jobs =====

    /// GET /api/v1/jobs with the query's non-empty parameters
    pub async fn list_jobs(
        &self,
        query: &JobQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<JobSummary>> {
        let request = self
            .request(Method::GET, JOBS_ENDPOINT)
            .query(&query.query_pairs());

        let response: JobListResponse = self.send_json(request, Some(cancel)).await?;
        Ok(response.jobs.unwrap_or_default())
    }

    pub async fn get_job(&self, id: &str, cancel: &CancellationToken) -> ApiResult<Option<Job>> {
        let request = self.request(Method::GET, &Self::job_path(id));
        let response: JobDetailResponse = self.send_json(request, Some(cancel)).await?;
        Ok(response.job)
    }

    /// POST /api/v1/createJob; the created job is returned when the backend
    /// echoes it
    pub async fn create_job(&self, job: &NewJob) -> ApiResult<Option<Job>> {
        let request = self.request(Method::POST, CREATE_JOB_ENDPOINT).json(job);
        let body = self.send(request, None).await?;
        Ok(Self::decode_lenient::<JobDetailResponse>(&body).and_then(|r| r.job))
    }

    pub async fn update_job(&self, id: &str, update: &JobUpdate) -> ApiResult<()> {
        let request = self.request(Method::PUT, &Self::job_path(id)).json(update);
        self.send(request, None).await?;
        Ok(())
    }

    pub async fn delete_job(&self, id: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &Self::job_path(id));
        self.send(request, None).await?;
        Ok(())
    }

    // ===== Session =====

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Option<User>> {
        let request = self.request(Method::POST, LOGIN_ENDPOINT).json(credentials);
        let body = self.send(request, None).await?;
        Ok(Self::decode_lenient::<SessionResponse>(&body).and_then(|r| r.user))
    }

    pub async fn signup(&self, credentials: &Credentials) -> ApiResult<Option<User>> {
        let request = self.request(Method::POST, SIGNUP_ENDPOINT).json(credentials);
        let body = self.send(request, None).await?;
        Ok(Self::decode_lenient::<SessionResponse>(&body).and_then(|r| r.user))
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let request = self
            .request(Method::POST, LOGOUT_ENDPOINT)
            .json(&serde_json::json!({}));
        self.send(request, None).await?;
        Ok(())
    }

    /// GET /api/v1/me - the user behind the session cookie, if any
    pub async fn current_user(&self, cancel: &CancellationToken) -> ApiResult<Option<User>> {
        let request = self.request(Method::GET, ME_ENDPOINT);
        let response: SessionResponse = self.send_json(request, Some(cancel)).await?;
        Ok(response.user)
    }

    // ===== Plumbing =====

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, endpoint))
    }

    fn job_path(id: &str) -> String {
        format!("{}/{}", JOBS_ENDPOINT, id)
    }

    async fn send_json<R>(
        &self,
        request: RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let body = self.send(request, cancel).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send and read the whole body. A fired token wins over whatever the
    /// exchange was doing.
    async fn send(
        &self,
        request: RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> ApiResult<String> {
        let request = request.build()?;

        match cancel {
            Some(token) => {
                let method = request.method().clone();
                let url = request.url().clone();
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        app_log!(trace, "Request canceled: {} {}", method, url);
                        Err(ApiError::Canceled)
                    }
                    result = self.exchange(request) => result,
                }
            }
            None => self.exchange(request).await,
        }
    }

    /// Non-2xx becomes `ApiError::Status` carrying the backend's message
    async fn exchange(&self, request: reqwest::Request) -> ApiResult<String> {
        let method = request.method().clone();
        let url = request.url().clone();
        app_log!(debug, "Making request to: {} {}", method, url);

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            app_log!(debug, "Response received: {} {}", status, url);
            Ok(body)
        } else {
            app_log!(error, "Response error: {} {} {}", status, body, url);
            Err(ApiError::Status {
                status,
                message: Self::error_message(&body),
            })
        }
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                }
            })
    }

    fn decode_lenient<R: DeserializeOwned>(body: &str) -> Option<R> {
        if body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(body).ok()
    }
}

#[async_trait]
impl JobSource for JobApiClient {
    async fn list_jobs(
        &self,
        query: &JobQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<JobSummary>> {
        JobApiClient::list_jobs(self, query, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            JobApiClient::error_message(r#"{"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(JobApiClient::error_message("Bad gateway"), "Bad gateway");
        assert_eq!(JobApiClient::error_message(""), "Unknown error");
        assert_eq!(JobApiClient::error_message(r#"{"message":""}"#), r#"{"message":""}"#);
    }

    #[test]
    fn test_job_path() {
        assert_eq!(JobApiClient::job_path("abc"), "/api/v1/jobs/abc");
    }
}
