// src/types/response.rs
use serde::Deserialize;

use super::job::{Job, JobSummary};
use super::user::User;

// ===== Backend Response Types =====

#[derive(Debug, Default, Deserialize)]
pub struct JobListResponse {
    #[serde(default)]
    pub jobs: Option<Vec<JobSummary>>,
}

#[derive(Debug, Deserialize)]
pub struct JobDetailResponse {
    #[serde(default)]
    pub job: Option<Job>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Body shape of a failed request; `message` is human readable when present
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
