// src/query/source.rs
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::filter::JobQuery;
use crate::error::ApiResult;
use crate::types::JobSummary;

/// Where the coordinator gets job lists from.
///
/// Implementations should resolve to [`crate::error::ApiError::Canceled`]
/// once `cancel` fires; the coordinator discards superseded outcomes either
/// way.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn list_jobs(
        &self,
        query: &JobQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<JobSummary>>;
}
