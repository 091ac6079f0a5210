// src/types/mod.rs
pub mod job;
mod lenient;
pub mod response;
pub mod user;

pub use job::{Job, JobDraft, JobSummary, JobType, JobUpdate, NewJob, SalaryRange};
pub use response::{ErrorBody, JobDetailResponse, JobListResponse, SessionResponse};
pub use user::{Credentials, User};
