//! Client for the job board backend: a debounced, cancellable job list
//! coordinator over a cookie-session HTTP client, plus the CLI built on it.

pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod logging;
pub mod query;
pub mod session;
pub mod types;

pub use crate::config::ConfigManager;
pub use crate::core::JobApiClient;
pub use error::{ApiError, ApiResult};
pub use query::{FilterPatch, JobListView, JobQueryCoordinator};
