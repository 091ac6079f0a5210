// src/query/mod.rs
//! Job list querying: filters, debounced search, one request at a time,
//! and the client-side re-rank over what the backend returned

pub mod coordinator;
pub mod debounce;
pub mod epoch;
pub mod filter;
pub mod rerank;
pub mod source;

pub use coordinator::{CoordinatorSettings, JobListView, JobQueryCoordinator};
pub use debounce::Debouncer;
pub use epoch::{RequestSlot, Ticket};
pub use filter::{FilterPatch, FilterState, JobQuery, SalaryBand};
pub use rerank::{rerank, rerank_owned};
pub use source::JobSource;
