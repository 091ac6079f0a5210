// src/query/coordinator.rs
//! Job list coordinator: one task owning the filter, the debounce register,
//! the request slot and the last good result set

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::debounce::{sleep_until_deadline, Debouncer};
use super::epoch::RequestSlot;
use super::filter::{FilterPatch, FilterState, JobQuery};
use super::rerank::rerank_owned;
use super::source::JobSource;
use crate::app_log;
use crate::config::QueryConfig;
use crate::error::ApiResult;
use crate::types::JobSummary;

/// What renderers see
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobListView {
    /// Re-ranked result set, in server order within each tier
    pub jobs: Vec<JobSummary>,
    /// True once any fetch has succeeded
    pub loaded: bool,
}

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub debounce: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        QueryConfig::default().into()
    }
}

impl From<QueryConfig> for CoordinatorSettings {
    fn from(config: QueryConfig) -> Self {
        Self {
            debounce: config.debounce(),
        }
    }
}

enum Command {
    SetFilter(FilterPatch),
}

struct FetchOutcome {
    epoch: u64,
    result: ApiResult<Vec<JobSummary>>,
}

/// Handle to a running coordinator.
///
/// Dropping the handle tears the coordinator down the same way
/// [`JobQueryCoordinator::shutdown`] does, without waiting for it.
pub struct JobQueryCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<JobListView>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl JobQueryCoordinator {
    /// Start the coordinator with empty filters. The initial unfiltered
    /// fetch is issued right away.
    pub fn spawn(source: Arc<dyn JobSource>, settings: CoordinatorSettings) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(JobListView::default());
        let shutdown = CancellationToken::new();

        let worker = Worker {
            source,
            filter: FilterState::default(),
            debounced_search: String::new(),
            debounce: Debouncer::new(settings.debounce),
            slot: RequestSlot::new(),
            raw: Vec::new(),
            loaded: false,
            view_tx,
        };
        let task = tokio::spawn(worker.run(command_rx, shutdown.clone()));

        Self {
            commands,
            view,
            shutdown,
            worker: Some(task),
        }
    }

    /// Merge `patch` into the filter state
    pub fn set_filter(&self, patch: FilterPatch) {
        if patch.is_empty() {
            return;
        }
        if self.commands.send(Command::SetFilter(patch)).is_err() {
            app_log!(warn, "Filter change ignored, coordinator already stopped");
        }
    }

    /// Snapshot of the current view
    pub fn view(&self) -> JobListView {
        self.view.borrow().clone()
    }

    /// Change notifications for renderers
    pub fn subscribe(&self) -> watch::Receiver<JobListView> {
        self.view.clone()
    }

    /// Cancel any in-flight fetch and stop the coordinator
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.worker.take() {
            if let Err(e) = task.await {
                app_log!(error, "Coordinator task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for JobQueryCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Worker {
    source: Arc<dyn JobSource>,
    filter: FilterState,
    debounced_search: String,
    debounce: Debouncer<String>,
    slot: RequestSlot,
    raw: Vec<JobSummary>,
    loaded: bool,
    view_tx: watch::Sender<JobListView>,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        shutdown: CancellationToken,
    ) {
        let (outcome_tx, mut outcomes) = mpsc::unbounded_channel();
        self.evaluate(&outcome_tx);

        loop {
            let deadline = self.debounce.deadline();
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(Command::SetFilter(patch)) => self.set_filter(patch, &outcome_tx),
                    None => break,
                },
                Some(outcome) = outcomes.recv() => self.apply_outcome(outcome),
                _ = sleep_until_deadline(deadline) => {
                    if let Some(search) = self.debounce.take_due(Instant::now()) {
                        self.debounced_search = search;
                        self.evaluate(&outcome_tx);
                    }
                }
            }
        }

        self.debounce.cancel();
        self.slot.close();
        app_log!(debug, "Job query coordinator stopped");
    }

    fn set_filter(&mut self, patch: FilterPatch, outcomes: &mpsc::UnboundedSender<FetchOutcome>) {
        if self.filter.apply(patch) {
            self.debounce.schedule(self.filter.search.clone());
            // Re-rank uses the raw text, so the view follows typing at once
            self.publish();
        }
        self.evaluate(outcomes);
    }

    /// Issue a fetch if the effective query moved since the last one
    fn evaluate(&mut self, outcomes: &mpsc::UnboundedSender<FetchOutcome>) {
        let query = JobQuery::from_filter(&self.filter, &self.debounced_search);
        let Some(ticket) = self.slot.issue(&query) else {
            return;
        };

        app_log!(debug, epoch = ticket.epoch, "Fetching jobs: {:?}", query.query_pairs());

        let source = Arc::clone(&self.source);
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
            let result = source.list_jobs(&query, &ticket.cancel).await;
            // The receiver is gone once the coordinator stopped
            let _ = outcomes.send(FetchOutcome {
                epoch: ticket.epoch,
                result,
            });
        });
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if !self.slot.settle(outcome.epoch) {
            app_log!(trace, epoch = outcome.epoch, "Discarding superseded fetch outcome");
            return;
        }

        match outcome.result {
            Ok(jobs) => {
                app_log!(debug, epoch = outcome.epoch, "Fetched {} jobs", jobs.len());
                self.raw = jobs;
                self.loaded = true;
                self.publish();
            }
            Err(e) if e.is_cancellation() => {}
            Err(e) => {
                app_log!(error, "Error fetching jobs: {}", e);
            }
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(JobListView {
            jobs: rerank_owned(&self.raw, &self.filter.search),
            loaded: self.loaded,
        });
    }
}
