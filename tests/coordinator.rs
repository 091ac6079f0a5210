use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use job_board::error::{ApiError, ApiResult};
use job_board::query::{
    CoordinatorSettings, FilterPatch, JobListView, JobQuery, JobQueryCoordinator, JobSource,
};
use job_board::types::JobSummary;
use reqwest::StatusCode;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

struct Call {
    query: JobQuery,
    cancel: CancellationToken,
    reply: Option<oneshot::Sender<ApiResult<Vec<JobSummary>>>>,
}

/// Records every fetch. With `auto` set it answers at once, otherwise each
/// call waits until the test replies to it.
#[derive(Default)]
struct FakeSource {
    calls: Mutex<Vec<Call>>,
    auto: Option<Vec<JobSummary>>,
}

impl FakeSource {
    fn manual() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn answering(jobs: Vec<JobSummary>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            auto: Some(jobs),
        })
    }

    fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn query(&self, index: usize) -> JobQuery {
        self.calls.lock().unwrap()[index].query.clone()
    }

    fn token(&self, index: usize) -> CancellationToken {
        self.calls.lock().unwrap()[index].cancel.clone()
    }

    fn reply(&self, index: usize, result: ApiResult<Vec<JobSummary>>) {
        let sender = self.calls.lock().unwrap()[index]
            .reply
            .take()
            .expect("call already answered");
        let _ = sender.send(result);
    }

    async fn wait_for_calls(&self, count: usize) {
        for _ in 0..1000 {
            if self.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("expected {count} calls, saw {}", self.len());
    }
}

#[async_trait]
impl JobSource for FakeSource {
    async fn list_jobs(
        &self,
        query: &JobQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<JobSummary>> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Call {
            query: query.clone(),
            cancel: cancel.clone(),
            reply: Some(tx),
        });

        if let Some(jobs) = &self.auto {
            return Ok(jobs.clone());
        }
        rx.await.unwrap_or(Err(ApiError::Canceled))
    }
}

fn spawn(source: Arc<FakeSource>) -> JobQueryCoordinator {
    JobQueryCoordinator::spawn(source, CoordinatorSettings::default())
}

async fn next_view(view: &mut watch::Receiver<JobListView>) -> JobListView {
    tokio::time::timeout(Duration::from_secs(5), view.changed())
        .await
        .expect("view update in time")
        .expect("coordinator alive");
    view.borrow_and_update().clone()
}

fn ids(view: &JobListView) -> Vec<&str> {
    view.jobs.iter().map(|job| job.id.as_str()).collect()
}

fn engineers() -> Vec<JobSummary> {
    vec![
        JobSummary::new("1", "Engineer", "Full-time"),
        JobSummary::new("2", "Senior Engineer", "Full-time"),
    ]
}

#[tokio::test(start_paused = true)]
async fn initial_fetch_has_no_parameters() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    let mut view = coordinator.subscribe();

    source.wait_for_calls(1).await;
    assert_eq!(source.query(0), JobQuery::default());
    assert!(source.query(0).query_pairs().is_empty());
    assert!(!coordinator.view().loaded);

    source.reply(0, Ok(engineers()));
    let loaded = next_view(&mut view).await;
    assert!(loaded.loaded);
    assert_eq!(ids(&loaded), vec!["1", "2"]);
}

#[tokio::test(start_paused = true)]
async fn search_burst_collapses_into_one_fetch_with_final_text() {
    let source = FakeSource::answering(Vec::new());
    let coordinator = spawn(source.clone());
    source.wait_for_calls(1).await;

    coordinator.set_filter(FilterPatch::default().search("e"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.set_filter(FilterPatch::default().search("en"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.set_filter(FilterPatch::default().search("eng"));

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(source.len(), 1, "nothing fetched inside the quiet window");

    source.wait_for_calls(2).await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(source.len(), 2);
    assert_eq!(source.query(1).search.as_deref(), Some("eng"));
}

#[tokio::test(start_paused = true)]
async fn filter_changes_fetch_without_debounce() {
    let source = FakeSource::answering(Vec::new());
    let coordinator = spawn(source.clone());
    source.wait_for_calls(1).await;

    coordinator.set_filter(FilterPatch::default().job_type(Some("Contract".into())));
    source.wait_for_calls(2).await;

    let query = source.query(1);
    assert_eq!(query.job_type.as_deref(), Some("Contract"));
    assert_eq!(query.search, None);
}

#[tokio::test(start_paused = true)]
async fn unchanged_parameters_do_not_refetch() {
    let source = FakeSource::answering(Vec::new());
    let coordinator = spawn(source.clone());
    source.wait_for_calls(1).await;

    coordinator.set_filter(FilterPatch::default().job_type(Some(String::new())));
    coordinator.set_filter(FilterPatch::default().search("x"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.set_filter(FilterPatch::default().search(""));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn raw_search_reranks_before_debounce_settles() {
    let source = FakeSource::answering(engineers());
    let coordinator = spawn(source.clone());
    let mut view = coordinator.subscribe();
    assert_eq!(ids(&next_view(&mut view).await), vec!["1", "2"]);

    coordinator.set_filter(FilterPatch::default().search("Engineer"));
    let exact = next_view(&mut view).await;
    assert_eq!(ids(&exact), vec!["1"]);
    assert_eq!(source.len(), 1, "re-rank happens without a fetch");

    coordinator.set_filter(FilterPatch::default().search("engin"));
    let partial = next_view(&mut view).await;
    assert_eq!(ids(&partial), vec!["1", "2"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_response_cannot_overwrite_newer_one() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    let mut view = coordinator.subscribe();
    source.wait_for_calls(1).await;

    coordinator.set_filter(FilterPatch::default().location(Some("pune".into())));
    source.wait_for_calls(2).await;
    assert!(source.token(0).is_cancelled());
    assert!(!source.token(1).is_cancelled());

    source.reply(1, Ok(vec![JobSummary::new("fresh", "Analyst", "Full-time")]));
    assert_eq!(ids(&next_view(&mut view).await), vec!["fresh"]);

    source.reply(0, Ok(vec![JobSummary::new("stale", "Analyst", "Full-time")]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!view.has_changed().unwrap_or(false));
    assert_eq!(ids(&coordinator.view()), vec!["fresh"]);
}

#[tokio::test(start_paused = true)]
async fn stale_response_arriving_first_is_ignored() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    let mut view = coordinator.subscribe();
    source.wait_for_calls(1).await;

    coordinator.set_filter(FilterPatch::default().remote_only(true));
    source.wait_for_calls(2).await;

    source.reply(0, Ok(vec![JobSummary::new("stale", "Analyst", "Full-time")]));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!view.has_changed().unwrap_or(false));
    assert_eq!(coordinator.view(), JobListView::default());

    source.reply(1, Ok(vec![JobSummary::new("fresh", "Analyst", "Full-time")]));
    let fresh = next_view(&mut view).await;
    assert_eq!(ids(&fresh), vec!["fresh"]);
    assert!(source.query(1).remote);
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_last_good_results() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    let mut view = coordinator.subscribe();
    source.wait_for_calls(1).await;
    source.reply(0, Ok(engineers()));
    next_view(&mut view).await;

    coordinator.set_filter(FilterPatch::default().salary(Some(50_000), Some(80_000)));
    source.wait_for_calls(2).await;
    source.reply(
        1,
        Err(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        }),
    );

    coordinator.set_filter(FilterPatch::default().salary(None, None));
    source.wait_for_calls(3).await;
    source.reply(2, Err(ApiError::Canceled));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!view.has_changed().unwrap_or(false));
    let current = coordinator.view();
    assert!(current.loaded);
    assert_eq!(ids(&current), vec!["1", "2"]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_in_flight_fetch_and_ignores_its_outcome() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    let view = coordinator.subscribe();
    source.wait_for_calls(1).await;

    coordinator.shutdown().await;
    assert!(source.token(0).is_cancelled());

    source.reply(0, Ok(engineers()));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(*view.borrow(), JobListView::default());
    assert_eq!(source.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_tears_down() {
    let source = FakeSource::manual();
    let coordinator = spawn(source.clone());
    source.wait_for_calls(1).await;

    drop(coordinator);
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(source.token(0).is_cancelled());
}
