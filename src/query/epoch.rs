// src/query/epoch.rs
use tokio_util::sync::CancellationToken;

use super::filter::JobQuery;

/// Right to publish one fetch's outcome
#[derive(Debug, Clone)]
pub struct Ticket {
    pub epoch: u64,
    pub cancel: CancellationToken,
}

/// The one-request-at-a-time slot.
///
/// Each issued fetch takes the next epoch and its own cancellation token;
/// issuing again cancels the previous token. Only an outcome carrying the
/// current epoch may be applied. Closing (or dropping) the slot cancels
/// whatever is in flight and refuses all later outcomes and issues.
#[derive(Debug, Default)]
pub struct RequestSlot {
    epoch: u64,
    last_issued: Option<JobQuery>,
    in_flight: Option<CancellationToken>,
    closed: bool,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a fetch for `query` unless it matches the last issued one
    pub fn issue(&mut self, query: &JobQuery) -> Option<Ticket> {
        if self.closed || self.last_issued.as_ref() == Some(query) {
            return None;
        }

        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.epoch += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.last_issued = Some(query.clone());

        Some(Ticket {
            epoch: self.epoch,
            cancel,
        })
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        !self.closed && epoch == self.epoch
    }

    /// Accept an outcome for `epoch`. Returns false for stale epochs and
    /// after close; the in-flight handle is released on acceptance.
    pub fn settle(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn close(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.closed = true;
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: &str) -> JobQuery {
        JobQuery {
            search: Some(search.to_string()),
            ..JobQuery::default()
        }
    }

    #[test]
    fn test_first_issue_always_fetches() {
        let mut slot = RequestSlot::new();
        let ticket = slot.issue(&JobQuery::default()).unwrap();
        assert_eq!(ticket.epoch, 1);
        assert!(slot.in_flight());
    }

    #[test]
    fn test_same_query_is_not_reissued() {
        let mut slot = RequestSlot::new();
        slot.issue(&query("a")).unwrap();
        assert!(slot.issue(&query("a")).is_none());
        assert_eq!(slot.epoch(), 1);
    }

    #[test]
    fn test_new_issue_cancels_and_supersedes_previous() {
        let mut slot = RequestSlot::new();
        let first = slot.issue(&query("a")).unwrap();
        let second = slot.issue(&query("b")).unwrap();

        assert!(first.cancel.is_cancelled());
        assert!(!second.cancel.is_cancelled());
        assert!(!slot.settle(first.epoch));
        assert!(slot.settle(second.epoch));
        assert!(!slot.in_flight());
    }

    #[test]
    fn test_returning_to_an_older_query_fetches_again() {
        let mut slot = RequestSlot::new();
        slot.issue(&query("a")).unwrap();
        slot.issue(&query("b")).unwrap();
        let third = slot.issue(&query("a")).unwrap();
        assert_eq!(third.epoch, 3);
    }

    #[test]
    fn test_close_cancels_and_refuses_everything() {
        let mut slot = RequestSlot::new();
        let ticket = slot.issue(&query("a")).unwrap();
        slot.close();

        assert!(ticket.cancel.is_cancelled());
        assert!(!slot.settle(ticket.epoch));
        assert!(slot.issue(&query("b")).is_none());
    }

    #[test]
    fn test_drop_cancels_in_flight() {
        let mut slot = RequestSlot::new();
        let ticket = slot.issue(&query("a")).unwrap();
        drop(slot);
        assert!(ticket.cancel.is_cancelled());
    }
}
