// src/query/debounce.rs
use std::time::Duration;
use tokio::time::Instant;

/// Single-slot delayed value.
///
/// Holds at most one pending value together with the instant it becomes
/// due. Scheduling again replaces both, which is what collapses a burst of
/// edits into one settled value.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) {
        self.schedule_at(Instant::now(), value);
    }

    pub fn schedule_at(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.window, value));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the value if its quiet window has elapsed by `now`
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Sleep until `deadline`, or forever when there is none.
///
/// Meant as a `select!` arm: with nothing pending the arm never fires.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_is_held_until_window_elapses() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule_at(start, "a");

        assert_eq!(debouncer.take_due(start + Duration::from_millis(299)), None);
        assert_eq!(debouncer.take_due(start + WINDOW), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_rescheduling_replaces_value_and_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule_at(start, "e");
        debouncer.schedule_at(start + Duration::from_millis(100), "en");
        debouncer.schedule_at(start + Duration::from_millis(200), "eng");

        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(500)));
        assert_eq!(debouncer.take_due(start + Duration::from_millis(400)), None);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(500)), Some("eng"));
        assert_eq!(debouncer.take_due(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule_at(start, 1);
        debouncer.cancel();
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.take_due(start + WINDOW), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_until_deadline_waits_for_window() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("settled");
        let started = Instant::now();

        sleep_until_deadline(debouncer.deadline()).await;

        assert!(started.elapsed() >= WINDOW);
        assert_eq!(debouncer.take_due(Instant::now()), Some("settled"));
    }
}
