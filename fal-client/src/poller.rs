//! Queue poller
//!
//! Drives a queued request to completion by polling its status with
//! exponential backoff, then fetches the result.
//!
//! The loop sleeps before every status call (1s, 2s, 4s, 8s, then every
//! 10s). Any error from the queue aborts the whole poll unchanged; nothing is
//! retried. Without a `max_wait` the loop only ends on completion or error.

use fal_core::domain::job::QueueState;
use fal_core::domain::log::LogEntry;
use fal_core::dto::payload::Payload;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::queue::QueueApi;

/// Delay schedule between status calls
///
/// `delay(n) = min(initial * 2^(n-1), max)` for the n-th call, n >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    initial: Duration,
    max: Duration,
}

impl BackoffSchedule {
    /// Create a schedule starting at `initial` and capped at `max`
    pub const fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Delay to wait before the `attempt`-th status call (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << doublings)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(10))
    }
}

/// Options for a poll
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Ask for model logs on every status call
    pub with_logs: bool,
    /// Give up with [`ClientError::Timeout`] once this much time has passed
    pub max_wait: Option<Duration>,
    /// Delays between status calls
    pub schedule: BackoffSchedule,
}

impl PollOptions {
    /// Options with logs enabled or disabled
    pub fn with_logs(with_logs: bool) -> Self {
        Self {
            with_logs,
            ..Self::default()
        }
    }

    /// Set a deadline for the poll
    pub fn max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Progress reported while a request is being driven to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// The request was accepted by the queue
    Submitted { request_id: String },
    /// The request is waiting; the position is reported when known
    Queued { position: Option<u32> },
    /// The request is being processed
    Running,
    /// A log line not reported before
    Log(LogEntry),
}

/// Remembers which log lines were already reported
///
/// Status windows overlap between polls, so lines are keyed by their
/// timestamp and message.
#[derive(Debug, Default)]
pub struct LogDeduper {
    seen: HashSet<(String, String)>,
}

impl LogDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines from `logs` not seen before, in arrival order
    pub fn fresh(&mut self, logs: Vec<LogEntry>) -> Vec<LogEntry> {
        logs.into_iter()
            .filter(|entry| {
                let (timestamp, message) = entry.dedup_key();
                self.seen
                    .insert((timestamp.to_string(), message.to_string()))
            })
            .collect()
    }
}

/// Polls a queued request until it completes
pub struct Poller<'a, Q: QueueApi + ?Sized> {
    queue: &'a Q,
    options: PollOptions,
}

impl<'a, Q: QueueApi + ?Sized> Poller<'a, Q> {
    /// Creates a new poller over `queue`
    pub fn new(queue: &'a Q, options: PollOptions) -> Self {
        Self { queue, options }
    }

    /// Submits a payload and polls it to completion
    ///
    /// # Returns
    /// The raw result body
    pub async fn run_queued<F>(
        &self,
        endpoint_id: &str,
        payload: &Payload,
        mut observer: F,
    ) -> Result<Vec<u8>>
    where
        F: FnMut(PollEvent),
    {
        let receipt = self.queue.submit(endpoint_id, payload).await?;
        observer(PollEvent::Submitted {
            request_id: receipt.request_id.clone(),
        });

        self.poll_until_done(endpoint_id, &receipt.request_id, observer)
            .await
    }

    /// Polls an already submitted request to completion
    ///
    /// # Returns
    /// The raw result body
    pub async fn poll_until_done<F>(
        &self,
        endpoint_id: &str,
        request_id: &str,
        mut observer: F,
    ) -> Result<Vec<u8>>
    where
        F: FnMut(PollEvent),
    {
        let started = Instant::now();
        let mut deduper = LogDeduper::new();
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            let delay = self.options.schedule.delay(attempt);

            if let Some(max_wait) = self.options.max_wait {
                if started.elapsed() + delay > max_wait {
                    return Err(ClientError::Timeout(max_wait));
                }
            }

            time::sleep(delay).await;

            debug!(
                "Polling request {} (attempt {}, waited {:?})",
                request_id, attempt, delay
            );

            let status = self
                .queue
                .status(endpoint_id, request_id, self.options.with_logs)
                .await?;

            if self.options.with_logs {
                for entry in deduper.fresh(status.logs) {
                    observer(PollEvent::Log(entry));
                }
            }

            if status.status.is_terminal() {
                info!(
                    "Request {} completed after {} status call(s)",
                    request_id, attempt
                );
                return self.queue.result(endpoint_id, request_id).await;
            }

            match status.status {
                QueueState::Queued => observer(PollEvent::Queued {
                    position: status.queue_position,
                }),
                QueueState::Running => observer(PollEvent::Running),
                QueueState::Completed => {}
                QueueState::Unknown(state) => {
                    debug!("Request {} reported unknown state {}", request_id, state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fal_core::domain::job::QueueStatus;
    use fal_core::dto::queue::QueueSubmitResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Queue that replays scripted status responses and records calls
    struct ScriptedQueue {
        statuses: Mutex<VecDeque<Result<QueueStatus>>>,
        status_calls: Mutex<Vec<(Instant, bool)>>,
        result_calls: Mutex<usize>,
    }

    impl ScriptedQueue {
        fn new(statuses: Vec<Result<QueueStatus>>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                status_calls: Mutex::new(Vec::new()),
                result_calls: Mutex::new(0),
            }
        }

        fn status_call_count(&self) -> usize {
            self.status_calls.lock().unwrap().len()
        }

        fn result_call_count(&self) -> usize {
            *self.result_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl QueueApi for ScriptedQueue {
        async fn submit(
            &self,
            _endpoint_id: &str,
            _payload: &Payload,
        ) -> Result<QueueSubmitResponse> {
            Ok(QueueSubmitResponse {
                request_id: "r1".to_string(),
                response_url: String::new(),
                status_url: String::new(),
                cancel_url: String::new(),
            })
        }

        async fn status(
            &self,
            _endpoint_id: &str,
            request_id: &str,
            include_logs: bool,
        ) -> Result<QueueStatus> {
            assert_eq!(request_id, "r1");
            self.status_calls
                .lock()
                .unwrap()
                .push((Instant::now(), include_logs));
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected status call"))
        }

        async fn result(&self, _endpoint_id: &str, _request_id: &str) -> Result<Vec<u8>> {
            *self.result_calls.lock().unwrap() += 1;
            Ok(br#"{"images":[{"url":"https://x"}]}"#.to_vec())
        }

        async fn cancel(&self, _endpoint_id: &str, _request_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn status(state: QueueState, position: Option<u32>, logs: Vec<LogEntry>) -> Result<QueueStatus> {
        Ok(QueueStatus {
            status: state,
            queue_position: position,
            logs,
        })
    }

    fn log(timestamp: &str, message: &str) -> LogEntry {
        LogEntry {
            message: message.to_string(),
            level: "INFO".to_string(),
            source: "user".to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    /// A real transport error, produced without touching the network
    fn transport_error() -> ClientError {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("invalid URL must fail to build");
        ClientError::Request(err)
    }

    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(50),
            "expected ~{:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        let schedule = BackoffSchedule::default();
        let delays: Vec<u64> = (1..=7).map(|n| schedule.delay(n).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10, 10]);
    }

    #[test]
    fn test_backoff_is_non_decreasing_and_capped() {
        let schedule = BackoffSchedule::default();
        let mut previous = Duration::ZERO;
        for attempt in 1..200 {
            let delay = schedule.delay(attempt);
            assert!(delay >= previous);
            assert!(delay <= Duration::from_secs(10));
            previous = delay;
        }
        assert_eq!(schedule.delay(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_deduper_keeps_first_seen_order() {
        let mut deduper = LogDeduper::new();
        let first = deduper.fresh(vec![log("1", "a"), log("2", "b")]);
        let second = deduper.fresh(vec![log("2", "b"), log("3", "c")]);

        let messages: Vec<&str> = first
            .iter()
            .chain(second.iter())
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_deduper_distinguishes_same_message_at_other_time() {
        let mut deduper = LogDeduper::new();
        let fresh = deduper.fresh(vec![log("1", "tick"), log("2", "tick"), log("1", "tick")]);
        assert_eq!(fresh.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_running_completed_scenario() {
        let queue = ScriptedQueue::new(vec![
            status(QueueState::Queued, Some(3), vec![]),
            status(QueueState::Running, None, vec![]),
            status(QueueState::Completed, None, vec![]),
        ]);
        let poller = Poller::new(&queue, PollOptions::default());

        let started = Instant::now();
        let mut events = Vec::new();
        let body = poller
            .poll_until_done("fal-ai/flux/dev", "r1", |event| events.push(event))
            .await
            .unwrap();

        assert_eq!(body, br#"{"images":[{"url":"https://x"}]}"#.to_vec());
        assert_eq!(queue.status_call_count(), 3);
        assert_eq!(queue.result_call_count(), 1);
        assert_eq!(
            events,
            vec![PollEvent::Queued { position: Some(3) }, PollEvent::Running]
        );

        let calls = queue.status_calls.lock().unwrap();
        assert_close(calls[0].0 - started, Duration::from_secs(1));
        assert_close(calls[1].0 - calls[0].0, Duration::from_secs(2));
        assert_close(calls[2].0 - calls[1].0, Duration::from_secs(4));
        assert!(calls.iter().all(|(_, include_logs)| !include_logs));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_waits_before_status_call() {
        let queue = ScriptedQueue::new(vec![status(QueueState::Completed, None, vec![])]);
        let poller = Poller::new(&queue, PollOptions::default());

        let started = Instant::now();
        poller
            .poll_until_done("fal-ai/flux/dev", "r1", |_| {})
            .await
            .unwrap();

        let calls = queue.status_calls.lock().unwrap();
        assert_close(calls[0].0 - started, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_aborts_poll() {
        let queue = ScriptedQueue::new(vec![
            Err(transport_error()),
            status(QueueState::Completed, None, vec![]),
        ]);
        let poller = Poller::new(&queue, PollOptions::default());

        let result = poller.poll_until_done("fal-ai/flux/dev", "r1", |_| {}).await;

        assert!(matches!(result, Err(ClientError::Request(_))));
        assert_eq!(queue.status_call_count(), 1);
        assert_eq!(queue.result_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_error_is_passed_through_unchanged() {
        let queue = ScriptedQueue::new(vec![
            status(QueueState::Queued, None, vec![]),
            Err(ClientError::api_error(404, "Request not found")),
        ]);
        let poller = Poller::new(&queue, PollOptions::default());

        let result = poller.poll_until_done("fal-ai/flux/dev", "r1", |_| {}).await;

        match result {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Request not found");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(queue.status_call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_logs_are_emitted_once() {
        let queue = ScriptedQueue::new(vec![
            status(QueueState::Running, None, vec![log("1", "a"), log("2", "b")]),
            status(QueueState::Running, None, vec![log("2", "b"), log("3", "c")]),
            status(QueueState::Completed, None, vec![log("3", "c")]),
        ]);
        let poller = Poller::new(&queue, PollOptions::with_logs(true));

        let mut logged = Vec::new();
        poller
            .poll_until_done("fal-ai/flux/dev", "r1", |event| {
                if let PollEvent::Log(entry) = event {
                    logged.push(entry.message);
                }
            })
            .await
            .unwrap();

        assert_eq!(logged, vec!["a", "b", "c"]);
        let calls = queue.status_calls.lock().unwrap();
        assert!(calls.iter().all(|(_, include_logs)| *include_logs));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logs_are_ignored_when_not_requested() {
        let queue = ScriptedQueue::new(vec![status(
            QueueState::Completed,
            None,
            vec![log("1", "a")],
        )]);
        let poller = Poller::new(&queue, PollOptions::default());

        let mut events = Vec::new();
        poller
            .poll_until_done("fal-ai/flux/dev", "r1", |event| events.push(event))
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_state_keeps_polling() {
        let queue = ScriptedQueue::new(vec![
            status(QueueState::Unknown("PAUSED".to_string()), None, vec![]),
            status(QueueState::Completed, None, vec![]),
        ]);
        let poller = Poller::new(&queue, PollOptions::default());

        let mut events = Vec::new();
        poller
            .poll_until_done("fal-ai/flux/dev", "r1", |event| events.push(event))
            .await
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(queue.status_call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_times_out() {
        let queue = ScriptedQueue::new(vec![
            status(QueueState::Running, None, vec![]),
            status(QueueState::Running, None, vec![]),
            status(QueueState::Completed, None, vec![]),
        ]);
        let options = PollOptions::default().max_wait(Some(Duration::from_secs(5)));
        let poller = Poller::new(&queue, options);

        let result = poller.poll_until_done("fal-ai/flux/dev", "r1", |_| {}).await;

        // 1s + 2s fit in the deadline, the following 4s sleep does not
        assert!(matches!(result, Err(ClientError::Timeout(d)) if d == Duration::from_secs(5)));
        assert_eq!(queue.status_call_count(), 2);
        assert_eq!(queue.result_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_queued_reports_submission() {
        let queue = ScriptedQueue::new(vec![status(QueueState::Completed, None, vec![])]);
        let poller = Poller::new(&queue, PollOptions::default());

        let mut events = Vec::new();
        poller
            .run_queued("fal-ai/flux/dev", &Payload::new(), |event| events.push(event))
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![PollEvent::Submitted {
                request_id: "r1".to_string()
            }]
        );
        assert_eq!(queue.result_call_count(), 1);
    }
}
