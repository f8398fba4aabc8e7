//! Clock sync against the time proxy.
//!
//! [`ClockSync`] owns the background poller. Dropping or stopping it aborts
//! the poller, so a fetch still in flight never updates a stopped clock.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use stp_core::clock::{ClockDisplay, ClockReference, DisplayZone, SyncStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{ClockError, TimeSource};

/// Default request timeout for the time endpoint.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the poller refreshes network time by default.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

/// HTTP client for the time proxy endpoint.
#[derive(Clone)]
pub struct TimeSyncClient {
    http: reqwest::Client,
    url: String,
}

impl fmt::Debug for TimeSyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSyncClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct SyncPayload {
    datetime: Option<String>,
}

impl TimeSyncClient {
    /// Creates a client for the endpoint at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, ClockError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ClockError::ClientBuild)?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the current network time from the endpoint.
    pub async fn fetch(&self) -> Result<DateTime<Utc>, ClockError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClockError::SyncFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: SyncPayload = serde_json::from_str(&body)
            .map_err(|err| ClockError::InvalidResponse(err.to_string()))?;
        let raw = payload
            .datetime
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ClockError::InvalidResponse("missing datetime".to_string()))?;

        DateTime::parse_from_rfc3339(raw.trim())
            .map(|time| time.with_timezone(&Utc))
            .map_err(|err| ClockError::InvalidResponse(format!("bad datetime {raw:?}: {err}")))
    }
}

#[async_trait]
impl TimeSource for TimeSyncClient {
    async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
        self.fetch().await
    }
}

/// Snapshot of the clock: sync outcome plus the reference to tick from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockState {
    pub status: SyncStatus,
    pub reference: ClockReference,
}

/// A running clock poller.
///
/// Fetches immediately, then every `refresh`. Failures switch the clock to
/// device time until the next successful poll.
#[derive(Debug)]
pub struct ClockSync {
    state: watch::Receiver<ClockState>,
    task: JoinHandle<()>,
}

impl ClockSync {
    /// Starts polling `source`. Must be called inside a Tokio runtime.
    pub fn start(source: Arc<dyn TimeSource>, refresh: Duration) -> Self {
        let (tx, rx) = watch::channel(ClockState::default());
        let refresh = refresh.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let next = match source.network_time().await {
                    Ok(time) => {
                        tracing::debug!(%time, "clock synced");
                        ClockState {
                            status: SyncStatus::Ready,
                            reference: ClockReference::synced(time, Instant::now()),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "clock sync failed, using device time");
                        ClockState {
                            status: SyncStatus::Fallback,
                            reference: ClockReference::unsynced(Instant::now()),
                        }
                    }
                };
                if tx.send(next).is_err() {
                    break;
                }
            }
        });

        Self { state: rx, task }
    }

    /// Latest clock state.
    pub fn state(&self) -> ClockState {
        *self.state.borrow()
    }

    /// Renders the clock widget as of now.
    pub fn display(&self, zone: &DisplayZone) -> ClockDisplay {
        let state = self.state();
        ClockDisplay::render(state.status, state.reference.now(), zone)
    }

    /// Waits until the poller publishes a new state.
    pub async fn updated(&mut self) -> Result<ClockState, ClockError> {
        self.state.changed().await.map_err(|_| ClockError::Stopped)?;
        Ok(*self.state.borrow_and_update())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling. Results of a fetch in flight are discarded.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ClockSync {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio::sync::Notify;

    fn sample_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Succeeds on the first call, fails afterwards.
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TimeSource for Flaky {
        async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(sample_time())
            } else {
                Err(ClockError::SyncFailed { status: 502 })
            }
        }
    }

    #[tokio::test]
    async fn fetch_parses_datetime() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/windows-time")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"datetime":"2026-10-18T10:00:00.000Z"}"#)
            .create_async()
            .await;

        let client = TimeSyncClient::new(format!("{}/api/windows-time", server.url())).unwrap();
        assert_eq!(client.fetch().await.unwrap(), sample_time());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_reports_gateway_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/windows-time")
            .with_status(502)
            .with_body(r#"{"error":"sync_failed"}"#)
            .create_async()
            .await;

        let client = TimeSyncClient::new(format!("{}/api/windows-time", server.url())).unwrap();
        assert!(matches!(
            client.fetch().await,
            Err(ClockError::SyncFailed { status: 502 })
        ));
    }

    #[tokio::test]
    async fn fetch_rejects_missing_datetime() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/windows-time")
            .with_status(200)
            .with_body(r"{}")
            .create_async()
            .await;

        let client = TimeSyncClient::new(format!("{}/api/windows-time", server.url())).unwrap();
        assert!(matches!(
            client.fetch().await,
            Err(ClockError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn poller_moves_from_ready_to_fallback() {
        let source = Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        });
        let mut sync = ClockSync::start(source, Duration::from_millis(50));
        assert_eq!(sync.state().status, SyncStatus::Loading);

        let first = sync.updated().await.unwrap();
        assert_eq!(first.status, SyncStatus::Ready);
        assert!(first.reference.is_synced());

        let second = sync.updated().await.unwrap();
        assert_eq!(second.status, SyncStatus::Fallback);
        assert!(!second.reference.is_synced());

        let display = sync.display(&DisplayZone::default());
        assert!(display.notice.is_some());
        sync.stop();
    }

    /// Answers the first call at once; later calls hang before failing.
    struct SlowAfterFirst {
        calls: AtomicUsize,
        started: Notify,
        finished: AtomicBool,
    }

    #[async_trait]
    impl TimeSource for SlowAfterFirst {
        async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(sample_time());
            }
            self.started.notify_one();
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.finished.store(true, Ordering::SeqCst);
            Err(ClockError::SyncFailed { status: 502 })
        }
    }

    #[tokio::test]
    async fn stop_discards_fetch_in_flight() {
        let source = Arc::new(SlowAfterFirst {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            finished: AtomicBool::new(false),
        });
        let mut sync = ClockSync::start(source.clone(), Duration::from_millis(20));
        let first = sync.updated().await.unwrap();
        assert_eq!(first.status, SyncStatus::Ready);

        source.started.notified().await;
        let mut state = sync.state.clone();
        sync.stop();

        let closed = tokio::time::timeout(Duration::from_secs(1), state.changed())
            .await
            .unwrap();
        assert!(closed.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!source.finished.load(Ordering::SeqCst));
        assert_eq!(*state.borrow(), first);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn updated_errors_once_the_poller_is_gone() {
        let source = Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        });
        let mut sync = ClockSync::start(source, Duration::from_secs(3600));
        sync.updated().await.unwrap();
        assert!(sync.is_running());

        sync.task.abort();
        assert!(matches!(sync.updated().await, Err(ClockError::Stopped)));
    }
}
