//! Network time for the study planner clock.
//!
//! Provides:
//! - An SNTP client for a public time server
//! - An HTTP proxy exposing that time at `/api/windows-time`
//! - A client for the proxy and a start/stop poller feeding the clock display

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod server;
pub mod sntp;
pub mod sync;

pub use server::{TIME_ROUTE, TimeResponse, create_router};
pub use sntp::SntpClient;
pub use sync::{ClockState, ClockSync, TimeSyncClient};

/// Clock sync errors.
#[derive(Debug, Error)]
pub enum ClockError {
    /// Socket or listener failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The time server did not answer in time.
    #[error("time server did not respond within {seconds}s")]
    Timeout { seconds: u64 },
    /// The time server sent something that is not a usable reply.
    #[error("invalid NTP packet: {0}")]
    InvalidPacket(String),
    /// The time server asked us to go away (stratum 0).
    #[error("time server refused the request: {code}")]
    KissOfDeath { code: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The time endpoint answered with an error status.
    #[error("time sync failed with status {status}")]
    SyncFailed { status: u16 },
    /// Failed to parse the endpoint's response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The poller has been stopped.
    #[error("clock sync stopped")]
    Stopped,
}

/// Something that can tell the current network time.
#[async_trait]
pub trait TimeSource: Send + Sync {
    async fn network_time(&self) -> Result<DateTime<Utc>, ClockError>;
}
