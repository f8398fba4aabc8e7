//! Clock display state.
//!
//! The clock shows network time when a sync has succeeded and device time
//! otherwise. A [`ClockReference`] pins the last synced instant to a
//! monotonic reading so the display keeps ticking between syncs.

use std::time::Instant;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::Serialize;

/// Text shown before the first sync attempt finishes.
pub const SYNCING_TEXT: &str = "Syncing clock...";

/// Notice shown while the clock runs on device time.
pub const FALLBACK_NOTICE: &str = "Using device time while sync retries.";

/// India Standard Time, in minutes east of UTC.
pub const IST_OFFSET_MINUTES: i32 = 330;

/// Outcome of the most recent sync attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// No attempt has finished yet.
    #[default]
    Loading,
    /// Network time is available.
    Ready,
    /// The last attempt failed; device time is shown.
    Fallback,
}

/// Last synced network time and when it was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReference {
    reference: Option<DateTime<Utc>>,
    synced_at: Instant,
}

impl Default for ClockReference {
    fn default() -> Self {
        Self::unsynced(Instant::now())
    }
}

impl ClockReference {
    /// A reference that tracks network time received at `synced_at`.
    pub const fn synced(reference: DateTime<Utc>, synced_at: Instant) -> Self {
        Self {
            reference: Some(reference),
            synced_at,
        }
    }

    /// A reference that falls back to device time.
    pub const fn unsynced(synced_at: Instant) -> Self {
        Self {
            reference: None,
            synced_at,
        }
    }

    pub const fn is_synced(&self) -> bool {
        self.reference.is_some()
    }

    /// Current time as of the monotonic instant `at`.
    ///
    /// Synced references advance by the elapsed monotonic time; unsynced ones
    /// return `device_now`.
    pub fn now_at(&self, at: Instant, device_now: DateTime<Utc>) -> DateTime<Utc> {
        match self.reference {
            Some(reference) => {
                let elapsed = at.saturating_duration_since(self.synced_at);
                Duration::from_std(elapsed)
                    .ok()
                    .and_then(|elapsed| reference.checked_add_signed(elapsed))
                    .unwrap_or(reference)
            }
            None => device_now,
        }
    }

    /// Current time right now.
    pub fn now(&self) -> DateTime<Utc> {
        self.now_at(Instant::now(), Utc::now())
    }
}

/// Time zone the clock is displayed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayZone {
    pub offset: FixedOffset,
    pub label: String,
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::from_minutes(IST_OFFSET_MINUTES, "India Standard Time")
    }
}

impl DisplayZone {
    /// Builds a zone from minutes east of UTC. Out-of-range offsets become UTC.
    pub fn from_minutes(minutes: i32, label: impl Into<String>) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            offset,
            label: label.into(),
        }
    }

    /// Formats `time` like `Sunday, 18 Oct, 09:05:03 pm`.
    pub fn format(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset)
            .format("%A, %-d %b, %I:%M:%S %P")
            .to_string()
    }
}

/// What the clock widget currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockDisplay {
    pub zone: String,
    pub text: String,
    pub status: SyncStatus,
    pub notice: Option<&'static str>,
}

impl ClockDisplay {
    /// Renders the widget for `status` at `time`.
    pub fn render(status: SyncStatus, time: DateTime<Utc>, zone: &DisplayZone) -> Self {
        let text = match status {
            SyncStatus::Loading => SYNCING_TEXT.to_string(),
            SyncStatus::Ready | SyncStatus::Fallback => zone.format(time),
        };
        Self {
            zone: zone.label.clone(),
            text,
            status,
            notice: (status == SyncStatus::Fallback).then_some(FALLBACK_NOTICE),
        }
    }
}
