//! Time proxy HTTP server.
//!
//! Browsers cannot speak NTP, so the clock reads network time through this
//! endpoint instead.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{ClockError, TimeSource};

/// Path of the time endpoint.
pub const TIME_ROUTE: &str = "/api/windows-time";

/// Error code returned when the upstream time server fails.
pub const SYNC_FAILED: &str = "sync_failed";

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub datetime: String,
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Shared state for the time handler.
#[derive(Clone)]
struct ProxyState {
    source: Arc<dyn TimeSource>,
}

/// Formats like JavaScript's `Date.toISOString`: millisecond precision, `Z` suffix.
pub fn format_iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Creates the router serving [`TIME_ROUTE`] from `source`.
///
/// Only GET is routed; other methods get 405.
pub fn create_router(source: Arc<dyn TimeSource>) -> Router {
    Router::new()
        .route(TIME_ROUTE, get(windows_time))
        .layer(TraceLayer::new_for_http())
        .with_state(ProxyState { source })
}

async fn windows_time(State(state): State<ProxyState>) -> Response {
    match state.source.network_time().await {
        Ok(time) => Json(TimeResponse {
            datetime: format_iso(time),
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "network time sync failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: SYNC_FAILED.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Serves the time proxy on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    source: Arc<dyn TimeSource>,
    shutdown: F,
) -> Result<(), ClockError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, route = TIME_ROUTE, "time proxy listening");
    }
    axum::serve(listener, create_router(source))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    struct FixedTime(DateTime<Utc>);

    #[async_trait]
    impl TimeSource for FixedTime {
        async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
            Ok(self.0)
        }
    }

    struct Unreachable;

    #[async_trait]
    impl TimeSource for Unreachable {
        async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
            Err(ClockError::Timeout { seconds: 5 })
        }
    }

    fn sample_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T10:00:00.250Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Serves `source` on an ephemeral port and returns its base URL.
    async fn spawn(source: Arc<dyn TimeSource>) -> String {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, source, std::future::pending()));
        format!("http://{addr}")
    }

    #[test]
    fn format_iso_matches_javascript() {
        assert_eq!(format_iso(sample_time()), "2026-10-18T10:00:00.250Z");
    }

    #[test]
    fn router_builds() {
        let _router = create_router(Arc::new(Unreachable));
    }

    #[tokio::test]
    async fn returns_datetime_on_success() {
        let base = spawn(Arc::new(FixedTime(sample_time()))).await;
        let response = reqwest::get(format!("{base}{TIME_ROUTE}")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: TimeResponse = response.json().await.unwrap();
        assert_eq!(body.datetime, "2026-10-18T10:00:00.250Z");
    }

    #[tokio::test]
    async fn returns_bad_gateway_on_failure() {
        let base = spawn(Arc::new(Unreachable)).await;
        let response = reqwest::get(format!("{base}{TIME_ROUTE}")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.error, "sync_failed");
    }

    #[tokio::test]
    async fn rejects_other_methods() {
        let base = spawn(Arc::new(FixedTime(sample_time()))).await;
        let response = reqwest::Client::new()
            .post(format!("{base}{TIME_ROUTE}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
