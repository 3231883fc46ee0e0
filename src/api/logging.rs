//! RPC Call Logging
//!
//! Middleware emitting one event per RPC with the procedure and its latency.

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{error, info};

/// Logs every RPC at INFO, or at ERROR when the call fails.
pub async fn log_rpc(request: Request, next: Next) -> Response {
    let procedure = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let lat_ms = millis(start.elapsed());
    let status = response.status().as_u16();
    if response.status().is_success() {
        info!(procedure = %procedure, lat_ms, status, "rpc");
    } else {
        error!(procedure = %procedure, lat_ms, status, "rpc");
    }

    response
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
