//! Telemetry: metric names and trace export.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops. Span export
//! and trace-context propagation live in [`trace`].
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `greeter_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `transport`: entry point that served the request: "grpc" or "http"
//! - `status`: outcome: "ok" or "error"

use std::time::Instant;

#[cfg(feature = "server")]
pub mod trace;

/// Total greeting requests served.
///
/// Labels: `transport`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "greeter_requests_total";

/// Request duration in seconds.
///
/// Labels: `transport`.
pub const REQUEST_DURATION_SECONDS: &str = "greeter_request_duration_seconds";

/// Label value for requests served on the gRPC port.
pub const TRANSPORT_GRPC: &str = "grpc";

/// Label value for requests served by the HTTP gateway.
pub const TRANSPORT_HTTP: &str = "http";

/// Record request outcome metrics (counter + histogram).
pub fn record_request(transport: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(REQUESTS_TOTAL,
        "transport" => transport,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS,
        "transport" => transport,
    )
    .record(elapsed);
}
