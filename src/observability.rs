use std::net::SocketAddr;

use crate::protocol::Request;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total queries executed. Labels: command, status.
pub const QUERIES_TOTAL: &str = "kartavail_queries_total";

/// Histogram: query latency in seconds. Labels: command.
pub const QUERY_DURATION_SECONDS: &str = "kartavail_query_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: active TCP connections.
pub const CONNECTIONS_ACTIVE: &str = "kartavail_connections_active";

/// Counter: total connections accepted.
pub const CONNECTIONS_TOTAL: &str = "kartavail_connections_total";

/// Counter: connections rejected due to limit.
pub const CONNECTIONS_REJECTED_TOTAL: &str = "kartavail_connections_rejected_total";

// ── Fleet snapshot ──────────────────────────────────────────────

/// Gauge: karts in the live snapshot.
pub const FLEET_KARTS: &str = "kartavail_fleet_karts";

/// Counter: snapshot reloads. Labels: status.
pub const RELOADS_TOTAL: &str = "kartavail_reloads_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Request variant to a short label for metrics.
pub fn command_label(req: &Request) -> &'static str {
    match req {
        Request::Availability { .. } => "availability",
        Request::FreeSpans { .. } => "free_spans",
        Request::Fleet => "fleet",
        Request::Reload => "reload",
    }
}
