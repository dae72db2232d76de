use std::sync::Arc;
use std::time::Instant;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Framed};
use tracing::debug;

use crate::engine;
use crate::fleet::FleetStore;
use crate::limits::MAX_LINE_LEN;
use crate::observability::{self, command_label};
use crate::protocol::{self, Request, Response};
use crate::schedule::Schedule;

/// Answers protocol requests against the current fleet snapshot.
pub struct AvailabilityHandler {
    store: Arc<FleetStore>,
    schedule: Schedule,
}

impl AvailabilityHandler {
    pub fn new(store: Arc<FleetStore>, schedule: Schedule) -> Self {
        Self { store, schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Parse, execute and meter one request line. Never fails: problems come
    /// back as `Response::Error`.
    pub async fn handle_line(&self, line: &str) -> Response {
        let req = match protocol::parse_request(line) {
            Ok(req) => req,
            Err(e) => {
                metrics::counter!(observability::QUERIES_TOTAL, "command" => "invalid", "status" => "error")
                    .increment(1);
                return Response::error(e);
            }
        };

        let label = command_label(&req);
        let start = Instant::now();
        let response = self.execute_request(req).await;
        let status = if response.is_error() { "error" } else { "ok" };
        metrics::counter!(observability::QUERIES_TOTAL, "command" => label, "status" => status)
            .increment(1);
        metrics::histogram!(observability::QUERY_DURATION_SECONDS, "command" => label)
            .record(start.elapsed().as_secs_f64());
        response
    }

    pub async fn execute_request(&self, req: Request) -> Response {
        match req {
            Request::Availability { date, category } => {
                let fleet = self.store.snapshot().await;
                let slots = match category {
                    Some(c) => engine::category_availability(fleet.karts(), date, &self.schedule, c),
                    None => engine::calculate_availability(fleet.karts(), date, &self.schedule),
                };
                Response::Availability { date, slots }
            }
            Request::FreeSpans {
                date,
                category,
                min_available,
                min_duration_ms,
            } => {
                let fleet = self.store.snapshot().await;
                let spans = engine::category_free_spans(
                    fleet.karts(),
                    date,
                    &self.schedule,
                    category,
                    min_available,
                    min_duration_ms,
                );
                Response::FreeSpans {
                    date,
                    category,
                    spans,
                }
            }
            Request::Fleet => {
                let fleet = self.store.snapshot().await;
                Response::Fleet {
                    karts: fleet.len(),
                    categories: engine::fleet_summary(fleet.karts()),
                }
            }
            Request::Reload => match self.store.reload().await {
                Ok(karts) => Response::Reloaded { karts },
                Err(e) => Response::error(e),
            },
        }
    }
}

/// Serve newline-delimited JSON requests until the peer hangs up.
/// Each request line gets exactly one response line; only an overlong
/// line or an I/O failure closes the connection early.
pub async fn process_connection<S>(
    socket: S,
    handler: Arc<AvailabilityHandler>,
) -> Result<(), AnyDelimiterCodecError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let codec = AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), MAX_LINE_LEN);
    let mut framed = Framed::new(socket, codec);

    while let Some(line) = framed.next().await {
        let line = line?;
        let response = match std::str::from_utf8(&line) {
            Ok(text) => handler.handle_line(text).await,
            Err(_) => {
                metrics::counter!(observability::QUERIES_TOTAL, "command" => "invalid", "status" => "error")
                    .increment(1);
                Response::error("request is not valid UTF-8")
            }
        };
        let encoded = serde_json::to_string(&response)
            .unwrap_or_else(|e| format!(r#"{{"type":"error","message":"encode failed: {e}"}}"#));
        framed.send(encoded).await?;
    }

    debug!("peer closed connection");
    Ok(())
}
