//! Realtime trigger
//!
//! Subscribes to INSERTs on the orders table over the Supabase Realtime
//! websocket and prints each new order as it arrives. The connection is
//! kept alive with Phoenix heartbeats and re-established with exponential
//! backoff when it drops or the join is refused.

pub mod protocol;

use crate::error::{ClientError, ClientResult};
use crate::jobs::PrintJobRunner;
use crate::state::PollState;
use futures::{SinkExt, StreamExt};
use protocol::{ChannelEvent, PhoenixMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

pub type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Initial reconnect delay
const INITIAL_RECONNECT_DELAY_SECS: u64 = 5;
/// Max reconnect delay
const MAX_RECONNECT_DELAY_SECS: u64 = 120;
/// Phoenix heartbeat interval
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

pub struct RealtimeListener {
    url: String,
    access_token: String,
    table: String,
    jobs: Arc<PrintJobRunner>,
    state: PollState,
}

impl RealtimeListener {
    pub fn new(
        url: impl Into<String>,
        access_token: impl Into<String>,
        table: impl Into<String>,
        jobs: Arc<PrintJobRunner>,
        state: PollState,
    ) -> Self {
        Self {
            url: url.into(),
            access_token: access_token.into(),
            table: table.into(),
            jobs,
            state,
        }
    }

    fn topic(&self) -> String {
        protocol::channel_topic(&self.table)
    }

    /// Connect, listen, reconnect on failure, until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(table = %self.table, "Realtime listener started");
        let mut reconnect_delay = Duration::from_secs(INITIAL_RECONNECT_DELAY_SECS);

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            match tokio_tungstenite::connect_async(self.url.as_str()).await {
                Ok((ws, _response)) => {
                    tracing::info!("Realtime websocket connected");
                    reconnect_delay = Duration::from_secs(INITIAL_RECONNECT_DELAY_SECS);
                    if let Err(e) = self.run_session(ws, &shutdown).await {
                        tracing::warn!("Realtime session ended: {e}");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        delay_secs = reconnect_delay.as_secs(),
                        "Realtime connection failed: {e}"
                    );
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {},
            }
            reconnect_delay =
                (reconnect_delay * 2).min(Duration::from_secs(MAX_RECONNECT_DELAY_SECS));
        }

        tracing::info!("Realtime listener stopped");
    }

    /// One websocket session: join, then heartbeat and dispatch until it ends
    async fn run_session(&self, ws: WsStream, shutdown: &CancellationToken) -> ClientResult<()> {
        let (mut ws_sink, mut ws_stream) = ws.split();
        let mut msg_ref: u64 = 1;

        let join = PhoenixMessage::join(&self.table, &self.access_token, msg_ref)
            .to_text()
            .map_err(|e| ClientError::Realtime(e.to_string()))?;
        ws_sink.send(Message::text(join)).await?;

        let mut heartbeat = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        heartbeat.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    let _ = ws_sink.close().await;
                    return Ok(());
                }

                _ = heartbeat.tick() => {
                    msg_ref += 1;
                    if let Ok(frame) = PhoenixMessage::heartbeat(msg_ref).to_text() {
                        ws_sink.send(Message::text(frame)).await?;
                    }
                }

                msg = ws_stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text(text.as_str()).await?;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            return Err(ClientError::Realtime("websocket closed by server".into()));
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            return Err(ClientError::Realtime("websocket stream ended".into()));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Act on one text frame
    ///
    /// Returns the id of an order that was printed. A refused join or a
    /// closed channel is an error so the session reconnects; failing to
    /// print an announced order is only logged.
    pub async fn handle_text(&self, text: &str) -> ClientResult<Option<u64>> {
        match protocol::parse_frame(text, &self.topic()) {
            ChannelEvent::Inserted(id) => Ok(self.print_inserted(id).await),
            ChannelEvent::Joined => {
                tracing::info!(table = %self.table, "Subscribed to order inserts");
                Ok(None)
            }
            ChannelEvent::Rejected(reason) => Err(ClientError::Realtime(format!(
                "subscription refused: {reason}"
            ))),
            ChannelEvent::Closed => Err(ClientError::Realtime("channel closed".into())),
            ChannelEvent::Ignored => {
                tracing::trace!("Ignoring realtime frame");
                Ok(None)
            }
        }
    }

    async fn print_inserted(&self, id: u64) -> Option<u64> {
        tracing::info!(order_id = id, "New order announced");

        match self.jobs.fetch_and_print(id).await {
            Ok(outcome) if outcome.is_printed() => {
                if let Err(e) = self.state.advance_to(id).await {
                    tracing::error!(order_id = id, "Printed but failed to save state: {e}");
                }
                Some(id)
            }
            Ok(_) => {
                tracing::warn!(order_id = id, "Order not printed; use `reprint {id}` to retry");
                None
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(order_id = id, "Announced order has no document in storage");
                None
            }
            Err(e) => {
                tracing::error!(order_id = id, "Failed to process announced order: {e}");
                None
            }
        }
    }
}
