//! Connection to the remote render host.
//!
//! Each browser session opens its own WebSocket client connection to the
//! remote host.  Traffic in each direction is handled by a separate task:
//!
//! - **Records out**: the session's [`ChannelSink`] serializes every record to
//!   little-endian bytes and queues it on a bounded `mpsc` channel;
//!   [`write_records`] drains the channel and sends one binary frame per
//!   record, in submission order.
//! - **Frames back**: [`relay_remote_frames`] forwards whatever the remote
//!   host sends (typically encoded images) to the browser unchanged.
//!
//! Delivery is fire-and-forget.  Nothing is acknowledged or retried.

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use input_core::{record_to_le_bytes, RecordSink};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use anyhow::Context;

/// WebSocket stream to the remote host.
pub type RemoteStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens a WebSocket connection to `url`.
///
/// # Errors
///
/// Returns an error if the TCP connection or the WebSocket handshake fails.
pub async fn connect_remote(url: &str) -> anyhow::Result<RemoteStream> {
    let (stream, response) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to remote host at {url}"))?;
    debug!("remote host {url} accepted upgrade (HTTP {})", response.status());
    Ok(stream)
}

// ── Record sink ───────────────────────────────────────────────────────────────

/// [`RecordSink`] that queues serialized records for the remote writer task.
///
/// The borrowed slots are copied into an owned byte buffer before queueing,
/// so the dispatcher can overwrite its scratch buffer immediately.
///
/// When the queue is full or the writer has gone away the record is dropped.
/// Only the first drop of a run of consecutive drops is logged at `warn`;
/// the rest go to `debug` so a stalled remote host does not flood the log at
/// pointer-move rate.  A closed queue is always logged at `debug`.
pub struct ChannelSink {
    tx: mpsc::Sender<Vec<u8>>,
    session_id: String,
    dropped: u64,
    consecutive_drops: u64,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Vec<u8>>, session_id: impl Into<String>) -> Self {
        Self {
            tx,
            session_id: session_id.into(),
            dropped: 0,
            consecutive_drops: 0,
        }
    }

    /// Number of records dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Length of the current run of drops; 0 once a record gets through.
    pub fn consecutive_drops(&self) -> u64 {
        self.consecutive_drops
    }
}

impl RecordSink for ChannelSink {
    fn send(&mut self, record: &[i32]) {
        match self.tx.try_send(record_to_le_bytes(record)) {
            Ok(()) => {
                if self.consecutive_drops > 0 {
                    debug!(
                        "session {}: outbound queue drained after {} dropped records",
                        self.session_id, self.consecutive_drops
                    );
                    self.consecutive_drops = 0;
                }
            }
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                self.consecutive_drops += 1;
                let kind = record.first().copied().unwrap_or_default();
                if self.consecutive_drops == 1 {
                    warn!(
                        "session {}: outbound queue full, record kind {kind} dropped ({} total)",
                        self.session_id, self.dropped
                    );
                } else {
                    debug!(
                        "session {}: outbound queue still full, record kind {kind} dropped",
                        self.session_id
                    );
                }
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped += 1;
                self.consecutive_drops += 1;
                debug!(
                    "session {}: remote writer closed, record dropped",
                    self.session_id
                );
            }
        }
    }
}

// ── Pumps ─────────────────────────────────────────────────────────────────────

/// Drains `rx` and writes each queued record to `remote` as a binary frame.
///
/// Runs until the channel closes or a write fails.  Once every sender is
/// gone and the queue is empty, `remote` is closed, which sends a WebSocket
/// Close frame.  Returns the number of frames written.
pub async fn write_records<K>(
    mut remote: K,
    mut rx: mpsc::Receiver<Vec<u8>>,
    session_id: &str,
) -> u64
where
    K: Sink<WsMessage> + Unpin,
    K::Error: std::fmt::Display,
{
    let mut written = 0u64;
    while let Some(bytes) = rx.recv().await {
        if let Err(e) = remote.send(WsMessage::Binary(bytes)).await {
            warn!("session {session_id}: write to remote host failed: {e}");
            return written;
        }
        written += 1;
    }
    if let Err(e) = remote.close().await {
        debug!("session {session_id}: closing remote connection failed: {e}");
    }
    debug!("session {session_id}: remote writer stopped after {written} records");
    written
}

/// Forwards frames from the remote host to the browser unchanged.
///
/// Binary and text frames are relayed; control frames are answered by the
/// WebSocket layer and skipped here.  Runs until either side closes.
/// Returns the number of frames relayed.
pub async fn relay_remote_frames<R, K>(mut remote: R, mut browser: K, session_id: &str) -> u64
where
    R: Stream<Item = Result<WsMessage, WsError>> + Unpin,
    K: Sink<WsMessage> + Unpin,
    K::Error: std::fmt::Display,
{
    let mut relayed = 0u64;
    loop {
        let msg = match remote.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                info!("session {session_id}: remote host closed the connection");
                break;
            }
            Some(Err(e)) => {
                warn!("session {session_id}: remote host stream error: {e}");
                break;
            }
        };

        match msg {
            WsMessage::Binary(_) | WsMessage::Text(_) => {
                if let Err(e) = browser.send(msg).await {
                    debug!("session {session_id}: browser send failed (disconnected): {e}");
                    break;
                }
                relayed += 1;
            }
            WsMessage::Close(_) => {
                info!("session {session_id}: remote host sent Close");
                break;
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
        }
    }
    relayed
}

// ── Tests ─────────────────────────────────────────────────────────────────────
