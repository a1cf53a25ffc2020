//! WebSocket server: accept loop and per-session task management.
//!
//! For every browser connection the server:
//!
//! 1. Completes the WebSocket handshake.
//! 2. Opens a WebSocket connection to the remote render host.
//! 3. Runs three tasks until any one of them ends:
//!    - **Browser → records**: parses JSON frames and feeds them through a
//!      [`BridgeSession`] whose sink queues binary records.
//!    - **Records → remote**: writes queued records as binary frames.
//!    - **Remote → browser**: relays the remote host's frames unchanged.
//!
//! When the browser leaves, the remote writer is given up to
//! [`WRITER_DRAIN_TIMEOUT`] to flush records still queued (typically the
//! final button release) and close the remote connection cleanly.
//!
//! Shutdown is driven by a shared `AtomicBool` that `main.rs` clears on
//! Ctrl+C.  The accept loop polls it every 200 ms.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{Stream, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::BridgeSession;
use crate::domain::config::{BridgeConfig, InputSettings};
use crate::infrastructure::remote_conn::{
    connect_remote, relay_remote_frames, write_records, ChannelSink,
};

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Upper bound on flushing queued records after the browser disconnects.
pub const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.ws_bind_addr` and runs the accept loop until `running` is
/// set to `false`.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(config: BridgeConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.ws_bind_addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {}", config.ws_bind_addr))?;

    info!("input bridge listening on {}", config.ws_bind_addr);
    serve(listener, config, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// Each accepted connection is handed to its own Tokio task, so one slow
/// browser never delays another.
///
/// # Errors
///
/// Currently always returns `Ok(())`; accept errors are logged and skipped.
pub async fn serve(
    listener: TcpListener,
    config: BridgeConfig,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL_INTERVAL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                info!("new browser connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, cfg).await;
                });
            }
            Ok(Err(e)) => {
                error!("accept error: {e}");
            }
            Err(_) => {
                // No connection within the poll interval.
            }
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<BridgeConfig>,
) {
    let session_id = Uuid::new_v4();
    match run_session(raw_stream, peer_addr, session_id, config).await {
        Ok(()) => info!("session {session_id} ({peer_addr}) closed normally"),
        Err(e) => warn!("session {session_id} ({peer_addr}) closed with error: {e:#}"),
    }
}

async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    session_id: Uuid,
    config: Arc<BridgeConfig>,
) -> anyhow::Result<()> {
    let browser_ws = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;
    info!("session {session_id}: WebSocket established with {peer_addr}");

    let remote_ws = connect_remote(&config.remote_url)
        .await
        .with_context(|| format!("session {session_id}: remote host unavailable"))?;
    info!("session {session_id}: connected to remote host at {}", config.remote_url);

    let (browser_tx, browser_rx) = browser_ws.split();
    let (remote_tx, remote_rx) = remote_ws.split();
    let (record_tx, record_rx) = mpsc::channel::<Vec<u8>>(config.channel_capacity);
    let session_name = session_id.to_string();

    // ── Task A: queued records → remote host ───────────────────────────────────
    let name_a = session_name.clone();
    let mut writer_task = tokio::spawn(async move {
        write_records(remote_tx, record_rx, &name_a).await;
    });

    // ── Task B: remote host → browser ─────────────────────────────────────────
    let name_b = session_name.clone();
    let mut relay_task = tokio::spawn(async move {
        relay_remote_frames(remote_rx, browser_tx, &name_b).await;
    });

    // ── Task C: browser JSON → records ────────────────────────────────────────
    let sink = ChannelSink::new(record_tx, session_name.clone());
    let settings = config.input;
    let name_c = session_name.clone();
    let mut reader_task = tokio::spawn(async move {
        read_browser_events(browser_rx, settings, sink, &name_c).await;
    });

    tokio::select! {
        _ = &mut writer_task => {
            debug!("session {session_id}: remote writer task ended");
        }
        _ = &mut relay_task => {
            debug!("session {session_id}: remote→browser task ended");
        }
        _ = &mut reader_task => {
            // The reader dropped its sink, so the writer stops on its own
            // once the queue is empty.
            debug!("session {session_id}: browser reader task ended, draining records");
            if timeout(WRITER_DRAIN_TIMEOUT, &mut writer_task).await.is_err() {
                warn!(
                    "session {session_id}: queued records not flushed within {:?}",
                    WRITER_DRAIN_TIMEOUT
                );
            }
        }
    }

    // The surviving tasks own the socket halves; stop them so both
    // connections close with the session.
    writer_task.abort();
    relay_task.abort();
    reader_task.abort();

    Ok(())
}

/// Reads browser frames and feeds them to a fresh [`BridgeSession`].
///
/// Malformed messages are logged and skipped; the session stays up.  Returns
/// the session's sink once the browser disconnects.
pub async fn read_browser_events<R>(
    mut browser: R,
    settings: InputSettings,
    sink: ChannelSink,
    session_id: &str,
) -> ChannelSink
where
    R: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    let mut session = BridgeSession::new(&settings, sink);

    loop {
        let msg = match browser.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {session_id}: browser WebSocket closed");
                break;
            }
            Some(Err(e)) => {
                warn!("session {session_id}: browser WebSocket error: {e}");
                break;
            }
            None => {
                debug!("session {session_id}: browser stream ended");
                break;
            }
        };

        match msg {
            WsMessage::Text(json) => match session.handle_text(&json) {
                Ok(sent) => {
                    debug!("session {session_id}: browser frame handled (record sent: {sent})");
                }
                Err(e) => {
                    warn!("session {session_id}: {e}");
                }
            },
            WsMessage::Binary(_) => {
                warn!("session {session_id}: unexpected binary frame from browser (ignored)");
            }
            WsMessage::Close(_) => {
                debug!("session {session_id}: browser sent Close");
                break;
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
        }
    }

    let sink = session.into_sink();
    if sink.dropped() > 0 {
        info!("session {session_id}: {} records dropped", sink.dropped());
    }
    sink
}

// ── Tests ─────────────────────────────────────────────────────────────────────
