//! input-bridge entry point.
//!
//! Accepts browser WebSocket connections, turns their JSON input events into
//! binary input records, and forwards them to a remote render host.
//!
//! # Usage
//!
//! ```text
//! input-bridge [OPTIONS]
//!
//! Options:
//!   --ws-bind <ADDR>           WebSocket bind address [default: 0.0.0.0]
//!   --ws-port <PORT>           WebSocket listener port [default: 5001]
//!   --remote-url <URL>         Remote render host [default: ws://127.0.0.1:5000]
//!   --channel-capacity <N>     Per-session outbound queue bound [default: 1024]
//!   --config <PATH>            TOML file with input settings
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                          | Default               |
//! |-----------------------------------|-----------------------|
//! | `INPUT_BRIDGE_WS_BIND`            | `0.0.0.0`             |
//! | `INPUT_BRIDGE_WS_PORT`            | `5001`                |
//! | `INPUT_BRIDGE_REMOTE_URL`         | `ws://127.0.0.1:5000` |
//! | `INPUT_BRIDGE_CHANNEL_CAPACITY`   | `1024`                |
//! | `INPUT_BRIDGE_CONFIG`             | (none)                |
//!
//! CLI arguments take precedence.  Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use input_bridge::domain::config::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_REMOTE_URL, DEFAULT_WS_PORT};
use input_bridge::domain::{BridgeConfig, InputSettings};
use input_bridge::infrastructure::{load_input_settings, run_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// WebSocket bridge from browser input events to a remote render host.
#[derive(Debug, Parser)]
#[command(
    name = "input-bridge",
    about = "Forwards browser input events to a remote render host as binary records",
    version
)]
struct Cli {
    /// IP address to bind the browser-facing WebSocket server to.
    #[arg(long, default_value = "0.0.0.0", env = "INPUT_BRIDGE_WS_BIND")]
    ws_bind: String,

    /// TCP port for the browser-facing WebSocket server.
    #[arg(long, default_value_t = DEFAULT_WS_PORT, env = "INPUT_BRIDGE_WS_PORT")]
    ws_port: u16,

    /// WebSocket URL of the remote render host (`ws://` or `wss://`).
    #[arg(long, default_value = DEFAULT_REMOTE_URL, env = "INPUT_BRIDGE_REMOTE_URL")]
    remote_url: String,

    /// Maximum number of records queued per session before new ones are
    /// dropped.
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY, env = "INPUT_BRIDGE_CHANNEL_CAPACITY")]
    channel_capacity: usize,

    /// TOML file with surface and input settings.
    #[arg(long, env = "INPUT_BRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`BridgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address does not parse, the remote URL is
    /// not a WebSocket URL, the channel capacity is zero, or the settings file
    /// cannot be loaded.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let ws_bind_addr: SocketAddr = format!("{}:{}", self.ws_bind, self.ws_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid WebSocket bind address: '{}:{}'",
                    self.ws_bind, self.ws_port
                )
            })?;

        if !(self.remote_url.starts_with("ws://") || self.remote_url.starts_with("wss://")) {
            bail!("remote URL must start with ws:// or wss://, got '{}'", self.remote_url);
        }

        if self.channel_capacity == 0 {
            bail!("channel capacity must be at least 1");
        }

        let input = match &self.config {
            Some(path) => load_input_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => InputSettings::default(),
        };

        Ok(BridgeConfig {
            ws_bind_addr,
            remote_url: self.remote_url,
            channel_capacity: self.channel_capacity,
            input,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_bridge_config()?;

    info!(
        "input bridge starting: ws={}, remote={}, gating={:?}",
        config.ws_bind_addr, config.remote_url, config.input.gating
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("input bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
