//! input-bridge library crate.
//!
//! Accepts browser WebSocket connections carrying DOM input events as JSON,
//! turns them into `input-core` binary records, and forwards those records to
//! a remote render host over a second WebSocket.  Frames the remote host sends
//! back (rendered images, status text) are relayed to the browser unchanged.
//!
//! ```text
//! Browser (JSON over WebSocket)
//!         ↕
//! [input-bridge]
//!   ├── domain/           BrowserEvent JSON types, BridgeConfig, InputSettings
//!   ├── application/      Adapters + BridgeSession (JSON → records)
//!   └── infrastructure/
//!         ├── ws_server/      Browser accept loop (tokio-tungstenite)
//!         ├── remote_conn/    Remote host connection and record queue
//!         └── settings_file/  TOML settings loader
//!         ↕
//! Remote render host (binary records over WebSocket)
//! ```
//!
//! `domain` has no I/O.  `application` depends on `domain` and `input-core`
//! only.  `infrastructure` adds `tokio` and `tungstenite`.

pub mod application;
pub mod domain;
pub mod infrastructure;
