//! Infrastructure layer for input-bridge.
//!
//! Everything that touches a socket or a file: the browser-facing WebSocket
//! server, the client connection to the remote render host, and the TOML
//! settings loader.

pub mod remote_conn;
pub mod settings_file;
pub mod ws_server;

pub use remote_conn::ChannelSink;
pub use settings_file::{load_input_settings, ConfigError};
pub use ws_server::{run_server, serve};
