//! Domain layer for input-bridge.
//!
//! Pure types with no I/O: the browser JSON vocabulary and the bridge
//! configuration.  Interpretation of these types lives in the application
//! layer; sockets and files live in the infrastructure layer.

pub mod config;
pub mod messages;

pub use config::{BridgeConfig, GatingMode, InputSettings, SurfaceSettings};
pub use messages::{BrowserEvent, TouchPoint};
