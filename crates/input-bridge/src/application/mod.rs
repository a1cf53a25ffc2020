//! Application layer for input-bridge.
//!
//! Turns browser messages into binary input records: the adapters resolve
//! browser quirks, and [`BridgeSession`] drives one `input-core` dispatcher
//! per browser.  No sockets and no task spawning happen here.

pub mod adapters;
pub mod bridge_service;

pub use adapters::{canonicalize, CanonicalEvent};
pub use bridge_service::{normalizer_from_settings, parse_browser_event, BridgeError, BridgeSession};
