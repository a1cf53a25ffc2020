//! Domain entities for input-stream.
//!
//! This module contains the event normalizer and the canonical event structs
//! it consumes.  It has no infrastructure dependencies: raw browser objects
//! (with their legacy and vendor-specific property names) are converted into
//! [`events`] at the boundary, and the normalizer only ever sees those.
//!
//! Code in outer layers (the bridge adapters, the WebSocket server) depends on
//! the domain, but the domain never depends on them.

/// Canonical per-kind event structs.
pub mod events;

/// Validity filtering, held-button tracking and classification.
pub mod normalizer;

/// The on-screen rectangle pointer coordinates are checked against.
pub mod surface;
