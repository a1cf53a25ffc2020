//! # input-core
//!
//! Shared library for input-stream containing the input-event normalizer,
//! the fixed-width binary record codec, and the transport seam used to hand
//! encoded records to a connection.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview
//!
//! A thin client surface (usually a browser page) shows frames rendered by a
//! remote host.  Every pointer, keyboard, wheel, touch, resize and file-path
//! interaction on that surface has to reach the remote host quickly and
//! cheaply.  This crate defines how:
//!
//! - **`domain`** – The event normalizer.  It decides whether an incoming
//!   event should produce a record at all (is it inside the surface, is a
//!   button held) and turns it into surface-local, typed fields.
//!
//! - **`protocol`** – How records look on the wire.  Fixed records are four
//!   little-endian `i32` slots (`[kind, f1, f2, f3]`); file paths use a
//!   variable-length record with two UTF-16 code units packed per slot.
//!
//! - **`dispatch`** – The glue: one [`InputDispatcher`] owns a normalizer,
//!   an encoder and a [`RecordSink`], and runs each event through all three
//!   synchronously.
//!
//! ```rust
//! use input_core::{
//!     InputDispatcher, PointerButton, PointerEvent, PointerPhase, RecordingSink, SurfaceRect,
//! };
//!
//! let surface = SurfaceRect::new(10.0, 20.0, 810.0, 620.0);
//! let mut dispatcher = InputDispatcher::new(surface, RecordingSink::default());
//!
//! let press = PointerEvent::new(110.0, 70.0, PointerButton::Right);
//! assert!(dispatcher.pointer(PointerPhase::Down, &press));
//! assert_eq!(dispatcher.sink().records()[0], vec![1, 100, 50, 4]);
//! ```

pub mod dispatch;
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `input_core::InputDispatcher` instead of the full module path.
pub use dispatch::InputDispatcher;
pub use domain::events::{KeyEvent, PointerEvent, PointerPhase, WheelEvent};
pub use domain::normalizer::{EventNormalizer, GatingPolicy};
pub use domain::surface::SurfaceRect;
pub use protocol::codec::{decode_record, record_to_le_bytes, ProtocolError, WireEncoder};
pub use protocol::messages::{EventKind, InputRecord, Modifiers, PointerButton};
pub use protocol::sink::{RecordSink, RecordingSink};
