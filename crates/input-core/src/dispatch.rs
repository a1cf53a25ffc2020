//! Event → record → sink pipeline.
//!
//! [`InputDispatcher`] is what a host environment talks to.  Every method runs
//! synchronously: normalize, encode into the reused scratch buffer, hand the
//! slots to the sink, return.  Events are processed strictly in call order.

use tracing::trace;

use crate::domain::events::{KeyEvent, PointerEvent, PointerPhase, WheelEvent};
use crate::domain::normalizer::EventNormalizer;
use crate::domain::surface::SurfaceRect;
use crate::protocol::codec::WireEncoder;
use crate::protocol::messages::InputRecord;
use crate::protocol::sink::RecordSink;

/// Owns one normalizer, one encoder and one sink.
///
/// Each method returns `true` if a record was sent and `false` if the event
/// was filtered out.  Filtering is never an error.
pub struct InputDispatcher<S> {
    normalizer: EventNormalizer,
    encoder: WireEncoder,
    sink: S,
}

impl<S: RecordSink> InputDispatcher<S> {
    /// Creates a dispatcher for `surface` with a default normalizer.
    pub fn new(surface: SurfaceRect, sink: S) -> Self {
        Self::with_normalizer(EventNormalizer::new(surface), sink)
    }

    /// Creates a dispatcher around a pre-configured normalizer.
    pub fn with_normalizer(normalizer: EventNormalizer, sink: S) -> Self {
        Self {
            normalizer,
            encoder: WireEncoder::new(),
            sink,
        }
    }

    /// Forwards a pointer event if the normalizer accepts it.
    pub fn pointer(&mut self, phase: PointerPhase, event: &PointerEvent) -> bool {
        match self.normalizer.pointer(phase, event) {
            Some(record) => {
                self.emit(&record);
                true
            }
            None => false,
        }
    }

    /// Forwards a key press.  Always emits.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let record = self.normalizer.key_down(event);
        self.emit(&record);
        true
    }

    /// Forwards a wheel notch.  Always emits.
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        let record = self.normalizer.wheel(event);
        self.emit(&record);
        true
    }

    /// Resize notifier: the surrounding application calls this with the new
    /// surface dimensions.  Nothing listens for resizes autonomously.
    pub fn notify_resize(&mut self, width: i32, height: i32) -> bool {
        let record = self.normalizer.resize(width, height);
        self.emit(&record);
        true
    }

    /// Sends `path` as a packed text record.
    pub fn send_text_path(&mut self, path: &str) -> bool {
        let units: Vec<u16> = path.encode_utf16().collect();
        let slots = self.encoder.encode_text(&units);
        trace!(len = units.len(), slots = slots.len(), "text path record");
        self.sink.send(slots);
        true
    }

    /// Replaces the surface rectangle used for validation and offsets.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.normalizer.set_surface(surface);
    }

    /// Read access to the normalizer state.
    pub fn normalizer(&self) -> &EventNormalizer {
        &self.normalizer
    }

    /// Read access to the encoder, e.g. to inspect text buffer capacity.
    pub fn encoder(&self) -> &WireEncoder {
        &self.encoder
    }

    /// Grows the text scratch buffer ahead of time.
    pub fn reserve_text_slots(&mut self, slots: usize) {
        self.encoder.reserve_text_slots(slots);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the dispatcher and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, record: &InputRecord) {
        let slots = self.encoder.encode(record);
        trace!(kind = ?record.kind(), "record");
        self.sink.send(slots);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
