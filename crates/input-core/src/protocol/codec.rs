//! Binary codec for encoding and decoding input-stream records.
//!
//! Wire format (all slots are little-endian `i32`):
//! ```text
//! fixed record: [kind][f1][f2][f3]                      kind ∈ 1..=6
//! text record:  [7][len][u0 | u1 << 16][u2 | u3 << 16]…  2 + (len + 1) / 2 slots
//! ```
//!
//! Encoding goes through a [`WireEncoder`], which owns the scratch buffers and
//! reuses them across calls so that high-frequency pointer traffic never
//! allocates.  Decoding is a pure function, [`decode_record`].

use thiserror::Error;

use crate::protocol::messages::{
    EventKind, InputRecord, Modifiers, PointerButton, FIXED_RECORD_SLOTS, SLOT_SIZE,
    TEXT_HEADER_SLOTS,
};
use crate::protocol::text::{pack_units, text_record_slots, unpack_text};

/// Text buffer size a fresh [`WireEncoder`] starts with, in slots.
pub const DEFAULT_TEXT_SLOTS: usize = 16;

/// Longest string (in UTF-16 units) whose length fits the `i32` length slot.
pub const MAX_TEXT_UNITS: usize = i32::MAX as usize;

/// Errors that can occur while decoding a record.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the record requires.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The byte length is not a whole number of 32-bit slots.
    #[error("record length {0} is not a multiple of 4 bytes")]
    MisalignedLength(usize),

    /// The kind slot holds a value outside 1..=7.
    #[error("unknown record kind: {0}")]
    UnknownKind(i32),

    /// A field is out of range or the text is not valid UTF-16.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Encoder ───────────────────────────────────────────────────────────────────

/// Serializes [`InputRecord`]s into reusable slot buffers.
///
/// The encoder keeps one 4-slot buffer for every fixed record and one
/// grow-only buffer for text records.  Each `encode_*` call overwrites the
/// buffer and returns a borrow of it, so the previous record must have been
/// handed off (and copied by the sink, if it defers transmission) before the
/// next call.  The borrow checker enforces this.
///
/// # Examples
///
/// ```rust
/// use input_core::protocol::codec::WireEncoder;
/// use input_core::protocol::messages::EventKind;
///
/// let mut encoder = WireEncoder::new();
/// let record = encoder.encode_fixed(EventKind::SurfaceResize, [800, 600, 0]);
/// assert_eq!(record, &[6, 800, 600, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct WireEncoder {
    fixed: [i32; FIXED_RECORD_SLOTS],
    text: Vec<i32>,
}

impl WireEncoder {
    /// Creates an encoder with a [`DEFAULT_TEXT_SLOTS`]-slot text buffer.
    pub fn new() -> Self {
        Self::with_text_capacity(DEFAULT_TEXT_SLOTS)
    }

    /// Creates an encoder whose text buffer starts with `slots` slots.
    pub fn with_text_capacity(slots: usize) -> Self {
        Self {
            fixed: [0; FIXED_RECORD_SLOTS],
            text: vec![0; slots],
        }
    }

    /// Current size of the text scratch buffer, in slots.
    ///
    /// This only ever grows.
    pub fn text_capacity(&self) -> usize {
        self.text.len()
    }

    /// Grows the text buffer to at least `slots` slots.  Never shrinks it.
    pub fn reserve_text_slots(&mut self, slots: usize) {
        if self.text.len() < slots {
            tracing::trace!(from = self.text.len(), to = slots, "growing text buffer");
            self.text.resize(slots, 0);
        }
    }

    /// Writes `[kind, f1, f2, f3]` into the fixed buffer and returns it.
    ///
    /// No validation is performed: callers pass already-classified fields.
    pub fn encode_fixed(&mut self, kind: EventKind, fields: [i32; 3]) -> &[i32] {
        self.fixed[0] = kind as i32;
        self.fixed[1..].copy_from_slice(&fields);
        &self.fixed
    }

    /// Writes a text record for `units` and returns exactly the slots that
    /// belong to it.
    ///
    /// Strings longer than [`MAX_TEXT_UNITS`] are truncated to that length.
    pub fn encode_text(&mut self, units: &[u16]) -> &[i32] {
        let units = &units[..units.len().min(MAX_TEXT_UNITS)];
        let required = text_record_slots(units.len());
        self.reserve_text_slots(required);

        self.text[0] = EventKind::TextPath as i32;
        self.text[1] = units.len() as i32;
        pack_units(units, &mut self.text[TEXT_HEADER_SLOTS..required]);
        &self.text[..required]
    }

    /// Encodes any [`InputRecord`], dispatching to the fixed or text path.
    pub fn encode(&mut self, record: &InputRecord) -> &[i32] {
        match record {
            InputRecord::TextPath(text) => {
                let units: Vec<u16> = text.encode_utf16().collect();
                self.encode_text(&units)
            }
            other => {
                // Every non-text variant has fixed fields.
                let fields = other.fixed_fields().unwrap_or([0; 3]);
                self.encode_fixed(other.kind(), fields)
            }
        }
    }
}

impl Default for WireEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes slots into little-endian wire bytes.
///
/// This is the snapshot a deferring transport takes before returning from
/// `send`.
pub fn record_to_le_bytes(slots: &[i32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(slots.len() * SLOT_SIZE);
    for slot in slots {
        buf.extend_from_slice(&slot.to_le_bytes());
    }
    buf
}

/// Reads little-endian `i32` slots from `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError::MisalignedLength`] if `bytes.len()` is not a
/// multiple of 4.
pub fn slots_from_le_bytes(bytes: &[u8]) -> Result<Vec<i32>, ProtocolError> {
    if bytes.len() % SLOT_SIZE != 0 {
        return Err(ProtocolError::MisalignedLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(SLOT_SIZE)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

// ── Decoder ───────────────────────────────────────────────────────────────────

/// Decodes one record from its wire bytes.
///
/// Fixed records may carry trailing bytes beyond the fourth slot; they are
/// ignored.  Text records must hold at least `2 + (len + 1) / 2` slots.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are truncated, misaligned, carry an
/// unknown kind, or hold out-of-range fields.
///
/// # Examples
///
/// ```rust
/// use input_core::protocol::codec::{decode_record, record_to_le_bytes, WireEncoder};
/// use input_core::protocol::messages::InputRecord;
///
/// let mut encoder = WireEncoder::new();
/// let bytes = record_to_le_bytes(encoder.encode(&InputRecord::TextPath("scene.osgt".into())));
/// assert_eq!(decode_record(&bytes).unwrap(), InputRecord::TextPath("scene.osgt".into()));
/// ```
pub fn decode_record(bytes: &[u8]) -> Result<InputRecord, ProtocolError> {
    let slots = slots_from_le_bytes(bytes)?;
    decode_slots(&slots)
}

/// Decodes one record from already-split slots.
///
/// # Errors
///
/// See [`decode_record`].
pub fn decode_slots(slots: &[i32]) -> Result<InputRecord, ProtocolError> {
    require_slots(slots, TEXT_HEADER_SLOTS)?;

    let kind = EventKind::try_from(slots[0]).map_err(|_| ProtocolError::UnknownKind(slots[0]))?;
    if kind == EventKind::TextPath {
        return decode_text(slots);
    }

    require_slots(slots, FIXED_RECORD_SLOTS)?;
    let (f1, f2, f3) = (slots[1], slots[2], slots[3]);
    let record = match kind {
        EventKind::PointerDown => InputRecord::PointerDown {
            x: f1,
            y: f2,
            button: decode_button(f3)?,
        },
        EventKind::PointerUp => InputRecord::PointerUp {
            x: f1,
            y: f2,
            button: decode_button(f3)?,
        },
        EventKind::PointerMove => InputRecord::PointerMove {
            x: f1,
            y: f2,
            button: decode_button(f3)?,
        },
        EventKind::KeyDown => InputRecord::KeyDown {
            code: f1,
            modifiers: Modifiers(f2),
        },
        EventKind::WheelScroll => {
            if !(-1..=1).contains(&f3) {
                return Err(ProtocolError::MalformedPayload(format!(
                    "wheel direction out of range: {f3}"
                )));
            }
            InputRecord::WheelScroll {
                x: f1,
                y: f2,
                direction: f3,
            }
        }
        EventKind::SurfaceResize => InputRecord::SurfaceResize {
            width: f1,
            height: f2,
        },
        EventKind::TextPath => unreachable!("text records are decoded above"),
    };
    Ok(record)
}

fn decode_text(slots: &[i32]) -> Result<InputRecord, ProtocolError> {
    let len = usize::try_from(slots[1]).map_err(|_| {
        ProtocolError::MalformedPayload(format!("negative text length: {}", slots[1]))
    })?;
    let needed = text_record_slots(len);
    let units = unpack_text(&slots[TEXT_HEADER_SLOTS..], len).ok_or(
        ProtocolError::InsufficientData {
            needed: needed * SLOT_SIZE,
            available: slots.len() * SLOT_SIZE,
        },
    )?;
    let text = String::from_utf16(&units)
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-16 text: {e}")))?;
    Ok(InputRecord::TextPath(text))
}

fn decode_button(code: i32) -> Result<PointerButton, ProtocolError> {
    PointerButton::try_from(code)
        .map_err(|_| ProtocolError::MalformedPayload(format!("unknown button code: {code}")))
}

fn require_slots(slots: &[i32], needed: usize) -> Result<(), ProtocolError> {
    if slots.len() < needed {
        Err(ProtocolError::InsufficientData {
            needed: needed * SLOT_SIZE,
            available: slots.len() * SLOT_SIZE,
        })
    } else {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
