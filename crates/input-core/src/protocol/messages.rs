//! All input-stream record types.
//!
//! Every record starts with an `i32` kind tag.  Kinds 1–6 are fixed records of
//! exactly [`FIXED_RECORD_SLOTS`] slots; kind 7 carries a packed UTF-16 string.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Number of `i32` slots in every fixed (non-text) record.
pub const FIXED_RECORD_SLOTS: usize = 4;

/// Number of `i32` slots preceding the packed characters of a text record
/// (`[kind, length]`).
pub const TEXT_HEADER_SLOTS: usize = 2;

/// Size in bytes of one wire slot.
pub const SLOT_SIZE: usize = 4;

// ── Event kinds ───────────────────────────────────────────────────────────────

/// Integer tag identifying which event variant a record encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EventKind {
    PointerDown = 1,
    PointerUp = 2,
    PointerMove = 3,
    KeyDown = 4,
    WheelScroll = 5,
    SurfaceResize = 6,
    TextPath = 7,
}

impl EventKind {
    /// Returns `true` for the kinds encoded as 4-slot fixed records.
    pub fn is_fixed(self) -> bool {
        !matches!(self, EventKind::TextPath)
    }
}

impl TryFrom<i32> for EventKind {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EventKind::PointerDown),
            2 => Ok(EventKind::PointerUp),
            3 => Ok(EventKind::PointerMove),
            4 => Ok(EventKind::KeyDown),
            5 => Ok(EventKind::WheelScroll),
            6 => Ok(EventKind::SurfaceResize),
            7 => Ok(EventKind::TextPath),
            _ => Err(()),
        }
    }
}

// ── Pointer buttons ───────────────────────────────────────────────────────────

/// Mouse button identity as carried on the wire.
///
/// The codes are not dense: left=0, middle=1, right=4.  Remote hosts map
/// these values back to their own button numbering, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PointerButton {
    #[default]
    Left = 0,
    Middle = 1,
    Right = 4,
}

impl PointerButton {
    /// Maps a DOM `MouseEvent.button` value (0 = main, 1 = auxiliary,
    /// 2 = secondary) to the wire button.
    ///
    /// Back/forward buttons and unknown values fall back to [`PointerButton::Left`].
    pub fn from_dom_button(button: i32) -> Self {
        match button {
            1 => PointerButton::Middle,
            2 => PointerButton::Right,
            _ => PointerButton::Left,
        }
    }

    /// Returns the wire code for this button.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for PointerButton {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PointerButton::Left),
            1 => Ok(PointerButton::Middle),
            4 => Ok(PointerButton::Right),
            _ => Err(()),
        }
    }
}

// ── Modifier keys ─────────────────────────────────────────────────────────────

/// Modifier key bitmask carried by [`InputRecord::KeyDown`].
///
/// Bit layout:
/// - `0x001`: Alt
/// - `0x010`: Ctrl
/// - `0x100`: Shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub i32);

impl Modifiers {
    pub const ALT: i32 = 0x1;
    pub const CTRL: i32 = 0x10;
    pub const SHIFT: i32 = 0x100;

    /// Builds the bitmask from the three DOM modifier flags.
    pub fn from_flags(alt: bool, ctrl: bool, shift: bool) -> Self {
        let mut bits = 0;
        if alt {
            bits |= Self::ALT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if shift {
            bits |= Self::SHIFT;
        }
        Self(bits)
    }

    /// Returns `true` if Alt was held.
    pub fn alt(&self) -> bool {
        self.0 & Self::ALT != 0
    }

    /// Returns `true` if Ctrl was held.
    pub fn ctrl(&self) -> bool {
        self.0 & Self::CTRL != 0
    }

    /// Returns `true` if Shift was held.
    pub fn shift(&self) -> bool {
        self.0 & Self::SHIFT != 0
    }
}

// ── Typed record ──────────────────────────────────────────────────────────────

/// A single classified input event, in surface-local wire units.
///
/// The normalizer produces these, the [`WireEncoder`](crate::protocol::WireEncoder)
/// serializes them, and [`decode_record`](crate::protocol::decode_record) turns
/// wire bytes back into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRecord {
    PointerDown { x: i32, y: i32, button: PointerButton },
    PointerUp { x: i32, y: i32, button: PointerButton },
    PointerMove { x: i32, y: i32, button: PointerButton },
    KeyDown { code: i32, modifiers: Modifiers },
    /// `direction` is always -1, 0 or 1.
    WheelScroll { x: i32, y: i32, direction: i32 },
    SurfaceResize { width: i32, height: i32 },
    TextPath(String),
}

impl InputRecord {
    /// Returns the [`EventKind`] discriminant for this record.
    pub fn kind(&self) -> EventKind {
        match self {
            InputRecord::PointerDown { .. } => EventKind::PointerDown,
            InputRecord::PointerUp { .. } => EventKind::PointerUp,
            InputRecord::PointerMove { .. } => EventKind::PointerMove,
            InputRecord::KeyDown { .. } => EventKind::KeyDown,
            InputRecord::WheelScroll { .. } => EventKind::WheelScroll,
            InputRecord::SurfaceResize { .. } => EventKind::SurfaceResize,
            InputRecord::TextPath(_) => EventKind::TextPath,
        }
    }

    /// Returns the three payload slots of a fixed record, or `None` for
    /// [`InputRecord::TextPath`].  Two-field kinds leave the last slot zero.
    pub fn fixed_fields(&self) -> Option<[i32; 3]> {
        match *self {
            InputRecord::PointerDown { x, y, button }
            | InputRecord::PointerUp { x, y, button }
            | InputRecord::PointerMove { x, y, button } => Some([x, y, button.code()]),
            InputRecord::KeyDown { code, modifiers } => Some([code, modifiers.0, 0]),
            InputRecord::WheelScroll { x, y, direction } => Some([x, y, direction]),
            InputRecord::SurfaceResize { width, height } => Some([width, height, 0]),
            InputRecord::TextPath(_) => None,
        }
    }
}
