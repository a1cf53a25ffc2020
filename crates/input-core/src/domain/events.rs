//! Canonical event structs.
//!
//! Browsers expose the same information under different property names
//! (`keyCode` vs `charCode`, `wheelDelta` vs `detail`) and through different
//! event families (mouse vs touch).  Adapters at the boundary resolve all of
//! that and hand the normalizer one of these structs.

use crate::protocol::messages::{Modifiers, PointerButton};

/// Which pointer transition an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Up,
    Move,
}

/// A mouse or touch position, in the surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    /// Touch points always report [`PointerButton::Left`].
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64, button: PointerButton) -> Self {
        Self {
            client_x,
            client_y,
            button,
        }
    }
}

/// A key press with its resolved legacy key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: i32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: i32, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// A wheel notch with its signed magnitude.
///
/// `delta` is positive for scrolling up/away from the user.  Only its sign
/// reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub delta: f64,
}

impl WheelEvent {
    pub fn new(client_x: f64, client_y: f64, delta: f64) -> Self {
        Self {
            client_x,
            client_y,
            delta,
        }
    }

    /// The wire direction: `delta` clamped to {-1, 0, 1}.
    pub fn direction(&self) -> i32 {
        if self.delta > 0.0 {
            1
        } else if self.delta < 0.0 {
            -1
        } else {
            0
        }
    }
}
