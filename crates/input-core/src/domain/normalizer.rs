//! The event normalizer.
//!
//! Decides whether an incoming event produces a record and computes its
//! surface-local fields.  Nothing here fails: an event that should not reach
//! the remote host is dropped and the caller gets `None`.
//!
//! # Held-button gating
//!
//! Pointer moves are only forwarded while a button is held.  The held flag is
//! driven by down/up events according to a [`GatingPolicy`]:
//!
//! | Policy         | Down outside    | Up outside                   |
//! |----------------|-----------------|------------------------------|
//! | `Consistent`   | dropped         | dropped, flag unchanged      |
//! | `Legacy`       | dropped         | dropped, flag cleared        |
//!
//! Inside the surface both policies emit the record and update the flag.

use tracing::trace;

use crate::domain::events::{KeyEvent, PointerEvent, PointerPhase, WheelEvent};
use crate::domain::surface::SurfaceRect;
use crate::protocol::messages::InputRecord;

/// How out-of-bounds pointer-up events affect the held flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatingPolicy {
    /// The held flag changes only on transitions inside the surface.
    #[default]
    Consistent,
    /// A pointer-up anywhere clears the held flag, even when no record is
    /// emitted for it.
    Legacy,
}

/// Turns canonical events into [`InputRecord`]s.
///
/// One normalizer belongs to one surface/session.  Its only cross-event state
/// is the held flag and, when redundant-move suppression is enabled, the last
/// forwarded move position.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    surface: SurfaceRect,
    policy: GatingPolicy,
    button_held: bool,
    suppress_duplicate_moves: bool,
    last_move: Option<(i32, i32)>,
}

impl EventNormalizer {
    /// Creates a normalizer for `surface` with the default policy.
    pub fn new(surface: SurfaceRect) -> Self {
        Self {
            surface,
            policy: GatingPolicy::default(),
            button_held: false,
            suppress_duplicate_moves: false,
            last_move: None,
        }
    }

    /// Sets the gating policy.
    pub fn with_policy(mut self, policy: GatingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drops held moves that land on the same surface-local position as the
    /// previous forwarded move.
    pub fn with_duplicate_move_suppression(mut self, enabled: bool) -> Self {
        self.suppress_duplicate_moves = enabled;
        self
    }

    /// The current surface rectangle.
    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    /// Replaces the surface rectangle, e.g. after a page layout change.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.surface = surface;
    }

    /// Returns `true` while a pointer button is held.
    pub fn is_button_held(&self) -> bool {
        self.button_held
    }

    /// Returns `true` if `event` lies strictly inside the surface.
    pub fn is_valid(&self, event: &PointerEvent) -> bool {
        self.surface.contains(event.client_x, event.client_y)
    }

    /// Classifies a pointer event.
    ///
    /// Mouse and touch adapters both funnel into this entry point.
    pub fn pointer(&mut self, phase: PointerPhase, event: &PointerEvent) -> Option<InputRecord> {
        match phase {
            PointerPhase::Down => self.pointer_down(event),
            PointerPhase::Up => self.pointer_up(event),
            PointerPhase::Move => self.pointer_move(event),
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> Option<InputRecord> {
        self.last_move = None;
        if !self.is_valid(event) {
            trace!(x = event.client_x, y = event.client_y, "pointer down outside surface dropped");
            return None;
        }
        self.button_held = true;
        let (x, y) = self.local(event);
        Some(InputRecord::PointerDown {
            x,
            y,
            button: event.button,
        })
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> Option<InputRecord> {
        self.last_move = None;
        if !self.is_valid(event) {
            if self.policy == GatingPolicy::Legacy {
                self.button_held = false;
            }
            trace!(x = event.client_x, y = event.client_y, "pointer up outside surface dropped");
            return None;
        }
        self.button_held = false;
        let (x, y) = self.local(event);
        Some(InputRecord::PointerUp {
            x,
            y,
            button: event.button,
        })
    }

    fn pointer_move(&mut self, event: &PointerEvent) -> Option<InputRecord> {
        if !self.button_held {
            return None;
        }
        let (x, y) = self.local(event);
        if self.suppress_duplicate_moves {
            if self.last_move == Some((x, y)) {
                trace!(x, y, "redundant pointer move dropped");
                return None;
            }
            self.last_move = Some((x, y));
        }
        Some(InputRecord::PointerMove {
            x,
            y,
            button: event.button,
        })
    }

    /// Classifies a key press.  Keyboard focus is global, so every key press
    /// is forwarded.
    pub fn key_down(&self, event: &KeyEvent) -> InputRecord {
        InputRecord::KeyDown {
            code: event.code,
            modifiers: event.modifiers,
        }
    }

    /// Classifies a wheel notch.  Wheel events are forwarded from anywhere on
    /// the page; the position is still expressed relative to the surface.
    pub fn wheel(&self, event: &WheelEvent) -> InputRecord {
        let (x, y) = self.surface.to_local(event.client_x, event.client_y);
        InputRecord::WheelScroll {
            x,
            y,
            direction: event.direction(),
        }
    }

    /// Classifies an externally triggered surface resize.
    pub fn resize(&self, width: i32, height: i32) -> InputRecord {
        InputRecord::SurfaceResize { width, height }
    }

    fn local(&self, event: &PointerEvent) -> (i32, i32) {
        self.surface.to_local(event.client_x, event.client_y)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
