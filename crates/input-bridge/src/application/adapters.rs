//! Browser event adapters.
//!
//! Each adapter resolves one family of browser quirks and produces the
//! canonical structs `input-core` works with.  Mouse and touch both end up as
//! a `(PointerPhase, PointerEvent)` pair, so the normalizer sees a single
//! pointer vocabulary regardless of the input device.

use input_core::{
    KeyEvent, Modifiers, PointerButton, PointerEvent, PointerPhase, SurfaceRect, WheelEvent,
};

use crate::domain::messages::{BrowserEvent, TouchPoint};

/// A browser event after adaptation, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalEvent {
    Pointer(PointerPhase, PointerEvent),
    Key(KeyEvent),
    Wheel(WheelEvent),
    Surface(SurfaceRect),
    Resize { width: i32, height: i32 },
    TextPath(String),
}

/// Mouse adapter: maps the DOM button value onto the wire button.
pub fn mouse_event(client_x: f64, client_y: f64, button: i32) -> PointerEvent {
    PointerEvent::new(client_x, client_y, PointerButton::from_dom_button(button))
}

/// Touch adapter: only the most recent touch point is used, and it always
/// acts as the left button.  An empty list yields nothing.
pub fn touch_event(touches: &[TouchPoint]) -> Option<PointerEvent> {
    touches
        .last()
        .map(|t| PointerEvent::new(t.client_x, t.client_y, PointerButton::Left))
}

/// Touch-lift adapter: the lifted finger is the last entry of
/// `changed_touches`.  Falls back to `touches` for pages that only forward
/// that list.
pub fn touch_lift_event(
    touches: &[TouchPoint],
    changed_touches: &[TouchPoint],
) -> Option<PointerEvent> {
    touch_event(changed_touches).or_else(|| touch_event(touches))
}

/// Keyboard adapter: `key_code` wins unless it is absent or 0, in which case
/// `char_code` is used.
pub fn key_event(
    key_code: Option<i32>,
    char_code: Option<i32>,
    alt: bool,
    ctrl: bool,
    shift: bool,
) -> KeyEvent {
    let code = match key_code {
        Some(code) if code != 0 => code,
        _ => char_code.unwrap_or(0),
    };
    KeyEvent::new(code, Modifiers::from_flags(alt, ctrl, shift))
}

/// Wheel adapter: `wheel_delta` wins unless it is absent or 0, in which case
/// the negated `detail` is used.
pub fn wheel_event(
    client_x: f64,
    client_y: f64,
    wheel_delta: Option<f64>,
    detail: Option<f64>,
) -> WheelEvent {
    let delta = match wheel_delta {
        Some(d) if d != 0.0 && !d.is_nan() => d,
        _ => -detail.unwrap_or(0.0),
    };
    WheelEvent::new(client_x, client_y, delta)
}

/// Runs `event` through the matching adapter.
///
/// Returns `None` for events that never produce a record: touch-cancel,
/// touch events with no touch point at all, and any touch event while
/// `touch_enabled` is `false`.  A `TouchEnd` with no point is resolved by
/// the session, which knows where the finger was last seen.
pub fn canonicalize(event: &BrowserEvent, touch_enabled: bool) -> Option<CanonicalEvent> {
    let pointer = |phase, ev: PointerEvent| Some(CanonicalEvent::Pointer(phase, ev));

    match event {
        BrowserEvent::MouseDown {
            client_x,
            client_y,
            button,
        } => pointer(PointerPhase::Down, mouse_event(*client_x, *client_y, *button)),
        BrowserEvent::MouseUp {
            client_x,
            client_y,
            button,
        } => pointer(PointerPhase::Up, mouse_event(*client_x, *client_y, *button)),
        BrowserEvent::MouseMove {
            client_x,
            client_y,
            button,
        } => pointer(PointerPhase::Move, mouse_event(*client_x, *client_y, *button)),

        BrowserEvent::TouchStart {
            touches,
            changed_touches,
        } if touch_enabled => touch_event(touches)
            .or_else(|| touch_event(changed_touches))
            .map(|ev| CanonicalEvent::Pointer(PointerPhase::Down, ev)),
        BrowserEvent::TouchEnd {
            touches,
            changed_touches,
        } if touch_enabled => touch_lift_event(touches, changed_touches)
            .map(|ev| CanonicalEvent::Pointer(PointerPhase::Up, ev)),
        BrowserEvent::TouchMove {
            touches,
            changed_touches,
        } if touch_enabled => touch_event(touches)
            .or_else(|| touch_event(changed_touches))
            .map(|ev| CanonicalEvent::Pointer(PointerPhase::Move, ev)),
        BrowserEvent::TouchStart { .. }
        | BrowserEvent::TouchEnd { .. }
        | BrowserEvent::TouchMove { .. }
        | BrowserEvent::TouchCancel { .. } => None,

        BrowserEvent::KeyDown {
            key_code,
            char_code,
            alt_key,
            ctrl_key,
            shift_key,
        } => Some(CanonicalEvent::Key(key_event(
            *key_code, *char_code, *alt_key, *ctrl_key, *shift_key,
        ))),

        BrowserEvent::Wheel {
            client_x,
            client_y,
            wheel_delta,
            detail,
        } => Some(CanonicalEvent::Wheel(wheel_event(
            *client_x,
            *client_y,
            *wheel_delta,
            *detail,
        ))),

        BrowserEvent::Surface {
            left,
            top,
            right,
            bottom,
        } => Some(CanonicalEvent::Surface(SurfaceRect::new(
            *left, *top, *right, *bottom,
        ))),

        BrowserEvent::Resize { width, height } => Some(CanonicalEvent::Resize {
            width: *width,
            height: *height,
        }),

        BrowserEvent::FilePath { path } => Some(CanonicalEvent::TextPath(path.clone())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(x: f64, y: f64) -> TouchPoint {
        TouchPoint {
            client_x: x,
            client_y: y,
        }
    }

    #[test]
    fn test_mouse_button_mapping() {
        assert_eq!(mouse_event(0.0, 0.0, 0).button, PointerButton::Left);
        assert_eq!(mouse_event(0.0, 0.0, 1).button, PointerButton::Middle);
        assert_eq!(mouse_event(0.0, 0.0, 2).button, PointerButton::Right);
        // Back/forward buttons fall back to left.
        assert_eq!(mouse_event(0.0, 0.0, 3).button, PointerButton::Left);
    }

    #[test]
    fn test_touch_uses_last_point_as_left_button() {
        // Arrange
        let touches = [tp(1.0, 2.0), tp(3.0, 4.0), tp(5.0, 6.0)];

        // Act
        let ev = touch_event(&touches).expect("non-empty list");

        // Assert
        assert_eq!(ev, PointerEvent::new(5.0, 6.0, PointerButton::Left));
    }

    #[test]
    fn test_touch_with_empty_list_yields_nothing() {
        assert_eq!(touch_event(&[]), None);
        let msg = BrowserEvent::TouchMove {
            touches: vec![],
            changed_touches: vec![],
        };
        assert_eq!(canonicalize(&msg, true), None);
    }

    #[test]
    fn test_one_finger_lift_uses_changed_touches() {
        // Arrange: the lifted finger is no longer in `touches`.
        let msg = BrowserEvent::TouchEnd {
            touches: vec![],
            changed_touches: vec![tp(40.0, 50.0)],
        };

        // Act
        let ev = canonicalize(&msg, true);

        // Assert
        assert_eq!(
            ev,
            Some(CanonicalEvent::Pointer(
                PointerPhase::Up,
                PointerEvent::new(40.0, 50.0, PointerButton::Left)
            ))
        );
    }

    #[test]
    fn test_touch_lift_prefers_changed_over_remaining_touches() {
        let ev = touch_lift_event(&[tp(1.0, 1.0)], &[tp(9.0, 9.0)]).expect("lift point");
        assert_eq!(ev, PointerEvent::new(9.0, 9.0, PointerButton::Left));
        let ev = touch_lift_event(&[tp(1.0, 1.0)], &[]).expect("lift point");
        assert_eq!(ev, PointerEvent::new(1.0, 1.0, PointerButton::Left));
    }

    #[test]
    fn test_touch_cancel_is_ignored() {
        let msg = BrowserEvent::TouchCancel {
            touches: vec![tp(10.0, 10.0)],
        };
        assert_eq!(canonicalize(&msg, true), None);
    }

    #[test]
    fn test_touch_disabled_ignores_all_touch_events() {
        let start = BrowserEvent::TouchStart {
            touches: vec![tp(10.0, 10.0)],
            changed_touches: vec![tp(10.0, 10.0)],
        };
        assert_eq!(canonicalize(&start, false), None);
    }

    #[test]
    fn test_touch_and_mouse_share_the_pointer_vocabulary() {
        let touch = canonicalize(
            &BrowserEvent::TouchStart {
                touches: vec![tp(7.0, 8.0)],
                changed_touches: vec![],
            },
            true,
        );
        let mouse = canonicalize(
            &BrowserEvent::MouseDown {
                client_x: 7.0,
                client_y: 8.0,
                button: 0,
            },
            true,
        );
        assert_eq!(touch, mouse);
    }

    #[test]
    fn test_key_code_preferred_over_char_code() {
        let ev = key_event(Some(13), Some(97), false, false, false);
        assert_eq!(ev.code, 13);
    }

    #[test]
    fn test_zero_key_code_falls_back_to_char_code() {
        assert_eq!(key_event(Some(0), Some(97), false, false, false).code, 97);
        assert_eq!(key_event(None, Some(98), false, false, false).code, 98);
        assert_eq!(key_event(None, None, false, false, false).code, 0);
    }

    #[test]
    fn test_key_modifiers() {
        let ev = key_event(Some(65), None, true, true, true);
        assert_eq!(ev.modifiers, Modifiers(0x111));
    }

    #[test]
    fn test_wheel_delta_preferred_over_detail() {
        assert_eq!(wheel_event(0.0, 0.0, Some(-120.0), Some(3.0)).delta, -120.0);
    }

    #[test]
    fn test_wheel_detail_is_negated_when_delta_missing() {
        assert_eq!(wheel_event(0.0, 0.0, None, Some(3.0)).direction(), -1);
        assert_eq!(wheel_event(0.0, 0.0, Some(0.0), Some(-3.0)).direction(), 1);
        assert_eq!(wheel_event(0.0, 0.0, None, None).direction(), 0);
    }

    #[test]
    fn test_surface_and_resize_pass_through() {
        let surface = BrowserEvent::Surface {
            left: 1.0,
            top: 2.0,
            right: 3.0,
            bottom: 4.0,
        };
        assert_eq!(
            canonicalize(&surface, true),
            Some(CanonicalEvent::Surface(SurfaceRect::new(1.0, 2.0, 3.0, 4.0)))
        );

        let resize = BrowserEvent::Resize {
            width: 800,
            height: 600,
        };
        assert_eq!(
            canonicalize(&resize, true),
            Some(CanonicalEvent::Resize {
                width: 800,
                height: 600
            })
        );
    }
}
