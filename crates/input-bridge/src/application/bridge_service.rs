//! Per-session translation: browser JSON → canonical events → binary records.
//!
//! A [`BridgeSession`] is created for every browser connection.  It owns one
//! [`InputDispatcher`], so normalizer state (held button, surface rectangle)
//! and encoder scratch buffers are never shared between browsers.
//!
//! The session is synchronous and transport-agnostic: the infrastructure layer
//! passes in a [`RecordSink`] that queues records for the remote host, and
//! tests pass in a [`input_core::RecordingSink`].

use input_core::{
    EventNormalizer, InputDispatcher, PointerEvent, PointerPhase, RecordSink, SurfaceRect,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::application::adapters::{canonicalize, CanonicalEvent};
use crate::domain::config::{InputSettings, MAX_TEXT_BUFFER_SLOTS};
use crate::domain::messages::BrowserEvent;

/// Errors that can occur while handling a browser message.
///
/// None of these end the session; the caller logs them and moves on to the
/// next frame.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The frame was not valid JSON or did not match any known message type.
    #[error("invalid browser message: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A `Surface` message described an empty or non-finite rectangle.
    #[error("invalid surface rectangle ({left}, {top}, {right}, {bottom})")]
    InvalidSurface {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
}

/// Parses one browser text frame.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidJson`] when the text is not a known message.
pub fn parse_browser_event(json: &str) -> Result<BrowserEvent, BridgeError> {
    Ok(serde_json::from_str(json)?)
}

/// Builds the normalizer described by `settings`.
pub fn normalizer_from_settings(settings: &InputSettings) -> EventNormalizer {
    EventNormalizer::new(settings.surface.to_rect())
        .with_policy(settings.gating.into())
        .with_duplicate_move_suppression(settings.suppress_duplicate_moves)
}

/// One browser's input pipeline.
pub struct BridgeSession<S> {
    dispatcher: InputDispatcher<S>,
    touch_enabled: bool,
    /// Where the active touch was last seen; released there when a
    /// `TouchEnd` carries no point.
    last_touch: Option<PointerEvent>,
}

impl<S: RecordSink> BridgeSession<S> {
    /// Creates a session configured by `settings` that emits into `sink`.
    ///
    /// `text_buffer_slots` is capped at [`MAX_TEXT_BUFFER_SLOTS`].
    pub fn new(settings: &InputSettings, sink: S) -> Self {
        let mut dispatcher =
            InputDispatcher::with_normalizer(normalizer_from_settings(settings), sink);
        dispatcher.reserve_text_slots(settings.text_buffer_slots.min(MAX_TEXT_BUFFER_SLOTS));
        Self {
            dispatcher,
            touch_enabled: settings.touch_enabled,
            last_touch: None,
        }
    }

    /// Parses and handles one browser text frame.
    ///
    /// Returns whether a record was emitted.
    ///
    /// # Errors
    ///
    /// See [`BridgeSession::handle_browser_event`] and
    /// [`parse_browser_event`].
    pub fn handle_text(&mut self, json: &str) -> Result<bool, BridgeError> {
        let event = parse_browser_event(json)?;
        self.handle_browser_event(&event)
    }

    /// Runs one browser message through the adapters and the dispatcher.
    ///
    /// Returns whether a record was emitted.  Filtered events (pointer
    /// outside the surface, unheld moves, touch-cancel) return `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidSurface`] for a `Surface` message whose
    /// rectangle is empty or not finite.  The previous surface stays active.
    pub fn handle_browser_event(&mut self, event: &BrowserEvent) -> Result<bool, BridgeError> {
        let canonical =
            canonicalize(event, self.touch_enabled).or_else(|| self.release_last_touch(event));
        self.track_touch(event, canonical.as_ref());
        let Some(canonical) = canonical else {
            trace!(msg = event.type_name(), "browser event ignored");
            return Ok(false);
        };

        let sent = match canonical {
            CanonicalEvent::Pointer(phase, ev) => self.dispatcher.pointer(phase, &ev),
            CanonicalEvent::Key(ev) => self.dispatcher.key_down(&ev),
            CanonicalEvent::Wheel(ev) => self.dispatcher.wheel(&ev),
            CanonicalEvent::Resize { width, height } => {
                self.dispatcher.notify_resize(width, height)
            }
            CanonicalEvent::TextPath(path) => self.dispatcher.send_text_path(&path),
            CanonicalEvent::Surface(rect) => {
                validate_surface(&rect)?;
                debug!(
                    left = rect.left,
                    top = rect.top,
                    width = rect.width(),
                    height = rect.height(),
                    "surface updated"
                );
                self.dispatcher.set_surface(rect);
                false
            }
        };
        Ok(sent)
    }

    fn release_last_touch(&self, event: &BrowserEvent) -> Option<CanonicalEvent> {
        match event {
            BrowserEvent::TouchEnd { .. } if self.touch_enabled => self
                .last_touch
                .map(|ev| CanonicalEvent::Pointer(PointerPhase::Up, ev)),
            _ => None,
        }
    }

    fn track_touch(&mut self, event: &BrowserEvent, canonical: Option<&CanonicalEvent>) {
        match (event, canonical) {
            (
                BrowserEvent::TouchStart { .. } | BrowserEvent::TouchMove { .. },
                Some(CanonicalEvent::Pointer(_, ev)),
            ) => self.last_touch = Some(*ev),
            (BrowserEvent::TouchEnd { .. } | BrowserEvent::TouchCancel { .. }, _) => {
                self.last_touch = None
            }
            _ => {}
        }
    }

    /// The session's dispatcher.
    pub fn dispatcher(&self) -> &InputDispatcher<S> {
        &self.dispatcher
    }

    /// Consumes the session and returns its sink.
    pub fn into_sink(self) -> S {
        self.dispatcher.into_sink()
    }
}

fn validate_surface(rect: &SurfaceRect) -> Result<(), BridgeError> {
    let finite = [rect.left, rect.top, rect.right, rect.bottom]
        .iter()
        .all(|v| v.is_finite());
    if finite && rect.width() > 0.0 && rect.height() > 0.0 {
        Ok(())
    } else {
        Err(BridgeError::InvalidSurface {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{GatingMode, SurfaceSettings};
    use input_core::RecordingSink;

    fn settings() -> InputSettings {
        InputSettings {
            surface: SurfaceSettings {
                left: 10.0,
                top: 20.0,
                right: 810.0,
                bottom: 620.0,
            },
            ..InputSettings::default()
        }
    }

    fn session() -> BridgeSession<RecordingSink> {
        BridgeSession::new(&settings(), RecordingSink::default())
    }

    #[test]
    fn test_right_click_inside_surface() {
        // Arrange
        let mut s = session();

        // Act
        let down = s
            .handle_text(r#"{"type":"MouseDown","client_x":110,"client_y":70,"button":2}"#)
            .unwrap();
        let up = s
            .handle_text(r#"{"type":"MouseUp","client_x":110,"client_y":70,"button":2}"#)
            .unwrap();

        // Assert
        assert!(down && up);
        assert_eq!(
            s.dispatcher().sink().records(),
            &[vec![1, 100, 50, 4], vec![2, 100, 50, 4]]
        );
    }

    #[test]
    fn test_touch_drag_streams_moves() {
        let mut s = session();
        let touch = |kind: &str, x: i32| {
            format!(r#"{{"type":"{kind}","touches":[{{"client_x":{x},"client_y":30}}]}}"#)
        };

        s.handle_text(&touch("TouchStart", 20)).unwrap();
        s.handle_text(&touch("TouchMove", 25)).unwrap();
        s.handle_text(r#"{"type":"TouchEnd","touches":[],"changedTouches":[{"clientX":30,"clientY":30}]}"#)
            .unwrap();

        assert_eq!(
            s.dispatcher().sink().records(),
            &[vec![1, 10, 10, 0], vec![3, 15, 10, 0], vec![2, 20, 10, 0]]
        );
        assert!(!s.dispatcher().normalizer().is_button_held());
    }

    #[test]
    fn test_touch_end_without_points_releases_at_last_touch() {
        // Arrange
        let mut s = session();
        s.handle_text(r#"{"type":"TouchStart","touches":[{"client_x":60,"client_y":70}]}"#)
            .unwrap();
        s.handle_text(r#"{"type":"TouchMove","touches":[{"client_x":65,"client_y":72}]}"#)
            .unwrap();

        // Act
        let up = s.handle_text(r#"{"type":"TouchEnd","touches":[]}"#).unwrap();
        let later_move = s
            .handle_text(r#"{"type":"MouseMove","client_x":70,"client_y":80}"#)
            .unwrap();

        // Assert
        assert!(up);
        assert!(!later_move);
        assert!(!s.dispatcher().normalizer().is_button_held());
        assert_eq!(
            s.dispatcher().sink().records(),
            &[vec![1, 50, 50, 0], vec![3, 55, 52, 0], vec![2, 55, 52, 0]]
        );
    }

    #[test]
    fn test_touch_end_without_prior_touch_is_ignored() {
        let mut s = session();
        let sent = s.handle_text(r#"{"type":"TouchEnd","touches":[]}"#).unwrap();
        assert!(!sent);
        assert!(s.dispatcher().sink().is_empty());
    }

    #[test]
    fn test_touch_cancel_forgets_last_touch() {
        let mut s = session();
        s.handle_text(r#"{"type":"TouchStart","touches":[{"client_x":60,"client_y":70}]}"#)
            .unwrap();
        s.handle_text(r#"{"type":"TouchCancel","touches":[]}"#).unwrap();

        let sent = s.handle_text(r#"{"type":"TouchEnd","touches":[]}"#).unwrap();

        assert!(!sent);
        assert_eq!(s.dispatcher().sink().records(), &[vec![1, 50, 50, 0]]);
    }

    #[test]
    fn test_touch_disabled_by_settings() {
        let mut cfg = settings();
        cfg.touch_enabled = false;
        let mut s = BridgeSession::new(&cfg, RecordingSink::default());

        let sent = s
            .handle_text(r#"{"type":"TouchStart","touches":[{"client_x":20,"client_y":30}]}"#)
            .unwrap();

        assert!(!sent);
        assert!(s.dispatcher().sink().is_empty());
    }

    #[test]
    fn test_key_down_with_char_code_fallback() {
        let mut s = session();
        s.handle_text(r#"{"type":"KeyDown","key_code":0,"char_code":97,"ctrl_key":true}"#)
            .unwrap();
        assert_eq!(s.dispatcher().sink().last(), Some(&[4, 97, 0x10, 0][..]));
    }

    #[test]
    fn test_wheel_with_firefox_detail() {
        let mut s = session();
        s.handle_text(r#"{"type":"Wheel","client_x":110,"client_y":70,"detail":3}"#)
            .unwrap();
        assert_eq!(s.dispatcher().sink().last(), Some(&[5, 100, 50, -1][..]));
    }

    #[test]
    fn test_surface_message_moves_the_surface() {
        let mut s = session();

        let sent = s
            .handle_text(r#"{"type":"Surface","left":0,"top":0,"right":100,"bottom":100}"#)
            .unwrap();
        s.handle_text(r#"{"type":"MouseDown","client_x":5,"client_y":5,"button":0}"#)
            .unwrap();

        assert!(!sent);
        assert_eq!(s.dispatcher().sink().records(), &[vec![1, 5, 5, 0]]);
    }

    #[test]
    fn test_empty_surface_is_rejected_and_previous_kept() {
        let mut s = session();

        let result =
            s.handle_text(r#"{"type":"Surface","left":50,"top":0,"right":50,"bottom":100}"#);

        assert!(matches!(result, Err(BridgeError::InvalidSurface { .. })));
        assert_eq!(s.dispatcher().normalizer().surface(), settings().surface.to_rect());
    }

    #[test]
    fn test_resize_and_file_path() {
        let mut s = session();
        s.handle_text(r#"{"type":"Resize","width":800,"height":600}"#).unwrap();
        s.handle_text(r#"{"type":"FilePath","path":"AB"}"#).unwrap();

        let records = s.into_sink();
        assert_eq!(records.records()[0], vec![6, 800, 600, 0]);
        assert_eq!(records.records()[1], vec![7, 2, 65 | (66 << 16)]);
    }

    #[test]
    fn test_invalid_json_is_an_error_not_a_panic() {
        let mut s = session();
        let result = s.handle_text("{not json");
        assert!(matches!(result, Err(BridgeError::InvalidJson(_))));
        assert!(s.dispatcher().sink().is_empty());
    }

    #[test]
    fn test_legacy_gating_from_settings() {
        let mut cfg = settings();
        cfg.gating = GatingMode::Legacy;
        let mut s = BridgeSession::new(&cfg, RecordingSink::default());

        s.handle_text(r#"{"type":"MouseDown","client_x":110,"client_y":70}"#).unwrap();
        s.handle_text(r#"{"type":"MouseUp","client_x":2000,"client_y":70}"#).unwrap();
        let sent = s
            .handle_text(r#"{"type":"MouseMove","client_x":120,"client_y":70}"#)
            .unwrap();

        assert!(!sent);
        assert!(!s.dispatcher().normalizer().is_button_held());
    }

    #[test]
    fn test_oversized_text_buffer_setting_is_capped() {
        let mut cfg = settings();
        cfg.text_buffer_slots = usize::MAX;
        let s = BridgeSession::new(&cfg, RecordingSink::default());
        assert_eq!(s.dispatcher().encoder().text_capacity(), MAX_TEXT_BUFFER_SLOTS);
    }

    #[test]
    fn test_text_buffer_presized_from_settings() {
        let mut cfg = settings();
        cfg.text_buffer_slots = 256;
        let s = BridgeSession::new(&cfg, RecordingSink::default());
        assert_eq!(s.dispatcher().encoder().text_capacity(), 256);
    }
}
