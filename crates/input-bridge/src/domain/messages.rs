//! JSON message types exchanged between the browser and the bridge.
//!
//! The browser serializes each DOM event it cares about into one JSON text
//! frame.  Every message carries a `"type"` discriminator:
//!
//! ```json
//! { "type": "MouseDown", "client_x": 120.5, "client_y": 88.0, "button": 2 }
//! { "type": "KeyDown", "key_code": 65, "ctrl_key": true }
//! { "type": "TouchMove", "touches": [{ "client_x": 10.0, "client_y": 20.0 }] }
//! ```
//!
//! Field names follow Rust conventions; the DOM property names (`clientX`,
//! `keyCode`, `wheelDelta`, ...) are accepted as aliases so a page can forward
//! event properties without renaming them.
//!
//! Nothing here is interpreted.  The adapters in
//! [`crate::application::adapters`] resolve browser quirks into the canonical
//! event structs of `input-core`.

use serde::{Deserialize, Serialize};

/// One touch point from a `TouchEvent.touches` list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    #[serde(alias = "clientX")]
    pub client_x: f64,
    #[serde(alias = "clientY")]
    pub client_y: f64,
}

/// Messages sent from the browser to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BrowserEvent {
    MouseDown {
        #[serde(alias = "clientX")]
        client_x: f64,
        #[serde(alias = "clientY")]
        client_y: f64,
        /// DOM `MouseEvent.button` (0 left, 1 middle, 2 right).
        #[serde(default)]
        button: i32,
    },
    MouseUp {
        #[serde(alias = "clientX")]
        client_x: f64,
        #[serde(alias = "clientY")]
        client_y: f64,
        #[serde(default)]
        button: i32,
    },
    MouseMove {
        #[serde(alias = "clientX")]
        client_x: f64,
        #[serde(alias = "clientY")]
        client_y: f64,
        #[serde(default)]
        button: i32,
    },

    TouchStart {
        #[serde(default)]
        touches: Vec<TouchPoint>,
        #[serde(default, alias = "changedTouches")]
        changed_touches: Vec<TouchPoint>,
    },
    /// A finger lifted.  The lifted finger is only in `changed_touches`;
    /// `touches` is empty after a one-finger lift.
    TouchEnd {
        #[serde(default)]
        touches: Vec<TouchPoint>,
        #[serde(default, alias = "changedTouches")]
        changed_touches: Vec<TouchPoint>,
    },
    TouchMove {
        #[serde(default)]
        touches: Vec<TouchPoint>,
        #[serde(default, alias = "changedTouches")]
        changed_touches: Vec<TouchPoint>,
    },
    /// Accepted so pages can forward every touch event, but never encoded.
    TouchCancel {
        #[serde(default)]
        touches: Vec<TouchPoint>,
    },

    /// A key press.  Older browsers report printable keys through
    /// `charCode` and leave `keyCode` at 0.
    KeyDown {
        #[serde(default, alias = "keyCode")]
        key_code: Option<i32>,
        #[serde(default, alias = "charCode")]
        char_code: Option<i32>,
        #[serde(default, alias = "altKey")]
        alt_key: bool,
        #[serde(default, alias = "ctrlKey")]
        ctrl_key: bool,
        #[serde(default, alias = "shiftKey")]
        shift_key: bool,
    },

    /// A wheel notch.  `wheel_delta` is the `mousewheel` property;
    /// `detail` is the Firefox `DOMMouseScroll` property, with inverted sign.
    Wheel {
        #[serde(alias = "clientX")]
        client_x: f64,
        #[serde(alias = "clientY")]
        client_y: f64,
        #[serde(default, alias = "wheelDelta")]
        wheel_delta: Option<f64>,
        #[serde(default)]
        detail: Option<f64>,
    },

    /// The render surface's bounding rectangle moved or changed size.
    Surface {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },

    /// The page asks the remote host to resize its render target.
    Resize { width: i32, height: i32 },

    /// A file path to open on the remote host, e.g. from a file picker.
    FilePath { path: String },
}

impl BrowserEvent {
    /// Returns a short type-name string for log messages.
    ///
    /// Field values are never included, so file paths do not end up in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            BrowserEvent::MouseDown { .. } => "MouseDown",
            BrowserEvent::MouseUp { .. } => "MouseUp",
            BrowserEvent::MouseMove { .. } => "MouseMove",
            BrowserEvent::TouchStart { .. } => "TouchStart",
            BrowserEvent::TouchEnd { .. } => "TouchEnd",
            BrowserEvent::TouchMove { .. } => "TouchMove",
            BrowserEvent::TouchCancel { .. } => "TouchCancel",
            BrowserEvent::KeyDown { .. } => "KeyDown",
            BrowserEvent::Wheel { .. } => "Wheel",
            BrowserEvent::Surface { .. } => "Surface",
            BrowserEvent::Resize { .. } => "Resize",
            BrowserEvent::FilePath { .. } => "FilePath",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_down_deserializes() {
        // Arrange
        let json = r#"{"type":"MouseDown","client_x":10.5,"client_y":20.0,"button":2}"#;

        // Act
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");

        // Assert
        assert_eq!(
            msg,
            BrowserEvent::MouseDown {
                client_x: 10.5,
                client_y: 20.0,
                button: 2
            }
        );
    }

    #[test]
    fn test_mouse_button_defaults_to_zero() {
        let json = r#"{"type":"MouseMove","client_x":1,"client_y":2}"#;
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");
        assert!(matches!(msg, BrowserEvent::MouseMove { button: 0, .. }));
    }

    #[test]
    fn test_dom_property_names_are_accepted() {
        let json = r#"{"type":"KeyDown","keyCode":0,"charCode":97,"shiftKey":true}"#;
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            msg,
            BrowserEvent::KeyDown {
                key_code: Some(0),
                char_code: Some(97),
                alt_key: false,
                ctrl_key: false,
                shift_key: true
            }
        );
    }

    #[test]
    fn test_key_down_with_no_fields() {
        let msg: BrowserEvent = serde_json::from_str(r#"{"type":"KeyDown"}"#).expect("deserialize");
        assert!(matches!(
            msg,
            BrowserEvent::KeyDown {
                key_code: None,
                char_code: None,
                ..
            }
        ));
    }

    #[test]
    fn test_touch_list_deserializes_in_order() {
        let json = r#"{"type":"TouchStart","touches":[{"clientX":1,"clientY":2},{"client_x":3,"client_y":4}]}"#;
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");
        match msg {
            BrowserEvent::TouchStart {
                touches,
                changed_touches,
            } => {
                assert_eq!(touches.len(), 2);
                assert_eq!(
                    touches[1],
                    TouchPoint {
                        client_x: 3.0,
                        client_y: 4.0
                    }
                );
                assert!(changed_touches.is_empty());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_touch_end_with_changed_touches_only() {
        let json = r#"{"type":"TouchEnd","touches":[],"changedTouches":[{"clientX":7,"clientY":8}]}"#;
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            msg,
            BrowserEvent::TouchEnd {
                touches: vec![],
                changed_touches: vec![TouchPoint {
                    client_x: 7.0,
                    client_y: 8.0
                }]
            }
        );
    }

    #[test]
    fn test_wheel_with_detail_only() {
        let json = r#"{"type":"Wheel","client_x":5,"client_y":6,"detail":3}"#;
        let msg: BrowserEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            msg,
            BrowserEvent::Wheel {
                client_x: 5.0,
                client_y: 6.0,
                wheel_delta: None,
                detail: Some(3.0)
            }
        );
    }

    #[test]
    fn test_file_path_round_trips() {
        let msg = BrowserEvent::FilePath {
            path: "C:\\data\\cow.osg".to_string(),
        };
        let json = serde_json::to_string(&msg).expect("serialize");
        assert!(json.contains(r#""type":"FilePath""#));
        let back: BrowserEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, msg);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<BrowserEvent, _> =
            serde_json::from_str(r#"{"type":"Paste","text":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_coordinates_are_rejected() {
        let result: Result<BrowserEvent, _> = serde_json::from_str(r#"{"type":"MouseDown"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_type_name_does_not_expose_path() {
        let msg = BrowserEvent::FilePath {
            path: "/secret/location".to_string(),
        };
        let name = msg.type_name();
        assert_eq!(name, "FilePath");
        assert!(!name.contains("secret"));
    }
}
