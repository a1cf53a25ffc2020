//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! Network endpoints come from the command line (or `INPUT_BRIDGE_*`
//! environment variables); input behaviour comes from [`InputSettings`],
//! which can be loaded from an optional TOML file:
//!
//! ```toml
//! gating = "consistent"
//! suppress_duplicate_moves = false
//! touch_enabled = true
//! text_buffer_slots = 16
//!
//! [surface]
//! left = 0.0
//! top = 0.0
//! right = 1280.0
//! bottom = 720.0
//! ```
//!
//! Every key is optional; absent keys take the defaults listed on each type.

use std::net::{Ipv4Addr, SocketAddr};

use input_core::{GatingPolicy, SurfaceRect};
use serde::{Deserialize, Serialize};

/// Default port the bridge accepts browser WebSocket connections on.
pub const DEFAULT_WS_PORT: u16 = 5001;

/// Default remote render host endpoint.
pub const DEFAULT_REMOTE_URL: &str = "ws://127.0.0.1:5000";

/// Default bound of the per-session outbound record queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Largest accepted `text_buffer_slots` (256 KiB of scratch per session).
pub const MAX_TEXT_BUFFER_SLOTS: usize = 65_536;

/// All runtime configuration for the bridge.
///
/// Built once at startup and shared across session tasks behind an `Arc`.
///
/// ```rust
/// use input_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 5001);
/// assert_eq!(cfg.remote_url, "ws://127.0.0.1:5000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Address the browser-facing WebSocket server binds to.
    pub ws_bind_addr: SocketAddr,

    /// WebSocket URL of the remote render host.  Each browser session opens
    /// its own connection to it.
    pub remote_url: String,

    /// Bound of the queue between a session's dispatcher and its remote
    /// writer.  Records arriving while the queue is full are dropped.
    pub channel_capacity: usize,

    /// Normalizer and adapter settings applied to every new session.
    pub input: InputSettings,
}

impl Default for BridgeConfig {
    /// | Field            | Default                 |
    /// |------------------|-------------------------|
    /// | ws_bind_addr     | `0.0.0.0:5001`          |
    /// | remote_url       | `ws://127.0.0.1:5000`   |
    /// | channel_capacity | 1024                    |
    /// | input            | `InputSettings::default()` |
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_WS_PORT)),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            input: InputSettings::default(),
        }
    }
}

/// How a pointer-up outside the surface affects the held-button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatingMode {
    /// The held state only changes on transitions inside the surface.
    #[default]
    Consistent,
    /// A pointer-up anywhere ends the drag.
    Legacy,
}

impl From<GatingMode> for GatingPolicy {
    fn from(mode: GatingMode) -> Self {
        match mode {
            GatingMode::Consistent => GatingPolicy::Consistent,
            GatingMode::Legacy => GatingPolicy::Legacy,
        }
    }
}

/// Initial render surface rectangle, in browser client coordinates.
///
/// Pages normally send a `Surface` message as soon as the element is laid
/// out; this is what sessions use until then.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSettings {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default = "default_surface_right")]
    pub right: f64,
    #[serde(default = "default_surface_bottom")]
    pub bottom: f64,
}

impl SurfaceSettings {
    pub fn to_rect(self) -> SurfaceRect {
        SurfaceRect::new(self.left, self.top, self.right, self.bottom)
    }
}

impl Default for SurfaceSettings {
    /// A 1920×1080 surface at the origin.
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: default_surface_right(),
            bottom: default_surface_bottom(),
        }
    }
}

/// Per-session input behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default)]
    pub gating: GatingMode,
    /// Drop held moves that land on the previous move's position.
    #[serde(default)]
    pub suppress_duplicate_moves: bool,
    /// When `false`, touch messages are ignored.
    #[serde(default = "default_true")]
    pub touch_enabled: bool,
    /// Initial text scratch buffer size, in slots.  At most
    /// [`MAX_TEXT_BUFFER_SLOTS`].
    #[serde(default = "default_text_buffer_slots")]
    pub text_buffer_slots: usize,
    #[serde(default)]
    pub surface: SurfaceSettings,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            gating: GatingMode::default(),
            suppress_duplicate_moves: false,
            touch_enabled: default_true(),
            text_buffer_slots: default_text_buffer_slots(),
            surface: SurfaceSettings::default(),
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_text_buffer_slots() -> usize {
    input_core::protocol::codec::DEFAULT_TEXT_SLOTS
}
fn default_surface_right() -> f64 {
    1920.0
}
fn default_surface_bottom() -> f64 {
    1080.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ws_port() {
        // Arrange / Act
        let cfg = BridgeConfig::default();
        // Assert
        assert_eq!(cfg.ws_bind_addr.port(), DEFAULT_WS_PORT);
        assert!(cfg.ws_bind_addr.ip().is_unspecified());
    }

    #[test]
    fn test_default_remote_url() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.remote_url, "ws://127.0.0.1:5000");
    }

    #[test]
    fn test_default_input_settings() {
        let input = InputSettings::default();
        assert_eq!(input.gating, GatingMode::Consistent);
        assert!(!input.suppress_duplicate_moves);
        assert!(input.touch_enabled);
        assert_eq!(input.text_buffer_slots, 16);
        assert_eq!(input.surface.to_rect(), SurfaceRect::default());
    }

    #[test]
    fn test_gating_mode_maps_to_policy() {
        assert_eq!(GatingPolicy::from(GatingMode::Consistent), GatingPolicy::Consistent);
        assert_eq!(GatingPolicy::from(GatingMode::Legacy), GatingPolicy::Legacy);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let input: InputSettings = toml::from_str("").expect("parse");
        assert_eq!(input, InputSettings::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_keys() {
        // Arrange
        let text = r#"
            gating = "legacy"

            [surface]
            right = 1280.0
            bottom = 720.0
        "#;

        // Act
        let input: InputSettings = toml::from_str(text).expect("parse");

        // Assert
        assert_eq!(input.gating, GatingMode::Legacy);
        assert!(input.touch_enabled);
        assert_eq!(
            input.surface.to_rect(),
            SurfaceRect::new(0.0, 0.0, 1280.0, 720.0)
        );
    }

    #[test]
    fn test_unknown_gating_mode_is_rejected() {
        let result: Result<InputSettings, _> = toml::from_str(r#"gating = "sticky""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_settings_toml_round_trip() {
        let mut input = InputSettings::default();
        input.suppress_duplicate_moves = true;
        input.surface.left = 12.5;

        let text = toml::to_string_pretty(&input).expect("serialize");
        let restored: InputSettings = toml::from_str(&text).expect("deserialize");

        assert_eq!(input, restored);
    }
}
