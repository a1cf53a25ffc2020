//! TOML settings file loading.
//!
//! The bridge reads [`InputSettings`] from the file named by `--config`.
//! Absent keys fall back to their serde defaults, so a file only needs the
//! values it changes.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::config::{InputSettings, MAX_TEXT_BUFFER_SLOTS};

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Parses settings from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not valid TOML or a value
/// has the wrong type, and [`ConfigError::Invalid`] if a value is out of
/// range.
pub fn parse_input_settings(text: &str) -> Result<InputSettings, ConfigError> {
    let settings: InputSettings = toml::from_str(text)?;
    if settings.text_buffer_slots > MAX_TEXT_BUFFER_SLOTS {
        return Err(ConfigError::Invalid {
            field: "text_buffer_slots",
            reason: format!(
                "{} exceeds the maximum of {MAX_TEXT_BUFFER_SLOTS}",
                settings.text_buffer_slots
            ),
        });
    }
    Ok(settings)
}

/// Loads settings from `path`.
///
/// The file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_input_settings`].
pub fn load_input_settings(path: &Path) -> Result<InputSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input_settings(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
