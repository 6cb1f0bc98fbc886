//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::timeline::{DEFAULT_PIXELS_PER_SECOND, DEFAULT_TIMELINE_SPAN_SECS};

/// Settings an editor is created with. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Timeline scale.
    pub pixels_per_second: f64,
    /// Seconds after which the playhead wraps to zero.
    pub timeline_span_secs: f64,
    /// Whether clip resizes may not exceed a known media length.
    pub cap_clips_to_media: bool,
    /// Width of a new canvas.
    pub default_width: u32,
    /// Height of a new canvas.
    pub default_height: u32,
    /// Background color of a new canvas.
    pub background_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
            timeline_span_secs: DEFAULT_TIMELINE_SPAN_SECS,
            cap_clips_to_media: false,
            default_width: 1080,
            default_height: 1080,
            background_color: "#ffffff".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
