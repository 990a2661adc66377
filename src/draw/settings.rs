use crate::draw::model::{Color, Point, SWATCHES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_URL_ENV: &str = "SKETCH_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SketchSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Color,
    #[serde(default = "default_swatches")]
    pub swatches: Vec<Color>,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_reset_settle_ms")]
    pub reset_settle_ms: u64,
    #[serde(default = "default_overlay_position")]
    pub default_overlay_position: Point,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_api_url() -> String {
    "http://localhost:8900".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Widest pen accepted from the settings file.
pub const MAX_LINE_WIDTH: u32 = 256;

fn default_line_width() -> u32 {
    3
}

fn default_stroke_color() -> Color {
    Color::WHITE
}

fn default_swatches() -> Vec<Color> {
    SWATCHES.to_vec()
}

fn default_reveal_delay_ms() -> u64 {
    1000
}

fn default_reset_settle_ms() -> u64 {
    300
}

fn default_overlay_position() -> Point {
    Point::new(10.0, 200.0)
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            line_width: default_line_width(),
            stroke_color: default_stroke_color(),
            swatches: default_swatches(),
            reveal_delay_ms: default_reveal_delay_ms(),
            reset_settle_ms: default_reset_settle_ms(),
            default_overlay_position: default_overlay_position(),
            debug_logging: false,
        }
    }
}

impl SketchSettings {
    pub fn sanitize(&mut self) {
        self.line_width = self.line_width.clamp(1, MAX_LINE_WIDTH);
        self.reveal_delay_ms = self.reveal_delay_ms.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = if trimmed.is_empty() {
            default_api_url()
        } else {
            trimmed.to_string()
        };
        self.stroke_color = self.stroke_color.opaque();
        if self.swatches.is_empty() {
            self.swatches = default_swatches();
        }
    }

    /// Applies `SKETCH_API_URL` when it is set to a non-empty value.
    pub fn apply_env_overrides(&mut self) {
        self.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    }

    fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
            self.sanitize();
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn reset_settle(&self) -> Duration {
        Duration::from_millis(self.reset_settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
