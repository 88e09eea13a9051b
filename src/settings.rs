use crate::canvas::model::{self, Color};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Logical canvas size in pixels, independent of how large the canvas is
    /// displayed on screen.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    /// Swatches offered by the palette popup.
    #[serde(default = "model::default_palette")]
    pub palette: Vec<Color>,
    #[serde(default = "default_pen_color")]
    pub pen_color: Color,
    #[serde(default = "default_brush_width")]
    pub brush_width: u32,
    /// Identifier of the hosted model performing image-conditioned generation.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where downloaded canvases are written. `None` means the platform
    /// download directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Replacement for the built-in editing-constraint instructions; must
    /// keep the `{prompt}` placeholder.
    #[serde(default)]
    pub instruction_template: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_canvas_width() -> u32 {
    model::CANVAS_WIDTH
}

fn default_canvas_height() -> u32 {
    model::CANVAS_HEIGHT
}

fn default_background_color() -> Color {
    Color::WHITE
}

fn default_pen_color() -> Color {
    Color::BLACK
}

fn default_brush_width() -> u32 {
    3
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            background_color: default_background_color(),
            palette: model::default_palette(),
            pen_color: default_pen_color(),
            brush_width: default_brush_width(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            export_dir: None,
            instruction_template: None,
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields defaults; a
    /// corrupt file is reported and also yields defaults so the app still
    /// starts.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path, %err, "settings file is invalid, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
