use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use zmapper_core::{GridSpec, ParamValues, SliderRange};

/// Formula shown on first launch.
pub const DEFAULT_FORMULA: &str = "a*sin(w*z)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_true")]
    pub restore_last_session: bool,
    #[serde(default = "default_formula")]
    pub last_formula: String,
    #[serde(default)]
    pub last_parameters: ParamValues,
    #[serde(default)]
    pub grid: GridSpec,
    /// Slider range given to parameters that appear for the first time.
    #[serde(default)]
    pub slider_range: SliderRange,
    /// Stroke width of interior grid lines, in pixels.
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    #[serde(default = "default_true")]
    pub show_hud: bool,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_true() -> bool {
    true
}
fn default_formula() -> String {
    DEFAULT_FORMULA.to_string()
}
fn default_line_width() -> f32 {
    1.0
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            restore_last_session: true,
            last_formula: default_formula(),
            last_parameters: ParamValues::new(),
            grid: GridSpec::default(),
            slider_range: SliderRange::default(),
            line_width: default_line_width(),
            show_hud: true,
        }
    }
}

impl AppPreferences {
    /// Load preferences from the config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs.sanitized();
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Replace values a hand-edited file may have broken.
    fn sanitized(mut self) -> Self {
        if self.grid.validate().is_err() {
            error!("Stored grid is invalid, using the default grid");
            self.grid = GridSpec::default();
        }
        let r = self.slider_range;
        if SliderRange::new(r.min, r.max, r.ticks).is_err() {
            error!("Stored slider range is invalid, using the default range");
            self.slider_range = SliderRange::default();
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            self.line_width = default_line_width();
        }
        self
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::config_directory().join("preferences.json")
}
