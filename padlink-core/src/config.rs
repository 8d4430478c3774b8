//! Input tuning configuration.
//!
//! Every magic constant of the input pipeline lives here: stick radius and
//! deadzone, repeat and keep-alive intervals, button timings and layout,
//! movement-analysis thresholds and acceleration limits.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PadError;
use crate::keycode::KeyCode;

/// Upper bound for every timer interval in the config (one hour).
pub const MAX_TIMER_MS: u64 = 60 * 60 * 1000;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Screen geometry.
    pub display: DisplayConfig,
    /// Virtual analog sticks.
    pub stick: StickConfig,
    /// Virtual buttons.
    pub buttons: ButtonConfig,
    /// Direct-touch forwarding.
    pub touch: TouchConfig,
    /// Slow-movement detection.
    pub movement: MovementConfig,
    /// Pointer / scroll acceleration.
    pub acceleration: AccelerationConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Screen geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pixels per density-independent pixel.
    pub density: f32,
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
}

/// Virtual analog stick tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StickConfig {
    /// Knob travel radius in dp.
    pub radius_dp: f32,
    /// Per-axis deadzone on the normalized value.
    pub deadzone: f32,
    /// Combined-frame repeat interval while a stick is held.
    pub repeat_interval_ms: u64,
    /// Minimum gap between presence frames while no stick is held.
    /// Zero disables them.
    pub keepalive_ms: u64,
}

/// Virtual button tuning and layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    /// Delay before a simulated short press is released.
    pub auto_release_ms: u64,
    /// Hold time on SELECT that enters edit mode.
    pub long_press_ms: u64,
    /// Button edge length in dp.
    pub size_dp: f32,
    /// On-screen button placement.
    pub layout: Vec<ButtonSpec>,
}

/// Placement of one virtual button, as fractions of the screen size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonSpec {
    pub label: String,
    pub key: KeyCode,
    pub x: f32,
    pub y: f32,
}

impl ButtonSpec {
    pub fn new(label: &str, key: KeyCode, x: f32, y: f32) -> Self {
        Self {
            label: label.into(),
            key,
            x,
            y,
        }
    }
}

/// Direct-touch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TouchConfig {
    /// Touches that start outside the remote desktop pan the local view
    /// instead of reaching the remote.
    pub off_canvas_panning: bool,
}

/// Slow-movement analysis tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Sliding window length.
    pub window_ms: u64,
    /// Minimum spacing between two analyses.
    pub analysis_interval_ms: u64,
    /// History required before the first verdict.
    pub min_history_ms: u64,
    /// Entry threshold in dp per second.
    pub slow_threshold_dp: f32,
    /// Exit threshold = entry threshold × this.
    pub exit_multiplier: f32,
    /// Rough dp → px conversion applied to path length.
    pub dp_to_px_ratio: f32,
}

/// Acceleration tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccelerationConfig {
    /// Multiplier gained per px/ms of speed.
    pub factor: f32,
    /// Upper bound on the multiplier.
    pub max: f32,
    /// Base multiplier for two-finger scrolling.
    pub scroll_base: f32,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            stick: StickConfig::default(),
            buttons: ButtonConfig::default(),
            touch: TouchConfig::default(),
            movement: MovementConfig::default(),
            acceleration: AccelerationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            density: 2.0,
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            radius_dp: 40.0,
            deadzone: 0.1,
            repeat_interval_ms: 50,
            keepalive_ms: 1000,
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            auto_release_ms: 50,
            long_press_ms: 1000,
            size_dp: 60.0,
            layout: default_layout(),
        }
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            off_canvas_panning: true,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            window_ms: 2000,
            analysis_interval_ms: 200,
            min_history_ms: 1000,
            slow_threshold_dp: 30.0,
            exit_multiplier: 8.0,
            dp_to_px_ratio: 2.0,
        }
    }
}

impl Default for AccelerationConfig {
    fn default() -> Self {
        Self {
            factor: 0.5,
            max: 2.5,
            scroll_base: 1.6,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Xbox-style layout: face buttons bottom right, d-pad bottom left,
/// shoulders along the top, stick clicks above the stick areas.
pub fn default_layout() -> Vec<ButtonSpec> {
    vec![
        ButtonSpec::new("A", KeyCode::BUTTON_A, 0.85, 0.70),
        ButtonSpec::new("B", KeyCode::BUTTON_B, 0.90, 0.80),
        ButtonSpec::new("X", KeyCode::BUTTON_X, 0.80, 0.80),
        ButtonSpec::new("Y", KeyCode::BUTTON_Y, 0.85, 0.90),
        ButtonSpec::new("START", KeyCode::BUTTON_START, 0.70, 0.85),
        ButtonSpec::new("SELECT", KeyCode::BUTTON_SELECT, 0.60, 0.85),
        ButtonSpec::new("DPAD_UP", KeyCode::DPAD_UP, 0.15, 0.70),
        ButtonSpec::new("DPAD_DOWN", KeyCode::DPAD_DOWN, 0.15, 0.90),
        ButtonSpec::new("DPAD_LEFT", KeyCode::DPAD_LEFT, 0.10, 0.80),
        ButtonSpec::new("DPAD_RIGHT", KeyCode::DPAD_RIGHT, 0.20, 0.80),
        ButtonSpec::new("L1", KeyCode::BUTTON_L1, 0.15, 0.05),
        ButtonSpec::new("L2", KeyCode::BUTTON_L2, 0.15, 0.12),
        ButtonSpec::new("R1", KeyCode::BUTTON_R1, 0.85, 0.05),
        ButtonSpec::new("R2", KeyCode::BUTTON_R2, 0.85, 0.12),
        ButtonSpec::new("LEFT_STICK_CLICK", KeyCode::BUTTON_THUMBL, 0.25, 0.55),
        ButtonSpec::new("RIGHT_STICK_CLICK", KeyCode::BUTTON_THUMBR, 0.75, 0.55),
    ]
}

// ── Derived values ───────────────────────────────────────────────

impl InputConfig {
    /// Stick travel radius in pixels.
    pub fn stick_radius_px(&self) -> f32 {
        self.stick.radius_dp * self.display.density
    }

    /// Button edge length in pixels.
    pub fn button_size_px(&self) -> f32 {
        self.buttons.size_dp * self.display.density
    }

    /// Reject values the input pipeline cannot work with.
    pub fn validate(&self) -> Result<(), PadError> {
        if !(self.display.density > 0.0) {
            return Err(PadError::InvalidConfig("display.density must be positive".into()));
        }
        if !(self.stick.radius_dp > 0.0) {
            return Err(PadError::InvalidConfig("stick.radius_dp must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.stick.deadzone) {
            return Err(PadError::InvalidConfig(format!(
                "stick.deadzone must be in [0, 1), got {}",
                self.stick.deadzone
            )));
        }
        if self.stick.repeat_interval_ms == 0 {
            return Err(PadError::InvalidConfig(
                "stick.repeat_interval_ms must be non-zero".into(),
            ));
        }
        for (name, ms) in [
            ("stick.repeat_interval_ms", self.stick.repeat_interval_ms),
            ("stick.keepalive_ms", self.stick.keepalive_ms),
            ("buttons.auto_release_ms", self.buttons.auto_release_ms),
            ("buttons.long_press_ms", self.buttons.long_press_ms),
        ] {
            if ms > MAX_TIMER_MS {
                return Err(PadError::InvalidConfig(format!(
                    "{name} must be at most {MAX_TIMER_MS} ms, got {ms}"
                )));
            }
        }
        if self.movement.exit_multiplier < 1.0 {
            return Err(PadError::InvalidConfig(
                "movement.exit_multiplier must be at least 1".into(),
            ));
        }
        if self.acceleration.max < 1.0 {
            return Err(PadError::InvalidConfig("acceleration.max must be at least 1".into()));
        }
        Ok(())
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, PadError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default config to a file.
    pub fn write_default(path: &Path) -> Result<(), PadError> {
        let text = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = toml::to_string_pretty(&InputConfig::default()).unwrap();
        assert!(text.contains("radius_dp"));
        assert!(text.contains("auto_release_ms"));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = InputConfig::from_toml_str("[stick]\ndeadzone = 0.2\n").unwrap();
        assert_eq!(cfg.stick.deadzone, 0.2);
        assert_eq!(cfg.stick.radius_dp, 40.0);
        assert_eq!(cfg.buttons.layout.len(), 16);
    }

    #[test]
    fn roundtrip_config() {
        let text = toml::to_string_pretty(&InputConfig::default()).unwrap();
        let parsed = InputConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, InputConfig::default());
    }

    #[test]
    fn rejects_out_of_range_deadzone() {
        let err = InputConfig::from_toml_str("[stick]\ndeadzone = 1.5\n").unwrap_err();
        assert!(matches!(err, PadError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_timer_intervals_past_one_hour() {
        for doc in [
            "[stick]\nrepeat_interval_ms = 3600001\n",
            "[stick]\nkeepalive_ms = 100000000000\n",
            "[buttons]\nauto_release_ms = 3600001\n",
            "[buttons]\nlong_press_ms = 7200000\n",
        ] {
            let err = InputConfig::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, PadError::InvalidConfig(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn accepts_timer_interval_of_exactly_one_hour() {
        let cfg = InputConfig::from_toml_str("[stick]\nkeepalive_ms = 3600000\n").unwrap();
        assert_eq!(cfg.stick.keepalive_ms, MAX_TIMER_MS);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = InputConfig::from_toml_str("[stick\n").unwrap_err();
        assert!(matches!(err, PadError::ConfigParse(_)));
    }

    #[test]
    fn derived_pixel_sizes() {
        let cfg = InputConfig::default();
        assert_eq!(cfg.stick_radius_px(), 80.0);
        assert_eq!(cfg.button_size_px(), 120.0);
    }

    #[test]
    fn load_missing_file_falls_back() {
        let cfg = InputConfig::load(Path::new("/nonexistent/padlink.toml"));
        assert_eq!(cfg, InputConfig::default());
    }

    #[test]
    fn written_default_loads_back() {
        let path = std::env::temp_dir().join(format!("padlink-{}.toml", std::process::id()));
        InputConfig::write_default(&path).unwrap();
        let cfg = InputConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg, InputConfig::default());
    }
}
