//! Playfield geometry and gameplay tuning
//!
//! Both are fixed for the lifetime of a session. Every field has a default from
//! [`crate::consts`], so a partial JSON document only overrides what it names.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SetupError};

/// Immutable playfield dimensions for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_thickness: f32,
    /// Gap between the paddle's bottom edge and the playfield floor
    pub paddle_bottom_margin: f32,
    pub ball_diameter: f32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_padding: f32,
    pub columns: usize,
    pub rows: usize,
    /// Tick period in milliseconds
    pub tick_period_ms: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: CONTAINER_WIDTH,
            height: CONTAINER_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_thickness: PADDLE_THICKNESS,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            ball_diameter: BALL_DIAMETER,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_padding: BLOCK_PADDING,
            columns: COLUMNS,
            rows: ROWS,
            tick_period_ms: TICK_PERIOD_MS,
        }
    }
}

impl Playfield {
    /// Total width of one row of blocks including the gaps between them
    pub fn layout_width(&self) -> f32 {
        let cols = self.columns as f32;
        self.block_width * cols + self.block_padding * (cols - 1.0).max(0.0)
    }

    /// Top-left corner of the block in grid cell `(row, col)`
    pub fn block_origin(&self, row: usize, col: usize) -> Vec2 {
        let left = self.width / 2.0 - self.layout_width() / 2.0;
        Vec2::new(
            left + col as f32 * (self.block_width + self.block_padding),
            row as f32 * (self.block_height + self.block_padding),
        )
    }

    /// Top edge of the paddle
    pub fn paddle_top(&self) -> f32 {
        self.height - self.paddle_bottom_margin - self.paddle_thickness
    }

    /// Rightmost allowed paddle position (left edge)
    pub fn paddle_max_position(&self) -> f32 {
        self.width - self.paddle_width
    }

    /// Where the ball starts each session
    pub fn ball_start(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Total height of the block grid including the gaps between rows
    pub fn layout_height(&self) -> f32 {
        let rows = self.rows as f32;
        self.block_height * rows + self.block_padding * (rows - 1.0).max(0.0)
    }

    /// Tick period, falling back to the default for unrepresentable values
    pub fn tick_period(&self) -> Duration {
        self.checked_tick_period()
            .unwrap_or_else(|| Duration::from_secs_f32(TICK_PERIOD_MS / 1000.0))
    }

    fn checked_tick_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f32(self.tick_period_ms / 1000.0)
            .ok()
            .filter(|period| !period.is_zero())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("playfield.width", self.width)?;
        positive("playfield.height", self.height)?;
        positive("playfield.paddle_width", self.paddle_width)?;
        positive("playfield.paddle_thickness", self.paddle_thickness)?;
        positive("playfield.ball_diameter", self.ball_diameter)?;
        positive("playfield.block_width", self.block_width)?;
        positive("playfield.block_height", self.block_height)?;
        positive("playfield.tick_period_ms", self.tick_period_ms)?;
        if self.checked_tick_period().is_none() {
            return Err(invalid(
                "playfield.tick_period_ms",
                format!("{} ms is not a usable tick period", self.tick_period_ms),
            ));
        }

        if self.block_padding < 0.0 || self.paddle_bottom_margin < 0.0 {
            return Err(invalid("playfield", "padding and margins must not be negative"));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(invalid("playfield.grid", "need at least one row and one column"));
        }
        if self.layout_width() > self.width {
            return Err(invalid(
                "playfield.grid",
                format!(
                    "{} wide layout does not fit {} wide playfield",
                    self.layout_width(),
                    self.width
                ),
            ));
        }
        if self.paddle_width > self.width {
            return Err(invalid("playfield.paddle_width", "paddle is wider than the playfield"));
        }
        if self.ball_diameter >= self.width || self.ball_diameter >= self.height {
            return Err(invalid("playfield.ball_diameter", "ball does not fit the playfield"));
        }
        if self.paddle_top() < 0.0 {
            return Err(invalid(
                "playfield.paddle_bottom_margin",
                "paddle sits above the playfield",
            ));
        }
        // Blocks at or below the paddle line can never be reached
        if self.layout_height() > self.paddle_top() {
            return Err(invalid(
                "playfield.grid",
                format!(
                    "{} tall layout reaches past the paddle at {}",
                    self.layout_height(),
                    self.paddle_top()
                ),
            ));
        }
        Ok(())
    }
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance covered by one paddle step
    pub paddle_step: f32,
    /// Velocity multiplier applied on every paddle hit
    pub paddle_boost: f32,
    /// Optional ceiling for the ball's velocity (unbounded when `None`)
    pub max_velocity: Option<f32>,
    /// Range for the initial `rise` and `run` components
    pub direction_range: (f32, f32),
    /// Range for the initial velocity
    pub speed_range: (f32, f32),
    /// Ticks after a paddle hit during which the paddle is ignored
    pub paddle_cooldown_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_step: PADDLE_STEP,
            paddle_boost: PADDLE_BOOST,
            max_velocity: None,
            direction_range: (DIRECTION_MIN, DIRECTION_MAX),
            speed_range: (SPEED_MIN, SPEED_MAX),
            paddle_cooldown_ticks: 0,
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("tuning.paddle_step", self.paddle_step)?;
        if self.paddle_boost.is_nan() || self.paddle_boost < 1.0 {
            return Err(invalid("tuning.paddle_boost", "boost must be at least 1.0"));
        }
        if let Some(cap) = self.max_velocity {
            positive("tuning.max_velocity", cap)?;
        }
        if self.speed_range.0 <= 0.0 {
            return Err(invalid("tuning.speed_range", "speed must be positive"));
        }
        Ok(())
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playfield: Playfield,
    pub tuning: Tuning,
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject geometry and tuning that cannot produce a playable session
    ///
    /// Inverted direction/speed ranges are reported when the ball is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playfield.validate()?;
        self.tuning.validate()
    }

    /// Element holding optional JSON settings (WASM only)
    #[cfg(target_arch = "wasm32")]
    const SETTINGS_ELEMENT_ID: &'static str = "breakout-settings";

    /// Load settings embedded in the page, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring page settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Settings file read by the native binary
    #[cfg(not(target_arch = "wasm32"))]
    const SETTINGS_FILE: &'static str = "breakout.json";

    /// Load `breakout.json` from the working directory, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::SETTINGS_FILE) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::SETTINGS_FILE);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", Self::SETTINGS_FILE, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be positive, got {}", value)))
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}
