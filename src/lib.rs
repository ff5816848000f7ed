//! Breakout - paddle, ball and a wall of blocks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle, ball, block field, tick engine)
//! - `game`: Menu / in-progress / won / lost / quit state machine
//! - `render`: Render sink interface consumed by frontends
//! - `platform`: Fixed-step clock and mount-point retry shared by frontends
//! - `settings`: Playfield geometry and gameplay tuning

pub mod error;
pub mod game;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SetupError};
pub use game::{Command, Game, GamePhase, Observer, Scheduler};
pub use settings::{Playfield, Settings, Tuning};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Playfield (container) dimensions
    pub const CONTAINER_WIDTH: f32 = 750.0;
    pub const CONTAINER_HEIGHT: f32 = 500.0;

    /// Ball bounding square
    pub const BALL_DIAMETER: f32 = 20.0;

    /// Block grid
    pub const BLOCK_WIDTH: f32 = 75.0;
    pub const BLOCK_HEIGHT: f32 = 15.0;
    pub const BLOCK_PADDING: f32 = 16.0;
    pub const COLUMNS: usize = 5;
    pub const ROWS: usize = 3;

    /// Paddle uses the block footprint and sits flush with the bottom edge
    pub const PADDLE_WIDTH: f32 = BLOCK_WIDTH;
    pub const PADDLE_THICKNESS: f32 = BLOCK_HEIGHT;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 0.0;
    /// Distance covered by one keyboard step
    pub const PADDLE_STEP: f32 = 5.0;

    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.05;

    /// Initial direction components are drawn from this range (zero excluded)
    pub const DIRECTION_MIN: f32 = -1.0;
    pub const DIRECTION_MAX: f32 = 1.0;
    /// Initial speed multiplier range
    pub const SPEED_MIN: f32 = 7.0;
    pub const SPEED_MAX: f32 = 10.0;

    /// Fixed simulation period (60 Hz)
    pub const TICK_PERIOD_MS: f32 = 1000.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Mount-point lookup retry policy
    pub const MOUNT_ATTEMPTS: u32 = 5;
    pub const MOUNT_RETRY_DELAY_MS: u64 = 100;
}

/// Uniform random number in `[min, max)`, never exactly zero
///
/// Returns `min` when the range is empty and fails when it is inverted.
pub fn random_between<R: Rng + ?Sized>(
    rng: &mut R,
    min: f32,
    max: f32,
) -> Result<f32, ConfigError> {
    if min > max || min.is_nan() || max.is_nan() {
        return Err(ConfigError::InvertedRange { min, max });
    }
    if min == max {
        return Ok(min);
    }

    loop {
        let value = rng.random_range(min..max);
        if value != 0.0 {
            return Ok(value);
        }
    }
}
