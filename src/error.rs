//! Error types for session setup
//!
//! Nothing inside a tick is fallible: clamping, missed collisions and a paddle
//! resting at its bound are ordinary control flow. Errors only arise while
//! building a session or mounting a frontend.

use thiserror::Error;

/// Rejected configuration (a precondition violation, aborts session setup)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`min` argument must not exceed `max` argument (min: {min}, max: {max})")]
    InvertedRange { min: f32, max: f32 },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Failure to bring up a frontend
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("mount point `{selector}` not found after {attempts} attempts")]
    MountPointMissing { selector: String, attempts: u32 },
}
