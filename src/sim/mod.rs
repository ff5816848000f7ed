//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by block slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionSide, resolve_side};
pub use rect::{Rect, spans_overlap};
pub use state::{
    Ball, Block, BlockField, Direction, Envelope, GameEvent, Paddle, Session, Terminal,
};
pub use tick::tick;
